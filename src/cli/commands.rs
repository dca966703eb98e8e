use std::sync::Arc;

use tracing::warn;

use crate::app::{AppContext, Result};
use crate::browser::ChromeHost;
use crate::client::{restore, SessionOutcome, StatusKind, StatusSink};
use crate::domain::Comment;
use crate::export::format_likes;

/// Prints status lines to the terminal.
pub struct TerminalStatus;

impl StatusSink for TerminalStatus {
    fn status(&mut self, kind: StatusKind, message: &str) {
        match kind {
            StatusKind::Loading => println!("… {}", message),
            StatusKind::Success | StatusKind::Info => println!("{}", message),
            StatusKind::Error => eprintln!("Error: {}", message),
        }
    }
}

pub async fn extract(
    ctx: &AppContext,
    url: &str,
    min_likes: Option<u64>,
    export: bool,
) -> Result<()> {
    let min_likes = min_likes.unwrap_or(ctx.config.session.default_min_likes);
    let host = ctx.launch_host().await?;

    let result = run_extract(ctx, host.clone(), url, min_likes, export).await;
    shutdown(&host).await;
    result
}

async fn run_extract(
    ctx: &AppContext,
    host: Arc<ChromeHost>,
    url: &str,
    min_likes: u64,
    export: bool,
) -> Result<()> {
    host.open(url).await?;
    let client = ctx.client(host);
    let mut sink = TerminalStatus;

    if let SessionOutcome::Comments { comments, .. } =
        client.extract(url, min_likes, &mut sink).await?
    {
        print_comments(&comments);
        if export {
            client.export(&comments, &mut sink).await;
        }
    }

    Ok(())
}

pub fn show_cached(ctx: &AppContext, url: &str) -> Result<()> {
    let mut sink = TerminalStatus;
    match restore(ctx.cache.as_ref(), url, &mut sink)? {
        Some(cached) => {
            println!(
                "Cached {} (min likes: {})",
                cached.cached_at.format("%Y-%m-%d %H:%M"),
                cached.min_likes
            );
            print_comments(&cached.comments);
        }
        None => println!("No cached comments for {}", url),
    }
    Ok(())
}

pub async fn export_cached(ctx: &AppContext, url: &str) -> Result<()> {
    let mut sink = TerminalStatus;
    let Some(cached) = restore(ctx.cache.as_ref(), url, &mut sink)? else {
        println!("No cached comments for {}; run `chorus extract` first", url);
        return Ok(());
    };

    // The page is opened only so the export can be named after its title.
    let host = ctx.launch_host().await?;
    let result = match host.open(url).await {
        Ok(_) => {
            ctx.client(host.clone())
                .export(&cached.comments, &mut sink)
                .await;
            Ok(())
        }
        Err(e) => Err(e),
    };
    shutdown(&host).await;
    result
}

fn print_comments(comments: &[Comment]) {
    for comment in comments {
        println!("{:>7}  {}", format_likes(comment.likes), comment.text);
    }
}

async fn shutdown(host: &ChromeHost) {
    if let Err(e) = host.close().await {
        warn!("Failed to shut down browser: {}", e);
    }
}
