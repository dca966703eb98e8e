use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chorus::app::AppContext;
use chorus::cli::{commands, Cli, Commands};
use chorus::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(secs) = cli.timeout {
        config.session.timeout_secs = secs;
    }
    if let Commands::Extract { headful: true, .. } = cli.command {
        config.browser.headless = false;
    }

    let ctx = AppContext::new(config, None)?;

    match cli.command {
        Commands::Extract {
            url,
            min_likes,
            export,
            ..
        } => {
            commands::extract(&ctx, &url, min_likes, export).await?;
        }
        Commands::Cached { url } => {
            commands::show_cached(&ctx, &url)?;
        }
        Commands::Export { url } => {
            commands::export_cached(&ctx, &url).await?;
        }
    }

    Ok(())
}
