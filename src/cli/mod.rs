pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chorus")]
#[command(about = "Extract the most-liked YouTube comments", long_about = None)]
pub struct Cli {
    /// Seconds before an extraction is abandoned (overrides the config file)
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a video page and extract its liked comments
    Extract {
        /// Watch URL of the video
        url: String,

        /// Minimum likes a comment needs (default from config)
        #[arg(short, long)]
        min_likes: Option<u64>,

        /// Export the result to a text file
        #[arg(short, long)]
        export: bool,

        /// Show the browser window
        #[arg(long)]
        headful: bool,
    },
    /// Show the last cached result for a video
    Cached {
        /// Watch URL of the video
        url: String,
    },
    /// Export the last cached result for a video
    Export {
        /// Watch URL of the video
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extract_with_flags() {
        let cli = Cli::parse_from([
            "chorus",
            "extract",
            "https://www.youtube.com/watch?v=abc",
            "--min-likes",
            "0",
            "--export",
            "--timeout",
            "5",
        ]);

        assert_eq!(cli.timeout, Some(5));
        match cli.command {
            Commands::Extract {
                url,
                min_likes,
                export,
                headful,
            } => {
                assert_eq!(url, "https://www.youtube.com/watch?v=abc");
                assert_eq!(min_likes, Some(0));
                assert!(export);
                assert!(!headful);
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_parse_cached() {
        let cli = Cli::parse_from(["chorus", "cached", "https://www.youtube.com/watch?v=abc"]);
        assert_eq!(cli.timeout, None);
        assert!(matches!(cli.command, Commands::Cached { .. }));
    }
}
