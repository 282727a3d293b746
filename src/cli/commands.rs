use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "charcounter")]
#[command(about = "Counts Cyrillic characters in Medium and WordPress articles")]
#[command(version)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set (overrides LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Telegram bot (long polling)
    Run,

    /// Fetch one article and print its character count
    Count {
        /// Article URL (Medium or WordPress)
        url: String,
    },

    /// Show which source handles a URL and what would be fetched, without fetching
    Resolve {
        /// Article URL (Medium or WordPress)
        url: String,
    },
}
