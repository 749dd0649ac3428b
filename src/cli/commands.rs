use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(about = "Watches Practicum homework reviews and reports status changes to Telegram")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the watch loop
    Run {
        /// Poll interval in seconds
        #[arg(short, long)]
        interval: Option<u64>,

        /// Log notifications instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Perform a single poll cycle and print the result without notifying
    Check {
        /// Poll from this Unix timestamp instead of now
        #[arg(long)]
        from_date: Option<i64>,
    },
}
