mod cli;
mod config;
mod error;
mod practicum;
mod telegram;
mod watcher;

use std::time::Duration;

use clap::Parser;
use colored::*;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};
use config::Config;
use error::Result;
use practicum::{response, status, PracticumClient};
use telegram::{DryRunNotifier, TelegramNotifier};
use watcher::{WatchState, Watcher};

#[tokio::main]
async fn main() {
    let _log_guard = init_logging();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run { interval, dry_run } => run_watcher(&config, interval, dry_run).await,

        Commands::Check { from_date } => {
            info!("running a single poll cycle");
            check_once(&config, from_date).await
        }
    };

    if let Err(e) = result {
        error!("{}", format!("Error: {e}").red());
        std::process::exit(1);
    }
}

/// Log to stdout and to homework-bot.log, filtered by RUST_LOG when set.
fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::never(".", "homework-bot.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("homework_bot=debug,info")),
        )
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    guard
}

async fn run_watcher(config: &Config, interval_override: Option<u64>, dry_run: bool) -> Result<()> {
    let interval = interval_override
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.watch.poll_interval());

    println!("{}", "Watching homework reviews...".cyan());
    println!("Interval: {} seconds", interval.as_secs());
    if dry_run {
        println!("{}", "Dry run: notifications are logged, not sent".yellow());
    }

    let client = PracticumClient::new(&config.practicum_token, &config.watch.endpoint)?;
    let state = WatchState::starting_now();

    if dry_run {
        Watcher::new(client, DryRunNotifier, interval).run(state).await;
    } else {
        let notifier = TelegramNotifier::new(&config.telegram_token, config.telegram_chat_id);
        Watcher::new(client, notifier, interval).run(state).await;
    }

    Ok(())
}

async fn check_once(config: &Config, from_date: Option<i64>) -> Result<()> {
    let client = PracticumClient::new(&config.practicum_token, &config.watch.endpoint)?;
    let cursor = from_date.unwrap_or_else(|| chrono::Utc::now().timestamp());

    let answer = client.get_homework_statuses(cursor).await?;
    let homeworks = response::check_response(&answer)?;

    println!("{}", "=== Poll Result ===".cyan().bold());
    println!("From date:    {cursor}");
    println!("Homeworks:    {}", homeworks.len());
    if let Some(date) = response::current_date(&answer) {
        println!("Server date:  {date}");
    }

    match homeworks.first() {
        Some(first) => {
            let message = status::parse_status(first)?;
            println!("\n{message}");
        }
        None => println!("{}", "No homework status updates.".yellow()),
    }

    Ok(())
}
