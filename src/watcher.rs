use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::{BotError, Result};
use crate::practicum::{response, status, PracticumClient};
use crate::telegram::Notifier;

/// Per-iteration loop state, threaded through each tick by ownership.
#[derive(Debug)]
pub struct WatchState {
    /// Lower bound for the next poll, a Unix timestamp.
    pub cursor: i64,
    /// Text of the most recently delivered notification, error notices
    /// included. Compared by literal equality to suppress repeats.
    pub last_message: Option<String>,
}

impl WatchState {
    pub fn starting_now() -> Self {
        Self {
            cursor: Utc::now().timestamp(),
            last_message: None,
        }
    }
}

enum PollOutcome {
    StatusChanged { message: String, next_cursor: i64 },
    NothingNew,
}

pub struct Watcher<N> {
    client: PracticumClient,
    notifier: N,
    interval: Duration,
}

impl<N: Notifier> Watcher<N> {
    pub fn new(client: PracticumClient, notifier: N, interval: Duration) -> Self {
        Self {
            client,
            notifier,
            interval,
        }
    }

    /// Run the poll loop until the process is terminated. The sleep executes
    /// on every branch, iteration failures included.
    pub async fn run(&self, mut state: WatchState) {
        info!(
            interval_secs = self.interval.as_secs(),
            from_date = state.cursor,
            "homework watcher started"
        );

        loop {
            self.tick(&mut state).await;
            sleep(self.interval).await;
        }
    }

    /// One poll iteration. Errors are reported to the chat (deduplicated) and
    /// swallowed, never returned.
    pub async fn tick(&self, state: &mut WatchState) {
        match self.poll_once(state.cursor).await {
            Ok(PollOutcome::StatusChanged {
                message,
                next_cursor,
            }) => match self.notify_if_changed(state, &message).await {
                Ok(()) => state.cursor = next_cursor,
                Err(e) => {
                    error!("iteration failed: {e}");
                    self.report_failure(state, &e).await;
                }
            },
            Ok(PollOutcome::NothingNew) => {
                debug!("no new homework statuses");
            }
            Err(e) => {
                error!("iteration failed: {e}");
                self.report_failure(state, &e).await;
            }
        }
    }

    async fn poll_once(&self, cursor: i64) -> Result<PollOutcome> {
        let answer = self.client.get_homework_statuses(cursor).await?;
        let homeworks = response::check_response(&answer)?;

        let Some(first) = homeworks.first() else {
            // Deliberate: the cursor stays put on an empty list even when the
            // answer carries a fresh current_date, so a quiet server keeps
            // re-fetching the same window.
            return Ok(PollOutcome::NothingNew);
        };

        let message = status::parse_status(first)?;
        let next_cursor = response::current_date(&answer).unwrap_or(cursor);

        Ok(PollOutcome::StatusChanged {
            message,
            next_cursor,
        })
    }

    /// Send `text` unless it repeats the last delivered notification.
    async fn notify_if_changed(&self, state: &mut WatchState, text: &str) -> Result<()> {
        if state.last_message.as_deref() == Some(text) {
            debug!("notification text unchanged, skipping send");
            return Ok(());
        }

        self.notifier.send(text).await?;
        state.last_message = Some(text.to_string());
        Ok(())
    }

    /// Best-effort failure notice. A send failure here is logged and
    /// swallowed so the loop always reaches its sleep.
    async fn report_failure(&self, state: &mut WatchState, error: &BotError) {
        let notice = format!("Сбой в работе программы: {error}");
        if let Err(e) = self.notify_if_changed(state, &notice).await {
            error!("failed to deliver failure notice: {e}");
        }
    }
}
