use async_trait::async_trait;
use teloxide::prelude::*;
use tracing::{debug, error, info};

use crate::error::Result;

/// Outbound message channel for the watcher. Deduplication lives in the
/// watcher, not here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str, chat_id: i64) -> Self {
        Self {
            bot: Bot::new(bot_token),
            chat_id: ChatId(chat_id),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        info!("sending message to Telegram");
        if let Err(e) = self.bot.send_message(self.chat_id, text).await {
            error!("failed to send message to Telegram: {e}");
            return Err(e.into());
        }
        debug!("message delivered to Telegram");
        Ok(())
    }
}

/// Logs the message instead of sending it, for `--dry-run`.
pub struct DryRunNotifier;

#[async_trait]
impl Notifier for DryRunNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        info!("dry run, would send to Telegram: {text}");
        Ok(())
    }
}
