use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::error::{BotError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 600;

const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: i64,
    pub watch: WatchConfig,
}

/// Non-secret tunables, overridable via `config/default.toml` or
/// `HOMEWORK_`-prefixed environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct WatchConfig {
    pub endpoint: String,
    pub poll_interval_secs: u64,
}

impl WatchConfig {
    fn load() -> Result<Self> {
        Self::build().map_err(|e| BotError::Config(format!("failed to load settings: {e}")))
    }

    fn build() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .set_default("endpoint", DEFAULT_ENDPOINT)?
            .set_default("poll_interval_secs", DEFAULT_POLL_INTERVAL_SECS)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("HOMEWORK").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Config {
    /// Load configuration from the environment, failing before any network
    /// activity if a required variable is absent. Every missing variable is
    /// reported, not just the first.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        info!("checking required tokens");
        let practicum = non_empty(std::env::var(PRACTICUM_TOKEN_VAR).ok());
        let telegram = non_empty(std::env::var(TELEGRAM_TOKEN_VAR).ok());
        let chat = non_empty(std::env::var(TELEGRAM_CHAT_ID_VAR).ok());

        let missing = missing_tokens(practicum.as_deref(), telegram.as_deref(), chat.as_deref());
        let (Some(practicum_token), Some(telegram_token), Some(chat_raw)) =
            (practicum, telegram, chat)
        else {
            return Err(BotError::MissingConfig(
                missing.iter().map(ToString::to_string).collect(),
            ));
        };

        let telegram_chat_id: i64 = chat_raw.trim().parse().map_err(|_| {
            BotError::Config(format!(
                "{TELEGRAM_CHAT_ID_VAR} must be an integer chat id, got {chat_raw:?}"
            ))
        })?;

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            watch: WatchConfig::load()?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Names of the required variables that are absent or blank.
pub fn missing_tokens(
    practicum: Option<&str>,
    telegram: Option<&str>,
    chat_id: Option<&str>,
) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if practicum.map_or(true, |v| v.trim().is_empty()) {
        missing.push(PRACTICUM_TOKEN_VAR);
    }
    if telegram.map_or(true, |v| v.trim().is_empty()) {
        missing.push(TELEGRAM_TOKEN_VAR);
    }
    if chat_id.map_or(true, |v| v.trim().is_empty()) {
        missing.push(TELEGRAM_CHAT_ID_VAR);
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_exactly_the_missing_subset() {
        let p = Some("practicum-token");
        let t = Some("telegram-token");
        let c = Some("42");

        let cases: [(Option<&str>, Option<&str>, Option<&str>, &[&str]); 8] = [
            (p, t, c, &[]),
            (None, t, c, &[PRACTICUM_TOKEN_VAR]),
            (p, None, c, &[TELEGRAM_TOKEN_VAR]),
            (p, t, None, &[TELEGRAM_CHAT_ID_VAR]),
            (None, None, c, &[PRACTICUM_TOKEN_VAR, TELEGRAM_TOKEN_VAR]),
            (None, t, None, &[PRACTICUM_TOKEN_VAR, TELEGRAM_CHAT_ID_VAR]),
            (p, None, None, &[TELEGRAM_TOKEN_VAR, TELEGRAM_CHAT_ID_VAR]),
            (
                None,
                None,
                None,
                &[PRACTICUM_TOKEN_VAR, TELEGRAM_TOKEN_VAR, TELEGRAM_CHAT_ID_VAR],
            ),
        ];

        for (practicum, telegram, chat, expected) in cases {
            assert_eq!(missing_tokens(practicum, telegram, chat), expected);
        }
    }

    #[test]
    fn blank_values_count_as_missing() {
        assert_eq!(
            missing_tokens(Some(""), Some("   "), Some("1")),
            [PRACTICUM_TOKEN_VAR, TELEGRAM_TOKEN_VAR]
        );
    }
}
