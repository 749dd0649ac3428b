use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingConfig(Vec<String>),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("network error reaching the homework API (from_date={from_date}): {source}")]
    Connectivity {
        from_date: i64,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected answer from the homework API (from_date={from_date}): {reason}")]
    ApiAnswer { from_date: i64, reason: String },

    #[error("malformed API response: {0}")]
    ResponseShape(String),

    #[error("unknown homework status - {0}")]
    UnknownStatus(String),

    #[error("failed to send Telegram message: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BotError>;
