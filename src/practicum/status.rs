use std::str::FromStr;

use serde_json::Value;

use super::response::json_type;
use crate::error::{BotError, Result};

/// Review verdicts the API is known to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Human-readable verdict text shown to the user.
    pub fn verdict(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(BotError::UnknownStatus(other.to_string())),
        }
    }
}

/// Build the notification text for one homework record.
pub fn parse_status(homework: &Value) -> Result<String> {
    let name = match homework.get("homework_name") {
        Some(Value::String(name)) => name,
        Some(other) => {
            return Err(BotError::ResponseShape(format!(
                "homework_name is {}, not a string",
                json_type(other)
            )))
        }
        None => return Err(BotError::ResponseShape("missing key homework_name".to_string())),
    };

    let raw_status = match homework.get("status") {
        Some(Value::String(status)) => status,
        Some(other) => {
            return Err(BotError::ResponseShape(format!(
                "status is {}, not a string",
                json_type(other)
            )))
        }
        None => return Err(BotError::ResponseShape("missing key status".to_string())),
    };

    let status: HomeworkStatus = raw_status.parse()?;
    Ok(format!(
        "Изменился статус проверки работы \"{name}\". {}",
        status.verdict()
    ))
}
