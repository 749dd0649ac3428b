use serde_json::Value;

use crate::error::{BotError, Result};

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate the shape of the API answer and return the homework list.
/// The list may be empty; that is not an error.
pub fn check_response(response: &Value) -> Result<&[Value]> {
    if !response.is_object() {
        return Err(BotError::ResponseShape(format!(
            "expected an object, got {}",
            json_type(response)
        )));
    }

    let Some(homeworks) = response.get("homeworks") else {
        return Err(BotError::ResponseShape("missing key homeworks".to_string()));
    };

    match homeworks.as_array() {
        Some(list) => Ok(list.as_slice()),
        None => Err(BotError::ResponseShape(format!(
            "homeworks is {}, not an array",
            json_type(homeworks)
        ))),
    }
}

/// Server-side cursor for the next poll, when the answer carries one.
pub fn current_date(response: &Value) -> Option<i64> {
    response.get("current_date").and_then(Value::as_i64)
}
