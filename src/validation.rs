use serde_json::Value;

use crate::error::AppError;
use crate::models::{CreateTodo, UpdateTodo};

pub const VALUE_MAX_LEN: usize = 50;

/// Checks a raw creation body: an object holding only a `value` string of
/// 1 to 50 characters.
pub fn validate_create(body: &Value) -> Result<CreateTodo, AppError> {
    let fields = body
        .as_object()
        .ok_or_else(|| invalid("request body must be an object"))?;

    if let Some(key) = fields.keys().find(|key| key.as_str() != "value") {
        return Err(invalid(format!("\"{key}\" is not allowed")));
    }

    let value = match fields.get("value") {
        None => return Err(invalid("\"value\" is required")),
        Some(Value::String(value)) => value,
        Some(_) => return Err(invalid("\"value\" must be a string")),
    };

    let len = value.chars().count();
    if len == 0 {
        return Err(invalid("\"value\" is not allowed to be empty"));
    }
    if len > VALUE_MAX_LEN {
        return Err(invalid(format!(
            "\"value\" length must be less than or equal to {VALUE_MAX_LEN} characters long"
        )));
    }

    Ok(CreateTodo {
        value: value.clone(),
    })
}

pub fn validate_update(update: &UpdateTodo) -> Result<(), AppError> {
    match update.order {
        Some(order) if order < 1 => Err(invalid("\"order\" must be a positive number")),
        _ => Ok(()),
    }
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Validation(message.into())
}
