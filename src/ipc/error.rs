use serde_json::json;

use crate::engine::{EngineError, ValidationError};

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Maps an engine validation failure onto its wire error code.
pub fn validation(id: &str, e: ValidationError) -> serde_json::Value {
    let code = match e {
        ValidationError::EmptyTitle => "empty_title",
        ValidationError::WhitespaceOnlyTitle => "whitespace_title",
        ValidationError::NegativeValue => "negative_value",
        ValidationError::DateOutOfRange => "date_out_of_range",
    };
    err(id, code, e.to_string(), None)
}

/// Maps an item-addressed engine failure; unknown ids become the same
/// `not_found` code the entity lookups use.
pub fn engine(id: &str, e: EngineError) -> serde_json::Value {
    match e {
        EngineError::Invalid(v) => validation(id, v),
        EngineError::UnknownItem => err(id, "not_found", "syllabus item not found", None),
    }
}
