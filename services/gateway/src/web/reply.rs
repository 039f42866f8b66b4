//! services/gateway/src/web/reply.rs
//!
//! The `{status, message, ...}` envelope every mock endpoint answers with.

use axum::{http::StatusCode, Json};
use serde_json::{json, Map, Value};

/// The result type of every mock handler.
pub type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Wraps the given fields in a `status: "success"` envelope.
pub fn success(fields: Value) -> Reply {
    let mut body = Map::new();
    body.insert("status".to_string(), Value::from("success"));
    if let Value::Object(extra) = fields {
        body.extend(extra);
    }
    Ok(Json(Value::Object(body)))
}

pub fn failure(code: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (
        code,
        Json(json!({ "status": "error", "message": message.into() })),
    )
}
