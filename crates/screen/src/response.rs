use serde_json::json;

use crate::error::ScreenError;
use crate::model::SearchOutcome;

pub const STATUS_OK: u16 = 200;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Map a search result onto the endpoint contract.
///
/// Success is `200` with the record array. Any failure is `500` with
/// `{"error": "<message>"}`; no partial results.
pub fn into_http(result: Result<SearchOutcome, ScreenError>) -> (u16, serde_json::Value) {
    match result {
        Ok(outcome) => match serde_json::to_value(&outcome) {
            Ok(body) => (STATUS_OK, body),
            Err(e) => error_body(&format!("cannot serialize results: {e}")),
        },
        Err(e) => error_body(&e.to_string()),
    }
}

pub fn error_body(message: &str) -> (u16, serde_json::Value) {
    (STATUS_INTERNAL_ERROR, json!({ "error": message }))
}
