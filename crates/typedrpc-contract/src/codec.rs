//! Text and value adapters that turn parser, serializer and validator
//! failures into taxonomy errors.

use serde::Serialize;
use serde_json::Value;
use typedrpc_result::ResultExt;
use typedrpc_schema::Schema;

use crate::error::RpcError;

/// Last-resort body when even a taxonomy error fails to serialize.
const STRINGIFY_FALLBACK: &str =
    r#"{"code":"jsonStringifyError","message":"Failed to stringify JSON"}"#;

/// Parse JSON text. Empty or malformed text yields `jsonParseError`.
pub fn parse_text(text: &str) -> Result<Value, RpcError> {
    serde_json::from_str(text).map_err(RpcError::json_parse)
}

/// Run `schema` over `value`. Failure yields `schemaValidationError`.
pub fn validate<S: Schema + ?Sized>(value: &Value, schema: &S) -> Result<S::Output, RpcError> {
    schema
        .validate(value)
        .map_err(|diagnostics| RpcError::schema_validation(&diagnostics))
}

/// [`parse_text`] then [`validate`]; parse failure skips validation.
pub fn parse_and_validate<S: Schema + ?Sized>(text: &str, schema: &S) -> Result<S::Output, RpcError> {
    parse_text(text).and_then_into(|value| validate(&value, schema))
}

/// Serialize to JSON text. Failure yields `jsonStringifyError`.
pub fn serialize_text<T: Serialize + ?Sized>(value: &T) -> Result<String, RpcError> {
    serde_json::to_string(value).map_err(RpcError::json_stringify)
}

/// Serialize to JSON text, or serialize the `jsonStringifyError` instead.
///
/// Always returns syntactically valid JSON.
pub fn serialize_text_or_error<T: Serialize + ?Sized>(value: &T) -> String {
    match serialize_text(value) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, "serialization failed, sending error instead");
            serde_json::to_string(&err).unwrap_or_else(|_| STRINGIFY_FALLBACK.to_string())
        }
    }
}
