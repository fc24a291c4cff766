use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use typedrpc_schema::{Diagnostics, Schema, TypedSchema};

/// Closed set of failure kinds a contract can report on its own.
///
/// Serialized as the camelCase literal, e.g. `"jsonParseError"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    /// Text was not valid JSON.
    JsonParseError,
    /// A value could not be serialized.
    JsonStringifyError,
    /// A value did not conform to its schema.
    SchemaValidationError,
    /// The transport returned a non-2xx status.
    HttpError,
    /// The transport failed to produce a response.
    FetchError,
    /// A handler or transport panicked.
    UnexpectedThrownError,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 6] = [
        ErrorCode::JsonParseError,
        ErrorCode::JsonStringifyError,
        ErrorCode::SchemaValidationError,
        ErrorCode::HttpError,
        ErrorCode::FetchError,
        ErrorCode::UnexpectedThrownError,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::JsonParseError => "jsonParseError",
            ErrorCode::JsonStringifyError => "jsonStringifyError",
            ErrorCode::SchemaValidationError => "schemaValidationError",
            ErrorCode::HttpError => "httpError",
            ErrorCode::FetchError => "fetchError",
            ErrorCode::UnexpectedThrownError => "unexpectedThrownError",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A taxonomy error: `{"code": <ErrorCode>, "message": <text>}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct RpcError {
    pub code: ErrorCode,
    pub message: String,
}

impl RpcError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn json_parse(diagnostic: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::JsonParseError,
            format!("Failed to parse JSON: {diagnostic}"),
        )
    }

    pub fn json_stringify(diagnostic: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::JsonStringifyError,
            format!("Failed to stringify JSON: {diagnostic}"),
        )
    }

    pub fn schema_validation(diagnostics: &Diagnostics) -> Self {
        Self::new(
            ErrorCode::SchemaValidationError,
            format!("Schema validation failed: {diagnostics}"),
        )
    }

    pub fn http(status: u16, status_text: &str) -> Self {
        Self::new(
            ErrorCode::HttpError,
            format!("HTTP error {status}: {status_text}"),
        )
    }

    pub fn fetch(reason: impl fmt::Display) -> Self {
        Self::new(ErrorCode::FetchError, format!("Fetch failed: {reason}"))
    }

    /// Convert an arbitrary fault caught at an untrusted boundary.
    pub fn unexpected_thrown(fault: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::UnexpectedThrownError,
            format!("An unexpected error was thrown: {fault}"),
        )
    }

    /// Convert a caught panic payload.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        Self::unexpected_thrown(panic_message(payload))
    }
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        format!("{payload:?}")
    }
}

/// Accepts exactly the taxonomy: a known `code` literal and a string
/// `message`. Other keys are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpcErrorSchema;

impl Schema for RpcErrorSchema {
    type Output = RpcError;

    fn validate(&self, value: &Value) -> Result<RpcError, Diagnostics> {
        TypedSchema::<RpcError>::new().validate(value)
    }
}

/// Application error type for contracts that never fail on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Never {}

impl fmt::Display for Never {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

/// Either a taxonomy error or an application error `E`.
///
/// Serialized untagged: the wire form is the bare inner error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RemoteError<E> {
    Rpc(RpcError),
    Application(E),
}

impl<E> RemoteError<E> {
    pub fn as_rpc(&self) -> Option<&RpcError> {
        match self {
            RemoteError::Rpc(err) => Some(err),
            RemoteError::Application(_) => None,
        }
    }

    pub fn as_application(&self) -> Option<&E> {
        match self {
            RemoteError::Rpc(_) => None,
            RemoteError::Application(err) => Some(err),
        }
    }
}

impl<E> From<RpcError> for RemoteError<E> {
    fn from(err: RpcError) -> Self {
        RemoteError::Rpc(err)
    }
}

impl<E: fmt::Display> fmt::Display for RemoteError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Rpc(err) => write!(f, "{err}"),
            RemoteError::Application(err) => write!(f, "application error: {err}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RemoteError<E> {}

/// Error branch that tries the taxonomy first, then the application schema.
///
/// An application error whose `code` collides with a taxonomy literal is
/// read as the taxonomy error.
#[derive(Debug, Clone, Copy)]
pub struct RemoteErrorSchema<A> {
    application: A,
}

impl<A> RemoteErrorSchema<A> {
    pub const fn new(application: A) -> Self {
        Self { application }
    }
}

impl<A: Schema> Schema for RemoteErrorSchema<A> {
    type Output = RemoteError<A::Output>;

    fn validate(&self, value: &Value) -> Result<Self::Output, Diagnostics> {
        let taxonomy = match RpcErrorSchema.validate(value) {
            Ok(err) => return Ok(RemoteError::Rpc(err)),
            Err(diagnostics) => diagnostics,
        };
        self.application
            .validate(value)
            .map(RemoteError::Application)
            .map_err(|application| {
                Diagnostics::collect(taxonomy.iter().chain(application.iter()).cloned())
                    .unwrap_or(application)
            })
    }
}
