use std::fmt;
use std::io;

use typedrpc::contract::{ErrorCode, RpcError};
use typedrpc::schema::SchemaError;

// Process exit codes.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

/// Exit code for a taxonomy error.
pub fn code_for(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::JsonParseError | ErrorCode::SchemaValidationError => DATA_INVALID,
        ErrorCode::FetchError => TRANSPORT_ERROR,
        ErrorCode::HttpError => FAILURE,
        ErrorCode::JsonStringifyError | ErrorCode::UnexpectedThrownError => INTERNAL,
    }
}

pub fn rpc_error(context: &str, err: &RpcError) -> CliError {
    CliError::new(code_for(err.code), format!("{context}: {err}"))
}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    match err {
        SchemaError::LoadFailed(_) => CliError::new(USAGE, format!("{context}: {err}")),
        SchemaError::CompileFailed(_) | SchemaError::InvalidJson(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}
