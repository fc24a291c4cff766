use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::validator::{Diagnostic, Diagnostics, Schema};

/// Schema defined entirely by a serde type.
///
/// Validation is typed decoding; a failure reports the path of the field
/// that did not decode.
pub struct TypedSchema<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedSchema<T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for TypedSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypedSchema<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedSchema<T> {}

impl<T> fmt::Debug for TypedSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedSchema")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> Schema for TypedSchema<T> {
    type Output = T;

    fn validate(&self, value: &Value) -> Result<T, Diagnostics> {
        decode(value)
    }
}

/// Accepts every value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnySchema;

impl Schema for AnySchema {
    type Output = Value;

    fn validate(&self, value: &Value) -> Result<Value, Diagnostics> {
        Ok(value.clone())
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, Diagnostics> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = err.path().to_string();
        let path = if path == "." { String::new() } else { path };
        Diagnostics::single(Diagnostic::new(path, err.into_inner().to_string()))
    })
}
