//! Opaque schema-validation capability for typed RPC contracts.
//!
//! A [`Schema`] turns an untyped JSON value into a typed one, or explains
//! structurally why it cannot. Contracts only ever talk to this trait, so
//! any validation engine can sit behind it.
//!
//! Shipped handles:
//!
//! - [`JsonSchema`]: JSON Schema 2020-12 checks followed by typed decoding
//! - [`TypedSchema`]: serde-only decoding with field-path diagnostics
//! - [`AnySchema`]: accepts any value
//! - [`ResultSchema`]: the `{ok, val|err}` envelope over two inner schemas

pub mod config;
pub mod error;
pub mod json_schema;
pub mod result_schema;
pub mod typed;
pub mod validator;

pub use config::SchemaConfig;
pub use error::{Result, SchemaError};
pub use json_schema::JsonSchema;
pub use result_schema::ResultSchema;
pub use typed::{AnySchema, TypedSchema};
pub use validator::{Diagnostic, Diagnostics, Schema};
