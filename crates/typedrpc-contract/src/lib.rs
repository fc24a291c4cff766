//! Typed, non-panicking RPC contracts over JSON and HTTP.
//!
//! A [`TypedRpc`] names one remote operation: a path, an input schema and an
//! output schema. The server side runs [`TypedRpc::execute`] on the raw
//! request body; the client side runs [`TypedRpc::call`] through an injected
//! [`Transport`](typedrpc_transport::Transport). Neither ever panics or
//! returns a bare error: every failure ends up as an [`RpcError`] (or an
//! application error) inside a result.

pub mod codec;
pub mod contract;
pub mod error;
pub mod fetch;

pub use codec::{parse_and_validate, parse_text, serialize_text, serialize_text_or_error, validate};
pub use contract::TypedRpc;
pub use error::{
    panic_message, ErrorCode, Never, RemoteError, RemoteErrorSchema, RpcError, RpcErrorSchema,
};
pub use fetch::fetch_text;
