//! Typed, schema-validated RPC contracts over JSON and HTTP.
//!
//! A contract names a remote operation by path and pairs it with an input
//! and an output schema. The server runs [`TypedRpc::execute`] on the raw
//! request body and sends back a `{ok, val|err}` envelope; the client runs
//! [`TypedRpc::call`] and gets a typed `Result`. No failure escapes as a
//! panic: everything lands in the [`RpcError`] taxonomy or an application
//! error.
//!
//! # Crate Structure
//!
//! - [`result`]: result combinators and the wire envelope
//! - [`schema`]: the schema-validation capability and its handles
//! - [`transport`]: the injected HTTP transport capability
//! - [`contract`]: `TypedRpc`, the taxonomy and the JSON codec
//! - [`greet`]: a ready-made demo contract
//!
//! ```
//! use typedrpc::greet::{greet_handler, greet_rpc, Environment};
//!
//! # tokio_test_block_on(async {
//! let rpc = greet_rpc();
//! let reply = rpc
//!     .execute(r#"{"name":"Alice"}"#, greet_handler(Environment::Development))
//!     .await;
//! assert_eq!(reply, r#"{"ok":true,"val":{"message":"Hello, Alice! (from development)"}}"#);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

/// Re-export result types.
pub mod result {
    pub use typedrpc_result::*;
}

/// Re-export schema types.
pub mod schema {
    pub use typedrpc_schema::*;
}

/// Re-export transport types.
pub mod transport {
    pub use typedrpc_transport::*;
}

/// Re-export contract types.
pub mod contract {
    pub use typedrpc_contract::*;
}

pub mod greet;

pub use typedrpc_contract::{ErrorCode, Never, RemoteError, RpcError, TypedRpc};
pub use typedrpc_result::Envelope;
pub use typedrpc_schema::Schema;
pub use typedrpc_transport::Transport;
