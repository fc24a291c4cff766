//! Injected HTTP transport capability for typed RPC contracts.
//!
//! Contracts never open connections themselves. They hand an
//! [`HttpRequest`] to a [`Transport`] and get back an [`HttpResponse`] or a
//! [`TransportError`]. Tests plug in scripted transports; applications use
//! [`HttpTransport`] (behind the `http` feature) or their own.

pub mod error;
pub mod message;
pub mod traits;

#[cfg(feature = "http")]
pub mod http;

pub use error::{Result, TransportError};
pub use message::{HttpRequest, HttpResponse, Method};
pub use traits::Transport;

#[cfg(feature = "http")]
pub use http::HttpTransport;
