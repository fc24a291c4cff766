/// Errors a transport reports instead of a response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request URL could not be used.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request could not be delivered or no response arrived.
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// A response arrived but its body could not be read.
    #[error("failed reading response body: {0}")]
    Body(String),

    /// The HTTP client could not be built.
    #[cfg(feature = "http")]
    #[error("failed building http client: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
