use async_trait::async_trait;

use crate::error::{Result, TransportError};
use crate::message::{HttpRequest, HttpResponse, Method};
use crate::traits::Transport;

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client with default settings.
    ///
    /// Fails instead of panicking when the client cannot be initialized,
    /// e.g. a TLS backend without a crypto provider.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| TransportError::Client(err.to_string()))?;
        Ok(Self { client })
    }

    /// Use a preconfigured client (proxies, TLS, default headers).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = reqwest::Url::parse(&request.url).map_err(|err| TransportError::InvalidUrl {
            url: request.url.clone(),
            reason: err.to_string(),
        })?;

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        tracing::debug!(method = %request.method, url = %request.url, "sending http request");
        let response = builder.send().await.map_err(|err| TransportError::Request {
            url: request.url.clone(),
            reason: err.to_string(),
        })?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::Body(err.to_string()))?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "received http response");
        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_client_builds() {
        assert!(HttpTransport::new().is_ok());
    }

    #[tokio::test]
    async fn invalid_url_is_reported_without_network() {
        let transport = HttpTransport::new().expect("client should build");
        let err = transport
            .send(HttpRequest::json("not a url", None))
            .await
            .expect_err("url should be rejected");
        assert!(matches!(err, TransportError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn refused_connection_is_request_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
        let addr = listener.local_addr().expect("addr should be known");
        drop(listener);

        let transport = HttpTransport::new().expect("client should build");
        let err = transport
            .send(HttpRequest::json(format!("http://{addr}/api"), Some("{}".to_string())))
            .await
            .expect_err("connection should fail");
        assert!(matches!(err, TransportError::Request { .. }));
    }
}
