use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use typedrpc_transport::{HttpRequest, Transport};

use crate::error::{panic_message, RpcError};

/// Fetch a JSON endpoint as text.
///
/// `POST`s `body` with `Content-Type: application/json` when given, `GET`s
/// otherwise. A transport error or panic yields `fetchError`; a non-2xx
/// status yields `httpError`.
pub async fn fetch_text<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    body: Option<String>,
) -> Result<String, RpcError> {
    let request = HttpRequest::json(url, body);
    let sent = AssertUnwindSafe(async move { transport.send(request).await })
        .catch_unwind()
        .await;

    match sent {
        Ok(Ok(response)) if response.is_success() => Ok(response.body),
        Ok(Ok(response)) => {
            tracing::debug!(url, status = response.status, "non-success http status");
            Err(RpcError::http(response.status, &response.status_text))
        }
        Ok(Err(err)) => {
            tracing::debug!(url, error = %err, "transport failed");
            Err(RpcError::fetch(err))
        }
        Err(payload) => {
            let message = panic_message(&*payload);
            tracing::warn!(url, panic = %message, "transport panicked");
            Err(RpcError::fetch(message))
        }
    }
}
