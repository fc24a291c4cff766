use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde::Serialize;
use typedrpc_result::{Envelope, FlattenExt};
use typedrpc_schema::{ResultSchema, Schema};
use typedrpc_transport::Transport;

use crate::codec::{parse_and_validate, serialize_text, serialize_text_or_error};
use crate::error::{Never, RemoteError, RemoteErrorSchema, RpcError, RpcErrorSchema};
use crate::fetch::fetch_text;

/// One named remote operation: a path, an input schema and an output schema.
///
/// `E` is the application error type the server handler may return. The
/// contract holds no mutable state; share it freely between tasks.
///
/// Neither [`execute`](Self::execute) nor [`call`](Self::call) panics or
/// returns an error outside its result.
pub struct TypedRpc<IS, OS, E = Never> {
    path: String,
    input_schema: IS,
    output_schema: OS,
    _error: PhantomData<fn() -> E>,
}

impl<IS, OS, E> TypedRpc<IS, OS, E> {
    pub fn new(path: impl Into<String>, input_schema: IS, output_schema: OS) -> Self {
        Self {
            path: path.into(),
            input_schema,
            output_schema,
            _error: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn input_schema(&self) -> &IS {
        &self.input_schema
    }

    pub fn output_schema(&self) -> &OS {
        &self.output_schema
    }

    /// `url_base` with this contract's path appended verbatim.
    pub fn url(&self, url_base: &str) -> String {
        format!("{url_base}{}", self.path)
    }
}

impl<IS: Schema, OS: Schema, E> TypedRpc<IS, OS, E> {
    /// Server side: validate `request_body`, run `handler`, serialize the
    /// outcome as a result envelope.
    ///
    /// Malformed or non-conforming input never reaches the handler. A
    /// handler panic becomes `unexpectedThrownError`. The returned text is
    /// always a JSON envelope.
    pub async fn execute<F, Fut>(&self, request_body: &str, handler: F) -> String
    where
        F: FnOnce(IS::Output) -> Fut,
        Fut: Future<Output = Result<OS::Output, E>>,
        OS::Output: Serialize,
        E: Serialize,
    {
        let outcome = Envelope::from(self.execute_typed(request_body, handler).await);
        serialize_text(&outcome).unwrap_or_else(|err| {
            tracing::warn!(path = %self.path, error = %err, "failed to serialize rpc outcome");
            serialize_text_or_error(&Envelope::<(), RpcError>::Err(err))
        })
    }

    /// [`execute`](Self::execute) without the final serialization.
    pub async fn execute_typed<F, Fut>(
        &self,
        request_body: &str,
        handler: F,
    ) -> Result<OS::Output, RemoteError<E>>
    where
        F: FnOnce(IS::Output) -> Fut,
        Fut: Future<Output = Result<OS::Output, E>>,
    {
        let input = match parse_and_validate(request_body, &self.input_schema) {
            Ok(input) => input,
            Err(err) => {
                tracing::debug!(path = %self.path, code = %err.code, "rejected rpc input");
                return Err(err.into());
            }
        };

        let handled = AssertUnwindSafe(async move { handler(input).await })
            .catch_unwind()
            .await;

        match handled {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(err)) => {
                tracing::debug!(path = %self.path, "handler returned an application error");
                Err(RemoteError::Application(err))
            }
            Err(payload) => {
                let err = RpcError::from_panic(&*payload);
                tracing::warn!(path = %self.path, error = %err, "rpc handler panicked");
                Err(err.into())
            }
        }
    }

    /// Client side: send `input` to `url_base + path` and decode the reply.
    ///
    /// The reply's error branch is validated against the taxonomy only, so an
    /// application error outside it surfaces as `schemaValidationError`. Use
    /// [`call_with_app_errors`](Self::call_with_app_errors) to receive
    /// application errors as such.
    pub async fn call<T>(
        &self,
        transport: &T,
        url_base: &str,
        input: &IS::Output,
    ) -> Result<OS::Output, RpcError>
    where
        T: Transport + ?Sized,
        IS::Output: Serialize,
    {
        let text = self.send(transport, url_base, input).await?;
        let envelope = ResultSchema::new(&self.output_schema, RpcErrorSchema);
        parse_and_validate(&text, &envelope).flatten_into()
    }

    /// Like [`call`](Self::call), but the reply's error branch also accepts
    /// application errors described by `app_errors`.
    pub async fn call_with_app_errors<T, A>(
        &self,
        transport: &T,
        url_base: &str,
        input: &IS::Output,
        app_errors: A,
    ) -> Result<OS::Output, RemoteError<E>>
    where
        T: Transport + ?Sized,
        A: Schema<Output = E>,
        IS::Output: Serialize,
    {
        let text = self.send(transport, url_base, input).await?;
        let envelope = ResultSchema::new(&self.output_schema, RemoteErrorSchema::new(app_errors));
        parse_and_validate(&text, &envelope).flatten_into()
    }

    async fn send<T>(
        &self,
        transport: &T,
        url_base: &str,
        input: &IS::Output,
    ) -> Result<String, RpcError>
    where
        T: Transport + ?Sized,
        IS::Output: Serialize,
    {
        let body = serialize_text(input)?;
        let url = self.url(url_base);
        tracing::debug!(path = %self.path, %url, "calling rpc");
        fetch_text(transport, &url, Some(body)).await
    }
}

impl<IS: Clone, OS: Clone, E> Clone for TypedRpc<IS, OS, E> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            input_schema: self.input_schema.clone(),
            output_schema: self.output_schema.clone(),
            _error: PhantomData,
        }
    }
}

impl<IS: fmt::Debug, OS: fmt::Debug, E> fmt::Debug for TypedRpc<IS, OS, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedRpc")
            .field("path", &self.path)
            .field("input_schema", &self.input_schema)
            .field("output_schema", &self.output_schema)
            .finish()
    }
}
