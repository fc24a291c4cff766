//! The greet contract: `POST /api/greet` with `{"name"}`, answering
//! `{"message"}`.

use std::fmt;
use std::future::{ready, Ready};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typedrpc_contract::{Never, TypedRpc};
use typedrpc_schema::TypedSchema;

pub const GREET_PATH: &str = "/api/greet";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetInput {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetOutput {
    pub message: String,
}

pub type GreetRpc = TypedRpc<TypedSchema<GreetInput>, TypedSchema<GreetOutput>, Never>;

pub fn greet_rpc() -> GreetRpc {
    TypedRpc::new(GREET_PATH, TypedSchema::new(), TypedSchema::new())
}

/// Deployment the server reports in its greeting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment `{0}` (expected development, staging or production)")]
pub struct UnknownEnvironment(pub String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(UnknownEnvironment(other.to_string())),
        }
    }
}

/// `Hello, <name>!`
pub fn greeting(input: &GreetInput) -> GreetOutput {
    GreetOutput {
        message: format!("Hello, {}!", input.name),
    }
}

/// Server handler that tags the greeting with the deployment it runs in.
pub fn greet_handler(
    environment: Environment,
) -> impl Fn(GreetInput) -> Ready<Result<GreetOutput, Never>> + Copy {
    move |input| {
        ready(Ok(GreetOutput {
            message: format!("Hello, {}! (from {environment})", input.name),
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use typedrpc_transport::{HttpRequest, HttpResponse, Method, Transport};

    use super::*;

    /// Answers every request by running the greet contract in-process.
    struct Loopback(Environment);

    #[async_trait::async_trait]
    impl Transport for Loopback {
        async fn send(&self, request: HttpRequest) -> typedrpc_transport::Result<HttpResponse> {
            assert_eq!(request.method, Method::Post);
            assert!(request.url.ends_with(GREET_PATH));
            let body = request.body.unwrap_or_default();
            let reply = greet_rpc().execute(&body, greet_handler(self.0)).await;
            Ok(HttpResponse::new(200, "OK", reply))
        }
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn http_transport_reports_unreachable_server_as_fetch_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
        let addr = listener.local_addr().expect("addr should be known");
        drop(listener);

        let transport =
            typedrpc_transport::HttpTransport::new().expect("client should build");
        let err = greet_rpc()
            .call(
                &transport,
                &format!("http://{addr}"),
                &GreetInput {
                    name: "Dana".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, typedrpc_contract::ErrorCode::FetchError);
    }

    #[test]
    fn plain_greeting() {
        let output = greeting(&GreetInput {
            name: "Alice".to_string(),
        });
        assert_eq!(output.message, "Hello, Alice!");
    }

    #[test]
    fn environment_parses_known_names_only() {
        assert_eq!("staging".parse::<Environment>().unwrap(), Environment::Staging);
        assert_eq!(Environment::default(), Environment::Development);
        assert_eq!(Environment::Production.to_string(), "production");
        let err = "qa".parse::<Environment>().unwrap_err();
        assert!(err.to_string().contains("qa"));
    }

    #[tokio::test]
    async fn execute_tags_environment() {
        let reply = greet_rpc()
            .execute(r#"{"name":"Alice"}"#, greet_handler(Environment::Staging))
            .await;
        assert_eq!(
            reply,
            r#"{"ok":true,"val":{"message":"Hello, Alice! (from staging)"}}"#
        );
    }

    #[tokio::test]
    async fn execute_rejects_missing_name() {
        let reply = greet_rpc()
            .execute(r#"{"nom":"Alice"}"#, greet_handler(Environment::Development))
            .await;
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["ok"], json!(false));
        assert_eq!(value["err"]["code"], json!("schemaValidationError"));
        assert!(value["err"]["message"].as_str().unwrap().contains("name"));
    }

    #[tokio::test]
    async fn call_through_loopback() {
        let output = greet_rpc()
            .call(
                &Loopback(Environment::Production),
                "http://localhost:8787",
                &GreetInput {
                    name: "Bob".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(output.message, "Hello, Bob! (from production)");
    }
}
