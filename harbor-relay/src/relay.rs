use std::sync::Arc;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::config::RelayConfig;
use crate::provider::{BeehiivProvider, BeehiivSubscription, NewsletterProvider};

/// Incoming subscribe form.
///
/// Fields that are absent or not strings are treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubscribeRequest {
    pub email: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
}

impl SubscribeRequest {
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            email: text("email"),
            first_name: text("firstName"),
        }
    }
}

/// Status and JSON body sent back to the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl RelayResponse {
    fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    fn error(
        status: StatusCode,
        message: &str,
    ) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Validates subscribe requests and forwards them to the provider.
///
/// Without a provider every request is answered with a configuration error.
#[derive(Clone)]
pub struct SubscribeRelay {
    provider: Option<Arc<dyn NewsletterProvider>>,
}

impl SubscribeRelay {
    pub fn new(provider: Option<Arc<dyn NewsletterProvider>>) -> Self {
        Self { provider }
    }

    /// Relay backed by Beehiiv when credentials are present in the
    /// environment.
    pub fn from_env() -> Self {
        let provider = RelayConfig::from_env()
            .map(|config| Arc::new(BeehiivProvider::new(config)) as Arc<dyn NewsletterProvider>);
        Self::new(provider)
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn handle(
        &self,
        request: &SubscribeRequest,
    ) -> RelayResponse {
        let Some(email) = request
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
        else {
            return RelayResponse::error(StatusCode::BAD_REQUEST, "Email is required");
        };

        let Some(provider) = &self.provider else {
            error!("Newsletter credentials not configured");
            return RelayResponse::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Newsletter service not configured",
            );
        };

        let subscription = BeehiivSubscription::new(email, request.first_name.as_deref());
        let response = match provider.subscribe(&subscription).await {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, "Subscription request failed");
                return RelayResponse::error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                );
            }
        };

        if response.is_success() {
            info!(email = %email, "Subscribed to newsletter");
            return RelayResponse::ok(json!({ "success": true }));
        }

        warn!(
            status = response.status,
            body = %response.body,
            "Newsletter provider rejected subscription"
        );
        if response.status == StatusCode::CONFLICT.as_u16() {
            return RelayResponse::ok(json!({ "success": true, "message": "Already subscribed" }));
        }

        let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
        RelayResponse::error(status, "Failed to subscribe")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::provider::{ProviderResponse, RelayError};

    /// Replies with a fixed outcome and records what it was sent.
    struct StubProvider {
        outcome: Result<ProviderResponse, String>,
        sent: Mutex<Vec<BeehiivSubscription>>,
    }

    impl StubProvider {
        fn replying(
            status: u16,
            body: &str,
        ) -> Arc<Self> {
            Arc::new(Self {
                outcome: Ok(ProviderResponse {
                    status,
                    body: body.to_string(),
                }),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                outcome: Err("connection refused".to_string()),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<BeehiivSubscription> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NewsletterProvider for StubProvider {
        async fn subscribe(
            &self,
            subscription: &BeehiivSubscription,
        ) -> Result<ProviderResponse, RelayError> {
            self.sent.lock().unwrap().push(subscription.clone());
            self.outcome.clone().map_err(RelayError::Network)
        }
    }

    fn relay(provider: Arc<StubProvider>) -> SubscribeRelay {
        SubscribeRelay::new(Some(provider as Arc<dyn NewsletterProvider>))
    }

    fn request(
        email: Option<&str>,
        first_name: Option<&str>,
    ) -> SubscribeRequest {
        SubscribeRequest {
            email: email.map(str::to_string),
            first_name: first_name.map(str::to_string),
        }
    }

    // =========================================================================
    // SubscribeRequest tests
    // =========================================================================

    #[test]
    fn from_value_reads_string_fields() {
        let parsed = SubscribeRequest::from_value(&json!({
            "email": "a@example.com",
            "firstName": "Ada",
        }));

        assert_eq!(parsed, request(Some("a@example.com"), Some("Ada")));
    }

    #[test]
    fn from_value_ignores_non_string_fields() {
        let parsed = SubscribeRequest::from_value(&json!({ "email": 42, "firstName": null }));

        assert_eq!(parsed, SubscribeRequest::default());
    }

    // =========================================================================
    // handle tests
    // =========================================================================

    #[tokio::test]
    async fn missing_email_is_bad_request() {
        let provider = StubProvider::replying(200, "{}");

        let response = relay(provider.clone()).handle(&request(None, Some("Ada"))).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, json!({ "error": "Email is required" }));
        assert!(provider.sent().is_empty());
    }

    #[tokio::test]
    async fn blank_email_is_bad_request() {
        let provider = StubProvider::replying(200, "{}");

        let response = relay(provider).handle(&request(Some("   "), None)).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn email_checked_before_credentials() {
        let response = SubscribeRelay::new(None).handle(&request(None, None)).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_credentials_is_server_error() {
        let response = SubscribeRelay::new(None)
            .handle(&request(Some("a@example.com"), None))
            .await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.body,
            json!({ "error": "Newsletter service not configured" })
        );
    }

    #[tokio::test]
    async fn upstream_success_is_ok() {
        let provider = StubProvider::replying(201, r#"{"data":{"id":"sub_1"}}"#);

        let response = relay(provider.clone())
            .handle(&request(Some("a@example.com"), Some(" Ada ")))
            .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, json!({ "success": true }));
        assert_eq!(
            provider.sent(),
            vec![BeehiivSubscription::new("a@example.com", Some("Ada"))]
        );
    }

    #[tokio::test]
    async fn upstream_conflict_is_already_subscribed() {
        let provider = StubProvider::replying(409, r#"{"errors":["exists"]}"#);

        let response = relay(provider).handle(&request(Some("a@example.com"), None)).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.body,
            json!({ "success": true, "message": "Already subscribed" })
        );
    }

    #[tokio::test]
    async fn upstream_error_status_is_passed_through() {
        let provider = StubProvider::replying(422, r#"{"errors":["invalid email"]}"#);

        let response = relay(provider).handle(&request(Some("bad"), None)).await;

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.body, json!({ "error": "Failed to subscribe" }));
    }

    #[tokio::test]
    async fn network_failure_is_internal_error() {
        let response = relay(StubProvider::failing())
            .handle(&request(Some("a@example.com"), None))
            .await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn email_is_trimmed_before_forwarding() {
        let provider = StubProvider::replying(200, "");

        relay(provider.clone())
            .handle(&request(Some(" a@example.com "), None))
            .await;

        assert_eq!(provider.sent()[0].email, "a@example.com");
    }
}
