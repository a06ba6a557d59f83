use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::RelayConfig;

const UTM_SOURCE: &str = "Tax_Shield_Tool";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Network(err.to_string())
    }
}

/// Status and raw body returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: String,
}

impl ProviderResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomField {
    pub name: String,
    pub value: String,
}

/// Body of a Beehiiv create-subscription request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BeehiivSubscription {
    pub email: String,
    pub reactivate_existing: bool,
    pub send_welcome_email: bool,
    pub utm_source: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomField>,
}

impl BeehiivSubscription {
    /// The first name is sent as a custom field only when it is non-blank.
    pub fn new(
        email: impl Into<String>,
        first_name: Option<&str>,
    ) -> Self {
        let custom_fields = first_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                vec![CustomField {
                    name: "first_name".to_string(),
                    value: name.to_string(),
                }]
            })
            .unwrap_or_default();

        Self {
            email: email.into(),
            reactivate_existing: false,
            send_welcome_email: true,
            utm_source: UTM_SOURCE,
            custom_fields,
        }
    }
}

/// Upstream newsletter service.
#[async_trait]
pub trait NewsletterProvider: Send + Sync {
    /// Submits one subscription. Any HTTP status is a successful call; only
    /// transport failures are errors.
    async fn subscribe(
        &self,
        subscription: &BeehiivSubscription,
    ) -> Result<ProviderResponse, RelayError>;
}

pub struct BeehiivProvider {
    client: reqwest::Client,
    config: RelayConfig,
}

impl BeehiivProvider {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

#[async_trait]
impl NewsletterProvider for BeehiivProvider {
    async fn subscribe(
        &self,
        subscription: &BeehiivSubscription,
    ) -> Result<ProviderResponse, RelayError> {
        let response = self
            .client
            .post(self.config.subscriptions_url())
            .bearer_auth(&self.config.api_key)
            .json(subscription)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(ProviderResponse { status, body })
    }
}
