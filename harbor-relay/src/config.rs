pub const API_KEY_ENV: &str = "BEEHIIV_API_KEY";
pub const PUBLICATION_ID_ENV: &str = "BEEHIIV_PUB_ID";

const DEFAULT_BASE_URL: &str = "https://api.beehiiv.com";

/// Credentials and endpoint of the newsletter provider.
#[derive(Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub api_key: String,
    pub publication_id: String,
    pub base_url: String,
}

impl RelayConfig {
    pub fn new(
        api_key: impl Into<String>,
        publication_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            publication_id: publication_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Reads `BEEHIIV_API_KEY` and `BEEHIIV_PUB_ID`.
    ///
    /// Returns `None` unless both are set and non-blank.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let api_key = read(API_KEY_ENV);
        let publication_id = read(PUBLICATION_ID_ENV);

        match (api_key, publication_id) {
            (Some(api_key), Some(publication_id)) => Some(Self::new(api_key, publication_id)),
            (api_key, publication_id) => {
                tracing::warn!(
                    api_key = api_key.is_some(),
                    publication_id = publication_id.is_some(),
                    "Newsletter credentials not configured"
                );
                None
            }
        }
    }

    pub fn with_base_url(
        mut self,
        base_url: impl Into<String>,
    ) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Subscriptions endpoint for the configured publication.
    pub fn subscriptions_url(&self) -> String {
        format!(
            "{}/v2/publications/{}/subscriptions",
            self.base_url.trim_end_matches('/'),
            self.publication_id
        )
    }
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &"<redacted>")
            .field("publication_id", &self.publication_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn from_lookup_reads_both_credentials() {
        let vars = [(API_KEY_ENV, "key"), (PUBLICATION_ID_ENV, "pub_1")];
        let config = RelayConfig::from_lookup(lookup(&vars));

        assert_eq!(config, Some(RelayConfig::new("key", "pub_1")));
    }

    #[test]
    fn from_lookup_requires_both_credentials() {
        assert_eq!(RelayConfig::from_lookup(lookup(&[(API_KEY_ENV, "key")])), None);
        assert_eq!(RelayConfig::from_lookup(lookup(&[(PUBLICATION_ID_ENV, "pub_1")])), None);
        assert_eq!(RelayConfig::from_lookup(lookup(&[])), None);
    }

    #[test]
    fn from_lookup_treats_blank_as_missing() {
        let config =
            RelayConfig::from_lookup(lookup(&[(API_KEY_ENV, "  "), (PUBLICATION_ID_ENV, "pub_1")]));

        assert_eq!(config, None);
    }

    #[test]
    fn subscriptions_url_includes_publication() {
        let config = RelayConfig::new("key", "pub_abc");

        assert_eq!(
            config.subscriptions_url(),
            "https://api.beehiiv.com/v2/publications/pub_abc/subscriptions"
        );
    }

    #[test]
    fn subscriptions_url_with_custom_base() {
        let config = RelayConfig::new("key", "pub_abc").with_base_url("http://localhost:9000/");

        assert_eq!(
            config.subscriptions_url(),
            "http://localhost:9000/v2/publications/pub_abc/subscriptions"
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", RelayConfig::new("secret-key", "pub_abc"));

        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("pub_abc"));
    }
}
