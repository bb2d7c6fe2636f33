//! Braintree Configuration

use checkout_core::{GatewayError, Result};

const SANDBOX_GRAPHQL_URL: &str = "https://payments.sandbox.braintree-api.com/graphql";
const PRODUCTION_GRAPHQL_URL: &str = "https://payments.braintree-api.com/graphql";

/// Braintree environment
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Production,
    /// Explicit GraphQL endpoint (local proxies, tests)
    Custom(String),
}

impl Environment {
    /// Parse `sandbox` / `production`; anything else is an endpoint URL
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "sandbox" | "" => Self::Sandbox,
            "production" => Self::Production,
            _ => Self::Custom(name.to_string()),
        }
    }

    #[must_use]
    pub fn graphql_url(&self) -> &str {
        match self {
            Self::Sandbox => SANDBOX_GRAPHQL_URL,
            Self::Production => PRODUCTION_GRAPHQL_URL,
            Self::Custom(url) => url,
        }
    }
}

/// Braintree gateway configuration
#[derive(Clone, Debug)]
pub struct BraintreeConfig {
    pub environment: Environment,

    pub merchant_id: String,

    pub public_key: String,

    pub private_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BraintreeConfig {
    pub fn new(
        environment: Environment,
        merchant_id: impl Into<String>,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            environment,
            merchant_id: merchant_id.into(),
            public_key: public_key.into(),
            private_key: private_key.into(),
            timeout_secs: 30,
        }
    }

    /// Create from environment variables
    ///
    /// Reads `BT_ENVIRONMENT`, `BT_MERCHANT_ID`, `BT_PUBLIC_KEY`,
    /// `BT_PRIVATE_KEY` and optionally `BT_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] when a credential is not set.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_name(&std::env::var("BT_ENVIRONMENT").unwrap_or_default());
        let merchant_id = required("BT_MERCHANT_ID")?;
        let public_key = required("BT_PUBLIC_KEY")?;
        let private_key = required("BT_PRIVATE_KEY")?;
        let timeout_secs = std::env::var("BT_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            timeout_secs,
            ..Self::new(environment, merchant_id, public_key, private_key)
        })
    }
}

fn required(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| GatewayError::Config(format!("{key} not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_names() {
        assert_eq!(Environment::from_name("Sandbox"), Environment::Sandbox);
        assert_eq!(Environment::from_name(""), Environment::Sandbox);
        assert_eq!(Environment::from_name("production").graphql_url(), PRODUCTION_GRAPHQL_URL);
        assert_eq!(
            Environment::from_name("http://127.0.0.1:9000/graphql").graphql_url(),
            "http://127.0.0.1:9000/graphql"
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = BraintreeConfig::new(Environment::Sandbox, "merchant", "public", "private");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.environment.graphql_url(), SANDBOX_GRAPHQL_URL);
    }
}
