use bon::Builder;
use url::Url;

use crate::types::{Credentials, Environment};

pub const DEFAULT_TIMEOUT: u64 = 60;
pub const DEFAULT_INTEGRATION_PRODUCT: &str = "payflow-kit";

/// Gateway configuration.
///
/// Everything the gateway would otherwise read from its surroundings is
/// injected here, so requests can be built and committed in isolation.
#[derive(Builder, Debug, Clone)]
pub struct GatewayConfig {
    /// Merchant account credentials.
    pub credentials: Credentials,
    /// Default environment, overridable per call with the `test` option.
    #[builder(default)]
    pub environment: Environment,
    /// Endpoint used instead of the environment's gateway host.
    pub endpoint_override: Option<Url>,
    /// Client timeout in seconds, sent as `X-VPS-CLIENT-TIMEOUT`.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: u64,
    /// Sent as `X-VPS-VIT-Integration-Product`.
    #[builder(into, default = DEFAULT_INTEGRATION_PRODUCT.to_string())]
    pub integration_product: String,
    /// Sent as `X-VPS-VIT-Integration-Version`.
    #[builder(into, default = env!("CARGO_PKG_VERSION").to_string())]
    pub integration_version: String,
    /// Sent as `X-VPS-VIT-Runtime-Version` when set.
    #[builder(into)]
    pub runtime_version: Option<String>,
}

impl GatewayConfig {
    /// Environment variable read by [`GatewayConfig::with_env_override`].
    pub const ENDPOINT_ENV: &'static str = "PAYFLOW_ENDPOINT";

    /// Apply the `PAYFLOW_ENDPOINT` override, if it is set and not blank.
    pub fn with_env_override(self) -> Result<Self, url::ParseError> {
        self.with_optional_endpoint(std::env::var(Self::ENDPOINT_ENV).ok())
    }

    /// Apply an endpoint override when one is given and not blank.
    pub fn with_optional_endpoint(
        self,
        endpoint: Option<String>,
    ) -> Result<Self, url::ParseError> {
        match endpoint.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => self.with_endpoint_override(value),
            _ => Ok(self),
        }
    }

    pub fn with_endpoint_override(mut self, endpoint: &str) -> Result<Self, url::ParseError> {
        self.endpoint_override = Some(Url::parse(endpoint)?);
        Ok(self)
    }

    /// The URL requests for `environment` are posted to.
    pub fn endpoint(&self, environment: Environment) -> Result<Url, url::ParseError> {
        match &self.endpoint_override {
            Some(endpoint) => Ok(endpoint.clone()),
            None => Url::parse(&format!("https://{}", environment.host())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GatewayConfig {
        GatewayConfig::builder()
            .credentials(Credentials::new("login", "PayPal", "secret", None).unwrap())
            .build()
    }

    #[test]
    fn defaults() {
        let defaults = config();
        assert_eq!(defaults.environment, Environment::Live);
        assert_eq!(defaults.timeout, 60);
        assert_eq!(defaults.integration_product, "payflow-kit");
        assert_eq!(defaults.runtime_version, None);
    }

    #[test]
    fn endpoint_follows_environment() {
        let defaults = config();
        assert_eq!(
            defaults.endpoint(Environment::Test).unwrap().as_str(),
            "https://pilot-payflowpro.paypal.com/"
        );
        assert_eq!(
            defaults.endpoint(Environment::Live).unwrap().as_str(),
            "https://payflowpro.paypal.com/"
        );
    }

    #[test]
    fn override_wins() {
        let local = config()
            .with_endpoint_override("http://127.0.0.1:8080/payflow")
            .unwrap();
        assert_eq!(
            local.endpoint(Environment::Live).unwrap().as_str(),
            "http://127.0.0.1:8080/payflow"
        );
        assert!(config().with_endpoint_override("not a url").is_err());
    }

    #[test]
    fn optional_endpoint_ignores_blank_values() {
        for endpoint in [None, Some(String::new()), Some("   ".to_string())] {
            let unchanged = config().with_optional_endpoint(endpoint).unwrap();
            assert_eq!(unchanged.endpoint_override, None);
        }

        let local = config()
            .with_optional_endpoint(Some(" http://127.0.0.1:9000/nvp ".to_string()))
            .unwrap();
        assert_eq!(
            local.endpoint(Environment::Test).unwrap().as_str(),
            "http://127.0.0.1:9000/nvp"
        );
        assert!(
            config()
                .with_optional_endpoint(Some("::".to_string()))
                .is_err()
        );
    }

    #[test]
    fn env_override_reads_payflow_endpoint() {
        // SAFETY: no other test in this crate touches this variable.
        unsafe { std::env::set_var(GatewayConfig::ENDPOINT_ENV, "http://127.0.0.1:7000/") };
        let local = config().with_env_override().unwrap();
        unsafe { std::env::remove_var(GatewayConfig::ENDPOINT_ENV) };

        assert_eq!(
            local.endpoint(Environment::Live).unwrap().as_str(),
            "http://127.0.0.1:7000/"
        );
    }
}
