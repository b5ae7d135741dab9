use crate::pipeline::resolution::ResolutionError;

/// Application-level constants
pub const APP_NAME: &str = "chartwright";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Public Gemini REST base (model name and `:generateContent` are appended).
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
/// Upper bound on the single generative call per request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_ENDPOINT: &str = "CHARTWRIGHT_GEMINI_ENDPOINT";
pub const ENV_MODEL: &str = "CHARTWRIGHT_GEMINI_MODEL";
pub const ENV_TIMEOUT: &str = "CHARTWRIGHT_GEMINI_TIMEOUT_SECS";

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "chartwright=info"
}

/// Connection settings for the generative-language service.
#[derive(Clone)]
pub struct GenerativeConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GenerativeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerativeConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GenerativeConfig {
    /// Default endpoint, model and timeout with the given credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ResolutionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `from_env` is this over `std::env::var`;
    /// tests pass a map so they never touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ResolutionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ResolutionError::Configuration(format!("{ENV_API_KEY} is not set"))
            })?;

        let mut config = Self::new(api_key.trim());
        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            config.endpoint = endpoint.trim().to_string();
        }
        if let Some(model) = lookup(ENV_MODEL).filter(|v| !v.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                ResolutionError::Configuration(format!(
                    "{ENV_TIMEOUT} must be a whole number of seconds, got '{timeout}'"
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ResolutionError> {
        if self.api_key.trim().is_empty() {
            return Err(ResolutionError::Configuration("API key is empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(ResolutionError::Configuration("model name is empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ResolutionError::Configuration(
                "timeout must be at least one second".into(),
            ));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ResolutionError::Configuration(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn app_name_is_chartwright() {
        assert_eq!(APP_NAME, "chartwright");
    }

    #[test]
    fn missing_api_key_is_configuration_error() {
        let err = GenerativeConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn blank_api_key_is_configuration_error() {
        let err = GenerativeConfig::from_lookup(lookup_from(&[(ENV_API_KEY, "   ")])).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn defaults_apply_when_only_key_set() {
        let config = GenerativeConfig::from_lookup(lookup_from(&[(ENV_API_KEY, "k")])).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.endpoint, DEFAULT_GEMINI_ENDPOINT);
        assert_eq!(config.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn overrides_are_read() {
        let config = GenerativeConfig::from_lookup(lookup_from(&[
            (ENV_API_KEY, "k"),
            (ENV_ENDPOINT, "http://localhost:8080/models"),
            (ENV_MODEL, "gemini-1.5-flash"),
            (ENV_TIMEOUT, "5"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080/models");
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn bad_timeout_is_configuration_error() {
        let err = GenerativeConfig::from_lookup(lookup_from(&[
            (ENV_API_KEY, "k"),
            (ENV_TIMEOUT, "soon"),
        ]))
        .unwrap_err();
        assert!(err.is_configuration());

        let err = GenerativeConfig::from_lookup(lookup_from(&[
            (ENV_API_KEY, "k"),
            (ENV_TIMEOUT, "0"),
        ]))
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let config = GenerativeConfig::new("k").with_endpoint("ftp://example.com");
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = GenerativeConfig::new("super-secret");
        let shown = format!("{config:?}");
        assert!(!shown.contains("super-secret"));
        assert!(shown.contains("redacted"));
    }
}
