use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

pub const DEFAULT_BASE_URL: &str = "https://graphify-backend.onrender.com";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 60_000;

/// Connection settings for [`super::HttpChartService`].
///
/// Serializable so hosts can keep it next to their own settings instead of
/// inventing an ad-hoc format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl ServiceConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_request_timeout_ms(mut self, request_timeout_ms: u64) -> Self {
        self.request_timeout_ms = request_timeout_ms;
        self
    }

    pub fn validate(&self) -> PipelineResult<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "base_url must not be empty".to_owned(),
            ));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(PipelineError::InvalidConfig(format!(
                "base_url `{base}` must start with http:// or https://"
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(PipelineError::InvalidConfig(
                "request_timeout_ms must be > 0".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Joins `path` onto the base URL with exactly one slash between them.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn from_json_str(input: &str) -> PipelineResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            PipelineError::InvalidConfig(format!("failed to parse service config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> PipelineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PipelineError::InvalidConfig(format!("failed to serialize service config: {e}"))
        })
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_user_agent() -> String {
    format!("chart-pipeline/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = ServiceConfig::from_json_str(r#"{"base_url": "http://localhost:8000"}"#)
            .expect("config");
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
        assert!(config.user_agent.starts_with("chart-pipeline/"));

        let config = ServiceConfig::from_json_str("{}").expect("config");
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn endpoint_joins_without_doubled_slashes() {
        let config = ServiceConfig::default().with_base_url("http://localhost:8000/");
        assert_eq!(config.endpoint("/upload/"), "http://localhost:8000/upload/");
        let config = ServiceConfig::default().with_base_url("http://localhost:8000");
        assert_eq!(config.endpoint("generate/"), "http://localhost:8000/generate/");
    }

    #[test]
    fn validation_rejects_unusable_values() {
        assert!(ServiceConfig::default().validate().is_ok());
        assert!(ServiceConfig::default().with_base_url("").validate().is_err());
        assert!(
            ServiceConfig::default()
                .with_base_url("ftp://example.com")
                .validate()
                .is_err()
        );
        assert!(
            ServiceConfig::default()
                .with_request_timeout_ms(0)
                .validate()
                .is_err()
        );
        assert!(ServiceConfig::from_json_str(r#"{"request_timeout_ms": 0}"#).is_err());
    }

    #[test]
    fn json_roundtrip_preserves_values() {
        let config = ServiceConfig::default()
            .with_base_url("http://127.0.0.1:9000")
            .with_request_timeout_ms(1500);
        let json = config.to_json_pretty().unwrap();
        assert_eq!(ServiceConfig::from_json_str(&json).unwrap(), config);
    }
}
