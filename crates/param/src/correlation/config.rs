use http::HeaderName;
use serde::Deserialize;
use thiserror::Error;

/// Header checked for an incoming correlation id unless configured otherwise
pub const DEFAULT_HEADER_NAME: &str = "X-Correlation-Id";

/// Configuration of the correlation id interceptor.
///
/// Every field has a default, so an empty document is a valid configuration:
///
/// ```
/// use micro_param::correlation::CorrelationIdConfig;
///
/// let config: CorrelationIdConfig = serde_json::from_str(r#"{ "echo_response": true }"#).unwrap();
/// assert_eq!(config.header_name, "X-Correlation-Id");
/// assert!(config.echo_response);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CorrelationIdConfig {
    /// Request header holding the caller's correlation id
    pub header_name: String,
    /// Copy the resolved id into the same header of the response
    pub echo_response: bool,
}

impl Default for CorrelationIdConfig {
    fn default() -> Self {
        Self { header_name: DEFAULT_HEADER_NAME.to_owned(), echo_response: false }
    }
}

impl CorrelationIdConfig {
    /// Parses the configured header name
    pub fn header_name(&self) -> Result<HeaderName, ConfigError> {
        HeaderName::from_bytes(self.header_name.as_bytes())
            .map_err(|_e| ConfigError::InvalidHeaderName { name: self.header_name.clone() })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("'{name}' is not a valid header name")]
    InvalidHeaderName { name: String },
}
