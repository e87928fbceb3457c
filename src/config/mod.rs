//! Configuration for the Bedrock flex-tier client.

use crate::error::{BedrockError, ConfigurationError};
use std::time::Duration;

/// Default model for multimodal image inference.
pub const DEFAULT_MODEL_ID: &str = "us.amazon.nova-2-lite-v1:0";

/// Configuration for the Bedrock client.
#[derive(Debug, Clone)]
pub struct BedrockConfig {
    /// AWS region.
    pub region: String,
    /// Custom endpoint URL (for testing or custom deployments).
    pub endpoint_url: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Model to invoke.
    pub model_id: String,
}

impl BedrockConfig {
    /// Create a new config builder.
    pub fn builder() -> BedrockConfigBuilder {
        BedrockConfigBuilder::new()
    }

    /// Get the Bedrock Runtime endpoint URL.
    pub fn runtime_endpoint(&self) -> String {
        if let Some(custom) = &self.endpoint_url {
            custom.clone()
        } else {
            format!("https://bedrock-runtime.{}.amazonaws.com", self.region)
        }
    }
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: "us-west-2".to_string(),
            endpoint_url: None,
            timeout: Duration::from_secs(60),
            model_id: DEFAULT_MODEL_ID.to_string(),
        }
    }
}

/// Builder for [`BedrockConfig`].
#[derive(Debug, Default)]
pub struct BedrockConfigBuilder {
    region: Option<String>,
    endpoint_url: Option<String>,
    timeout: Option<Duration>,
    model_id: Option<String>,
}

impl BedrockConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a custom endpoint URL.
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the model to invoke.
    pub fn model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Fill unset fields from environment variables.
    pub fn from_env(mut self) -> Self {
        if self.region.is_none() {
            self.region = std::env::var("AWS_REGION")
                .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
                .ok();
        }

        if self.endpoint_url.is_none() {
            self.endpoint_url = std::env::var("AWS_ENDPOINT_URL_BEDROCK")
                .or_else(|_| std::env::var("AWS_ENDPOINT_URL"))
                .ok();
        }

        if self.model_id.is_none() {
            self.model_id = std::env::var("BEDROCK_MODEL_ID").ok();
        }

        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<BedrockConfig, BedrockError> {
        let region = self
            .region
            .ok_or(BedrockError::Configuration(ConfigurationError::MissingRegion))?;

        if !is_valid_region(&region) {
            return Err(BedrockError::Configuration(
                ConfigurationError::InvalidRegion { region },
            ));
        }

        Ok(BedrockConfig {
            region,
            endpoint_url: self.endpoint_url,
            timeout: self.timeout.unwrap_or(Duration::from_secs(60)),
            model_id: self.model_id.unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
        })
    }
}

/// Validate AWS region format.
fn is_valid_region(region: &str) -> bool {
    // Should match a pattern like "us-west-2", "eu-central-1", etc.
    let parts: Vec<&str> = region.split('-').collect();
    if parts.len() < 3 {
        return false;
    }

    let valid_prefixes = ["us", "eu", "ap", "sa", "ca", "me", "af", "cn", "il"];
    if !valid_prefixes.contains(&parts[0]) {
        // Allow for custom/local endpoints
        return region.starts_with("local") || region == "localhost";
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = BedrockConfig::builder()
            .region("us-west-2")
            .timeout(Duration::from_secs(30))
            .model_id("us.amazon.nova-2-lite-v1:0")
            .build()
            .unwrap();

        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.model_id, "us.amazon.nova-2-lite-v1:0");
    }

    #[test]
    fn test_config_missing_region() {
        let result = BedrockConfig::builder().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_default_model() {
        let config = BedrockConfig::builder().region("us-west-2").build().unwrap();
        assert_eq!(config.model_id, DEFAULT_MODEL_ID);
    }

    #[test]
    fn test_runtime_endpoint() {
        let config = BedrockConfig::builder().region("us-west-2").build().unwrap();
        assert_eq!(
            config.runtime_endpoint(),
            "https://bedrock-runtime.us-west-2.amazonaws.com"
        );
    }

    #[test]
    fn test_custom_endpoint() {
        let config = BedrockConfig::builder()
            .region("us-east-1")
            .endpoint_url("http://localhost:4566")
            .build()
            .unwrap();

        assert_eq!(config.runtime_endpoint(), "http://localhost:4566");
    }

    #[test]
    fn test_is_valid_region() {
        assert!(is_valid_region("us-west-2"));
        assert!(is_valid_region("eu-central-1"));
        assert!(!is_valid_region("invalid"));
        assert!(!is_valid_region("us"));
    }
}
