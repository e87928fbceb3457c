//! Bedrock Runtime client.
//!
//! One synchronous (from the caller's point of view) HTTPS exchange per
//! operation: no retry, no backoff, no streaming. Transport and service
//! errors propagate directly.

use crate::config::BedrockConfig;
use crate::credentials::{
    AwsCredentials, ChainCredentialsProvider, CredentialsProvider, StaticCredentialsProvider,
};
use crate::error::{
    map_service_error, parse_error_type, BedrockError, ConfigurationError, NetworkError,
    ResponseError,
};
use crate::signing::{AwsSigner, RuntimeSigner};
use crate::types::{
    ConverseOutput, ConverseRequest, ConverseResponse, InvokeOutput, InvokeRequest,
    ResponseMetadata, ServiceTier, SERVICE_TIER_HEADER,
};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

/// Bedrock client trait defining the public API.
#[async_trait]
pub trait BedrockClient: Send + Sync {
    /// Invoke the configured model with a raw `messages-v1` payload,
    /// requesting the given service tier via the tier-selection header.
    async fn invoke(
        &self,
        request: &InvokeRequest,
        tier: ServiceTier,
    ) -> Result<InvokeOutput, BedrockError>;

    /// Invoke the configured model through the Converse API, with the tier
    /// selection carried in the request body.
    async fn converse(&self, request: &ConverseRequest) -> Result<ConverseOutput, BedrockError>;

    /// The model this client invokes.
    fn model_id(&self) -> &str;
}

/// Bedrock client implementation.
pub struct BedrockClientImpl {
    config: BedrockConfig,
    http_client: HttpClient,
    signer: RuntimeSigner,
}

impl BedrockClientImpl {
    /// Create a new client with the given configuration and credentials.
    pub fn new(
        config: BedrockConfig,
        credentials_provider: Arc<dyn CredentialsProvider>,
    ) -> Result<Self, BedrockError> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                BedrockError::Network(NetworkError::ConnectionFailed {
                    message: format!("Failed to create HTTP client: {}", e),
                })
            })?;

        let signer = RuntimeSigner::new(credentials_provider, &config.region);

        Ok(Self {
            config,
            http_client,
            signer,
        })
    }

    fn build_invoke_url(&self) -> String {
        format!(
            "{}/model/{}/invoke",
            self.config.runtime_endpoint(),
            self.config.model_id
        )
    }

    fn build_converse_url(&self) -> String {
        format!(
            "{}/model/{}/converse",
            self.config.runtime_endpoint(),
            self.config.model_id
        )
    }

    /// Sign and send a single POST. Any transport error is terminal.
    async fn execute_post(
        &self,
        url: &str,
        headers: HashMap<String, String>,
        body: &[u8],
    ) -> Result<Response, BedrockError> {
        let parsed_url = Url::parse(url).map_err(|e| {
            BedrockError::Configuration(ConfigurationError::InvalidConfiguration {
                field: "url".to_string(),
                message: format!("Invalid URL: {}", e),
            })
        })?;

        let signed = self
            .signer
            .sign("POST", &parsed_url, &headers, Some(body))
            .await?;

        let mut request = self.http_client.post(signed.url.as_str());
        for (name, value) in signed.headers {
            request = request.header(&name, &value);
        }
        if let Some(body) = signed.body {
            request = request.body(body);
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                BedrockError::Network(NetworkError::Timeout {
                    duration: self.config.timeout,
                })
            } else {
                BedrockError::Network(NetworkError::ConnectionFailed {
                    message: e.to_string(),
                })
            }
        })
    }

    /// Capture status and lowercased headers from a response.
    fn capture_metadata(response: &Response) -> ResponseMetadata {
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_lowercase(), v.to_string()))
            })
            .collect();

        ResponseMetadata {
            status: response.status().as_u16(),
            headers,
        }
    }

    /// Map an error response to the service error taxonomy.
    async fn parse_error_response(&self, response: Response) -> BedrockError {
        let status = response.status().as_u16();
        let request_id = response
            .headers()
            .get("x-amzn-requestid")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let error_type = response
            .headers()
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            .map(parse_error_type)
            .map(String::from);

        let body = response.text().await.unwrap_or_default();
        let message: Option<String> = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from));

        map_service_error(
            status,
            error_type.as_deref(),
            message.as_deref(),
            request_id,
            Some(&self.config.model_id),
        )
    }

    async fn read_success_body(
        &self,
        response: Response,
    ) -> Result<(ResponseMetadata, bytes::Bytes), BedrockError> {
        let metadata = Self::capture_metadata(&response);
        let body = response.bytes().await.map_err(|e| {
            BedrockError::Network(NetworkError::ConnectionFailed {
                message: format!("Failed to read response: {}", e),
            })
        })?;
        Ok((metadata, body))
    }
}

#[async_trait]
impl BedrockClient for BedrockClientImpl {
    #[instrument(skip(self, request), fields(model_id = %self.config.model_id, tier = %tier))]
    async fn invoke(
        &self,
        request: &InvokeRequest,
        tier: ServiceTier,
    ) -> Result<InvokeOutput, BedrockError> {
        let body = serde_json::to_vec(request).map_err(|e| BedrockError::Payload {
            message: e.to_string(),
        })?;

        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert("accept".to_string(), "application/json".to_string());
        headers.insert(SERVICE_TIER_HEADER.to_string(), tier.as_str().to_string());

        debug!(body_size = body.len(), "Invoking model");

        let url = self.build_invoke_url();
        let response = self.execute_post(&url, headers, &body).await?;

        if !response.status().is_success() {
            return Err(self.parse_error_response(response).await);
        }

        let (metadata, body) = self.read_success_body(response).await?;
        let body: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
            BedrockError::Response(ResponseError::Json {
                message: e.to_string(),
            })
        })?;

        Ok(InvokeOutput { metadata, body })
    }

    #[instrument(skip(self, request), fields(model_id = %self.config.model_id))]
    async fn converse(&self, request: &ConverseRequest) -> Result<ConverseOutput, BedrockError> {
        let body = serde_json::to_vec(request).map_err(|e| BedrockError::Payload {
            message: e.to_string(),
        })?;

        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert("accept".to_string(), "application/json".to_string());

        debug!(body_size = body.len(), "Converse call");

        let url = self.build_converse_url();
        let response = self.execute_post(&url, headers, &body).await?;

        if !response.status().is_success() {
            return Err(self.parse_error_response(response).await);
        }

        let (metadata, body) = self.read_success_body(response).await?;
        let response: ConverseResponse = serde_json::from_slice(&body).map_err(|e| {
            BedrockError::Response(ResponseError::Json {
                message: e.to_string(),
            })
        })?;

        Ok(ConverseOutput { metadata, response })
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }
}

impl std::fmt::Debug for BedrockClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BedrockClientImpl")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Client builder.
pub struct BedrockClientBuilder {
    config: Option<BedrockConfig>,
    credentials_provider: Option<Arc<dyn CredentialsProvider>>,
}

impl BedrockClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            credentials_provider: None,
        }
    }

    /// Set configuration.
    pub fn config(mut self, config: BedrockConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set credentials provider.
    pub fn credentials_provider(mut self, provider: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials_provider = Some(provider);
        self
    }

    /// Set static credentials.
    pub fn credentials(mut self, credentials: AwsCredentials) -> Self {
        self.credentials_provider = Some(Arc::new(StaticCredentialsProvider::new(credentials)));
        self
    }

    /// Fill unset pieces from environment variables and the ambient
    /// credential chain.
    pub fn from_env(mut self) -> Self {
        if self.config.is_none() {
            if let Ok(config) = BedrockConfig::builder().from_env().build() {
                self.config = Some(config);
            }
        }
        if self.credentials_provider.is_none() {
            self.credentials_provider = Some(Arc::new(ChainCredentialsProvider::new()));
        }
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<BedrockClientImpl, BedrockError> {
        let config = self
            .config
            .ok_or(BedrockError::Configuration(ConfigurationError::MissingRegion))?;

        let credentials_provider = self.credentials_provider.ok_or(BedrockError::Configuration(
            ConfigurationError::MissingCredentials,
        ))?;

        BedrockClientImpl::new(config, credentials_provider)
    }
}

impl Default for BedrockClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client() -> BedrockClientImpl {
        let config = BedrockConfig::builder().region("us-west-2").build().unwrap();
        BedrockClientBuilder::new()
            .config(config)
            .credentials(AwsCredentials::new("AKID", "SECRET"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_invoke_url() {
        let client = create_test_client();
        let url = client.build_invoke_url();
        assert!(url.contains("bedrock-runtime.us-west-2.amazonaws.com"));
        assert!(url.contains("/model/us.amazon.nova-2-lite-v1:0/invoke"));
    }

    #[test]
    fn test_build_converse_url() {
        let client = create_test_client();
        let url = client.build_converse_url();
        assert!(url.ends_with("/model/us.amazon.nova-2-lite-v1:0/converse"));
    }

    #[test]
    fn test_builder_missing_config() {
        let result = BedrockClientBuilder::new()
            .credentials(AwsCredentials::new("AKID", "SECRET"))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder() {
        let config = BedrockConfig::builder().region("us-west-2").build().unwrap();
        let result = BedrockClientBuilder::new()
            .config(config)
            .credentials(AwsCredentials::new("AKID", "SECRET"))
            .build();
        assert!(result.is_ok());
    }
}
