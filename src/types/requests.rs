//! Request types for Bedrock Runtime operations.

use serde::{Deserialize, Serialize};

/// Schema version for the Nova messages payload.
pub const SCHEMA_VERSION: &str = "messages-v1";

/// Service tier selector for a request.
///
/// Controls the cost/latency/priority characteristics the service applies to
/// the invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceTier {
    /// Lower-priority, lower-cost processing.
    Flex,
    /// Default on-demand processing.
    Standard,
}

impl ServiceTier {
    /// The wire string for this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceTier::Flex => "flex",
            ServiceTier::Standard => "standard",
        }
    }
}

impl std::fmt::Display for ServiceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invoke-model request body in the `messages-v1` schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeRequest {
    /// Fixed schema version literal.
    pub schema_version: String,
    /// Conversation messages.
    pub messages: Vec<Message>,
    /// Generation parameters.
    pub inference_config: InferenceConfig,
}

impl InvokeRequest {
    /// Build the canonical image-plus-prompt request: exactly one user
    /// message with two content blocks, image first.
    pub fn image_prompt(
        format: impl Into<String>,
        base64_bytes: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![
                    ContentBlock::Image(ImageBlock {
                        format: format.into(),
                        source: ImageSource {
                            bytes: base64_bytes.into(),
                        },
                    }),
                    ContentBlock::Text(prompt.into()),
                ],
            }],
            inference_config: InferenceConfig::default(),
        }
    }

    /// Override the generation parameters.
    pub fn with_inference_config(mut self, config: InferenceConfig) -> Self {
        self.inference_config = config;
        self
    }
}

/// A conversational message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role: "user" or "assistant".
    pub role: String,
    /// Ordered content blocks.
    pub content: Vec<ContentBlock>,
}

/// A single content block within a message.
///
/// Serializes externally tagged, matching the wire format:
/// `{"image": {...}}` or `{"text": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ContentBlock {
    /// An image block.
    #[serde(rename = "image")]
    Image(ImageBlock),
    /// A text block.
    #[serde(rename = "text")]
    Text(String),
}

/// Image content carried in a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Declared image format (e.g. "png", "jpeg").
    pub format: String,
    /// Image source.
    pub source: ImageSource,
}

/// Image source bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSource {
    /// Base64-encoded image bytes.
    pub bytes: String,
}

/// Generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Temperature for sampling.
    pub temperature: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.7,
        }
    }
}

/// Converse API request body.
///
/// Unlike invoke-model, the Converse API carries the tier selection in the
/// body rather than a request header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverseRequest {
    /// Conversation messages.
    pub messages: Vec<Message>,
    /// Generation parameters.
    pub inference_config: InferenceConfig,
    /// Tier selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<ServiceTierSpec>,
}

impl ConverseRequest {
    /// Build the canonical image-plus-prompt Converse request.
    pub fn image_prompt(
        format: impl Into<String>,
        base64_bytes: impl Into<String>,
        prompt: impl Into<String>,
        tier: ServiceTier,
    ) -> Self {
        let invoke = InvokeRequest::image_prompt(format, base64_bytes, prompt);
        Self {
            messages: invoke.messages,
            inference_config: invoke.inference_config,
            service_tier: Some(ServiceTierSpec::new(tier)),
        }
    }
}

/// Body-level service tier selection for the Converse API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceTierSpec {
    /// Tier type string: "flex" or "standard".
    #[serde(rename = "type")]
    pub tier_type: String,
}

impl ServiceTierSpec {
    /// Create a tier spec from a [`ServiceTier`].
    pub fn new(tier: ServiceTier) -> Self {
        Self {
            tier_type: tier.as_str().to_string(),
        }
    }
}
