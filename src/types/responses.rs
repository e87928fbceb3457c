//! Response types for Bedrock Runtime operations.

use crate::error::{BedrockError, ResponseError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response header confirming which service tier was actually applied.
pub const SERVICE_TIER_HEADER: &str = "x-amzn-bedrock-service-tier";

/// HTTP-level metadata captured from a response.
///
/// Header names are keyed lowercase, matching how the driver reports them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, keyed by lowercase name.
    pub headers: HashMap<String, String>,
}

impl ResponseMetadata {
    /// The AWS request ID, if the service reported one.
    pub fn request_id(&self) -> Option<&str> {
        self.headers.get("x-amzn-requestid").map(String::as_str)
    }

    /// The tier-confirmation header value.
    ///
    /// The header may be absent; that is reported as `None`, never an error.
    pub fn service_tier(&self) -> Option<&str> {
        self.headers.get(SERVICE_TIER_HEADER).map(String::as_str)
    }
}

/// A parsed invoke-model response: metadata plus the raw JSON body.
///
/// The body is kept opaque so the caller can print it whole; typed access
/// happens through [`InvokeOutput::output_text`].
#[derive(Debug, Clone)]
pub struct InvokeOutput {
    /// HTTP-level metadata.
    pub metadata: ResponseMetadata,
    /// Parsed JSON response body.
    pub body: serde_json::Value,
}

impl InvokeOutput {
    /// Extract the generated answer text at `output.message.content[0].text`.
    ///
    /// Fails with a field-access error naming the first missing path segment
    /// if the body has a different shape.
    pub fn output_text(&self) -> Result<&str, BedrockError> {
        extract_output_text(&self.body)
    }
}

/// Walk `output.message.content[0].text` in a response body.
pub(crate) fn extract_output_text(body: &serde_json::Value) -> Result<&str, BedrockError> {
    let missing = |path: &str| {
        BedrockError::Response(ResponseError::MissingField {
            path: path.to_string(),
        })
    };

    let output = body.get("output").ok_or_else(|| missing("output"))?;
    let message = output
        .get("message")
        .ok_or_else(|| missing("output.message"))?;
    let content = message
        .get("content")
        .and_then(|c| c.as_array())
        .ok_or_else(|| missing("output.message.content"))?;
    let first = content
        .first()
        .ok_or_else(|| missing("output.message.content[0]"))?;
    first
        .get("text")
        .and_then(|t| t.as_str())
        .ok_or_else(|| missing("output.message.content[0].text"))
}

/// Token accounting reported by the Converse API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    /// Tokens consumed by the input.
    pub input_tokens: u32,
    /// Tokens generated.
    pub output_tokens: u32,
    /// Sum of input and output.
    pub total_tokens: u32,
}

/// The `output` block of a Converse response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverseOutputBlock {
    /// The assistant message.
    pub message: crate::types::Message,
}

/// Converse API response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverseResponse {
    /// Generated output.
    pub output: ConverseOutputBlock,
    /// Token usage.
    pub usage: TokenUsage,
    /// Why generation stopped.
    pub stop_reason: String,
    /// Tier confirmation, when the service echoes it in the body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<crate::types::ServiceTierSpec>,
}

/// A completed Converse exchange: HTTP metadata plus the typed body.
#[derive(Debug, Clone)]
pub struct ConverseOutput {
    /// HTTP-level metadata.
    pub metadata: ResponseMetadata,
    /// Parsed response body.
    pub response: ConverseResponse,
}

impl ConverseResponse {
    /// Extract the first text block of the assistant message.
    pub fn output_text(&self) -> Result<&str, BedrockError> {
        self.output
            .message
            .content
            .iter()
            .find_map(|block| match block {
                crate::types::ContentBlock::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .ok_or_else(|| {
                BedrockError::Response(ResponseError::MissingField {
                    path: "output.message.content[].text".to_string(),
                })
            })
    }
}
