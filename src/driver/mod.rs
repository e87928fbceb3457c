//! The request driver: load an image, submit it with a prompt, and report
//! what came back.
//!
//! Each run is one straight-line sequence: read file, derive format, encode,
//! build payload, invoke, extract. The image is read before any request is
//! built, so a missing file never reaches the network.

use crate::client::BedrockClient;
use crate::error::BedrockError;
use crate::image::load_image;
use crate::types::{
    ConverseRequest, InvokeRequest, ResponseMetadata, ServiceTier, TokenUsage,
};
use std::path::Path;
use tracing::info;

/// Comparison between the requested service tier and what the service
/// confirmed via the tier-confirmation header.
#[derive(Debug, Clone)]
pub struct TierComparison {
    /// The tier the request asked for.
    pub requested: ServiceTier,
    /// The tier the service reported, if the header was present.
    pub actual: Option<String>,
}

impl TierComparison {
    /// Compare the requested tier against response metadata.
    pub fn from_metadata(requested: ServiceTier, metadata: &ResponseMetadata) -> Self {
        Self {
            requested,
            actual: metadata.service_tier().map(String::from),
        }
    }

    /// Whether the confirmed tier equals the requested one.
    pub fn matched(&self) -> bool {
        self.actual.as_deref() == Some(self.requested.as_str())
    }

    /// Human-readable verification summary.
    pub fn summary(&self) -> String {
        let actual = self.actual.as_deref().unwrap_or("absent");
        if self.matched() {
            format!(
                "Requested tier: {}\nActual tier:    {}\nConfirmed: {} tier was applied",
                self.requested, actual, self.requested
            )
        } else {
            format!(
                "Requested tier: {}\nActual tier:    {}\nNote: service applied '{}' instead of the requested '{}' tier",
                self.requested, actual, actual, self.requested
            )
        }
    }
}

/// Result of one invoke-model image inference run.
#[derive(Debug, Clone)]
pub struct InvokeReport {
    /// HTTP-level response metadata.
    pub metadata: ResponseMetadata,
    /// Full parsed response body.
    pub body: serde_json::Value,
    /// The extracted answer text.
    pub answer: String,
    /// Tier verification.
    pub tier: TierComparison,
}

/// Result of one Converse-API image inference run.
#[derive(Debug, Clone)]
pub struct ConverseReport {
    /// HTTP-level response metadata.
    pub metadata: ResponseMetadata,
    /// The extracted answer text.
    pub answer: String,
    /// Token accounting.
    pub usage: TokenUsage,
    /// Why generation stopped.
    pub stop_reason: String,
    /// Tier verification.
    pub tier: TierComparison,
}

/// Run image inference through invoke-model with the given tier.
///
/// The tier selection travels as a request header; the confirmation comes
/// back as a response header which may be absent.
pub async fn describe_image<C>(
    client: &C,
    image_path: &Path,
    prompt: &str,
    tier: ServiceTier,
) -> Result<InvokeReport, BedrockError>
where
    C: BedrockClient + ?Sized,
{
    let image = load_image(image_path)?;
    let request = InvokeRequest::image_prompt(image.format, image.base64, prompt);

    info!(path = %image_path.display(), tier = %tier, "Submitting image inference request");
    let output = client.invoke(&request, tier).await?;

    let answer = output.output_text()?.to_string();
    let tier = TierComparison::from_metadata(tier, &output.metadata);

    Ok(InvokeReport {
        metadata: output.metadata,
        body: output.body,
        answer,
        tier,
    })
}

/// Run image inference through the Converse API with the given tier.
///
/// Here the tier selection travels in the request body; verification still
/// reads the confirmation header, falling back to the body echo.
pub async fn describe_image_converse<C>(
    client: &C,
    image_path: &Path,
    prompt: &str,
    tier: ServiceTier,
) -> Result<ConverseReport, BedrockError>
where
    C: BedrockClient + ?Sized,
{
    let image = load_image(image_path)?;
    let request = ConverseRequest::image_prompt(image.format, image.base64, prompt, tier);

    info!(path = %image_path.display(), tier = %tier, "Submitting Converse image request");
    let output = client.converse(&request).await?;

    let answer = output.response.output_text()?.to_string();
    let mut comparison = TierComparison::from_metadata(tier, &output.metadata);
    if comparison.actual.is_none() {
        comparison.actual = output
            .response
            .service_tier
            .as_ref()
            .map(|t| t.tier_type.clone());
    }

    Ok(ConverseReport {
        metadata: output.metadata,
        answer,
        usage: output.response.usage,
        stop_reason: output.response.stop_reason,
        tier: comparison,
    })
}

const RULE: &str = "============================================================";

/// Render an invoke-model report as console text: metadata, body, answer,
/// tier verification.
pub fn render_report(report: &InvokeReport) -> String {
    let metadata_json = serde_json::to_string_pretty(&report.metadata)
        .unwrap_or_else(|_| "<unprintable>".to_string());
    let body_json = serde_json::to_string_pretty(&report.body)
        .unwrap_or_else(|_| "<unprintable>".to_string());

    format!(
        "{RULE}\nResponse metadata\n{RULE}\n{metadata_json}\n\n\
         {RULE}\nResponse body\n{RULE}\n{body_json}\n\n\
         {RULE}\nAnswer\n{RULE}\n{answer}\n\n\
         {RULE}\nService tier verification\n{RULE}\n{tier}\n",
        metadata_json = metadata_json,
        body_json = body_json,
        answer = report.answer,
        tier = report.tier.summary(),
    )
}

/// Render a Converse report as console text.
pub fn render_converse_report(report: &ConverseReport) -> String {
    format!(
        "{RULE}\nAnswer\n{RULE}\n{answer}\n\n\
         Token usage: input={input} output={output} total={total}\n\
         Stop reason: {stop}\n\n\
         {RULE}\nService tier verification\n{RULE}\n{tier}\n",
        answer = report.answer,
        input = report.usage.input_tokens,
        output = report.usage.output_tokens,
        total = report.usage.total_tokens,
        stop = report.stop_reason,
        tier = report.tier.summary(),
    )
}
