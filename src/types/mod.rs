//! Request and response types for Bedrock flex-tier operations.

mod requests;
mod responses;

pub use requests::{
    ContentBlock, ConverseRequest, ImageBlock, ImageSource, InferenceConfig, InvokeRequest,
    Message, ServiceTier, ServiceTierSpec, SCHEMA_VERSION,
};
pub use responses::{
    ConverseOutput, ConverseOutputBlock, ConverseResponse, InvokeOutput, ResponseMetadata,
    TokenUsage, SERVICE_TIER_HEADER,
};
