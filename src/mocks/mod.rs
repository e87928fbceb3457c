//! Test doubles and fixtures.
//!
//! `MockBedrockClient` stands in for the real client in driver tests: it
//! records every request it receives and replays queued outputs, so tests can
//! assert both on what went out and on how the driver handled what came back.

use crate::client::BedrockClient;
use crate::error::{BedrockError, ServiceError};
use crate::types::{
    ConverseOutput, ConverseRequest, ConverseResponse, InvokeOutput, InvokeRequest,
    ResponseMetadata, ServiceTier, SERVICE_TIER_HEADER,
};
use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// A recorded invoke call.
#[derive(Debug, Clone)]
pub struct RecordedInvoke {
    /// The request payload.
    pub request: InvokeRequest,
    /// The requested tier.
    pub tier: ServiceTier,
}

/// Mock Bedrock client for driver tests.
#[derive(Default)]
pub struct MockBedrockClient {
    invoke_outputs: Mutex<VecDeque<Result<InvokeOutput, BedrockError>>>,
    converse_outputs: Mutex<VecDeque<Result<ConverseOutput, BedrockError>>>,
    recorded_invokes: Mutex<Vec<RecordedInvoke>>,
    recorded_converses: Mutex<Vec<ConverseRequest>>,
}

impl MockBedrockClient {
    /// Create an empty mock. With nothing queued, calls fail with an
    /// internal service error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an invoke result.
    pub fn push_invoke(&self, result: Result<InvokeOutput, BedrockError>) {
        self.invoke_outputs.lock().unwrap().push_back(result);
    }

    /// Queue a converse result.
    pub fn push_converse(&self, result: Result<ConverseOutput, BedrockError>) {
        self.converse_outputs.lock().unwrap().push_back(result);
    }

    /// Number of invoke calls received.
    pub fn invoke_count(&self) -> usize {
        self.recorded_invokes.lock().unwrap().len()
    }

    /// The last recorded invoke call, if any.
    pub fn last_invoke(&self) -> Option<RecordedInvoke> {
        self.recorded_invokes.lock().unwrap().last().cloned()
    }

    /// Number of converse calls received.
    pub fn converse_count(&self) -> usize {
        self.recorded_converses.lock().unwrap().len()
    }

    /// The last recorded converse call, if any.
    pub fn last_converse(&self) -> Option<ConverseRequest> {
        self.recorded_converses.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl BedrockClient for MockBedrockClient {
    async fn invoke(
        &self,
        request: &InvokeRequest,
        tier: ServiceTier,
    ) -> Result<InvokeOutput, BedrockError> {
        self.recorded_invokes.lock().unwrap().push(RecordedInvoke {
            request: request.clone(),
            tier,
        });

        self.invoke_outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(BedrockError::Service(ServiceError::Internal {
                    message: Some("no mock response queued".to_string()),
                    request_id: None,
                }))
            })
    }

    async fn converse(&self, request: &ConverseRequest) -> Result<ConverseOutput, BedrockError> {
        self.recorded_converses.lock().unwrap().push(request.clone());

        self.converse_outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(BedrockError::Service(ServiceError::Internal {
                    message: Some("no mock response queued".to_string()),
                    request_id: None,
                }))
            })
    }

    fn model_id(&self) -> &str {
        "us.amazon.nova-2-lite-v1:0"
    }
}

/// A Nova-shaped success body with the given answer text.
pub fn nova_success_body(text: &str) -> serde_json::Value {
    json!({
        "output": {
            "message": {
                "role": "assistant",
                "content": [{"text": text}]
            }
        },
        "stopReason": "end_turn",
        "usage": {"inputTokens": 1504, "outputTokens": 87, "totalTokens": 1591}
    })
}

/// Response metadata with standard headers and an optional tier confirmation.
pub fn metadata_with_tier(tier: Option<&str>) -> ResponseMetadata {
    let mut headers: HashMap<String, String> = HashMap::new();
    headers.insert("content-type".to_string(), "application/json".to_string());
    headers.insert("x-amzn-requestid".to_string(), "mock-request-id".to_string());
    if let Some(t) = tier {
        headers.insert(SERVICE_TIER_HEADER.to_string(), t.to_string());
    }
    ResponseMetadata {
        status: 200,
        headers,
    }
}

/// A full invoke success fixture.
pub fn invoke_success(text: &str, tier: Option<&str>) -> InvokeOutput {
    InvokeOutput {
        metadata: metadata_with_tier(tier),
        body: nova_success_body(text),
    }
}

/// A full converse success fixture.
pub fn converse_success(text: &str, tier: Option<&str>) -> ConverseOutput {
    let response: ConverseResponse = serde_json::from_value(nova_success_body(text))
        .expect("fixture body deserializes");
    ConverseOutput {
        metadata: metadata_with_tier(tier),
        response,
    }
}
