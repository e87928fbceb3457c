//! Integration tests for the HTTP client against a mock Bedrock endpoint.

use bedrock_flex::{
    AwsCredentials, BedrockClient, BedrockClientBuilder, BedrockClientImpl, BedrockConfig,
    BedrockError, ConverseRequest, InvokeRequest, ResponseError, ServiceError, ServiceTier,
};
use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/model/us.amazon.nova-2-lite-v1:0/invoke";
const CONVERSE_PATH: &str = "/model/us.amazon.nova-2-lite-v1:0/converse";

fn nova_body(text: &str) -> serde_json::Value {
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

async fn create_client(server: &MockServer) -> BedrockClientImpl {
    let config = BedrockConfig::builder()
        .region("us-west-2")
        .endpoint_url(server.uri())
        .build()
        .unwrap();

    BedrockClientBuilder::new()
        .config(config)
        .credentials(AwsCredentials::new("AKID", "SECRET"))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_invoke_sends_tier_header_and_signed_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-amzn-bedrock-service-tier", "flex"))
        .and(header("content-type", "application/json"))
        .and(header_exists("authorization"))
        .and(header_exists("x-amz-date"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(nova_body("A small red square."))
                .insert_header("x-amzn-bedrock-service-tier", "flex")
                .insert_header("x-amzn-requestid", "req-1"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server).await;
    let request = InvokeRequest::image_prompt("png", "aGVsbG8=", "Describe this image in detail.");

    let output = client.invoke(&request, ServiceTier::Flex).await.unwrap();
    assert_eq!(output.output_text().unwrap(), "A small red square.");
    assert_eq!(output.metadata.service_tier(), Some("flex"));
    assert_eq!(output.metadata.request_id(), Some("req-1"));
    assert_eq!(output.metadata.status, 200);
}

#[tokio::test]
async fn test_invoke_body_matches_messages_v1_schema() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(nova_body("ok")))
        .mount(&server)
        .await;

    let client = create_client(&server).await;
    let request = InvokeRequest::image_prompt("png", "aGVsbG8=", "Describe this image in detail.");
    client.invoke(&request, ServiceTier::Flex).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["schemaVersion"], "messages-v1");
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["messages"][0]["role"], "user");

    let content = body["messages"][0]["content"].as_array().unwrap();
    assert_eq!(content.len(), 2);
    assert_eq!(content[0]["image"]["format"], "png");
    assert_eq!(content[0]["image"]["source"]["bytes"], "aGVsbG8=");
    assert_eq!(content[1]["text"], "Describe this image in detail.");

    assert_eq!(
        body["inferenceConfig"],
        json!({"maxTokens": 512, "temperature": 0.7})
    );
}

#[tokio::test]
async fn test_invoke_without_tier_confirmation_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(nova_body("ok")))
        .mount(&server)
        .await;

    let client = create_client(&server).await;
    let request = InvokeRequest::image_prompt("png", "aGVsbG8=", "Describe");

    let output = client.invoke(&request, ServiceTier::Flex).await.unwrap();
    assert!(output.metadata.service_tier().is_none());
}

#[tokio::test]
async fn test_invoke_throttled() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("x-amzn-errortype", "ThrottlingException:http/1.1")
                .insert_header("x-amzn-requestid", "req-t")
                .set_body_json(json!({"message": "Too many requests"})),
        )
        .mount(&server)
        .await;

    let client = create_client(&server).await;
    let request = InvokeRequest::image_prompt("png", "aGVsbG8=", "Describe");

    let error = client.invoke(&request, ServiceTier::Flex).await.unwrap_err();
    match error {
        BedrockError::Service(ServiceError::Throttled { request_id }) => {
            assert_eq!(request_id.as_deref(), Some("req-t"));
        }
        other => panic!("Expected Throttled, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invoke_validation_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(400)
                .insert_header("x-amzn-errortype", "ValidationException")
                .set_body_json(json!({"message": "Malformed input request"})),
        )
        .mount(&server)
        .await;

    let client = create_client(&server).await;
    let request = InvokeRequest::image_prompt("png", "aGVsbG8=", "Describe");

    let error = client.invoke(&request, ServiceTier::Flex).await.unwrap_err();
    match error {
        BedrockError::Service(ServiceError::Validation { message, .. }) => {
            assert_eq!(message, "Malformed input request");
        }
        other => panic!("Expected Validation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invoke_non_json_body_fails_at_parse() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = create_client(&server).await;
    let request = InvokeRequest::image_prompt("png", "aGVsbG8=", "Describe");

    let error = client.invoke(&request, ServiceTier::Flex).await.unwrap_err();
    assert!(matches!(
        error,
        BedrockError::Response(ResponseError::Json { .. })
    ));
}

#[tokio::test]
async fn test_converse_carries_tier_in_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CONVERSE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(nova_body("From converse"))
                .insert_header("x-amzn-bedrock-service-tier", "flex"),
        )
        .mount(&server)
        .await;

    let client = create_client(&server).await;
    let request = ConverseRequest::image_prompt("png", "aGVsbG8=", "Describe", ServiceTier::Flex);

    let output = client.converse(&request).await.unwrap();
    assert_eq!(output.response.output_text().unwrap(), "From converse");
    assert_eq!(output.response.usage.total_tokens, 1591);
    assert_eq!(output.response.stop_reason, "end_turn");
    assert_eq!(output.metadata.service_tier(), Some("flex"));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["serviceTier"], json!({"type": "flex"}));
    // Converse has no schemaVersion field and no tier header
    assert!(body.get("schemaVersion").is_none());
}
