//! HTTP to service error mapping.

use super::{BedrockError, ServiceError};

/// Map an HTTP error response to a `BedrockError`.
///
/// `error_type` is the parsed `x-amzn-errortype` header value; the status
/// code decides the fallback when the header is absent or unrecognized.
pub fn map_service_error(
    status: u16,
    error_type: Option<&str>,
    message: Option<&str>,
    request_id: Option<String>,
    model_id: Option<&str>,
) -> BedrockError {
    let error_type = error_type.unwrap_or("");
    let message_str = message.map(|s| s.to_string());

    let service_error = match (status, error_type) {
        (400, "ValidationException") => ServiceError::Validation {
            message: message_str.unwrap_or_else(|| "Validation error".to_string()),
            request_id,
        },

        (403, _) => ServiceError::AccessDenied {
            message: message_str.unwrap_or_else(|| "Access denied".to_string()),
            request_id,
        },

        (404, "ResourceNotFoundException") => ServiceError::ModelNotFound {
            model_id: model_id.unwrap_or("unknown").to_string(),
            request_id,
        },

        (429, _) => ServiceError::Throttled { request_id },

        (503, _) => ServiceError::Unavailable { request_id },

        // Default mapping by status code
        (400..=499, _) => ServiceError::Validation {
            message: message_str.unwrap_or_else(|| format!("Client error: {}", status)),
            request_id,
        },
        _ => ServiceError::Internal {
            message: message_str,
            request_id,
        },
    };

    BedrockError::Service(service_error)
}

/// Parse the `x-amzn-errortype` header to extract the error code.
///
/// Header format: "ErrorType:additional_info" or just "ErrorType".
pub fn parse_error_type(header_value: &str) -> &str {
    header_value.split(':').next().unwrap_or(header_value)
}
