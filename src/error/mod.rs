//! Error types for the Bedrock flex-tier client.
//!
//! Errors are categorized by their source: local configuration and
//! credentials, local image I/O, the network transport, the Bedrock service
//! itself, and the shape of what the service returned. There is no retry
//! layer; every error propagates to the caller as-is.

mod mapping;

pub use mapping::{map_service_error, parse_error_type};

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum BedrockError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Credential-related errors.
    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    /// Local image file errors.
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Network transport errors.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Errors reported by the Bedrock service.
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Errors in the shape or encoding of the response.
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    /// Request payload serialization errors.
    #[error("Failed to serialize request payload: {message}")]
    Payload {
        /// Serialization error message.
        message: String,
    },
}

impl BedrockError {
    /// Returns the AWS request ID if the service reported one.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            BedrockError::Service(e) => e.request_id(),
            _ => None,
        }
    }

    /// Returns the AWS error code if applicable.
    pub fn aws_error_code(&self) -> Option<&str> {
        match self {
            BedrockError::Service(e) => Some(e.code()),
            _ => None,
        }
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Missing required region configuration.
    #[error("Missing region: region must be specified via config or environment")]
    MissingRegion,

    /// Missing required credentials.
    #[error("Missing credentials: credentials must be specified via config or environment")]
    MissingCredentials,

    /// Invalid configuration value.
    #[error("Invalid configuration: {field} - {message}")]
    InvalidConfiguration {
        /// The configuration field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Region string does not look like an AWS region.
    #[error("Region '{region}' is not a valid AWS region")]
    InvalidRegion {
        /// The rejected region.
        region: String,
    },
}

/// Credential-related errors.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// No credentials could be found.
    #[error("Credentials not found: no credentials could be loaded from any source")]
    NotFound,

    /// Credentials are invalid or unreadable.
    #[error("Invalid credentials: {message}")]
    Invalid {
        /// Details about why credentials are invalid.
        message: String,
    },
}

/// Local image file errors.
///
/// A missing file is surfaced unmodified to the caller; the driver never
/// retries or substitutes a default image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The image file does not exist.
    #[error("Image file not found: {path}")]
    NotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The image file exists but could not be read.
    #[error("Failed to read image file {path}: {message}")]
    Read {
        /// The path that was requested.
        path: PathBuf,
        /// Underlying I/O error message.
        message: String,
    },
}

/// Network transport errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Connection failed.
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Error message.
        message: String,
    },

    /// Request timed out.
    #[error("Request timed out after {duration:?}")]
    Timeout {
        /// The timeout duration.
        duration: Duration,
    },
}

/// Errors reported by the Bedrock service, mapped from the HTTP status and
/// the `x-amzn-errortype` header.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request rejected by validation (400).
    #[error("Validation error: {message}")]
    Validation {
        /// Details from the service.
        message: String,
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// Access denied by IAM policy or model access settings (403).
    #[error("Access denied: {message}")]
    AccessDenied {
        /// Details from the service.
        message: String,
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// Model not found (404).
    #[error("Model not found: '{model_id}'")]
    ModelNotFound {
        /// The model ID.
        model_id: String,
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// Request throttled (429).
    #[error("Throttled: rate limit exceeded")]
    Throttled {
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// Internal service error (500).
    #[error("Internal server error")]
    Internal {
        /// Error message if provided.
        message: Option<String>,
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// Service unavailable (503).
    #[error("Service unavailable")]
    Unavailable {
        /// AWS request ID.
        request_id: Option<String>,
    },
}

impl ServiceError {
    /// Returns the AWS error code.
    pub fn code(&self) -> &str {
        match self {
            ServiceError::Validation { .. } => "ValidationException",
            ServiceError::AccessDenied { .. } => "AccessDeniedException",
            ServiceError::ModelNotFound { .. } => "ResourceNotFoundException",
            ServiceError::Throttled { .. } => "ThrottlingException",
            ServiceError::Internal { .. } => "InternalServerException",
            ServiceError::Unavailable { .. } => "ServiceUnavailableException",
        }
    }

    /// Returns the AWS request ID if available.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            ServiceError::Validation { request_id, .. }
            | ServiceError::AccessDenied { request_id, .. }
            | ServiceError::ModelNotFound { request_id, .. }
            | ServiceError::Throttled { request_id }
            | ServiceError::Internal { request_id, .. }
            | ServiceError::Unavailable { request_id } => request_id.as_deref(),
        }
    }
}

/// Errors in the shape or encoding of a success response.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The response body was not valid JSON.
    #[error("Failed to parse response JSON: {message}")]
    Json {
        /// Parse error message.
        message: String,
    },

    /// An expected field was missing from the response body.
    ///
    /// A differently-shaped success response fails here at the point of
    /// field access rather than silently yielding empty text.
    #[error("Response body missing expected field: {path}")]
    MissingField {
        /// Dotted path of the field that was absent.
        path: String,
    },
}
