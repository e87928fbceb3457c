//! AWS credentials management.
//!
//! Ambient credential resolution following the standard AWS chain:
//! environment variables first, then the shared credentials file. The demo
//! driver never configures credentials explicitly; whatever the environment
//! provides is what gets signed with.

use crate::error::{BedrockError, CredentialsError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, trace};

/// AWS credentials.
#[derive(Debug, Clone)]
pub struct AwsCredentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
}

impl AwsCredentials {
    /// Create new long-term credentials.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Create credentials with a session token.
    pub fn with_session_token(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: Some(session_token.into()),
        }
    }

    /// Get the access key ID.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Get the secret access key.
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// Get the session token if present.
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }
}

/// Trait for credential providers.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Get credentials.
    async fn get_credentials(&self) -> Result<AwsCredentials, BedrockError>;

    /// Provider name for debugging.
    fn name(&self) -> &'static str;
}

/// Static credentials provider.
pub struct StaticCredentialsProvider {
    credentials: AwsCredentials,
}

impl StaticCredentialsProvider {
    /// Create a new static credentials provider.
    pub fn new(credentials: AwsCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialsProvider for StaticCredentialsProvider {
    async fn get_credentials(&self) -> Result<AwsCredentials, BedrockError> {
        Ok(self.credentials.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Environment credentials provider.
#[derive(Default)]
pub struct EnvCredentialsProvider;

impl EnvCredentialsProvider {
    /// Create a new environment credentials provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CredentialsProvider for EnvCredentialsProvider {
    async fn get_credentials(&self) -> Result<AwsCredentials, BedrockError> {
        let access_key = std::env::var("AWS_ACCESS_KEY_ID")
            .map_err(|_| BedrockError::Credentials(CredentialsError::NotFound))?;

        let secret_key = std::env::var("AWS_SECRET_ACCESS_KEY")
            .map_err(|_| BedrockError::Credentials(CredentialsError::NotFound))?;

        match std::env::var("AWS_SESSION_TOKEN").ok() {
            Some(token) => Ok(AwsCredentials::with_session_token(
                access_key, secret_key, token,
            )),
            None => Ok(AwsCredentials::new(access_key, secret_key)),
        }
    }

    fn name(&self) -> &'static str {
        "environment"
    }
}

/// Profile credentials provider (reads from `~/.aws/credentials`).
pub struct ProfileCredentialsProvider {
    profile: String,
}

impl ProfileCredentialsProvider {
    /// Create a new profile credentials provider with the default profile.
    pub fn new() -> Self {
        Self {
            profile: std::env::var("AWS_PROFILE").unwrap_or_else(|_| "default".to_string()),
        }
    }

    /// Create with a specific profile name.
    pub fn with_profile(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
        }
    }

    fn credentials_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("AWS_SHARED_CREDENTIALS_FILE") {
            return Some(PathBuf::from(path));
        }
        std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".aws").join("credentials"))
    }

    fn parse_credentials(&self, content: &str) -> Result<AwsCredentials, BedrockError> {
        let mut in_profile = false;
        let mut access_key: Option<String> = None;
        let mut secret_key: Option<String> = None;
        let mut session_token: Option<String> = None;

        let profile_header = format!("[{}]", self.profile);

        for line in content.lines() {
            let line = line.trim();

            if line.starts_with('[') {
                in_profile = line == profile_header;
                continue;
            }

            if in_profile {
                if let Some((key, value)) = line.split_once('=') {
                    match key.trim() {
                        "aws_access_key_id" => access_key = Some(value.trim().to_string()),
                        "aws_secret_access_key" => secret_key = Some(value.trim().to_string()),
                        "aws_session_token" => session_token = Some(value.trim().to_string()),
                        _ => {}
                    }
                }
            }
        }

        match (access_key, secret_key) {
            (Some(ak), Some(sk)) => match session_token {
                Some(token) => Ok(AwsCredentials::with_session_token(ak, sk, token)),
                None => Ok(AwsCredentials::new(ak, sk)),
            },
            _ => Err(BedrockError::Credentials(CredentialsError::NotFound)),
        }
    }
}

impl Default for ProfileCredentialsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialsProvider for ProfileCredentialsProvider {
    async fn get_credentials(&self) -> Result<AwsCredentials, BedrockError> {
        let path = Self::credentials_path()
            .ok_or(BedrockError::Credentials(CredentialsError::NotFound))?;

        if !path.exists() {
            return Err(BedrockError::Credentials(CredentialsError::NotFound));
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            BedrockError::Credentials(CredentialsError::Invalid {
                message: format!("Failed to read credentials file: {}", e),
            })
        })?;

        self.parse_credentials(&content)
    }

    fn name(&self) -> &'static str {
        "profile"
    }
}

/// Chained credentials provider that tries multiple sources in order.
pub struct ChainCredentialsProvider {
    providers: Vec<Arc<dyn CredentialsProvider>>,
}

impl ChainCredentialsProvider {
    /// Create a new chain with the default providers: environment, profile.
    pub fn new() -> Self {
        Self {
            providers: vec![
                Arc::new(EnvCredentialsProvider::new()),
                Arc::new(ProfileCredentialsProvider::new()),
            ],
        }
    }

    /// Create a chain with custom providers.
    pub fn with_providers(providers: Vec<Arc<dyn CredentialsProvider>>) -> Self {
        Self { providers }
    }
}

impl Default for ChainCredentialsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialsProvider for ChainCredentialsProvider {
    async fn get_credentials(&self) -> Result<AwsCredentials, BedrockError> {
        let mut last_error: Option<BedrockError> = None;

        for provider in &self.providers {
            trace!("Trying credentials provider: {}", provider.name());

            match provider.get_credentials().await {
                Ok(creds) => {
                    debug!("Credentials loaded from provider: {}", provider.name());
                    return Ok(creds);
                }
                Err(e) => {
                    trace!("Provider {} failed: {:?}", provider.name(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(BedrockError::Credentials(CredentialsError::NotFound)))
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}

impl std::fmt::Debug for ChainCredentialsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainCredentialsProvider")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_new() {
        let creds = AwsCredentials::new("AKID", "SECRET");
        assert_eq!(creds.access_key_id(), "AKID");
        assert_eq!(creds.secret_access_key(), "SECRET");
        assert!(creds.session_token().is_none());
    }

    #[test]
    fn test_credentials_with_token() {
        let creds = AwsCredentials::with_session_token("AKID", "SECRET", "TOKEN");
        assert_eq!(creds.session_token(), Some("TOKEN"));
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticCredentialsProvider::new(AwsCredentials::new("AKID", "SECRET"));

        let creds = provider.get_credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "AKID");
    }

    #[test]
    fn test_profile_parse() {
        let provider = ProfileCredentialsProvider::with_profile("default");
        let content = r#"
[default]
aws_access_key_id = AKID123
aws_secret_access_key = SECRET456

[other]
aws_access_key_id = OTHER
aws_secret_access_key = KEY
"#;

        let creds = provider.parse_credentials(content).unwrap();
        assert_eq!(creds.access_key_id(), "AKID123");
        assert_eq!(creds.secret_access_key(), "SECRET456");
    }

    #[test]
    fn test_profile_parse_missing_keys() {
        let provider = ProfileCredentialsProvider::with_profile("default");
        let result = provider.parse_credentials("[default]\n");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_chain_falls_through_to_static() {
        let chain = ChainCredentialsProvider::with_providers(vec![
            Arc::new(ProfileCredentialsProvider::with_profile("nonexistent-profile")),
            Arc::new(StaticCredentialsProvider::new(AwsCredentials::new(
                "AKID", "SECRET",
            ))),
        ]);

        let creds = chain.get_credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "AKID");
    }
}
