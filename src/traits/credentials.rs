//! Credential store trait abstraction.
//!
//! The access/refresh token pair lives behind this trait so the core stays
//! portable across storage backends (encrypted file, OS keychain, in-memory
//! test double). No in-memory fallback silently substitutes for the real
//! store in production wiring.

use async_trait::async_trait;

use crate::auth::Credentials;

/// Credential store operation errors.
#[derive(Debug, Clone)]
pub enum CredentialsError {
    /// Failed to load credentials
    LoadFailed(String),
    /// Failed to save credentials
    SaveFailed(String),
    /// Failed to clear credentials
    ClearFailed(String),
    /// IO error
    Io(String),
    /// Serialization/deserialization error
    Serialization(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsError::LoadFailed(msg) => write!(f, "Failed to load credentials: {}", msg),
            CredentialsError::SaveFailed(msg) => write!(f, "Failed to save credentials: {}", msg),
            CredentialsError::ClearFailed(msg) => {
                write!(f, "Failed to clear credentials: {}", msg)
            }
            CredentialsError::Io(msg) => write!(f, "IO error: {}", msg),
            CredentialsError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            CredentialsError::Other(msg) => write!(f, "Credentials error: {}", msg),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Trait for credential storage and retrieval.
///
/// The token pair is the only shared mutable resource in the client: it is
/// read by every request and written only by the refresh path and the
/// login/logout flows. Access and refresh tokens are always saved and
/// cleared together.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Load the stored credentials.
    ///
    /// # Returns
    /// - `Ok(Some(credentials))` if credentials exist and were loaded
    /// - `Ok(None)` if no credentials are stored
    /// - `Err(error)` if loading failed
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError>;

    /// Save credentials, overwriting any stored pair.
    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError>;

    /// Delete both tokens from storage.
    async fn clear(&self) -> Result<(), CredentialsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_error_display() {
        assert_eq!(
            CredentialsError::LoadFailed("read error".to_string()).to_string(),
            "Failed to load credentials: read error"
        );
        assert_eq!(
            CredentialsError::SaveFailed("write error".to_string()).to_string(),
            "Failed to save credentials: write error"
        );
        assert_eq!(
            CredentialsError::ClearFailed("delete error".to_string()).to_string(),
            "Failed to clear credentials: delete error"
        );
        assert_eq!(
            CredentialsError::Io("disk full".to_string()).to_string(),
            "IO error: disk full"
        );
        assert_eq!(
            CredentialsError::Serialization("invalid json".to_string()).to_string(),
            "Serialization error: invalid json"
        );
        assert_eq!(
            CredentialsError::Other("unknown".to_string()).to_string(),
            "Credentials error: unknown"
        );
    }

    #[test]
    fn test_credentials_error_clone() {
        let err = CredentialsError::LoadFailed("test".to_string());
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }

    #[test]
    fn test_credentials_error_implements_error_trait() {
        let err = CredentialsError::Other("x".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
