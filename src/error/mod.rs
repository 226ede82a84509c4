//! Error types surfaced by the TuPasaje client.

use thiserror::Error;

use crate::traits::{CredentialsError, HttpError, Response};

/// Errors returned to callers of [`crate::client::ApiClient`] and the
/// service wrappers built on it.
///
/// Transient transport failures surface as [`ApiError::Http`] with no
/// refresh attempt. Authorization failures that survive the retry-once
/// protocol surface as [`ApiError::Unauthorized`]. A failed refresh
/// exchange surfaces as [`ApiError::RefreshFailed`] to every caller that
/// was waiting on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection, timeout, IO).
    #[error("transport error: {0}")]
    Http(#[from] HttpError),

    /// Credential store failure.
    #[error("credential store error: {0}")]
    Credentials(#[from] CredentialsError),

    /// The backend rejected the caller's credentials.
    #[error("unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// The refresh exchange itself was rejected; the session is over.
    #[error("token refresh failed ({status}): {message}")]
    RefreshFailed { status: u16, message: String },

    /// The backend returned a non-success status to a service call.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build an [`ApiError::Unauthorized`] from a 401 response.
    pub fn unauthorized(response: &Response) -> Self {
        ApiError::Unauthorized {
            status: response.status,
            message: response.text().unwrap_or_default(),
        }
    }

    /// Build an [`ApiError::Server`] from a non-success response.
    pub fn server(response: &Response) -> Self {
        ApiError::Server {
            status: response.status,
            message: response.text().unwrap_or_default(),
        }
    }

    /// Check if this error means the session is gone and the user must log
    /// in again.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::RefreshFailed { .. }
        )
    }
}
