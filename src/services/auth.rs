//! Login and logout flows.

use std::sync::Arc;

use crate::auth::{Credentials, TokenResponse};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::services::decode;
use crate::session::SessionState;

/// Authentication service: creates the credential pair on login and tears
/// the session down on logout.
pub struct AuthService {
    client: Arc<ApiClient>,
    session: SessionState,
}

impl AuthService {
    /// Create an auth service bound to a client and the shared session
    /// state.
    pub fn new(client: Arc<ApiClient>, session: SessionState) -> Self {
        Self { client, session }
    }

    /// Log in with a phone number and PIN.
    ///
    /// POST /auth/login
    ///
    /// On success the access/refresh pair is persisted and the session
    /// flag is flipped.
    pub async fn login(&self, phone: &str, pin: &str) -> Result<Credentials, ApiError> {
        let body = serde_json::json!({ "phone": phone, "pin": pin });
        let response = self.client.post_json("/auth/login", &body).await?;
        let token: TokenResponse = decode(&response)?;

        let credentials = token.into_credentials();
        self.client.credentials().save(&credentials).await?;
        self.session.set_authenticated(true);
        tracing::debug!(user_id = ?credentials.user_id, "logged in");
        Ok(credentials)
    }

    /// Restore a previous session from the credential store.
    ///
    /// Called at startup, before any network traffic. A stored pair
    /// counts as a live session if the access token is still valid or a
    /// refresh token is available for the reactive exchange on first
    /// use.
    pub async fn restore_session(&self) -> Result<bool, ApiError> {
        let restored = match self.client.credentials().load().await? {
            Some(creds) => creds.is_valid() || creds.refresh_token.is_some(),
            None => false,
        };
        self.session.set_authenticated(restored);
        tracing::debug!(restored, "session restore");
        Ok(restored)
    }

    /// Log out, tearing down the local session.
    ///
    /// POST /auth/logout
    ///
    /// The server-side call is best effort: a failed logout request never
    /// blocks local teardown. Credentials are cleared and the session flag
    /// is flipped regardless.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let body = serde_json::json!({});
        if let Err(e) = self.client.post_json("/auth/logout", &body).await {
            tracing::warn!(error = %e, "server-side logout failed; tearing down locally");
        }

        self.client.credentials().clear().await?;
        self.session.set_authenticated(false);
        tracing::debug!("logged out");
        Ok(())
    }
}
