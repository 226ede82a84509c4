//! Token endpoint payload types.
//!
//! Both login (`POST /auth/login`) and refresh (`POST /auth/refresh`) return
//! the same token response shape. Token strings are opaque to this client;
//! only the expiry claim is ever inspected, and only as a fallback when the
//! backend omits `expires_in`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use crate::auth::Credentials;

/// Response from token endpoints (POST /auth/login and POST /auth/refresh).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u32>, // API may not return this; decode from JWT
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TokenResponse {
    /// Build the credential pair this response represents.
    ///
    /// Expiry comes from `expires_in` when present, otherwise from the JWT
    /// `exp` claim, otherwise a conservative 15 minutes.
    pub fn into_credentials(self) -> Credentials {
        let expires_in = self
            .expires_in
            .or_else(|| get_jwt_expires_in(&self.access_token))
            .unwrap_or(900);
        let expires_at = chrono::Utc::now().timestamp() + expires_in as i64;

        Credentials {
            access_token: Some(self.access_token),
            refresh_token: Some(self.refresh_token),
            expires_at: Some(expires_at),
            user_id: self.user_id,
        }
    }
}

/// JWT claims for extracting expiration time.
#[derive(Deserialize)]
struct JwtClaims {
    exp: i64,
}

/// Extract the expiration time from a JWT access token.
///
/// Returns the number of seconds until the token expires, or None if the
/// token cannot be parsed or the expiration has already passed.
pub fn get_jwt_expires_in(access_token: &str) -> Option<u32> {
    let parts: Vec<&str> = access_token.split('.').collect();
    let payload = URL_SAFE_NO_PAD.decode(parts.get(1)?).ok()?;
    let claims: JwtClaims = serde_json::from_slice(&payload).ok()?;
    let now = chrono::Utc::now().timestamp();
    Some((claims.exp - now).max(0) as u32)
}
