//! Thin typed service wrappers over [`crate::client::ApiClient`].
//!
//! The backend owns all business logic (balances, ledger, gateway
//! integration); these wrappers only shape requests and decode replies.
//! None of them know a token refresh may happen mid-call.

pub mod auth;
pub mod driver;
pub mod wallet;

pub use auth::AuthService;
pub use driver::DriverService;
pub use wallet::WalletService;

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::traits::Response;

/// Decode a successful JSON reply, mapping non-2xx statuses to
/// [`ApiError::Server`].
pub(crate) fn decode<T: DeserializeOwned>(response: &Response) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(ApiError::server(response));
    }
    response.json().map_err(|e| ApiError::Decode(e.to_string()))
}
