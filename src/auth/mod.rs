//! Authentication data model for the TuPasaje client.
//!
//! This module provides:
//! - Credential storage and management
//! - Token endpoint payload types shared by login and refresh

pub mod api;
pub mod credentials;

pub use api::{get_jwt_expires_in, TokenResponse};
pub use credentials::{Credentials, CredentialsManager};
