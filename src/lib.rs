//! TuPasaje client - session/token lifecycle and authenticated-request core
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod auth;
pub mod client;
pub mod error;
pub mod services;
pub mod session;
pub mod traits;
