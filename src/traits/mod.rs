//! Trait abstractions for the client's external collaborators.
//!
//! The core only ever talks to the HTTP transport and the credential store
//! through these traits, so both can be swapped for mocks in tests.

pub mod credentials;
pub mod http;

pub use credentials::{CredentialsError, CredentialsProvider};
pub use http::{Headers, HttpError, HttpTransport, Method, Response};
