//! Test doubles for the collaborator traits.

pub mod credentials;
pub mod http;

pub use credentials::InMemoryCredentials;
pub use http::{MockResponse, MockTransport, RecordedRequest};
