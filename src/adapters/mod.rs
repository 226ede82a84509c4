//! Concrete implementations of the collaborator traits.
//!
//! Production code wires [`ReqwestTransport`] and
//! [`FileCredentialsProvider`] into the client; tests use the doubles in
//! [`mock`].

pub mod file_credentials;
pub mod mock;
pub mod reqwest_http;

pub use file_credentials::FileCredentialsProvider;
pub use reqwest_http::ReqwestTransport;
