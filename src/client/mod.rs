//! Authenticated HTTP client core.
//!
//! [`ApiClient`] is the HTTP call interface the rest of the application
//! uses. It attaches the stored access token to every outgoing request,
//! detects authorization failures, and coordinates a single-flight token
//! refresh with transparent replay. Callers never see a refresh that
//! succeeds; unrecoverable failures surface as rejected calls.

pub mod refresh;

use std::sync::Arc;

use crate::error::ApiError;
use crate::traits::{CredentialsError, CredentialsProvider, Headers, HttpTransport, Method, Response};

pub use refresh::{RefreshError, TokenRefreshCoordinator};

/// HTTP status code signaling an authorization failure.
const STATUS_UNAUTHORIZED: u16 = 401;

/// Path of the backend refresh endpoint, relative to the base URL.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// An outgoing request descriptor.
///
/// The retry marker lives on the request itself: a request is replayed at
/// most once after a refresh, which prevents infinite refresh loops when
/// the backend rejects even fresh tokens.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Path relative to the client's base URL
    pub path: String,
    /// Request headers
    pub headers: Headers,
    /// Optional request body
    pub body: Option<String>,
    /// Whether this request has already been replayed after a refresh.
    retried: bool,
}

impl Request {
    /// Create a request with no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: None,
            retried: false,
        }
    }

    /// Create a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Create a POST request with a body.
    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        let mut request = Self::new(Method::Post, path);
        request.body = Some(body.into());
        request
    }

    /// Add a header to the request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Whether this request has already been replayed after a refresh.
    pub fn is_retried(&self) -> bool {
        self.retried
    }
}

/// The authenticated HTTP client for the TuPasaje backend.
///
/// Construct one per backend; the refresh coordinator is owned by the
/// client, so single-flight state never leaks across clients or tests.
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialsProvider>,
    refresh: TokenRefreshCoordinator,
}

impl ApiClient {
    /// Create a new client for `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialsProvider>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let refresh = TokenRefreshCoordinator::new(
            Arc::clone(&transport),
            Arc::clone(&credentials),
            format!("{}{}", base_url, REFRESH_PATH),
        );
        Self {
            base_url,
            transport,
            credentials,
            refresh,
        }
    }

    /// The backend base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The credential store this client reads tokens from.
    pub fn credentials(&self) -> &Arc<dyn CredentialsProvider> {
        &self.credentials
    }

    /// Execute a request against the backend.
    ///
    /// The stored access token is attached automatically. On the first 401
    /// the request joins the refresh protocol and is replayed once with the
    /// fresh token; a 401 on the replay is surfaced to the caller. All
    /// other statuses, success or not, are returned untouched.
    pub async fn execute(&self, mut request: Request) -> Result<Response, ApiError> {
        let response = self.send_with_stored_token(&request).await?;
        if response.status != STATUS_UNAUTHORIZED {
            return Ok(response);
        }
        if request.retried {
            // Already replayed once; surface instead of joining another
            // refresh.
            return Err(ApiError::unauthorized(&response));
        }
        request.retried = true;

        tracing::debug!(path = %request.path, "authorization failure; entering refresh protocol");
        match self.refresh.refresh().await {
            Ok(access_token) => {
                let replay = self.dispatch(&request, Some(&access_token)).await?;
                if replay.status == STATUS_UNAUTHORIZED {
                    Err(ApiError::unauthorized(&replay))
                } else {
                    Ok(replay)
                }
            }
            // No refresh token: the caller gets its original error back.
            Err(RefreshError::MissingRefreshToken) => Err(ApiError::unauthorized(&response)),
            Err(RefreshError::Exchange { status, message }) => {
                Err(ApiError::RefreshFailed { status, message })
            }
            Err(RefreshError::Store(message)) => {
                Err(ApiError::Credentials(CredentialsError::SaveFailed(message)))
            }
        }
    }

    /// Convenience wrapper for a GET request.
    pub async fn get(&self, path: &str) -> Result<Response, ApiError> {
        self.execute(Request::get(path)).await
    }

    /// Convenience wrapper for a JSON POST request.
    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Response, ApiError> {
        self.execute(
            Request::post(path, body.to_string())
                .with_header("Content-Type", "application/json"),
        )
        .await
    }

    /// Attach the stored access token (if any) and send.
    ///
    /// A store read failure rejects the request: we fail closed rather
    /// than send an unauthenticated request the caller believes is
    /// authenticated.
    async fn send_with_stored_token(&self, request: &Request) -> Result<Response, ApiError> {
        let token = self.credentials.load().await?.and_then(|c| c.access_token);
        self.dispatch(request, token.as_deref()).await
    }

    /// Send the request with an explicit bearer token (or none).
    async fn dispatch(
        &self,
        request: &Request,
        access_token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut headers = request.headers.clone();
        if let Some(token) = access_token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        let response = self
            .transport
            .send(request.method, &url, request.body.as_deref(), &headers)
            .await?;
        Ok(response)
    }
}
