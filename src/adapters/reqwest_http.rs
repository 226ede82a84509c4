//! Reqwest-based HTTP transport adapter.
//!
//! Production [`HttpTransport`] implementation over a `reqwest::Client`.

use async_trait::async_trait;

use crate::traits::{Headers, HttpError, HttpTransport, Method, Response};

/// HTTP transport implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a new transport with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a new transport with a custom reqwest::Client.
    ///
    /// This allows for advanced configuration like custom timeouts,
    /// connection pools, or TLS settings.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convert reqwest error to HttpError.
    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Convert reqwest headers to our Headers type.
    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    fn convert_method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&str>,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        let mut builder = self.client.request(Self::convert_method(method), url);
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::with_headers(status, response_headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reqwest_transport_new() {
        let transport = ReqwestTransport::new();
        let _inner = transport.inner();
    }

    #[test]
    fn test_reqwest_transport_default() {
        let transport = ReqwestTransport::default();
        let _ = transport.inner();
    }

    #[test]
    fn test_reqwest_transport_clone() {
        let transport = ReqwestTransport::new();
        let cloned = transport.clone();
        let _ = cloned.inner();
    }

    #[test]
    fn test_reqwest_transport_with_custom_client() {
        let custom = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();
        let transport = ReqwestTransport::with_client(custom);
        let _ = transport.inner();
    }

    #[test]
    fn test_convert_method() {
        assert_eq!(
            ReqwestTransport::convert_method(Method::Get),
            reqwest::Method::GET
        );
        assert_eq!(
            ReqwestTransport::convert_method(Method::Post),
            reqwest::Method::POST
        );
        assert_eq!(
            ReqwestTransport::convert_method(Method::Put),
            reqwest::Method::PUT
        );
        assert_eq!(
            ReqwestTransport::convert_method(Method::Delete),
            reqwest::Method::DELETE
        );
    }

    #[test]
    fn test_convert_headers() {
        let mut header_map = reqwest::header::HeaderMap::new();
        header_map.insert(
            reqwest::header::CONTENT_TYPE,
            "application/json".parse().unwrap(),
        );
        header_map.insert(reqwest::header::CONTENT_LENGTH, "100".parse().unwrap());

        let headers = ReqwestTransport::convert_headers(&header_map);
        assert_eq!(
            headers.get("content-type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(headers.get("content-length"), Some(&"100".to_string()));
    }

    #[tokio::test]
    async fn test_send_invalid_url() {
        let transport = ReqwestTransport::new();
        let result = transport
            .send(Method::Get, "not-a-valid-url", None, &Headers::new())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_send_connection_refused() {
        let transport = ReqwestTransport::new();
        // Use a port that's unlikely to be in use
        let result = transport
            .send(Method::Get, "http://127.0.0.1:59999/test", None, &Headers::new())
            .await;
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(matches!(
                e,
                HttpError::ConnectionFailed(_) | HttpError::Other(_)
            ));
        }
    }

    #[tokio::test]
    async fn test_post_connection_refused() {
        let transport = ReqwestTransport::new();
        let result = transport
            .send(
                Method::Post,
                "http://127.0.0.1:59999/test",
                Some("{}"),
                &Headers::new(),
            )
            .await;
        assert!(result.is_err());
    }
}
