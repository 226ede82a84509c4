//! Mock HTTP transport for testing.
//!
//! Provides a configurable transport that returns scripted responses,
//! records every request for verification, and can add latency to a URL
//! to hold an exchange in flight while other tasks pile up behind it.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{Headers, HttpError, HttpTransport, Method, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: Method,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: Option<String>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Return a transport error
    Error(HttpError),
}

/// Mock HTTP transport.
///
/// Responses are scripted per URL. `set_response` installs a sticky
/// response; `push_response` appends to a FIFO script where the last entry
/// stays sticky, so a URL can answer 401 once and 200 afterwards.
#[derive(Debug, Clone)]
pub struct MockTransport {
    /// Scripted responses by URL
    responses: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    /// Default response when no URL matches
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Artificial latency per URL
    latencies: Arc<Mutex<HashMap<String, Duration>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            latencies: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Install a sticky response for a URL, replacing any script.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), VecDeque::from([response]));
    }

    /// Append a response to a URL's script. Each entry is consumed once;
    /// the last entry stays sticky.
    pub fn push_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Set a default response for URLs without scripts.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Add artificial latency before answering a URL.
    pub fn set_latency(&self, url: &str, latency: Duration) {
        self.latencies.lock().unwrap().insert(url.to_string(), latency);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Get the recorded requests sent to an exact URL.
    pub fn requests_to(&self, url: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url == url)
            .cloned()
            .collect()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record_request(&self, method: Method, url: &str, headers: &Headers, body: Option<String>) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method,
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn next_response(&self, url: &str) -> Option<MockResponse> {
        let mut responses = self.responses.lock().unwrap();

        // Exact match first
        if let Some(script) = responses.get_mut(url) {
            return Self::pop_scripted(script);
        }

        // Then prefix match (for URL patterns)
        let pattern = responses
            .keys()
            .find(|pattern| url.starts_with(pattern.as_str()))
            .cloned();
        if let Some(pattern) = pattern {
            if let Some(script) = responses.get_mut(&pattern) {
                return Self::pop_scripted(script);
            }
        }

        // Finally use default
        let default = self.default_response.lock().unwrap();
        default.clone()
    }

    fn pop_scripted(script: &mut VecDeque<MockResponse>) -> Option<MockResponse> {
        if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        }
    }

    fn latency_for(&self, url: &str) -> Option<Duration> {
        self.latencies.lock().unwrap().get(url).copied()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&str>,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        self.record_request(method, url, headers, body.map(|b| b.to_string()));

        if let Some(latency) = self.latency_for(url) {
            tokio::time::sleep(latency).await;
        }

        match self.next_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}
