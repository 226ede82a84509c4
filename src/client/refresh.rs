//! Single-flight token refresh coordination.
//!
//! At most one refresh exchange is outstanding at any time. The first
//! request that hits an authorization failure flips the gate and starts
//! the exchange; every request that fails while the exchange is in
//! flight parks on the pending queue and receives the shared outcome.
//! The exchange itself runs in a detached task, so a caller that is
//! timed out or aborted mid-refresh cannot leave the gate latched and
//! queued requests still settle. The gate and queue are owned state on
//! the coordinator, not module globals, so the single-flight behavior is
//! testable in isolation.

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::auth::TokenResponse;
use crate::traits::{CredentialsProvider, Headers, HttpTransport, Method};

/// Outcome of a refresh exchange, fanned out to every caller that joined
/// it.
pub type RefreshOutcome = Result<String, RefreshError>;

/// Why a refresh exchange failed. All variants are unrecoverable: the
/// credential pair has already been cleared by the time one is returned.
#[derive(Debug, Clone)]
pub enum RefreshError {
    /// No refresh token in the store; no exchange was attempted.
    MissingRefreshToken,
    /// The backend rejected the exchange, or it failed in transit.
    Exchange { status: u16, message: String },
    /// The new pair could not be persisted.
    Store(String),
}

impl std::fmt::Display for RefreshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshError::MissingRefreshToken => write!(f, "No refresh token available"),
            RefreshError::Exchange { status, message } => {
                write!(f, "Refresh exchange failed ({}): {}", status, message)
            }
            RefreshError::Store(msg) => write!(f, "Failed to store refreshed tokens: {}", msg),
        }
    }
}

impl std::error::Error for RefreshError {}

/// The single-flight gate. `Refreshing` carries the pending queue; it is
/// non-empty only while an exchange is in flight.
enum Gate {
    Idle,
    Refreshing(Vec<oneshot::Sender<RefreshOutcome>>),
}

/// Coordinates token refresh exchanges against the backend.
///
/// Owned by [`crate::client::ApiClient`]; one coordinator per client.
pub struct TokenRefreshCoordinator {
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialsProvider>,
    refresh_url: String,
    gate: Arc<Mutex<Gate>>,
}

impl TokenRefreshCoordinator {
    /// Create a coordinator exchanging tokens at `refresh_url`.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialsProvider>,
        refresh_url: String,
    ) -> Self {
        Self {
            transport,
            credentials,
            refresh_url,
            gate: Arc::new(Mutex::new(Gate::Idle)),
        }
    }

    /// Run or join a refresh exchange and return the new access token.
    ///
    /// The first caller while the gate is idle starts the exchange;
    /// concurrent callers enqueue and await the shared outcome. Every
    /// caller gets exactly one resolution. The exchange task outlives its
    /// initiator, so the gate resets and queued callers settle even if
    /// the initiating request is dropped mid-flight.
    pub async fn refresh(&self) -> RefreshOutcome {
        let (tx, rx) = oneshot::channel();
        // Check-and-set on the gate must stay synchronous: no suspension
        // point between observing Idle and flipping to Refreshing.
        let leads = {
            let mut gate = self.gate.lock().unwrap();
            match &mut *gate {
                Gate::Idle => {
                    *gate = Gate::Refreshing(vec![tx]);
                    true
                }
                Gate::Refreshing(waiters) => {
                    waiters.push(tx);
                    false
                }
            }
        };

        if leads {
            let transport = Arc::clone(&self.transport);
            let credentials = Arc::clone(&self.credentials);
            let refresh_url = self.refresh_url.clone();
            let gate = Arc::clone(&self.gate);
            tokio::spawn(async move {
                let outcome = Self::exchange(transport, credentials, &refresh_url).await;
                // Flip the gate back to Idle and take the queue in one
                // critical section, then drain in enqueue order.
                let waiters = {
                    let mut gate = gate.lock().unwrap();
                    match std::mem::replace(&mut *gate, Gate::Idle) {
                        Gate::Refreshing(waiters) => waiters,
                        Gate::Idle => Vec::new(),
                    }
                };
                for tx in waiters {
                    let _ = tx.send(outcome.clone());
                }
            });
        }

        match rx.await {
            Ok(outcome) => outcome,
            // Only reachable on runtime teardown, when the exchange task
            // is dropped before it settles.
            Err(_) => Err(RefreshError::Exchange {
                status: 0,
                message: "refresh exchange was abandoned".to_string(),
            }),
        }
    }

    /// Perform the actual exchange: read the refresh token, POST it to
    /// the backend, persist the new pair. Clears the credential pair on
    /// every failure path.
    async fn exchange(
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialsProvider>,
        refresh_url: &str,
    ) -> RefreshOutcome {
        // A store read failure is treated the same as an absent token.
        let stored = credentials.load().await.ok().flatten();
        let refresh_token = match stored.and_then(|c| c.refresh_token) {
            Some(token) => token,
            None => {
                tracing::warn!("no refresh token available; clearing credentials");
                let _ = credentials.clear().await;
                return Err(RefreshError::MissingRefreshToken);
            }
        };

        tracing::debug!("exchanging refresh token for a new credential pair");
        let body = serde_json::json!({ "refresh_token": refresh_token }).to_string();
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let response = match transport
            .send(Method::Post, refresh_url, Some(&body), &headers)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let _ = credentials.clear().await;
                return Err(RefreshError::Exchange {
                    status: 0,
                    message: e.to_string(),
                });
            }
        };

        if !response.is_success() {
            tracing::warn!(
                status = response.status,
                "refresh exchange rejected; clearing credentials"
            );
            let _ = credentials.clear().await;
            return Err(RefreshError::Exchange {
                status: response.status,
                message: response.text().unwrap_or_default(),
            });
        }

        let token: TokenResponse = match response.json() {
            Ok(token) => token,
            Err(e) => {
                let _ = credentials.clear().await;
                return Err(RefreshError::Exchange {
                    status: response.status,
                    message: format!("invalid token response: {}", e),
                });
            }
        };

        let access_token = token.access_token.clone();
        let new_credentials = token.into_credentials();
        if let Err(e) = credentials.save(&new_credentials).await {
            let _ = credentials.clear().await;
            return Err(RefreshError::Store(e.to_string()));
        }

        tracing::debug!("credential pair refreshed");
        Ok(access_token)
    }
}
