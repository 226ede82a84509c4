//! Process-wide session state.
//!
//! A shared flag indicating whether the application currently considers the
//! user authenticated. Navigation and redirect logic consume it; the auth
//! service flips it on login and logout. The HTTP client core never touches
//! it, even when it clears credentials: the application observes the expired
//! session on its next check.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle to the process-wide authenticated flag.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    authenticated: Arc<AtomicBool>,
}

impl SessionState {
    /// Create a new, unauthenticated session state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the application currently considers the user authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    /// Flip the authenticated flag.
    pub fn set_authenticated(&self, authenticated: bool) {
        self.authenticated.store(authenticated, Ordering::SeqCst);
    }
}
