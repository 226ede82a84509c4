//! In-memory credential store for testing.
//!
//! Holds a credential pair behind shared mutable state so tests can
//! inspect what the client stored, and can inject load/save/clear
//! failures to exercise the error paths.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::auth::Credentials;
use crate::traits::{CredentialsError, CredentialsProvider};

#[derive(Debug, Default)]
struct Inner {
    credentials: Option<Credentials>,
    load_should_fail: bool,
    save_should_fail: bool,
    clear_should_fail: bool,
}

/// In-memory credential store.
///
/// Clones share state, so a test can hand one clone to the client and
/// keep the other for assertions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryCredentials {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with credentials.
    pub fn with_credentials(credentials: Credentials) -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().credentials = Some(credentials);
        store
    }

    /// Make subsequent `load` calls fail.
    pub fn set_load_should_fail(&self, should_fail: bool) {
        self.inner.lock().unwrap().load_should_fail = should_fail;
    }

    /// Make subsequent `save` calls fail.
    pub fn set_save_should_fail(&self, should_fail: bool) {
        self.inner.lock().unwrap().save_should_fail = should_fail;
    }

    /// Make subsequent `clear` calls fail.
    pub fn set_clear_should_fail(&self, should_fail: bool) {
        self.inner.lock().unwrap().clear_should_fail = should_fail;
    }

    /// Get the currently stored credentials.
    pub fn get_credentials(&self) -> Option<Credentials> {
        self.inner.lock().unwrap().credentials.clone()
    }

    /// Replace the stored credentials directly.
    pub fn set_credentials(&self, credentials: Option<Credentials>) {
        self.inner.lock().unwrap().credentials = credentials;
    }
}

#[async_trait]
impl CredentialsProvider for InMemoryCredentials {
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError> {
        let inner = self.inner.lock().unwrap();
        if inner.load_should_fail {
            return Err(CredentialsError::LoadFailed(
                "Simulated load failure".to_string(),
            ));
        }
        Ok(inner.credentials.clone())
    }

    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.save_should_fail {
            return Err(CredentialsError::SaveFailed(
                "Simulated save failure".to_string(),
            ));
        }
        inner.credentials = Some(creds.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialsError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.clear_should_fail {
            return Err(CredentialsError::ClearFailed(
                "Simulated clear failure".to_string(),
            ));
        }
        inner.credentials = None;
        Ok(())
    }
}
