//! Credential pair model and on-disk storage.
//!
//! The access/refresh pair lives in `~/.tupasaje/.credentials.json`.
//! Writes go through a sibling temp file followed by a rename, so a
//! reader never observes a half-written pair; on unix the file is
//! readable by its owner only.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory under the home directory holding client state.
const CREDENTIALS_DIR: &str = ".tupasaje";

/// The credentials file name.
const CREDENTIALS_FILE: &str = ".credentials.json";

/// The stored authentication state of a TuPasaje user.
///
/// The access and refresh tokens form a pair: created together on login,
/// overwritten together on every successful refresh, deleted together on
/// logout or unrecoverable refresh failure. The store never holds one
/// without the other.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    /// Access token sent with each authenticated request.
    pub access_token: Option<String>,
    /// Refresh token exchanged for a new pair when the access token expires.
    pub refresh_token: Option<String>,
    /// Access token expiry as a Unix timestamp (seconds since epoch).
    pub expires_at: Option<i64>,
    /// The authenticated passenger or driver ID.
    pub user_id: Option<String>,
}

impl Credentials {
    /// Create credentials from an access/refresh token pair.
    pub fn pair(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
            expires_at: None,
            user_id: None,
        }
    }

    /// Whether an access token is present.
    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// Whether the access token has expired. An absent expiry counts as
    /// expired.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => chrono::Utc::now().timestamp() >= expires_at,
            None => true,
        }
    }

    /// Whether the access token can still be sent as-is: present and not
    /// expired.
    pub fn is_valid(&self) -> bool {
        self.has_token() && !self.is_expired()
    }
}

/// On-disk credential storage.
#[derive(Debug)]
pub struct CredentialsManager {
    credentials_path: PathBuf,
}

impl CredentialsManager {
    /// Create a manager storing under the user's home directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self {
            credentials_path: home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE),
        })
    }

    /// Create a manager storing at an explicit path.
    pub fn with_path(credentials_path: PathBuf) -> Self {
        Self { credentials_path }
    }

    /// Get the path to the credentials file.
    pub fn credentials_path(&self) -> &PathBuf {
        &self.credentials_path
    }

    /// Load the stored pair.
    ///
    /// A missing file means no stored session (`Ok(None)`); so does a
    /// file that no longer parses, since nothing usable can be recovered
    /// from it. Read failures on an existing file are surfaced.
    pub fn load(&self) -> io::Result<Option<Credentials>> {
        let bytes = match fs::read(&self.credentials_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(serde_json::from_slice(&bytes).ok())
    }

    /// Persist the pair.
    ///
    /// The serialized pair is written to a sibling temp file and renamed
    /// over the target, so a concurrent reader sees either the old pair
    /// or the new one, never a partial write. The file is created
    /// owner-read/write only.
    pub fn save(&self, credentials: &Credentials) -> io::Result<()> {
        if let Some(parent) = self.credentials_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(credentials)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let tmp_path = self.credentials_path.with_extension("json.tmp");
        fs::write(&tmp_path, &json)?;
        restrict_permissions(&tmp_path)?;
        fs::rename(&tmp_path, &self.credentials_path)
    }

    /// Delete the stored pair. Deleting an absent file is not an error.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.credentials_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
