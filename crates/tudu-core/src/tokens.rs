//! Session token storage and retrieval.
//!
//! Stores the JWT pair in `<home>/tokens.json` with restricted permissions
//! (0600). Tokens are never logged or displayed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// On-disk token pair.
///
/// Field names match the wire names returned by the token endpoint, so the
/// stored file reads naturally next to server logs.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct StoredTokens {
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

/// File-backed store for the current session's token pair.
#[derive(Debug, Clone)]
pub struct TokenStore {
    tokens: StoredTokens,
    path: PathBuf,
}

impl TokenStore {
    /// Loads the token store from the default location.
    /// Returns an empty store if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(paths::tokens_path())
    }

    /// Loads a token store backed by a specific file.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                tokens: StoredTokens::default(),
                path,
            });
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read tokens from {}", path.display()))?;
        let tokens = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse tokens from {}", path.display()))?;

        Ok(Self { tokens, path })
    }

    /// Returns the stored access token, if any.
    pub fn access(&self) -> Option<&str> {
        self.tokens.access_token.as_deref()
    }

    /// Returns the stored refresh token, if any.
    pub fn refresh(&self) -> Option<&str> {
        self.tokens.refresh_token.as_deref()
    }

    /// Stores a new access token, plus a refresh token when one was issued.
    ///
    /// A missing refresh token leaves any previously stored one in place;
    /// endpoints that only rotate the access token must not drop the pair.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn set(&mut self, access: &str, refresh: Option<&str>) -> Result<()> {
        self.tokens.access_token = Some(access.to_string());
        if let Some(refresh) = refresh {
            self.tokens.refresh_token = Some(refresh.to_string());
        }
        self.save()
    }

    /// Clears both tokens and deletes the backing file.
    /// Returns whether any token was actually stored.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn clear(&mut self) -> Result<bool> {
        let had_tokens =
            self.tokens.access_token.is_some() || self.tokens.refresh_token.is_some();
        self.tokens = StoredTokens::default();

        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }

        Ok(had_tokens)
    }

    /// Saves the tokens to disk with restricted permissions (0600).
    fn save(&self) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(&self.tokens).context("Failed to serialize tokens")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.len() <= 16 {
        return "***".to_string();
    }
    format!("{}...", &token[..12])
}
