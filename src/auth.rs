//! Login session and credential storage.
//!
//! The controller never touches token storage: requests get their bearer
//! credential through the `CredentialProvider` seam, and the file-backed
//! `TokenStore` is wired in at the binary edge.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::remote::http::into_api_result;

/// Supplies the bearer credential attached to authenticated requests.
pub trait CredentialProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// File-backed token storage.
///
/// "Remember me" stores the token in the persistent file; otherwise it goes
/// to the session file, which lives under the system temp directory and does
/// not survive a reboot.
#[derive(Debug, Clone)]
pub struct TokenStore {
    persistent: PathBuf,
    session: PathBuf,
}

impl TokenStore {
    pub fn new(persistent: PathBuf, session: PathBuf) -> Self {
        Self {
            persistent,
            session,
        }
    }

    fn read(path: &Path) -> Option<String> {
        let token = fs::read_to_string(path).ok()?;
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    pub fn load(&self) -> Option<String> {
        Self::read(&self.persistent).or_else(|| Self::read(&self.session))
    }

    pub fn save(&self, token: &str, remember: bool) -> Result<()> {
        let path = if remember {
            &self.persistent
        } else {
            &self.session
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, token)
            .with_context(|| format!("failed to write token file: {}", path.display()))?;
        debug!("stored session token at {}", path.display());
        Ok(())
    }

    /// Remove any stored token; missing files are not an error.
    pub fn clear(&self) -> Result<()> {
        for path in [&self.persistent, &self.session] {
            if path.exists() {
                fs::remove_file(path)
                    .with_context(|| format!("failed to remove token file: {}", path.display()))?;
            }
        }
        Ok(())
    }
}

impl CredentialProvider for TokenStore {
    fn token(&self) -> Option<String> {
        self.load()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub message: String,
}

/// Authenticate against `POST /admin/login`. This is the one unauthenticated
/// endpoint the console calls.
pub async fn login(base_url: &str, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "email and password are required".into(),
        ));
    }

    let url = format!("{}/admin/login", base_url.trim_end_matches('/'));
    let response = Client::new()
        .post(&url)
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;

    let login: LoginResponse = into_api_result(response).await?.json().await?;
    Ok(login)
}
