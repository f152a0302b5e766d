use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::types::Token;

/// Seconds before the nominal expiry at which a token is considered stale.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Read-only access to a bearer token cached on disk by an external login flow.
///
/// Tokens are never refreshed here; a stale token is reported so the caller can
/// ask the user to log in again.
pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    /// Loads the token from `<data_local_dir>/promptlist/cache/token.json`.
    pub async fn load() -> Result<Self, String> {
        Self::load_from(&Self::token_path()).await
    }

    pub async fn load_from(path: &Path) -> Result<Self, String> {
        let content = async_fs::read_to_string(path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { token })
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp() as u64)
    }

    fn is_expired_at(&self, now: u64) -> bool {
        let expires_at = self.token.obtained_at + self.token.expires_in;
        now + EXPIRY_MARGIN_SECS >= expires_at
    }

    pub fn access_token(&self) -> &str {
        &self.token.access_token
    }

    pub fn token_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("promptlist/cache/token.json");
        path
    }
}
