use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::{Res, config, spotify::auth::SpotifyAuth, types::Token};

/// Tokens are refreshed this many seconds before they actually expire.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        Self::with_path(token, Self::token_path())
    }

    pub fn with_path(token: Token, path: PathBuf) -> Self {
        TokenManager { token, path }
    }

    pub async fn load() -> Res<Self> {
        Self::load_from(&Self::token_path()).await
    }

    pub async fn load_from(path: &Path) -> Res<Self> {
        let content = async_fs::read_to_string(path).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self {
            token,
            path: path.to_path_buf(),
        })
    }

    pub async fn persist(&self) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Returns an access token, refreshing and persisting it first when it is
    /// about to expire.
    pub async fn get_valid_token(&mut self, auth: &SpotifyAuth) -> Res<String> {
        if self.is_expired() {
            self.refresh(auth).await?;
        }

        Ok(self.token.access_token.clone())
    }

    pub async fn refresh(&mut self, auth: &SpotifyAuth) -> Res<()> {
        let mut token = auth.refresh_token(&self.token.refresh_token).await?;
        // Spotify may omit the refresh token when it does not rotate it.
        if token.refresh_token.is_empty() {
            token.refresh_token = self.token.refresh_token.clone();
        }
        self.token = token;
        self.persist().await
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp().max(0) as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn token_path() -> PathBuf {
        config::data_path("cache/token.json")
    }
}
