//! Configuration management for discogs2spotify.
//!
//! Credentials are read once at process start into a [`Config`] value which is
//! then handed to each client. Values come from the process environment,
//! optionally seeded from an env file:
//! 1. Environment variables (highest priority)
//! 2. The `--env-file` path, or `credentials.env` in the working directory,
//!    or `.env` in the local data directory
//! 3. Defaults for the API endpoints

use std::{
    env, fmt,
    path::{Path, PathBuf},
};

use crate::{Error, Res};

/// Directory name below the platform's local data directory.
pub const APP_DIR: &str = "discogs2spotify";

/// Env file looked up in the working directory when no path is given.
pub const DEFAULT_ENV_FILE: &str = "credentials.env";

pub const DEFAULT_DISCOGS_API_URL: &str = "https://api.discogs.com";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_SCOPE: &str =
    "playlist-read-private playlist-modify-public playlist-modify-private";

/// Returns a path below the application's local data directory.
///
/// - Linux: `~/.local/share/discogs2spotify/<relative>`
/// - macOS: `~/Library/Application Support/discogs2spotify/<relative>`
/// - Windows: `%LOCALAPPDATA%/discogs2spotify/<relative>`
pub fn data_path(relative: &str) -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push(relative);
    path
}

/// Loads environment variables from an env file.
///
/// An explicit `path` must exist. Without one, `credentials.env` in the
/// working directory is tried first and then `.env` in the local data
/// directory; finding neither is fine because the variables may already be
/// set in the environment. Variables that are already set are never
/// overwritten.
///
/// Returns the file that was loaded, if any.
pub async fn load_env(path: Option<&Path>) -> Res<Option<PathBuf>> {
    if let Some(path) = path {
        load_file(path)?;
        return Ok(Some(path.to_path_buf()));
    }

    let local = PathBuf::from(DEFAULT_ENV_FILE);
    if local.is_file() {
        load_file(&local)?;
        return Ok(Some(local));
    }

    let path = data_path(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        load_file(&path)?;
        return Ok(Some(path));
    }

    Ok(None)
}

fn load_file(path: &Path) -> Res<()> {
    dotenv::from_path(path).map_err(|e| Error::EnvFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Credentials and endpoints for both services.
///
/// The `Debug` output redacts the secrets, so a `Config` can be logged safely.
#[derive(Clone)]
pub struct Config {
    pub discogs_token: String,
    pub discogs_api_url: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_redirect_uri: String,
    pub spotify_scope: String,
    pub spotify_api_url: String,
    pub spotify_auth_url: String,
    pub spotify_token_url: String,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// The four credentials are required; presence is the only check made.
    /// Each accepts the `SPOTIPY_*` name used by older credential files as
    /// well as a `SPOTIFY_API_*` alias.
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let required = |primary: &'static str, alias: &str| -> Res<String> {
            get(primary)
                .or_else(|| get(alias))
                .ok_or(Error::MissingConfig(primary))
        };

        let optional = |key: &str, default: &str| -> String {
            get(key)
                .unwrap_or_else(|| default.to_string())
                .trim_end_matches('/')
                .to_string()
        };

        Ok(Self {
            discogs_token: required("DISCOGS_USER_TOKEN", "DISCOGS_API_TOKEN")?,
            spotify_client_id: required("SPOTIPY_CLIENT_ID", "SPOTIFY_API_AUTH_CLIENT_ID")?,
            spotify_client_secret: required(
                "SPOTIPY_CLIENT_SECRET",
                "SPOTIFY_API_AUTH_CLIENT_SECRET",
            )?,
            spotify_redirect_uri: required("SPOTIPY_REDIRECT_URI", "SPOTIFY_API_REDIRECT_URI")?,
            spotify_scope: get("SPOTIFY_API_AUTH_SCOPE")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_SCOPE.to_string()),
            discogs_api_url: optional("DISCOGS_API_URL", DEFAULT_DISCOGS_API_URL),
            spotify_api_url: optional("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
            spotify_auth_url: optional("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL),
            spotify_token_url: optional("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("discogs_token", &"<redacted>")
            .field("discogs_api_url", &self.discogs_api_url)
            .field("spotify_client_id", &"<redacted>")
            .field("spotify_client_secret", &"<redacted>")
            .field("spotify_redirect_uri", &self.spotify_redirect_uri)
            .field("spotify_scope", &self.spotify_scope)
            .field("spotify_api_url", &self.spotify_api_url)
            .field("spotify_auth_url", &self.spotify_auth_url)
            .field("spotify_token_url", &self.spotify_token_url)
            .finish()
    }
}
