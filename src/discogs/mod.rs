//! # Discogs Integration Module
//!
//! Read-only access to a user's Discogs collection. All requests are
//! authenticated with the personal access token from the configuration.
//!
//! ## API Coverage
//!
//! - `GET /users/{user}/collection/folders` - Collection folders with item counts
//! - `GET /users/{user}/collection/folders/{id}/releases` - Releases of a folder,
//!   following the `pagination.urls.next` links
//! - `GET /releases/{id}` - Release details with tracklist
//!
//! Any non-success status is returned as [`Error::Status`]; there is no retry.

pub mod collection;
pub mod releases;

use reqwest::{
    Client,
    header::{AUTHORIZATION, USER_AGENT},
};
use serde::de::DeserializeOwned;

use crate::{
    Error, Res,
    config::Config,
    types::{CollectionRelease, Folder, TracklistEntry},
};

const USER_AGENT_VALUE: &str = concat!("DiscogsToSpotify/", env!("CARGO_PKG_VERSION"));

/// The Discogs operations the sync pipeline depends on.
#[allow(async_fn_in_trait)]
pub trait CollectionSource {
    async fn list_collection_folders(&self, username: &str) -> Res<Vec<Folder>>;

    async fn list_releases(&self, username: &str, folder_id: u64) -> Res<Vec<CollectionRelease>>;

    async fn fetch_release_tracklist(&self, release_id: u64) -> Res<Vec<TracklistEntry>>;
}

pub struct DiscogsClient {
    http: Client,
    api_url: String,
    token: String,
}

impl DiscogsClient {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.discogs_api_url, &config.discogs_token)
    }

    pub fn with_base_url(api_url: &str, token: &str) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Res<T> {
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Discogs token={}", self.token))
            .header(USER_AGENT, USER_AGENT_VALUE)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                service: "Discogs",
                status,
                url: url.to_string(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

impl CollectionSource for DiscogsClient {
    async fn list_collection_folders(&self, username: &str) -> Res<Vec<Folder>> {
        self.get_collection_folders(username).await
    }

    async fn list_releases(&self, username: &str, folder_id: u64) -> Res<Vec<CollectionRelease>> {
        self.get_folder_releases(username, folder_id).await
    }

    async fn fetch_release_tracklist(&self, release_id: u64) -> Res<Vec<TracklistEntry>> {
        self.get_release_tracklist(release_id).await
    }
}
