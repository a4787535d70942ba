//! # Spotify Integration Module
//!
//! Wraps the parts of the Spotify Web API the sync needs: the authorization
//! code flow, album and track search, album track listings and playlist
//! upserts.
//!
//! ## API Coverage
//!
//! - `GET /me` - The authenticated user's id
//! - `GET /search` - Album and track search by free-text query
//! - `GET /albums/{id}/tracks` - Album tracks, following `next` links
//! - `GET /users/{user_id}/playlists` - Playlist lookup by name
//! - `POST /users/{user_id}/playlists` - Playlist creation
//! - `POST /playlists/{id}/tracks` - Append up to 100 tracks
//! - `PUT /playlists/{id}/tracks` - Replace the playlist with up to 100 tracks
//! - `POST /api/token` - Token exchange and refresh
//!
//! ## Error Handling
//!
//! Every call returns [`Res`]. A non-success status becomes [`Error::Status`];
//! nothing is retried. The caller decides whether a failure ends the run.
//!
//! ## Token Lifecycle
//!
//! The client owns a [`TokenManager`]. Before each request the token is
//! refreshed if it expires within four minutes, and the refreshed token is
//! written back to the cache.

pub mod albums;
pub mod auth;
pub mod playlist;
pub mod search;

use std::fmt;

use reqwest::{Client, Method};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use crate::{
    Error, Res,
    config::Config,
    management::TokenManager,
    matching::MatchPolicy,
    spotify::auth::SpotifyAuth,
    types::{Album, Track, TrackCandidate},
    utils,
};

/// How collected tracks are written into the target playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertMode {
    /// Keep the current tracks and append the new ones.
    Append,
    /// Replace the playlist contents with the new tracks.
    Replace,
}

impl fmt::Display for UpsertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpsertMode::Append => write!(f, "append"),
            UpsertMode::Replace => write!(f, "replace"),
        }
    }
}

/// The Spotify operations the sync pipeline depends on.
///
/// Implementors provide the raw endpoints; searching with a policy and
/// batching playlist writes are built on top of them.
#[allow(async_fn_in_trait)]
pub trait MusicCatalog {
    async fn current_user_id(&self) -> Res<String>;

    async fn search_albums(&self, query: &str) -> Res<Vec<Album>>;

    async fn search_tracks(&self, query: &str) -> Res<Vec<Track>>;

    async fn list_album_tracks(&self, album_id: &str) -> Res<Vec<String>>;

    async fn find_or_create_playlist(&self, user_id: &str, name: &str) -> Res<String>;

    /// Appends one batch of at most 100 track URIs.
    async fn add_tracks_batch(&self, playlist_id: &str, uris: &[String]) -> Res<()>;

    /// Replaces the playlist contents with one batch of at most 100 track URIs.
    async fn replace_tracks_batch(&self, playlist_id: &str, uris: &[String]) -> Res<()>;

    async fn search_album(
        &self,
        title: &str,
        artist: &str,
        policy: MatchPolicy,
    ) -> Res<Option<Album>> {
        let candidates = self.search_albums(&utils::album_query(title, artist)).await?;
        Ok(policy.pick(&candidate(title, artist), candidates))
    }

    async fn search_track(
        &self,
        title: &str,
        artist: &str,
        policy: MatchPolicy,
    ) -> Res<Option<Track>> {
        let candidates = self.search_tracks(&utils::track_query(title, artist)).await?;
        Ok(policy.pick(&candidate(title, artist), candidates))
    }

    /// Writes `track_ids` into the playlist in batches of at most 100.
    ///
    /// In replace mode the first batch replaces the contents (an empty list
    /// clears the playlist) and the remaining batches are appended.
    async fn upsert_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
        mode: UpsertMode,
    ) -> Res<()> {
        let batches = utils::track_uri_batches(track_ids);
        let mut batches = batches.iter();

        if mode == UpsertMode::Replace {
            let first = batches.next().map(Vec::as_slice).unwrap_or(&[]);
            self.replace_tracks_batch(playlist_id, first).await?;
        }

        for batch in batches {
            self.add_tracks_batch(playlist_id, batch).await?;
        }

        Ok(())
    }
}

fn candidate(title: &str, artist: &str) -> TrackCandidate {
    TrackCandidate {
        title: title.to_string(),
        artist: artist.to_string(),
    }
}

pub struct SpotifyClient {
    http: Client,
    api_url: String,
    auth: SpotifyAuth,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(config: &Config, tokens: TokenManager) -> Self {
        Self::with_auth(&config.spotify_api_url, SpotifyAuth::new(config), tokens)
    }

    pub fn with_auth(api_url: &str, auth: SpotifyAuth, tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            auth,
            tokens: Mutex::new(tokens),
        }
    }

    async fn access_token(&self) -> Res<String> {
        let mut tokens = self.tokens.lock().await;
        tokens.get_valid_token(&self.auth).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Res<T> {
        self.call(Method::GET, url, query, None::<&()>).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Res<T> {
        self.call(method, url, &[], Some(body)).await
    }

    async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Res<T> {
        let token = self.access_token().await?;

        let mut request = self.http.request(method, url).bearer_auth(token);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                service: "Spotify",
                status,
                url: url.to_string(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

impl MusicCatalog for SpotifyClient {
    async fn current_user_id(&self) -> Res<String> {
        self.get_current_user_id().await
    }

    async fn search_albums(&self, query: &str) -> Res<Vec<Album>> {
        self.get_album_search(query).await
    }

    async fn search_tracks(&self, query: &str) -> Res<Vec<Track>> {
        self.get_track_search(query).await
    }

    async fn list_album_tracks(&self, album_id: &str) -> Res<Vec<String>> {
        self.get_album_track_ids(album_id).await
    }

    async fn find_or_create_playlist(&self, user_id: &str, name: &str) -> Res<String> {
        match self.find_playlist(user_id, name).await? {
            Some(id) => Ok(id),
            None => self.create_playlist(user_id, name).await,
        }
    }

    async fn add_tracks_batch(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        self.post_tracks(playlist_id, uris).await
    }

    async fn replace_tracks_batch(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        self.put_tracks(playlist_id, uris).await
    }
}
