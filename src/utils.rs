use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use reqwest::Url;
use sha2::{Digest, Sha256};

use crate::{
    Error, Res,
    types::{BasicInformation, Folder, FolderTableRow},
};

/// Spotify rejects playlist track requests with more identifiers than this.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

pub fn generate_state() -> String {
    random_alphanumeric(16)
}

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Code and state carried by the URL Spotify redirects to after authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResponse {
    pub code: String,
    pub state: Option<String>,
}

/// Extracts the authorization code from a pasted redirect URL.
///
/// Anything that is not a URL with a `code` parameter is taken to be the bare
/// code itself. An `error` parameter (for example `access_denied`) is an error.
pub fn parse_response_code(response: &str) -> Res<AuthorizationResponse> {
    let response = response.trim();
    if response.is_empty() {
        return Err(Error::Auth("empty authorization response".to_string()));
    }

    let Ok(url) = Url::parse(response) else {
        return Ok(AuthorizationResponse {
            code: response.to_string(),
            state: None,
        });
    };

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "error" => return Err(Error::Auth(value.into_owned())),
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    match code {
        Some(code) => Ok(AuthorizationResponse { code, state }),
        None => Err(Error::Auth(format!("no code in {}", response))),
    }
}

pub fn album_query(title: &str, artist: &str) -> String {
    format!("album:{} artist:{}", title, artist)
}

pub fn track_query(title: &str, artist: &str) -> String {
    format!("track:{} artist:{}", title, artist)
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{}", track_id)
}

/// Turns track ids into URI batches of at most [`MAX_TRACKS_PER_REQUEST`].
pub fn track_uri_batches(track_ids: &[String]) -> Vec<Vec<String>> {
    track_ids
        .chunks(MAX_TRACKS_PER_REQUEST)
        .map(|chunk| chunk.iter().map(|id| track_uri(id)).collect())
        .collect()
}

pub fn format_folder_line(folder: &Folder) -> String {
    format!("{}: {} ({} items)", folder.id, folder.name, folder.count)
}

pub fn format_folder_lines(folders: &[Folder]) -> Vec<String> {
    folders.iter().map(format_folder_line).collect()
}

pub fn folder_table_rows(folders: &[Folder]) -> Vec<FolderTableRow> {
    folders
        .iter()
        .map(|f| FolderTableRow {
            id: f.id,
            name: f.name.clone(),
            items: f.count,
        })
        .collect()
}

/// The first listed artist of a release, as Discogs spells it.
pub fn primary_artist(info: &BasicInformation) -> String {
    info.artists
        .first()
        .map(|a| a.name.clone())
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string())
}

/// Strips Discogs name decorations that Spotify does not know about.
///
/// Discogs disambiguates artists sharing a name with a numeric suffix
/// ("Nirvana (2)") and marks name variations with a trailing `*`.
pub fn clean_artist_name(name: &str) -> String {
    let mut cleaned = name.trim().trim_end_matches('*').trim_end();

    if let Some(open) = cleaned.rfind(" (") {
        let suffix = &cleaned[open + 2..];
        if let Some(number) = suffix.strip_suffix(')') {
            if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
                cleaned = cleaned[..open].trim_end();
            }
        }
    }

    cleaned.to_string()
}

/// Case-insensitive, whitespace-trimmed comparison used by strict matching.
pub fn names_equal(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
