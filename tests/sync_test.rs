use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

use reqwest::StatusCode;

use discogs2spotify::discogs::CollectionSource;
use discogs2spotify::input::{Prompt, ScriptedInput};
use discogs2spotify::matching::MatchPolicy;
use discogs2spotify::spotify::{MusicCatalog, UpsertMode};
use discogs2spotify::sync::*;
use discogs2spotify::types::{
    Album, BasicInformation, CollectionRelease, DiscogsArtist, Folder, SpotifyArtist, Track,
    TracklistEntry,
};
use discogs2spotify::{Error, ItemStage, Res, SetupError};

fn status_error(url: &str) -> Error {
    Error::Status {
        service: "Test",
        status: StatusCode::INTERNAL_SERVER_ERROR,
        url: url.to_string(),
    }
}

// Fake Discogs

#[derive(Default)]
struct FakeDiscogs {
    folders: Vec<Folder>,
    releases: Vec<CollectionRelease>,
    tracklists: HashMap<u64, Vec<TracklistEntry>>,
    fail_folders: bool,
    fail_releases: bool,
}

impl FakeDiscogs {
    fn with_releases(releases: Vec<CollectionRelease>) -> Self {
        Self {
            folders: vec![
                Folder {
                    id: 0,
                    name: "All".to_string(),
                    count: releases.len() as u64,
                },
                Folder {
                    id: 1,
                    name: "Uncategorized".to_string(),
                    count: releases.len() as u64,
                },
            ],
            releases,
            ..Self::default()
        }
    }
}

impl CollectionSource for FakeDiscogs {
    async fn list_collection_folders(&self, _username: &str) -> Res<Vec<Folder>> {
        if self.fail_folders {
            return Err(status_error("folders"));
        }
        Ok(self.folders.clone())
    }

    async fn list_releases(&self, _username: &str, _folder_id: u64) -> Res<Vec<CollectionRelease>> {
        if self.fail_releases {
            return Err(status_error("releases"));
        }
        Ok(self.releases.clone())
    }

    async fn fetch_release_tracklist(&self, release_id: u64) -> Res<Vec<TracklistEntry>> {
        self.tracklists
            .get(&release_id)
            .cloned()
            .ok_or_else(|| status_error("tracklist"))
    }
}

// Fake Spotify

#[derive(Default)]
struct FakeSpotify {
    // search results by exact query
    albums: HashMap<String, Vec<Album>>,
    tracks: HashMap<String, Vec<Track>>,
    album_tracks: HashMap<String, Vec<String>>,
    failing_queries: HashSet<String>,
    fail_user: bool,
    fail_playlist: bool,
    queries: Mutex<Vec<String>>,
    playlists: Mutex<Vec<(String, String)>>,
    // (method, uris) of every playlist write
    writes: Mutex<Vec<(&'static str, Vec<String>)>>,
}

impl FakeSpotify {
    fn album(mut self, title: &str, artist: &str, album_id: &str, track_count: usize) -> Self {
        self.albums.insert(
            format!("album:{} artist:{}", title, artist),
            vec![Album {
                id: album_id.to_string(),
                name: title.to_string(),
                artists: vec![SpotifyArtist {
                    name: artist.to_string(),
                }],
            }],
        );
        self.album_tracks.insert(
            album_id.to_string(),
            (0..track_count)
                .map(|n| format!("{}-{}", album_id, n))
                .collect(),
        );
        self
    }

    fn track(mut self, title: &str, artist: &str, track_id: &str) -> Self {
        self.tracks.insert(
            format!("track:{} artist:{}", title, artist),
            vec![Track {
                id: track_id.to_string(),
                name: title.to_string(),
                artists: vec![SpotifyArtist {
                    name: artist.to_string(),
                }],
            }],
        );
        self
    }

    fn failing(mut self, query: &str) -> Self {
        self.failing_queries.insert(query.to_string());
        self
    }

    fn check_query(&self, query: &str) -> Res<()> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.failing_queries.contains(query) {
            return Err(status_error(query));
        }
        Ok(())
    }

    fn writes(&self) -> Vec<(&'static str, Vec<String>)> {
        self.writes.lock().unwrap().clone()
    }
}

impl MusicCatalog for FakeSpotify {
    async fn current_user_id(&self) -> Res<String> {
        if self.fail_user {
            return Err(status_error("me"));
        }
        Ok("user-1".to_string())
    }

    async fn search_albums(&self, query: &str) -> Res<Vec<Album>> {
        self.check_query(query)?;
        Ok(self.albums.get(query).cloned().unwrap_or_default())
    }

    async fn search_tracks(&self, query: &str) -> Res<Vec<Track>> {
        self.check_query(query)?;
        Ok(self.tracks.get(query).cloned().unwrap_or_default())
    }

    async fn list_album_tracks(&self, album_id: &str) -> Res<Vec<String>> {
        Ok(self.album_tracks.get(album_id).cloned().unwrap_or_default())
    }

    async fn find_or_create_playlist(&self, _user_id: &str, name: &str) -> Res<String> {
        if self.fail_playlist {
            return Err(status_error("playlists"));
        }

        let mut playlists = self.playlists.lock().unwrap();
        if let Some((id, _)) = playlists.iter().find(|(_, n)| n == name) {
            return Ok(id.clone());
        }
        let id = format!("pl-{}", playlists.len() + 1);
        playlists.push((id.clone(), name.to_string()));
        Ok(id)
    }

    async fn add_tracks_batch(&self, _playlist_id: &str, uris: &[String]) -> Res<()> {
        self.writes.lock().unwrap().push(("POST", uris.to_vec()));
        Ok(())
    }

    async fn replace_tracks_batch(&self, _playlist_id: &str, uris: &[String]) -> Res<()> {
        self.writes.lock().unwrap().push(("PUT", uris.to_vec()));
        Ok(())
    }
}

// Helpers

fn release(id: u64, title: &str, artist: &str) -> CollectionRelease {
    CollectionRelease {
        id,
        basic_information: BasicInformation {
            id,
            title: title.to_string(),
            year: None,
            artists: vec![DiscogsArtist {
                name: artist.to_string(),
            }],
        },
    }
}

fn tracklist_entry(title: &str) -> TracklistEntry {
    TracklistEntry {
        position: String::new(),
        title: title.to_string(),
        entry_type: "track".to_string(),
        duration: String::new(),
    }
}

fn script(folder: &str, playlist: &str) -> ScriptedInput {
    ScriptedInput::new()
        .answer(Prompt::Username, "alice")
        .answer(Prompt::FolderId, folder)
        .answer(Prompt::PlaylistName, playlist)
}

fn unmatched_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "discogs2spotify-{}-{}-missing.txt",
        std::process::id(),
        name
    ))
}

fn options(mode: SyncMode, unmatched_file: Option<PathBuf>) -> SyncOptions {
    let mut options = SyncOptions::new(mode);
    options.unmatched_file = unmatched_file;
    options.show_progress = false;
    options
}

// Album mode

#[tokio::test]
async fn test_album_mode_end_to_end() {
    let discogs = FakeDiscogs::with_releases(vec![release(1, "Abbey Road", "The Beatles")]);
    let spotify = FakeSpotify::default().album("Abbey Road", "The Beatles", "abbey", 17);
    let path = unmatched_path("album-e2e");
    let mut input = script("0", "Vinyl");

    let report = SyncDriver::new(
        &discogs,
        &spotify,
        &mut input,
        options(SyncMode::Album, Some(path.clone())),
    )
    .run()
    .await
    .unwrap();

    // Prompts in order, folders listed before the folder prompt
    assert_eq!(
        input.asked(),
        &[Prompt::Username, Prompt::FolderId, Prompt::PlaylistName]
    );
    assert_eq!(report.folders.len(), 2);

    assert_eq!(report.username, "alice");
    assert_eq!(report.folder_id, 0);
    assert_eq!(report.playlist_name, "Vinyl");
    assert_eq!(report.playlist_id.as_deref(), Some("pl-1"));
    assert_eq!(report.releases, 1);
    assert_eq!(report.matched(), 1);
    assert_eq!(report.track_ids.len(), 17);
    assert!(report.unmatched.is_empty());
    assert!(report.failures.is_empty());

    // All 17 tracks in a single append
    let writes = spotify.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, "POST");
    assert_eq!(writes[0].1.len(), 17);
    assert_eq!(writes[0].1[0], "spotify:track:abbey-0");

    // The unmatched file is still written, empty
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_unmatched_releases_listed_once() {
    let discogs = FakeDiscogs::with_releases(vec![
        release(1, "Abbey Road", "The Beatles"),
        release(2, "Unknown Pleasures", "Joy Division"),
        release(3, "Empty Shell", "Nobody"),
    ]);
    // The third album is found but has no tracks
    let spotify = FakeSpotify::default()
        .album("Abbey Road", "The Beatles", "abbey", 17)
        .album("Empty Shell", "Nobody", "empty", 0);
    let path = unmatched_path("unmatched-once");

    let report = SyncDriver::new(
        &discogs,
        &spotify,
        script("0", "Vinyl"),
        options(SyncMode::Album, Some(path.clone())),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(report.matched(), 1);
    assert_eq!(report.unmatched.len(), 2);
    assert!(report.failures.is_empty());

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "Unknown Pleasures by Joy Division\nEmpty Shell by Nobody\n"
    );
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_no_match_adds_nothing() {
    let discogs = FakeDiscogs::with_releases(vec![release(1, "Obscure Demo", "Local Band")]);
    let spotify = FakeSpotify::default();

    let report = SyncDriver::new(
        &discogs,
        &spotify,
        script("0", "Vinyl"),
        options(SyncMode::Album, None),
    )
    .run()
    .await
    .unwrap();

    assert!(report.track_ids.is_empty());
    assert_eq!(report.unmatched.len(), 1);

    // The playlist exists, but appending nothing sends no request
    assert_eq!(report.playlist_id.as_deref(), Some("pl-1"));
    assert!(spotify.writes().is_empty());
}

#[tokio::test]
async fn test_large_collection_is_batched() {
    let discogs = FakeDiscogs::with_releases(vec![
        release(1, "Box Set", "Big Band"),
        release(2, "Double Album", "Small Band"),
    ]);
    let spotify = FakeSpotify::default()
        .album("Box Set", "Big Band", "box", 180)
        .album("Double Album", "Small Band", "double", 70);

    let report = SyncDriver::new(
        &discogs,
        &spotify,
        script("0", "Vinyl"),
        options(SyncMode::Album, None),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(report.track_ids.len(), 250);

    let writes = spotify.writes();
    let sizes: Vec<usize> = writes.iter().map(|(_, uris)| uris.len()).collect();
    assert_eq!(sizes, vec![100, 100, 50]);
    assert!(writes.iter().all(|(method, _)| *method == "POST"));

    // Collection order is kept across batches
    assert_eq!(writes[0].1[0], "spotify:track:box-0");
    assert_eq!(writes[1].1[80], "spotify:track:double-0");
}

#[tokio::test]
async fn test_replace_mode_replaces_then_appends() {
    let discogs = FakeDiscogs::with_releases(vec![release(1, "Box Set", "Big Band")]);
    let spotify = FakeSpotify::default().album("Box Set", "Big Band", "box", 130);

    let mut options = options(SyncMode::Album, None);
    options.upsert = UpsertMode::Replace;

    SyncDriver::new(&discogs, &spotify, script("0", "Vinyl"), options)
        .run()
        .await
        .unwrap();

    let writes = spotify.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!((writes[0].0, writes[0].1.len()), ("PUT", 100));
    assert_eq!((writes[1].0, writes[1].1.len()), ("POST", 30));
}

#[tokio::test]
async fn test_discogs_artist_decorations_are_stripped() {
    let discogs = FakeDiscogs::with_releases(vec![release(1, "Nevermind", "Nirvana (2)")]);
    let spotify = FakeSpotify::default().album("Nevermind", "Nirvana", "nevermind", 12);

    let report = SyncDriver::new(
        &discogs,
        &spotify,
        script("0", "Vinyl"),
        options(SyncMode::Album, None),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(report.track_ids.len(), 12);
    assert_eq!(
        spotify.queries.lock().unwrap()[0],
        "album:Nevermind artist:Nirvana"
    );
}

#[tokio::test]
async fn test_search_failure_is_recorded_and_run_continues() {
    let discogs = FakeDiscogs::with_releases(vec![
        release(1, "Broken", "Flaky Artist"),
        release(2, "Abbey Road", "The Beatles"),
    ]);
    let spotify = FakeSpotify::default()
        .album("Abbey Road", "The Beatles", "abbey", 17)
        .failing("album:Broken artist:Flaky Artist");
    let path = unmatched_path("search-failure");

    let report = SyncDriver::new(
        &discogs,
        &spotify,
        script("0", "Vinyl"),
        options(SyncMode::Album, Some(path.clone())),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, ItemStage::AlbumSearch);
    assert_eq!(report.failures[0].item, "Broken by Flaky Artist");

    // The failed release is unmatched, the next one still synced
    assert_eq!(report.unmatched.len(), 1);
    assert_eq!(report.track_ids.len(), 17);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Broken by Flaky Artist\n"
    );
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_duplicate_unmatched_release_listed_once() {
    let discogs = FakeDiscogs::with_releases(vec![
        release(7, "Obscure Demo", "Local Band"),
        release(7, "Obscure Demo", "Local Band"),
    ]);
    let spotify = FakeSpotify::default();
    let path = unmatched_path("duplicate-unmatched");

    let report = SyncDriver::new(
        &discogs,
        &spotify,
        script("0", "Vinyl"),
        options(SyncMode::Album, Some(path.clone())),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(report.releases, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.unmatched.len(), 1);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Obscure Demo by Local Band\n"
    );

    // The copy is not searched again
    assert_eq!(spotify.queries.lock().unwrap().len(), 1);
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_duplicate_matched_release_submitted_once() {
    let discogs = FakeDiscogs::with_releases(vec![
        release(1, "Abbey Road", "The Beatles"),
        release(2, "Let It Be", "The Beatles"),
        release(1, "Abbey Road", "The Beatles"),
    ]);
    let spotify = FakeSpotify::default()
        .album("Abbey Road", "The Beatles", "abbey", 17)
        .album("Let It Be", "The Beatles", "let-it-be", 12);

    let report = SyncDriver::new(
        &discogs,
        &spotify,
        script("0", "Vinyl"),
        options(SyncMode::Album, None),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(report.releases, 2);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.track_ids.len(), 29);

    // First copy kept, collection order preserved
    let writes = spotify.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].1.len(), 29);
    assert_eq!(writes[0].1[0], "spotify:track:abbey-0");
    assert_eq!(writes[0].1[17], "spotify:track:let-it-be-0");
}

#[tokio::test]
async fn test_empty_playlist_name_uses_default() {
    let discogs = FakeDiscogs::with_releases(vec![]);
    let spotify = FakeSpotify::default();

    let report = SyncDriver::new(
        &discogs,
        &spotify,
        script("0", ""),
        options(SyncMode::Album, None),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(report.playlist_name, DEFAULT_PLAYLIST_NAME);
    assert_eq!(
        spotify.playlists.lock().unwrap()[0].1,
        DEFAULT_PLAYLIST_NAME
    );
}

#[tokio::test]
async fn test_playlist_failure_does_not_abort() {
    let discogs = FakeDiscogs::with_releases(vec![release(1, "Obscure Demo", "Local Band")]);
    let spotify = FakeSpotify {
        fail_playlist: true,
        ..FakeSpotify::default()
    };
    let path = unmatched_path("playlist-failure");

    let report = SyncDriver::new(
        &discogs,
        &spotify,
        script("0", "Vinyl"),
        options(SyncMode::Album, Some(path.clone())),
    )
    .run()
    .await
    .unwrap();

    assert!(report.playlist_id.is_none());
    assert!(report.playlist_error.is_some());

    // The unmatched file is still written
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Obscure Demo by Local Band\n"
    );
    let _ = std::fs::remove_file(&path);
}

// Tracklist mode

#[tokio::test]
async fn test_tracklist_mode() {
    let mut discogs = FakeDiscogs::with_releases(vec![
        release(1, "Abbey Road", "The Beatles"),
        release(2, "Lost Tapes", "The Beatles"),
    ]);
    discogs.tracklists.insert(
        1,
        vec![
            tracklist_entry("Come Together"),
            tracklist_entry("Something"),
            tracklist_entry("Her Majesty"),
        ],
    );
    // No tracklist for release 2: fetching it fails

    let spotify = FakeSpotify::default()
        .track("Come Together", "The Beatles", "come-together")
        .failing("track:Something artist:The Beatles");

    let report = SyncDriver::new(
        &discogs,
        &spotify,
        script("0", "Vinyl"),
        options(SyncMode::Tracklist, None),
    )
    .run()
    .await
    .unwrap();

    // One track found, one search failed, one not found
    assert_eq!(report.track_ids, vec!["come-together"]);

    let stages: Vec<ItemStage> = report.failures.iter().map(|f| f.stage).collect();
    assert_eq!(stages, vec![ItemStage::TrackSearch, ItemStage::Tracklist]);

    // Only the release without a tracklist is unmatched
    assert_eq!(report.unmatched.len(), 1);
    assert_eq!(report.unmatched[0].album, "Lost Tapes");

    assert_eq!(spotify.writes()[0].1, vec!["spotify:track:come-together"]);
}

// Single mode

#[tokio::test]
async fn test_single_mode() {
    let discogs = FakeDiscogs::with_releases(vec![
        release(1, "Blue Monday", "New Order"),
        release(2, "Unreleased", "Nobody"),
    ]);
    let spotify = FakeSpotify::default().track("Blue Monday", "New Order", "blue-monday");
    let mut input = script("0", "Singles");

    let options = options(SyncMode::Single, None);
    assert_eq!(options.upsert, UpsertMode::Replace);
    assert!(!options.list_folders);

    let report = SyncDriver::new(&discogs, &spotify, &mut input, options)
        .run()
        .await
        .unwrap();

    // Folders are not listed in single mode
    assert!(report.folders.is_empty());
    assert_eq!(report.track_ids, vec!["blue-monday"]);
    assert_eq!(report.unmatched.len(), 1);

    // The release title is searched as a track
    assert_eq!(
        spotify.queries.lock().unwrap()[0],
        "track:Blue Monday artist:New Order"
    );

    // Replace mode: the playlist holds exactly the new tracks
    assert_eq!(
        spotify.writes(),
        vec![("PUT", vec!["spotify:track:blue-monday".to_string()])]
    );
}

#[tokio::test]
async fn test_replace_withheld_when_every_lookup_failed() {
    let discogs = FakeDiscogs::with_releases(vec![release(1, "Blue Monday", "New Order")]);
    let spotify = FakeSpotify::default().failing("track:Blue Monday artist:New Order");

    let report = SyncDriver::new(
        &discogs,
        &spotify,
        script("0", "Singles"),
        options(SyncMode::Single, None),
    )
    .run()
    .await
    .unwrap();

    // The existing playlist is not cleared
    assert!(report.playlist_skipped);
    assert!(report.playlist_id.is_none());
    assert!(report.playlist_error.is_none());
    assert!(spotify.writes().is_empty());
    assert!(spotify.playlists.lock().unwrap().is_empty());
    assert_eq!(report.unmatched.len(), 1);
}

#[tokio::test]
async fn test_replace_with_no_matches_still_clears() {
    let discogs = FakeDiscogs::with_releases(vec![release(1, "Unreleased", "Nobody")]);
    let spotify = FakeSpotify::default();

    let report = SyncDriver::new(
        &discogs,
        &spotify,
        script("0", "Singles"),
        options(SyncMode::Single, None),
    )
    .run()
    .await
    .unwrap();

    // Nothing failed, so an empty result replaces the contents
    assert!(!report.playlist_skipped);
    assert_eq!(spotify.writes(), vec![("PUT", Vec::<String>::new())]);
}

#[test]
fn test_sync_mode_defaults() {
    assert_eq!(SyncMode::default(), SyncMode::Album);
    assert_eq!(SyncMode::Album.default_upsert(), UpsertMode::Append);
    assert_eq!(SyncMode::Tracklist.default_upsert(), UpsertMode::Append);
    assert_eq!(SyncMode::Single.default_upsert(), UpsertMode::Replace);

    let options = SyncOptions::default();
    assert_eq!(options.policy, MatchPolicy::First);
    assert!(options.list_folders);
    assert_eq!(
        options.unmatched_file.as_deref(),
        Some(std::path::Path::new("missing_albums.txt"))
    );
}

// Setup failures

#[tokio::test]
async fn test_missing_username_is_fatal() {
    let discogs = FakeDiscogs::with_releases(vec![]);
    let spotify = FakeSpotify::default();

    let result = SyncDriver::new(
        &discogs,
        &spotify,
        ScriptedInput::new(),
        options(SyncMode::Album, None),
    )
    .run()
    .await;

    assert!(matches!(
        result,
        Err(SetupError::Input {
            prompt: "Discogs username",
            ..
        })
    ));
}

#[tokio::test]
async fn test_invalid_folder_id_is_fatal() {
    let discogs = FakeDiscogs::with_releases(vec![release(1, "Abbey Road", "The Beatles")]);
    let spotify = FakeSpotify::default();

    let result = SyncDriver::new(
        &discogs,
        &spotify,
        script("jazz", "Vinyl"),
        options(SyncMode::Album, None),
    )
    .run()
    .await;

    assert!(matches!(result, Err(SetupError::Input { .. })));
    assert!(spotify.writes().is_empty());
}

#[tokio::test]
async fn test_folder_listing_failure_is_fatal() {
    let discogs = FakeDiscogs {
        fail_folders: true,
        ..FakeDiscogs::default()
    };
    let spotify = FakeSpotify::default();

    let result = SyncDriver::new(
        &discogs,
        &spotify,
        script("0", "Vinyl"),
        options(SyncMode::Album, None),
    )
    .run()
    .await;

    assert!(matches!(result, Err(SetupError::Collections { .. })));
}

#[tokio::test]
async fn test_collection_failure_is_fatal() {
    let discogs = FakeDiscogs {
        fail_releases: true,
        ..FakeDiscogs::default()
    };
    let spotify = FakeSpotify::default();
    let path = unmatched_path("collection-failure");

    let result = SyncDriver::new(
        &discogs,
        &spotify,
        script("42", "Vinyl"),
        options(SyncMode::Album, Some(path.clone())),
    )
    .run()
    .await;

    match result {
        Err(SetupError::Collection { folder_id, .. }) => assert_eq!(folder_id, 42),
        other => panic!("expected a collection error, got {:?}", other.map(|r| r.releases)),
    }

    // Nothing was written anywhere
    assert!(spotify.writes().is_empty());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_spotify_user_failure_is_fatal() {
    let discogs = FakeDiscogs::with_releases(vec![release(1, "Abbey Road", "The Beatles")]);
    let spotify = FakeSpotify {
        fail_user: true,
        ..FakeSpotify::default()
    };

    let result = SyncDriver::new(
        &discogs,
        &spotify,
        script("0", "Vinyl"),
        options(SyncMode::Album, None),
    )
    .run()
    .await;

    assert!(matches!(result, Err(SetupError::CurrentUser(_))));
    assert!(spotify.queries.lock().unwrap().is_empty());
}
