//! The Discogs collection to Spotify playlist pipeline.
//!
//! [`SyncDriver::run`] walks one collection folder release by release, in the
//! order Discogs returns them, and writes everything it matched into a single
//! playlist. Failures before the first release is matched are fatal and come
//! back as [`SetupError`]. Failures for a single release are recorded in the
//! [`SyncReport`] and the run moves on.

use std::{collections::HashSet, fmt, path::PathBuf};

use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Error, ItemError, ItemStage, Res, SetupError,
    discogs::CollectionSource,
    info,
    input::{InputProvider, Prompt},
    management::{DEFAULT_UNMATCHED_FILE, UnmatchedLog},
    matching::MatchPolicy,
    spotify::{MusicCatalog, UpsertMode},
    success,
    types::{CollectionRelease, Folder, UnmatchedAlbum},
    utils, warning,
};

pub const DEFAULT_PLAYLIST_NAME: &str = "Discogs Collection";

/// What is added to the playlist for a matched release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SyncMode {
    /// Search the album and add all of its tracks
    #[default]
    Album,
    /// Search every track of the Discogs tracklist individually
    Tracklist,
    /// Search one track per release
    Single,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Album => write!(f, "album"),
            SyncMode::Tracklist => write!(f, "tracklist"),
            SyncMode::Single => write!(f, "single"),
        }
    }
}

impl SyncMode {
    pub fn default_upsert(&self) -> UpsertMode {
        match self {
            SyncMode::Album | SyncMode::Tracklist => UpsertMode::Append,
            SyncMode::Single => UpsertMode::Replace,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub mode: SyncMode,
    pub policy: MatchPolicy,
    pub upsert: UpsertMode,
    /// Print the user's folders before asking for one.
    pub list_folders: bool,
    /// Where unmatched albums are written; `None` skips the file.
    pub unmatched_file: Option<PathBuf>,
    pub show_progress: bool,
}

impl SyncOptions {
    pub fn new(mode: SyncMode) -> Self {
        Self {
            mode,
            policy: MatchPolicy::default(),
            upsert: mode.default_upsert(),
            list_folders: mode != SyncMode::Single,
            unmatched_file: Some(PathBuf::from(DEFAULT_UNMATCHED_FILE)),
            show_progress: true,
        }
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::new(SyncMode::default())
    }
}

/// Everything a finished run produced.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub username: String,
    pub folder_id: u64,
    pub playlist_name: String,
    /// Folders as listed before selection, empty when listing was skipped.
    pub folders: Vec<Folder>,
    /// Distinct releases processed; repeated copies are counted in `duplicates`.
    pub releases: usize,
    pub duplicates: usize,
    pub playlist_id: Option<String>,
    /// Set when a replace was withheld because every lookup failed.
    pub playlist_skipped: bool,
    /// Track ids in the order they were submitted to the playlist.
    pub track_ids: Vec<String>,
    pub unmatched: Vec<UnmatchedAlbum>,
    pub failures: Vec<ItemError>,
    pub playlist_error: Option<Error>,
    pub unmatched_error: Option<Error>,
}

impl SyncReport {
    pub fn matched(&self) -> usize {
        self.releases - self.unmatched.len()
    }
}

/// Result of matching one release.
#[derive(Debug, Default)]
struct ReleaseOutcome {
    track_ids: Vec<String>,
    failures: Vec<ItemError>,
}

pub struct SyncDriver<'a, D, S, I> {
    discogs: &'a D,
    spotify: &'a S,
    input: I,
    options: SyncOptions,
}

impl<'a, D, S, I> SyncDriver<'a, D, S, I>
where
    D: CollectionSource,
    S: MusicCatalog,
    I: InputProvider,
{
    pub fn new(discogs: &'a D, spotify: &'a S, input: I, options: SyncOptions) -> Self {
        Self {
            discogs,
            spotify,
            input,
            options,
        }
    }

    pub async fn run(&mut self) -> Result<SyncReport, SetupError> {
        let mut report = SyncReport {
            username: self.ask(Prompt::Username)?,
            ..SyncReport::default()
        };

        if self.options.list_folders {
            report.folders = self
                .discogs
                .list_collection_folders(&report.username)
                .await
                .map_err(|source| SetupError::Collections {
                    username: report.username.clone(),
                    source,
                })?;

            println!("Available collections:");
            for line in utils::format_folder_lines(&report.folders) {
                println!("{}", line);
            }
        }

        report.folder_id = self.ask_folder_id()?;
        report.playlist_name = match self.ask(Prompt::PlaylistName)? {
            name if name.is_empty() => DEFAULT_PLAYLIST_NAME.to_string(),
            name => name,
        };

        let user_id = self
            .spotify
            .current_user_id()
            .await
            .map_err(SetupError::CurrentUser)?;

        let releases = self
            .discogs
            .list_releases(&report.username, report.folder_id)
            .await
            .map_err(|source| SetupError::Collection {
                folder_id: report.folder_id,
                source,
            })?;
        let releases = distinct_releases(releases, &mut report.duplicates);
        report.releases = releases.len();
        if report.duplicates > 0 {
            info!(
                "Skipping {} duplicate copies in collection {}",
                report.duplicates, report.folder_id
            );
        }

        info!(
            "Matching {} releases from collection {} ({} mode, {} match)",
            releases.len(),
            report.folder_id,
            self.options.mode,
            self.options.policy
        );

        let pb = self.progress_bar(releases.len() as u64);
        for release in &releases {
            let (album, artist) = release_label(release);
            pb.set_message(format!("{} by {}", album, artist));

            let outcome = self.match_release(release).await;
            for failure in &outcome.failures {
                pb.suspend(|| warning!("{}", failure));
            }

            if outcome.track_ids.is_empty() {
                report.unmatched.push(UnmatchedAlbum { album, artist });
            }
            report.track_ids.extend(outcome.track_ids);
            report.failures.extend(outcome.failures);
            pb.inc(1);
        }
        pb.finish_and_clear();

        info!(
            "Matched {} of {} releases, {} tracks collected",
            report.matched(),
            report.releases,
            report.track_ids.len()
        );

        if self.withhold_replace(&report) {
            warning!(
                "No tracks matched and {} lookups failed; leaving '{}' untouched",
                report.failures.len(),
                report.playlist_name
            );
            report.playlist_skipped = true;
        } else {
            match self
                .upsert(&user_id, &report.playlist_name, &report.track_ids)
                .await
            {
                Ok(playlist_id) => {
                    success!("Playlist '{}' created/updated successfully", report.playlist_name);
                    report.playlist_id = Some(playlist_id);
                }
                Err(e) => {
                    warning!("Error creating/updating Spotify playlist: {}", e);
                    report.playlist_error = Some(e);
                }
            }
        }

        if let Some(path) = &self.options.unmatched_file {
            let log = UnmatchedLog::new(path);
            match log.write(&report.unmatched).await {
                Ok(()) => info!(
                    "{} missing albums have been logged to {}",
                    report.unmatched.len(),
                    log.path().display()
                ),
                Err(e) => {
                    warning!("Failed to write {}: {}", log.path().display(), e);
                    report.unmatched_error = Some(e);
                }
            }
        }

        Ok(report)
    }

    async fn match_release(&self, release: &CollectionRelease) -> ReleaseOutcome {
        let (album, listed_artist) = release_label(release);
        let artist = utils::clean_artist_name(&listed_artist);
        let item = format!("{} by {}", album, listed_artist);
        let policy = self.options.policy;

        let mut outcome = ReleaseOutcome::default();
        let fail = |stage: ItemStage, source: Error| ItemError {
            item: item.clone(),
            stage,
            source,
        };

        match self.options.mode {
            SyncMode::Album => match self.spotify.search_album(&album, &artist, policy).await {
                Ok(Some(found)) => match self.spotify.list_album_tracks(&found.id).await {
                    Ok(track_ids) => outcome.track_ids = track_ids,
                    Err(e) => outcome.failures.push(fail(ItemStage::AlbumTracks, e)),
                },
                Ok(None) => {}
                Err(e) => outcome.failures.push(fail(ItemStage::AlbumSearch, e)),
            },
            SyncMode::Tracklist => {
                match self
                    .discogs
                    .fetch_release_tracklist(release.basic_information.id)
                    .await
                {
                    Ok(tracklist) => {
                        for entry in tracklist {
                            match self.spotify.search_track(&entry.title, &artist, policy).await {
                                Ok(Some(track)) => outcome.track_ids.push(track.id),
                                Ok(None) => {}
                                Err(e) => outcome.failures.push(fail(ItemStage::TrackSearch, e)),
                            }
                        }
                    }
                    Err(e) => outcome.failures.push(fail(ItemStage::Tracklist, e)),
                }
            }
            SyncMode::Single => match self.spotify.search_track(&album, &artist, policy).await {
                Ok(Some(track)) => outcome.track_ids.push(track.id),
                Ok(None) => {}
                Err(e) => outcome.failures.push(fail(ItemStage::TrackSearch, e)),
            },
        }

        outcome
    }

    /// True when a replace would empty the playlist after failed lookups.
    fn withhold_replace(&self, report: &SyncReport) -> bool {
        self.options.upsert == UpsertMode::Replace
            && report.track_ids.is_empty()
            && !report.failures.is_empty()
    }

    async fn upsert(&self, user_id: &str, playlist_name: &str, track_ids: &[String]) -> Res<String> {
        let playlist_id = self
            .spotify
            .find_or_create_playlist(user_id, playlist_name)
            .await?;

        self.spotify
            .upsert_tracks(&playlist_id, track_ids, self.options.upsert)
            .await?;

        Ok(playlist_id)
    }

    fn ask(&mut self, prompt: Prompt) -> Result<String, SetupError> {
        self.input.ask(prompt).map_err(|source| SetupError::Input {
            prompt: prompt.label(),
            source,
        })
    }

    fn ask_folder_id(&mut self) -> Result<u64, SetupError> {
        let answer = self.ask(Prompt::FolderId)?;
        answer.parse::<u64>().map_err(|_| SetupError::Input {
            prompt: Prompt::FolderId.label(),
            source: Error::Input(format!("'{}' is not a collection id", answer)),
        })
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::with_template("{bar:30.blue} {pos}/{len} {msg}") {
            pb.set_style(style);
        }
        pb
    }
}

/// The album title and first artist of a release, as listed on Discogs.
fn release_label(release: &CollectionRelease) -> (String, String) {
    (
        release.basic_information.title.clone(),
        utils::primary_artist(&release.basic_information),
    )
}

/// Drops repeated copies of a release, keeping the first in collection order.
fn distinct_releases(
    releases: Vec<CollectionRelease>,
    duplicates: &mut usize,
) -> Vec<CollectionRelease> {
    let mut seen = HashSet::new();
    let total = releases.len();
    let distinct: Vec<CollectionRelease> = releases
        .into_iter()
        .filter(|r| seen.insert(r.basic_information.id))
        .collect();
    *duplicates = total - distinct.len();
    distinct
}
