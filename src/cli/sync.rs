use std::path::PathBuf;

use crate::{
    SetupError,
    config::Config,
    discogs::DiscogsClient,
    error, info,
    input::{ConsoleInput, PresetInput, Prompt},
    management::DEFAULT_UNMATCHED_FILE,
    matching::MatchPolicy,
    spotify::{self, UpsertMode},
    success,
    sync::{SyncDriver, SyncMode, SyncOptions},
    warning,
};

/// Command-line values for a sync run; anything missing is prompted for.
#[derive(Debug, Clone)]
pub struct SyncArgs {
    pub username: Option<String>,
    pub folder: Option<u64>,
    pub playlist: Option<String>,
    pub mode: SyncMode,
    pub policy: MatchPolicy,
    pub upsert: Option<UpsertMode>,
    pub unmatched_file: Option<PathBuf>,
    pub no_unmatched_file: bool,
}

pub async fn sync(config: &Config, args: SyncArgs) {
    // single mode works on the "All" folder unless told otherwise
    let folder = args
        .folder
        .or((args.mode == SyncMode::Single).then_some(0))
        .map(|id| id.to_string());

    let mut input = PresetInput::new(ConsoleInput::stdin())
        .with(Prompt::Username, args.username.clone())
        .with(Prompt::FolderId, folder)
        .with(Prompt::PlaylistName, args.playlist.clone());

    let spotify = match spotify::auth::authenticate(config, &mut input).await {
        Ok(client) => client,
        Err(e) => error!("{}", SetupError::Authentication(e)),
    };
    let discogs = DiscogsClient::new(config);

    let mut options = SyncOptions::new(args.mode);
    options.policy = args.policy;
    options.list_folders = args.folder.is_none() && args.mode != SyncMode::Single;
    if let Some(upsert) = args.upsert {
        options.upsert = upsert;
    }
    options.unmatched_file = if args.no_unmatched_file {
        None
    } else {
        Some(
            args.unmatched_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UNMATCHED_FILE)),
        )
    };

    let mut driver = SyncDriver::new(&discogs, &spotify, input, options);
    let report = match driver.run().await {
        Ok(report) => report,
        Err(e) => error!("{}", e),
    };

    if !report.failures.is_empty() {
        warning!(
            "{} lookups failed; the affected releases are listed as missing",
            report.failures.len()
        );
    }

    match &report.playlist_id {
        Some(_) => success!(
            "{} tracks from {} of {} releases written to '{}'",
            report.track_ids.len(),
            report.matched(),
            report.releases,
            report.playlist_name
        ),
        None => info!("Playlist '{}' was not updated", report.playlist_name),
    }
}
