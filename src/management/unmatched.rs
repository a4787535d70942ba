use std::path::{Path, PathBuf};

use crate::{Res, types::UnmatchedAlbum};

pub const DEFAULT_UNMATCHED_FILE: &str = "missing_albums.txt";

/// Plain text record of releases that found no Spotify match.
///
/// One `"{album} by {artist}"` line per release. The file is truncated and
/// rewritten on every run.
pub struct UnmatchedLog {
    path: PathBuf,
}

impl UnmatchedLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn write(&self, albums: &[UnmatchedAlbum]) -> Res<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            async_fs::create_dir_all(parent).await?;
        }

        let content: String = albums.iter().map(|a| format!("{}\n", a)).collect();
        async_fs::write(&self.path, content).await?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for UnmatchedLog {
    fn default() -> Self {
        Self::new(DEFAULT_UNMATCHED_FILE)
    }
}
