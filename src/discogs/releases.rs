use crate::{
    Res,
    discogs::DiscogsClient,
    types::{ReleaseResponse, TracklistEntry},
};

impl DiscogsClient {
    /// Fetches the tracklist of a release.
    ///
    /// Headings and index entries are dropped; only entries of type `track`
    /// are returned, in tracklist order.
    pub async fn get_release_tracklist(&self, release_id: u64) -> Res<Vec<TracklistEntry>> {
        let api_url = format!(
            "{uri}/releases/{id}",
            uri = self.api_url,
            id = release_id
        );

        let release = self.get_json::<ReleaseResponse>(&api_url).await?;

        Ok(release
            .tracklist
            .into_iter()
            .filter(|t| t.entry_type == "track" && !t.title.trim().is_empty())
            .collect())
    }
}
