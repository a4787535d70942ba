use crate::{
    Res,
    spotify::SpotifyClient,
    types::{Paging, Track},
};

impl SpotifyClient {
    /// Returns the ids of every track on an album.
    ///
    /// Spotify pages album tracks; the `next` link of each page is followed
    /// until it is `null` and the pages are concatenated in order.
    pub async fn get_album_track_ids(&self, album_id: &str) -> Res<Vec<String>> {
        let first = format!(
            "{uri}/albums/{id}/tracks?limit=50",
            uri = self.api_url,
            id = album_id
        );

        let mut track_ids = Vec::new();
        let mut next = Some(first);
        while let Some(api_url) = next {
            let page = self.get_json::<Paging<Track>>(&api_url, &[]).await?;
            track_ids.extend(page.items.into_iter().map(|t| t.id));
            next = page.next;
        }

        Ok(track_ids)
    }
}
