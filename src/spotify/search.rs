use crate::{
    Res,
    spotify::SpotifyClient,
    types::{Album, SearchAlbumsResponse, SearchTracksResponse, Track},
};

/// Results requested per search. Only the strict match policy looks past the
/// first one.
const SEARCH_LIMIT: &str = "10";

impl SpotifyClient {
    /// Searches albums by free-text query, in Spotify's ranking order.
    pub async fn get_album_search(&self, query: &str) -> Res<Vec<Album>> {
        let api_url = format!("{uri}/search", uri = self.api_url);
        let json = self
            .get_json::<SearchAlbumsResponse>(
                &api_url,
                &[("q", query), ("type", "album"), ("limit", SEARCH_LIMIT)],
            )
            .await?;

        Ok(json.albums.items)
    }

    /// Searches tracks by free-text query, in Spotify's ranking order.
    pub async fn get_track_search(&self, query: &str) -> Res<Vec<Track>> {
        let api_url = format!("{uri}/search", uri = self.api_url);
        let json = self
            .get_json::<SearchTracksResponse>(
                &api_url,
                &[("q", query), ("type", "track"), ("limit", SEARCH_LIMIT)],
            )
            .await?;

        Ok(json.tracks.items)
    }
}
