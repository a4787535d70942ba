use reqwest::Method;

use crate::{
    Res,
    spotify::SpotifyClient,
    types::{CreatePlaylistRequest, CurrentUser, Paging, Playlist, SnapshotResponse, TracksRequest},
};

const PLAYLIST_DESCRIPTION: &str = "Tracks from my Discogs collection";

impl SpotifyClient {
    pub async fn get_current_user_id(&self) -> Res<String> {
        let api_url = format!("{uri}/me", uri = self.api_url);
        let user = self.get_json::<CurrentUser>(&api_url, &[]).await?;
        Ok(user.id)
    }

    /// Looks up a playlist owned by the user by exact name, across all pages.
    ///
    /// Followed playlists of other users are listed too and are skipped. The
    /// first owned playlist with the name wins when several share it.
    pub async fn find_playlist(&self, user_id: &str, name: &str) -> Res<Option<String>> {
        let mut next = Some(format!(
            "{uri}/users/{user_id}/playlists?limit=50",
            uri = self.api_url,
            user_id = user_id
        ));

        while let Some(api_url) = next {
            let page = self
                .get_json::<Paging<Option<Playlist>>>(&api_url, &[])
                .await?;

            let owned = |p: &Playlist| p.owner.as_ref().is_some_and(|o| o.id == user_id);
            if let Some(playlist) = page
                .items
                .into_iter()
                .flatten()
                .find(|p| p.name == name && owned(p))
            {
                return Ok(Some(playlist.id));
            }
            next = page.next;
        }

        Ok(None)
    }

    pub async fn create_playlist(&self, user_id: &str, name: &str) -> Res<String> {
        let api_url = format!(
            "{uri}/users/{user_id}/playlists",
            uri = self.api_url,
            user_id = user_id
        );

        let request = CreatePlaylistRequest {
            name: name.to_string(),
            description: PLAYLIST_DESCRIPTION.to_string(),
            public: true,
        };

        let playlist = self
            .send_json::<_, Playlist>(Method::POST, &api_url, &request)
            .await?;
        Ok(playlist.id)
    }

    /// Appends up to 100 track URIs to a playlist.
    pub async fn post_tracks(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        self.write_tracks(Method::POST, playlist_id, uris).await
    }

    /// Replaces the tracks of a playlist with up to 100 track URIs.
    pub async fn put_tracks(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        self.write_tracks(Method::PUT, playlist_id, uris).await
    }

    async fn write_tracks(&self, method: Method, playlist_id: &str, uris: &[String]) -> Res<()> {
        let api_url = format!(
            "{uri}/playlists/{id}/tracks",
            uri = self.api_url,
            id = playlist_id
        );

        let request = TracksRequest {
            uris: uris.to_vec(),
        };

        self.send_json::<_, SnapshotResponse>(method, &api_url, &request)
            .await?;
        Ok(())
    }
}
