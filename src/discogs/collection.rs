use crate::{
    Res,
    discogs::DiscogsClient,
    types::{CollectionRelease, CollectionReleasesResponse, Folder, FoldersResponse},
};

/// Releases requested per page; the largest page size Discogs allows.
const RELEASES_PER_PAGE: u32 = 100;

impl DiscogsClient {
    /// Lists the collection folders of `username` in the order Discogs returns
    /// them. Folder `0` is the implicit "All" folder.
    pub async fn get_collection_folders(&self, username: &str) -> Res<Vec<Folder>> {
        let api_url = format!(
            "{uri}/users/{username}/collection/folders",
            uri = self.api_url,
            username = username
        );

        let json = self.get_json::<FoldersResponse>(&api_url).await?;
        Ok(json.folders)
    }

    /// Lists every release in a collection folder, following the pagination
    /// links until the last page.
    pub async fn get_folder_releases(
        &self,
        username: &str,
        folder_id: u64,
    ) -> Res<Vec<CollectionRelease>> {
        let mut next = Some(format!(
            "{uri}/users/{username}/collection/folders/{folder_id}/releases?per_page={per_page}",
            uri = self.api_url,
            username = username,
            folder_id = folder_id,
            per_page = RELEASES_PER_PAGE
        ));

        let mut releases = Vec::new();
        while let Some(api_url) = next {
            let page = self.get_json::<CollectionReleasesResponse>(&api_url).await?;
            releases.extend(page.releases);

            next = page
                .pagination
                .and_then(|p| p.urls.next)
                .filter(|url| *url != api_url);
        }

        Ok(releases)
    }
}
