use tabled::Table;

use crate::{
    config::Config,
    discogs::{CollectionSource, DiscogsClient},
    error, utils, warning,
};

/// Prints the collection folders of a Discogs user as a table.
pub async fn folders(config: &Config, username: &str) {
    let client = DiscogsClient::new(config);

    match client.list_collection_folders(username).await {
        Ok(folders) if folders.is_empty() => warning!("{} has no collection folders", username),
        Ok(folders) => {
            let table = Table::new(utils::folder_table_rows(&folders));
            println!("{}", table);
        }
        Err(e) => error!("Error fetching Discogs collections: {}", e),
    }
}
