//! # CLI Module
//!
//! User-facing commands of discogs2spotify. Each command takes the
//! [`Config`](crate::config::Config) built at startup, calls into the clients
//! and the sync pipeline, and turns setup failures into a non-zero exit.
//!
//! - [`auth`] - Authorize with Spotify and cache the token
//! - [`folders`] - Show the collection folders of a Discogs user
//! - [`sync`] - Copy a collection folder into a Spotify playlist
//!
//! ```bash
//! discogs2spotify auth
//! discogs2spotify folders --username alice
//! discogs2spotify sync --username alice --folder 0 --playlist "Vinyl"
//! ```

mod auth;
mod folders;
mod sync;

pub use auth::auth;
pub use folders::folders;
pub use sync::SyncArgs;
pub use sync::sync;
