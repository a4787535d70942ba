//! # API Module
//!
//! HTTP endpoints of the local server started by `discogs2spotify auth`.
//!
//! - [`callback`] - Receives Spotify's authorization redirect and stores the
//!   code for the waiting authorization flow, after checking `state`.
//! - [`health`] - Reports that the server is up and whether a code is still
//!   awaited.
//!
//! Both handlers share the pending authorization through an
//! `Arc<Mutex<Option<PkceToken>>>` extension. See [`crate::server`] for the
//! router.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
