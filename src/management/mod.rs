mod auth;
mod unmatched;

pub use auth::TokenManager;
pub use unmatched::DEFAULT_UNMATCHED_FILE;
pub use unmatched::UnmatchedLog;
