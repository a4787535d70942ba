//! Selection of a Spotify search result for a Discogs release or track.
//!
//! Spotify's search ranking decides most matches. [`MatchPolicy::First`] takes
//! whatever comes first, which is fast and forgiving but happily returns a live
//! album or a namesake artist. [`MatchPolicy::Exact`] only accepts a result
//! whose title and artist equal the wanted ones.

use std::fmt;

use clap::ValueEnum;

use crate::{
    types::{Album, SpotifyArtist, Track, TrackCandidate},
    utils,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MatchPolicy {
    /// Take the first search result unconditionally
    #[default]
    First,
    /// Take the first result whose title and artist equal the wanted ones
    Exact,
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::First => write!(f, "first"),
            MatchPolicy::Exact => write!(f, "exact"),
        }
    }
}

/// A search result that can be compared against a [`TrackCandidate`].
pub trait Candidate {
    fn title(&self) -> &str;
    fn artists(&self) -> &[SpotifyArtist];
}

impl Candidate for Album {
    fn title(&self) -> &str {
        &self.name
    }

    fn artists(&self) -> &[SpotifyArtist] {
        &self.artists
    }
}

impl Candidate for Track {
    fn title(&self) -> &str {
        &self.name
    }

    fn artists(&self) -> &[SpotifyArtist] {
        &self.artists
    }
}

impl MatchPolicy {
    /// Picks the result to use from `candidates`, in search order.
    pub fn pick<T: Candidate>(&self, wanted: &TrackCandidate, candidates: Vec<T>) -> Option<T> {
        match self {
            MatchPolicy::First => candidates.into_iter().next(),
            MatchPolicy::Exact => candidates
                .into_iter()
                .find(|c| Self::is_exact(wanted, c)),
        }
    }

    fn is_exact<T: Candidate>(wanted: &TrackCandidate, candidate: &T) -> bool {
        utils::names_equal(candidate.title(), &wanted.title)
            && candidate
                .artists()
                .iter()
                .any(|a| utils::names_equal(&a.name, &wanted.artist))
    }
}
