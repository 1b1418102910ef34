//! MusicBrainz API integration
//!
//! Secondary metadata backend: release and release-group lookups, release
//! search summaries and series.
//!
//! API docs: https://musicbrainz.org/doc/MusicBrainz_API

pub mod dto;
mod adapter;
mod client;

pub use client::{DEFAULT_BASE_URL, MusicBrainzClient};
