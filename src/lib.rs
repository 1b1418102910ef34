//! Catalog Sync - music catalog acquisition for a local library.
//!
//! Looks up artists and releases on Discogs (with MusicBrainz as a secondary
//! backend), reconciles master/version hierarchies into release groups and
//! synchronizes them into the SQLite store a library manager reads.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod naming;
#[cfg(test)]
pub mod test_utils;
