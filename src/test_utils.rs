//! Test utilities and fixtures.
//!
//! Common helpers for tests that touch the local store.
//!
//! # Example
//!
//! ```ignore
//! use catalog_sync::test_utils::temp_db;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (pool, _dir) = temp_db().await;
//!     // ... test logic
//! }
//! ```

use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;

use crate::db::{HaveFile, ReleaseRow, TrackRow};
use crate::naming;

/// Creates a temporary database for testing.
///
/// The database is created in a temporary directory that is automatically
/// cleaned up when the returned `TempDir` is dropped. Migrations are run
/// automatically.
///
/// Keep the TempDir alive for the duration of your test.
pub async fn temp_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.display());

    let pool = crate::db::init_db(&db_url)
        .await
        .expect("Failed to initialize test database");

    (pool, dir)
}

/// A scanned local file whose clean name is derived from its tags.
pub fn mock_have_file(location: &str, artist: &str, album: &str, track: &str) -> HaveFile {
    HaveFile {
        location: location.to_string(),
        artist_name: artist.to_string(),
        album_title: album.to_string(),
        track_title: track.to_string(),
        track_number: Some(1),
        bit_rate: Some(320),
        format: Some("FLAC".to_string()),
        clean_name: naming::track_clean_name(artist, album, track),
    }
}

/// An `allalbums` row with sensible defaults.
pub fn mock_release_row(release_id: &str, album_id: &str) -> ReleaseRow {
    ReleaseRow {
        release_id: release_id.to_string(),
        artist_id: "artist-1".to_string(),
        artist_name: "Test Artist".to_string(),
        album_title: "Test Album".to_string(),
        album_id: album_id.to_string(),
        album_asin: None,
        release_date: Some("1969".to_string()),
        release_type: "Album".to_string(),
        release_country: "UK".to_string(),
        release_format: "(LP, Album)".to_string(),
    }
}

/// An `alltracks` row with sensible defaults.
pub fn mock_track_row(track_id: &str, release_id: &str, number: i64) -> TrackRow {
    TrackRow {
        track_id: track_id.to_string(),
        release_id: release_id.to_string(),
        artist_id: "artist-1".to_string(),
        artist_name: "Test Artist".to_string(),
        album_title: "Test Album".to_string(),
        album_id: "rg-1".to_string(),
        track_title: format!("Track {}", number),
        track_duration: Some(180),
        track_number: number,
        clean_name: format!("test artist test album track {}", number),
        location: None,
        bit_rate: None,
        format: None,
    }
}
