//! Local relational store for synchronized catalog data.
//!
//! Uses SQLx with SQLite. The schema mirrors the tables the downstream
//! library manager reads:
//! - `allalbums` / `alltracks`: every release version ever synced
//! - `albums` / `tracks`: curated subset (only deleted from here)
//! - `have`: locally owned audio files, linked to release groups via `Matched`
//!
//! Row-level operations take a `&mut SqliteConnection` so they run the same
//! inside or outside a transaction.
//!
//! # Example
//!
//! ```ignore
//! use catalog_sync::db::{init_db, release_exists};
//!
//! let pool = init_db("sqlite:catalog.db").await?;
//! let mut conn = pool.acquire().await?;
//! let known = release_exists(&mut conn, "2383283").await?;
//! ```

use sqlx::SqliteConnection;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "catalog_sync.db";

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(path: Option<&std::path::Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{}", DEFAULT_DB_NAME),
    }
}

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist, establishes a connection
/// pool with up to 5 connections, and runs all pending migrations.
pub async fn init_db(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// A row of `allalbums`: one release version of a release group.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ReleaseRow {
    #[sqlx(rename = "ReleaseID")]
    pub release_id: String,
    #[sqlx(rename = "ArtistID")]
    pub artist_id: String,
    #[sqlx(rename = "ArtistName")]
    pub artist_name: String,
    #[sqlx(rename = "AlbumTitle")]
    pub album_title: String,
    /// Release group id
    #[sqlx(rename = "AlbumID")]
    pub album_id: String,
    #[sqlx(rename = "AlbumASIN")]
    pub album_asin: Option<String>,
    #[sqlx(rename = "ReleaseDate")]
    pub release_date: Option<String>,
    #[sqlx(rename = "Type")]
    pub release_type: String,
    #[sqlx(rename = "ReleaseCountry")]
    pub release_country: String,
    #[sqlx(rename = "ReleaseFormat")]
    pub release_format: String,
}

/// A row of `alltracks`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TrackRow {
    #[sqlx(rename = "TrackID")]
    pub track_id: String,
    #[sqlx(rename = "ReleaseID")]
    pub release_id: String,
    #[sqlx(rename = "ArtistID")]
    pub artist_id: String,
    #[sqlx(rename = "ArtistName")]
    pub artist_name: String,
    #[sqlx(rename = "AlbumTitle")]
    pub album_title: String,
    #[sqlx(rename = "AlbumID")]
    pub album_id: String,
    #[sqlx(rename = "TrackTitle")]
    pub track_title: String,
    #[sqlx(rename = "TrackDuration")]
    pub track_duration: Option<i64>,
    #[sqlx(rename = "TrackNumber")]
    pub track_number: i64,
    #[sqlx(rename = "CleanName")]
    pub clean_name: String,
    #[sqlx(rename = "Location")]
    pub location: Option<String>,
    #[sqlx(rename = "BitRate")]
    pub bit_rate: Option<i64>,
    #[sqlx(rename = "Format")]
    pub format: Option<String>,
}

/// A locally owned file matched to a catalog track.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct HaveMatch {
    #[sqlx(rename = "Location")]
    pub location: String,
    #[sqlx(rename = "BitRate")]
    pub bit_rate: Option<i64>,
    #[sqlx(rename = "Format")]
    pub format: Option<String>,
}

/// A scanned local file, as written by the library scanner.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HaveFile {
    pub location: String,
    pub artist_name: String,
    pub album_title: String,
    pub track_title: String,
    pub track_number: Option<i64>,
    pub bit_rate: Option<i64>,
    pub format: Option<String>,
    pub clean_name: String,
}

/// Release ids stored for a release group.
pub async fn release_ids_for_album(
    conn: &mut SqliteConnection,
    album_id: &str,
) -> sqlx::Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT ReleaseID FROM allalbums WHERE AlbumID = ?")
        .bind(album_id)
        .fetch_all(conn)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Whether `allalbums` already has a row for this release.
pub async fn release_exists(conn: &mut SqliteConnection, release_id: &str) -> sqlx::Result<bool> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM allalbums WHERE ReleaseID = ?")
        .bind(release_id)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}

/// Get the `allalbums` row of a release.
pub async fn get_release(
    conn: &mut SqliteConnection,
    release_id: &str,
) -> sqlx::Result<Option<ReleaseRow>> {
    sqlx::query_as::<_, ReleaseRow>(
        r#"
        SELECT ReleaseID, ArtistID, ArtistName, AlbumTitle, AlbumID, AlbumASIN,
               ReleaseDate, Type, ReleaseCountry, ReleaseFormat
        FROM allalbums WHERE ReleaseID = ?
        "#,
    )
    .bind(release_id)
    .fetch_optional(conn)
    .await
}

/// Get the `alltracks` rows of a release, in track order.
pub async fn get_release_tracks(
    conn: &mut SqliteConnection,
    release_id: &str,
) -> sqlx::Result<Vec<TrackRow>> {
    sqlx::query_as::<_, TrackRow>(
        r#"
        SELECT TrackID, ReleaseID, ArtistID, ArtistName, AlbumTitle, AlbumID,
               TrackTitle, TrackDuration, TrackNumber, CleanName, Location, BitRate, Format
        FROM alltracks WHERE ReleaseID = ?
        ORDER BY TrackNumber
        "#,
    )
    .bind(release_id)
    .fetch_all(conn)
    .await
}

/// Remove every reference to a release from all four release tables.
pub async fn delete_release_everywhere(
    conn: &mut SqliteConnection,
    release_id: &str,
) -> sqlx::Result<()> {
    for table in ["albums", "tracks", "allalbums", "alltracks"] {
        sqlx::query(&format!("DELETE FROM {} WHERE ReleaseID = ?", table))
            .bind(release_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Remove a release's `allalbums`/`alltracks` rows before rewriting them.
pub async fn delete_release_rows(
    conn: &mut SqliteConnection,
    release_id: &str,
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM allalbums WHERE ReleaseID = ?")
        .bind(release_id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM alltracks WHERE ReleaseID = ?")
        .bind(release_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Insert or update an `allalbums` row keyed by ReleaseID.
pub async fn upsert_release(conn: &mut SqliteConnection, row: &ReleaseRow) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO allalbums (ReleaseID, ArtistID, ArtistName, AlbumTitle, AlbumID, AlbumASIN,
                               ReleaseDate, Type, ReleaseCountry, ReleaseFormat)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(ReleaseID) DO UPDATE SET
            ArtistID = excluded.ArtistID,
            ArtistName = excluded.ArtistName,
            AlbumTitle = excluded.AlbumTitle,
            AlbumID = excluded.AlbumID,
            AlbumASIN = excluded.AlbumASIN,
            ReleaseDate = excluded.ReleaseDate,
            Type = excluded.Type,
            ReleaseCountry = excluded.ReleaseCountry,
            ReleaseFormat = excluded.ReleaseFormat
        "#,
    )
    .bind(&row.release_id)
    .bind(&row.artist_id)
    .bind(&row.artist_name)
    .bind(&row.album_title)
    .bind(&row.album_id)
    .bind(&row.album_asin)
    .bind(&row.release_date)
    .bind(&row.release_type)
    .bind(&row.release_country)
    .bind(&row.release_format)
    .execute(conn)
    .await?;
    Ok(())
}

/// Insert or update an `alltracks` row keyed by (TrackID, ReleaseID).
pub async fn upsert_release_track(conn: &mut SqliteConnection, row: &TrackRow) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO alltracks (TrackID, ReleaseID, ArtistID, ArtistName, AlbumTitle, AlbumID,
                               TrackTitle, TrackDuration, TrackNumber, CleanName,
                               Location, BitRate, Format)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(TrackID, ReleaseID) DO UPDATE SET
            ArtistID = excluded.ArtistID,
            ArtistName = excluded.ArtistName,
            AlbumTitle = excluded.AlbumTitle,
            AlbumID = excluded.AlbumID,
            TrackTitle = excluded.TrackTitle,
            TrackDuration = excluded.TrackDuration,
            TrackNumber = excluded.TrackNumber,
            CleanName = excluded.CleanName,
            Location = excluded.Location,
            BitRate = excluded.BitRate,
            Format = excluded.Format
        "#,
    )
    .bind(&row.track_id)
    .bind(&row.release_id)
    .bind(&row.artist_id)
    .bind(&row.artist_name)
    .bind(&row.album_title)
    .bind(&row.album_id)
    .bind(&row.track_title)
    .bind(row.track_duration)
    .bind(row.track_number)
    .bind(&row.clean_name)
    .bind(&row.location)
    .bind(row.bit_rate)
    .bind(&row.format)
    .execute(conn)
    .await?;
    Ok(())
}

/// Find a local file for a track.
///
/// Tries an exact clean-name match first, then a case-insensitive LIKE on
/// the raw artist, album and track names.
pub async fn find_have_match(
    conn: &mut SqliteConnection,
    clean_name: &str,
    artist_name: &str,
    album_title: &str,
    track_title: &str,
) -> sqlx::Result<Option<HaveMatch>> {
    let exact = sqlx::query_as::<_, HaveMatch>(
        "SELECT Location, BitRate, Format FROM have WHERE CleanName = ? LIMIT 1",
    )
    .bind(clean_name)
    .fetch_optional(&mut *conn)
    .await?;

    if exact.is_some() {
        return Ok(exact);
    }

    sqlx::query_as::<_, HaveMatch>(
        r#"
        SELECT Location, BitRate, Format FROM have
        WHERE ArtistName LIKE ? AND AlbumTitle LIKE ? AND TrackTitle LIKE ?
        LIMIT 1
        "#,
    )
    .bind(artist_name)
    .bind(album_title)
    .bind(track_title)
    .fetch_optional(&mut *conn)
    .await
}

/// Link a local file to the release group it belongs to.
pub async fn mark_have_matched(
    conn: &mut SqliteConnection,
    location: &str,
    album_id: &str,
) -> sqlx::Result<()> {
    sqlx::query("UPDATE have SET Matched = ? WHERE Location = ?")
        .bind(album_id)
        .bind(location)
        .execute(conn)
        .await?;
    Ok(())
}

/// A random album title of a locally owned file by this artist.
pub async fn random_album_title(
    conn: &mut SqliteConnection,
    artist_name: &str,
) -> sqlx::Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT AlbumTitle FROM have
        WHERE ArtistName = ? AND AlbumTitle IS NOT NULL AND AlbumTitle != ''
        ORDER BY RANDOM() LIMIT 1
        "#,
    )
    .bind(artist_name)
    .fetch_optional(conn)
    .await?;
    Ok(row.map(|(title,)| title))
}

/// Record a scanned local file in `have`.
pub async fn insert_have(conn: &mut SqliteConnection, file: &HaveFile) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO have (Location, ArtistName, AlbumTitle, TrackTitle, TrackNumber,
                          BitRate, Format, CleanName)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(Location) DO UPDATE SET
            ArtistName = excluded.ArtistName,
            AlbumTitle = excluded.AlbumTitle,
            TrackTitle = excluded.TrackTitle,
            TrackNumber = excluded.TrackNumber,
            BitRate = excluded.BitRate,
            Format = excluded.Format,
            CleanName = excluded.CleanName
        "#,
    )
    .bind(&file.location)
    .bind(&file.artist_name)
    .bind(&file.album_title)
    .bind(&file.track_title)
    .bind(file.track_number)
    .bind(file.bit_rate)
    .bind(&file.format)
    .bind(&file.clean_name)
    .execute(conn)
    .await?;
    Ok(())
}

/// Release group a local file was matched to, if any.
pub async fn have_matched(
    conn: &mut SqliteConnection,
    location: &str,
) -> sqlx::Result<Option<String>> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT Matched FROM have WHERE Location = ?")
            .bind(location)
            .fetch_optional(conn)
            .await?;
    Ok(row.and_then(|(matched,)| matched))
}

/// Count rows referencing a release in one of the release tables.
pub async fn count_release_rows(
    conn: &mut SqliteConnection,
    table: &str,
    release_id: &str,
) -> sqlx::Result<i64> {
    let table = match table {
        "albums" | "tracks" | "allalbums" | "alltracks" => table,
        _ => return Err(sqlx::Error::Protocol(format!("unknown table {}", table))),
    };
    let (count,): (i64,) =
        sqlx::query_as(&format!("SELECT COUNT(*) FROM {} WHERE ReleaseID = ?", table))
            .bind(release_id)
            .fetch_one(conn)
            .await?;
    Ok(count)
}
