//! Catalog acquisition: lookups against Discogs and MusicBrainz, release-group
//! reconciliation and synchronization into the local store.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                     CatalogService                        │
//! │  search · reconcile · sync · metadata                     │
//! └───────────────┬───────────────────────────────┬───────────┘
//!                 │ every remote call             │ rows
//!         ┌───────▼────────┐                ┌─────▼─────┐
//!         │  RateGateway   │                │  db (sqlx)│
//!         └───┬────────┬───┘                └───────────┘
//!   ┌─────────▼──┐  ┌──▼──────────────┐
//!   │ CatalogApi │  │ MusicBrainzClient│
//!   │ (Discogs)  │  └─────────────────┘
//!   └────────────┘
//! ```
//!
//! Each client has `dto.rs` (API shapes), `adapter.rs` (DTO to domain) and
//! `client.rs` (HTTP). Everything above the clients works on [`domain`]
//! types only.

pub mod discogs;
pub mod domain;
pub mod gateway;
pub mod metadata;
pub mod musicbrainz;
pub mod normalize;
pub mod reconcile;
pub mod search;
pub mod service;
pub mod sync;
pub mod traits;

pub use domain::{
    ArtistDiscography, ArtistMatch, ArtistRecord, CatalogError, Lookup, MetadataRelease,
    ReleaseGroup, ReleaseSummary, ReleaseType,
};
pub use gateway::RateGateway;
pub use reconcile::HybridRelease;
pub use service::{CatalogConfig, CatalogService};
pub use sync::SyncOutcome;
pub use traits::CatalogApi;
