//! Discogs API integration
//!
//! Primary catalog: artist and release search, artist discographies with
//! master/version hierarchies, and full release details.
//!
//! API docs: https://www.discogs.com/developers

pub mod dto;
mod adapter;
mod client;

pub use client::{DEFAULT_BASE_URL, DiscogsClient};
