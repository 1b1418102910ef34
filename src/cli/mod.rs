//! Command-line interface for catalog-sync.
//!
//! Search the catalog, inspect discographies and synchronize them into the
//! local store.

mod commands;

pub use commands::{Cli, Commands, run_command};
