//! Bulk import and export for the clan registry.
//!
//! - [`export`]: flat CSV and plain-text listings of the whole store.
//! - [`seed`]: dated JSON snapshots, and seeding an empty store from one.
//! - [`dump`]: building a seed file from raw directory dumps.
//! - [`extract`]: growing the full dump from a list of clan tags.
//!
//! Store access goes through [`clanreg_core::registry::Registry`], so imports
//! get the same validation and uniqueness checks as API inserts.

pub mod dump;
pub mod export;
pub mod extract;
pub mod seed;

pub use dump::{SeedBuild, build_seed_from_raw_dumps};
pub use export::{export_delimited, export_plain_text};
pub use extract::{ExtractPaths, ExtractReport, extract_new_clans};
pub use seed::{SeedEntry, SeedSnapshot, export_seed_snapshot, import_seed_snapshot};

use std::path::Path;

/// Create the parent directory of `path` if it has one.
async fn ensure_parent(path: &Path) -> std::io::Result<()> {
  match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent).await,
    _ => Ok(()),
  }
}

#[cfg(test)]
mod tests;
