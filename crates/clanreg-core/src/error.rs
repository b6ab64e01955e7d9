//! Error taxonomy shared by every clan registry crate.
//!
//! Backends keep their own error types and convert into this one with
//! `From`, so callers can match on the variants below regardless of which
//! store or collaborator produced them.

use std::path::PathBuf;

use thiserror::Error;

use crate::clan::ClanId;

#[derive(Debug, Error)]
pub enum Error {
  /// Input did not match any member of the country catalog.
  #[error("invalid country: {0:?}")]
  InvalidCountry(String),

  /// Clan ids are positive and must fit the store's integer column.
  #[error("invalid clan id: {0}")]
  InvalidId(ClanId),

  #[error("clan {0} already exists")]
  DuplicateId(ClanId),

  #[error("clan tag {0:?} is already taken")]
  DuplicateTag(String),

  #[error("clan not found: {0}")]
  NotFound(ClanId),

  #[error("clan {0} not found in the upstream directory")]
  NotFoundUpstream(ClanId),

  #[error("upstream directory unavailable: {0}")]
  UpstreamUnavailable(String),

  #[error("no language list found on the profile page of clan {0}")]
  LanguagesUnavailable(ClanId),

  #[error("no clans found in the store")]
  NoRecords,

  #[error("seed file not found: {}", .0.display())]
  SeedFileMissing(PathBuf),

  #[error("malformed dump: {0}")]
  MalformedDump(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("serialization error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
