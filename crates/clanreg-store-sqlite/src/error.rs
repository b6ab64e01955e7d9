//! Error type for `clanreg-store-sqlite`.

use clanreg_core::clan::ClanId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] clanreg_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("clan {0} already exists")]
  DuplicateId(ClanId),

  #[error("clan tag {0:?} is already taken")]
  DuplicateTag(String),

  #[error("clan not found: {0}")]
  NotFound(ClanId),

  /// SQLite stores signed 64-bit integers.
  #[error("clan id {0} does not fit in an SQLite integer")]
  IdOutOfRange(ClanId),

  /// A row that cannot be decoded back into a clan record.
  #[error("corrupt row: {0}")]
  CorruptRow(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for clanreg_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      Error::DuplicateId(id) => Self::DuplicateId(id),
      Error::DuplicateTag(tag) => Self::DuplicateTag(tag),
      Error::NotFound(id) => Self::NotFound(id),
      Error::IdOutOfRange(id) => Self::InvalidId(id),
      other => Self::Storage(Box::new(other)),
    }
  }
}
