//! Seed snapshots: dated JSON copies of the store, and loading one back.

use std::{
  io,
  path::{Path, PathBuf},
};

use chrono::NaiveDate;
use clanreg_core::{
  Error, Result,
  clan::{ClanId, ClanRecord, NewClan},
  registry::Registry,
  store::ClanStore,
};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt as _;

/// One element of a seed file.
///
/// `country` is kept as free text so that files written by older tools, which
/// used upper-snake spellings, still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedEntry {
  pub clan_id:   ClanId,
  pub clan_tag:  String,
  pub clan_name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub country:   Option<String>,
}

impl From<ClanRecord> for SeedEntry {
  fn from(c: ClanRecord) -> Self {
    Self {
      clan_id:   c.id,
      clan_tag:  c.tag,
      clan_name: c.name,
      country:   Some(c.country.as_str().to_owned()),
    }
  }
}

impl From<SeedEntry> for NewClan {
  fn from(e: SeedEntry) -> Self {
    Self { id: e.clan_id, tag: e.clan_tag, name: e.clan_name, country: e.country }
  }
}

/// A written snapshot and the number of clans in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSnapshot {
  pub path:  PathBuf,
  pub count: usize,
}

fn snapshot_name(date: NaiveDate, attempt: u32) -> String {
  let stamp = date.format("%Y%m%d");
  match attempt {
    0 => format!("clan_seed_{stamp}.json"),
    n => format!("clan_seed_{stamp}_{n}.json"),
  }
}

/// Write every clan to `seed_dir/clan_seed_<YYYYMMDD>.json`, dated today in
/// local time.
///
/// Returns `Ok(None)` and writes nothing when the store is empty.
pub async fn export_seed_snapshot<S: ClanStore>(
  registry: &Registry<S>,
  seed_dir: impl AsRef<Path>,
) -> Result<Option<SeedSnapshot>> {
  export_seed_snapshot_on(registry, seed_dir, chrono::Local::now().date_naive()).await
}

/// [`export_seed_snapshot`] with an explicit capture date.
///
/// Snapshots are never overwritten: a second export on the same date goes to
/// `clan_seed_<YYYYMMDD>_1.json`, then `_2`, and so on.
pub async fn export_seed_snapshot_on<S: ClanStore>(
  registry: &Registry<S>,
  seed_dir: impl AsRef<Path>,
  date: NaiveDate,
) -> Result<Option<SeedSnapshot>> {
  let seed_dir = seed_dir.as_ref();
  let clans = registry.list_all().await?;
  if clans.is_empty() {
    tracing::warn!("no clans in the store; skipping seed snapshot");
    return Ok(None);
  }

  let count = clans.len();
  let entries: Vec<SeedEntry> = clans.into_iter().map(SeedEntry::from).collect();
  let body = serde_json::to_vec_pretty(&entries)?;

  tokio::fs::create_dir_all(seed_dir).await?;

  let mut attempt = 0;
  let (path, mut file) = loop {
    let path = seed_dir.join(snapshot_name(date, attempt));
    match tokio::fs::OpenOptions::new()
      .write(true)
      .create_new(true)
      .open(&path)
      .await
    {
      Ok(file) => break (path, file),
      Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
      Err(e) => return Err(e.into()),
    }
  };
  file.write_all(&body).await?;
  file.flush().await?;

  tracing::info!(count, path = %path.display(), "wrote seed snapshot");
  Ok(Some(SeedSnapshot { path, count }))
}

/// Insert every entry of the seed file at `path` through
/// [`Registry::create`]. Stops at the first failing entry; entries before it
/// stay inserted.
pub async fn import_seed_snapshot<S: ClanStore>(
  registry: &Registry<S>,
  path: impl AsRef<Path>,
) -> Result<usize> {
  let path = path.as_ref();
  let bytes = match tokio::fs::read(path).await {
    Ok(bytes) => bytes,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Err(Error::SeedFileMissing(path.to_path_buf()));
    }
    Err(e) => return Err(e.into()),
  };
  let entries: Vec<SeedEntry> = serde_json::from_slice(&bytes)?;

  let mut inserted = 0;
  for entry in entries {
    registry.create(entry.into()).await?;
    inserted += 1;
  }

  tracing::info!(count = inserted, path = %path.display(), "seeded store from snapshot");
  Ok(inserted)
}
