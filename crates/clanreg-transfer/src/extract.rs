//! Growing the full dump from a list of clan tags.
//!
//! Tags are resolved through [`ClanSearch`] and only exact matches are kept.
//! Each run writes two stamped files: `<stamp>_french_clan_list.json`, the
//! newest full dump plus the resolved clans, and `<stamp>_removed_clan.json`,
//! every tag that has ever failed to resolve. Tags already in the dump or in
//! an earlier removed file are not searched again.

use std::{
  collections::{BTreeSet, HashMap, HashSet},
  io,
  path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use clanreg_core::{Error, Result, clan::ClanId, directory::ClanSearch};
use serde_json::Map;

use crate::dump::{RawDumpEntry, parse_full_dump};

const STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const DUMP_SUFFIX: &str = "_french_clan_list.json";
const REMOVED_SUFFIX: &str = "_removed_clan.json";

/// Where [`extract_new_clans`] reads and writes.
#[derive(Debug, Clone)]
pub struct ExtractPaths {
  /// Whitespace-separated clan tags.
  pub tags:        PathBuf,
  /// Stamped full dumps are read from and written to this directory.
  pub raw_dir:     PathBuf,
  pub removed_dir: PathBuf,
  /// Starting dump when `raw_dir` holds no stamped one yet. Skipped if absent.
  pub base_dump:   PathBuf,
}

/// Outcome of [`extract_new_clans`].
#[derive(Debug)]
pub struct ExtractReport {
  pub full_dump:    PathBuf,
  pub removed_dump: PathBuf,
  /// Ids resolved in this run, in tag order.
  pub added:        Vec<ClanId>,
  /// Clans in the written full dump.
  pub total:        usize,
  /// Tags that did not resolve in this run.
  pub rejected:     Vec<String>,
}

/// Split on whitespace, dedupe and sort.
pub fn parse_tag_list(text: &str) -> Vec<String> {
  text
    .split_whitespace()
    .map(str::to_owned)
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
}

/// Drop tags already present in the dump or rejected by an earlier run.
pub fn new_candidates(
  tags: Vec<String>,
  known: &HashSet<&str>,
  removed: &BTreeSet<String>,
) -> Vec<String> {
  tags
    .into_iter()
    .filter(|t| !known.contains(t.as_str()) && !removed.contains(t))
    .collect()
}

/// The newest `<stamp>_french_clan_list.json` among `paths`, going by the
/// stamp in the file name. Names without a stamp are ignored.
pub fn latest_stamped_dump(paths: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
  paths
    .into_iter()
    .filter_map(|path| {
      let stamp = path.file_name()?.to_str()?.strip_suffix(DUMP_SUFFIX)?;
      let at = NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok()?;
      Some((at, path))
    })
    .max_by_key(|(at, _)| *at)
    .map(|(_, path)| path)
}

/// Files in `dir` whose names end with `suffix`, sorted. A missing directory
/// has none.
async fn files_ending_with(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
  let mut entries = match tokio::fs::read_dir(dir).await {
    Ok(entries) => entries,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
    Err(e) => return Err(e.into()),
  };

  let mut found = Vec::new();
  while let Some(entry) = entries.next_entry().await? {
    let path = entry.path();
    if path
      .file_name()
      .and_then(|n| n.to_str())
      .is_some_and(|n| n.ends_with(suffix))
    {
      found.push(path);
    }
  }
  found.sort();
  Ok(found)
}

async fn load_removed(dir: &Path) -> Result<BTreeSet<String>> {
  let mut removed = BTreeSet::new();
  for path in files_ending_with(dir, REMOVED_SUFFIX).await? {
    let tags: Vec<String> = serde_json::from_slice(&tokio::fs::read(&path).await?)
      .map_err(|e| Error::MalformedDump(format!("{}: {e}", path.display())))?;
    removed.extend(tags);
  }
  Ok(removed)
}

async fn load_base_dump(paths: &ExtractPaths) -> Result<Vec<(ClanId, RawDumpEntry)>> {
  let source = latest_stamped_dump(files_ending_with(&paths.raw_dir, DUMP_SUFFIX).await?)
    .unwrap_or_else(|| paths.base_dump.clone());

  match tokio::fs::read(&source).await {
    Ok(bytes) => {
      tracing::info!(path = %source.display(), "extending full dump");
      parse_full_dump(&bytes)
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      tracing::warn!(path = %source.display(), "no full dump yet; starting empty");
      Ok(Vec::new())
    }
    Err(e) => Err(e.into()),
  }
}

/// Resolve the new tags listed at `paths.tags` and write the stamped dump
/// pair, stamped with the current local time.
pub async fn extract_new_clans<C: ClanSearch>(
  search: &C,
  paths: &ExtractPaths,
) -> Result<ExtractReport> {
  extract_new_clans_at(search, paths, chrono::Local::now().naive_local()).await
}

/// [`extract_new_clans`] with an explicit stamp.
///
/// A search failure aborts the run before anything is written.
pub async fn extract_new_clans_at<C: ClanSearch>(
  search: &C,
  paths: &ExtractPaths,
  at: NaiveDateTime,
) -> Result<ExtractReport> {
  let tags = parse_tag_list(&tokio::fs::read_to_string(&paths.tags).await?);
  let mut dump = load_base_dump(paths).await?;
  let mut removed = load_removed(&paths.removed_dir).await?;

  let candidates = {
    let known: HashSet<&str> = dump.iter().map(|(_, e)| e.clan_tag.as_str()).collect();
    new_candidates(tags, &known, &removed)
  };
  tracing::info!(
    candidates = candidates.len(),
    known = dump.len(),
    removed = removed.len(),
    "searching new clan tags"
  );

  let mut index: HashMap<ClanId, usize> =
    dump.iter().enumerate().map(|(i, (id, _))| (*id, i)).collect();
  let mut added = Vec::new();
  let mut rejected = Vec::new();

  for tag in candidates {
    match search.search_tag(&tag).await? {
      Some(hit) if hit.tag == tag => {
        let entry = RawDumpEntry { clan_tag: hit.tag, clan_name: hit.name };
        match index.get(&hit.id) {
          Some(&i) => dump[i].1 = entry,
          None => {
            index.insert(hit.id, dump.len());
            dump.push((hit.id, entry));
          }
        }
        added.push(hit.id);
      }
      _ => {
        tracing::debug!(%tag, "tag did not resolve");
        rejected.push(tag);
      }
    }
  }

  let stamp = at.format(STAMP_FORMAT);

  let mut body = Map::new();
  for (id, entry) in &dump {
    body.insert(id.to_string(), serde_json::to_value(entry)?);
  }
  tokio::fs::create_dir_all(&paths.raw_dir).await?;
  let full_dump = paths.raw_dir.join(format!("{stamp}{DUMP_SUFFIX}"));
  tokio::fs::write(&full_dump, serde_json::to_vec_pretty(&body)?).await?;

  removed.extend(rejected.iter().cloned());
  tokio::fs::create_dir_all(&paths.removed_dir).await?;
  let removed_dump = paths.removed_dir.join(format!("{stamp}{REMOVED_SUFFIX}"));
  tokio::fs::write(&removed_dump, serde_json::to_vec_pretty(&removed)?).await?;

  tracing::info!(
    added = added.len(),
    rejected = rejected.len(),
    total = dump.len(),
    path = %full_dump.display(),
    "wrote extended full dump"
  );
  Ok(ExtractReport { full_dump, removed_dump, added, total: dump.len(), rejected })
}
