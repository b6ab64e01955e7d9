//! Building a seed file from raw directory dumps.
//!
//! The full dump is an id-keyed object, `{"<id>": {"clan_tag", "clan_name"}}`.
//! The validated dump names the subset of those ids confirmed as French clans,
//! either as an array of ids or as an object keyed the same way as the full
//! dump. Entry order of the full dump is preserved in the output.

use std::{
  collections::HashMap,
  path::{Path, PathBuf},
};

use clanreg_core::{Error, Result, clan::ClanId, country::Country};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{SeedEntry, ensure_parent};

/// Tag and name of one clan in the full dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDumpEntry {
  pub clan_tag:  String,
  pub clan_name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
  Number(u64),
  Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValidatedDump {
  Ids(Vec<RawId>),
  Keyed(Map<String, Value>),
}

/// Result of merging the two dumps.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedMerge {
  pub entries:   Vec<SeedEntry>,
  /// Validated ids that do not appear in the full dump.
  pub unmatched: Vec<String>,
}

/// Outcome of [`build_seed_from_raw_dumps`].
#[derive(Debug)]
pub struct SeedBuild {
  pub path:      PathBuf,
  pub entries:   usize,
  pub unmatched: Vec<String>,
}

pub fn parse_full_dump(bytes: &[u8]) -> Result<Vec<(ClanId, RawDumpEntry)>> {
  let map: Map<String, Value> = serde_json::from_slice(bytes)
    .map_err(|e| Error::MalformedDump(format!("full dump: {e}")))?;

  map
    .into_iter()
    .map(|(key, value)| {
      let id = key
        .trim()
        .parse::<ClanId>()
        .map_err(|_| Error::MalformedDump(format!("full dump key {key:?} is not a clan id")))?;
      let entry = serde_json::from_value(value)
        .map_err(|e| Error::MalformedDump(format!("full dump entry {key}: {e}")))?;
      Ok((id, entry))
    })
    .collect()
}

pub fn parse_validated_dump(bytes: &[u8]) -> Result<Vec<String>> {
  let dump: ValidatedDump = serde_json::from_slice(bytes).map_err(|_| {
    Error::MalformedDump("validated dump must be an array of ids or an id-keyed object".into())
  })?;

  Ok(match dump {
    ValidatedDump::Ids(ids) => ids
      .into_iter()
      .map(|id| match id {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
      })
      .collect(),
    ValidatedDump::Keyed(map) => map.into_iter().map(|(k, _)| k).collect(),
  })
}

/// Turn every full-dump entry into an `Unknown` seed entry, then mark the
/// validated ids as `France`.
pub fn merge_raw_dumps(full: Vec<(ClanId, RawDumpEntry)>, validated: &[String]) -> SeedMerge {
  let mut entries: Vec<SeedEntry> = full
    .into_iter()
    .map(|(id, raw)| SeedEntry {
      clan_id:   id,
      clan_tag:  raw.clan_tag,
      clan_name: raw.clan_name,
      country:   Some(Country::Unknown.as_str().to_owned()),
    })
    .collect();

  let index: HashMap<ClanId, usize> =
    entries.iter().enumerate().map(|(i, e)| (e.clan_id, i)).collect();

  let mut unmatched = Vec::new();
  for raw in validated {
    let slot = raw.trim().parse::<ClanId>().ok().and_then(|id| index.get(&id));
    match slot {
      Some(&i) => entries[i].country = Some(Country::France.as_str().to_owned()),
      None => {
        tracing::warn!(id = %raw, "validated clan id not present in full dump");
        unmatched.push(raw.clone());
      }
    }
  }

  SeedMerge { entries, unmatched }
}

/// Merge the dumps at `full_dump` and `validated_dump` and write the result
/// as a pretty-printed seed file at `output`, replacing any existing file.
pub async fn build_seed_from_raw_dumps(
  full_dump: impl AsRef<Path>,
  validated_dump: impl AsRef<Path>,
  output: impl AsRef<Path>,
) -> Result<SeedBuild> {
  let output = output.as_ref();

  let full = parse_full_dump(&tokio::fs::read(full_dump.as_ref()).await?)?;
  let validated = parse_validated_dump(&tokio::fs::read(validated_dump.as_ref()).await?)?;
  let SeedMerge { entries, unmatched } = merge_raw_dumps(full, &validated);

  ensure_parent(output).await?;
  tokio::fs::write(output, serde_json::to_vec_pretty(&entries)?).await?;

  tracing::info!(
    entries = entries.len(),
    unmatched = unmatched.len(),
    path = %output.display(),
    "built seed file from raw dumps"
  );
  Ok(SeedBuild { path: output.to_path_buf(), entries: entries.len(), unmatched })
}
