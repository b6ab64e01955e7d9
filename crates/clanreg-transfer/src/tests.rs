//! Pipeline tests against an in-memory SQLite store and a scratch directory.

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use clanreg_core::{
  Error,
  clan::NewClan,
  country::Country,
  directory::{ClanHit, ClanSearch},
  registry::Registry,
};
use clanreg_store_sqlite::SqliteStore;

use crate::{
  ExtractPaths, SeedEntry, build_seed_from_raw_dumps, dump::parse_full_dump, export_delimited,
  export_plain_text, extract::extract_new_clans_at, import_seed_snapshot,
  seed::export_seed_snapshot_on,
};

async fn registry() -> Registry<SqliteStore> {
  Registry::new(Arc::new(SqliteStore::open_in_memory().await.unwrap()))
}

async fn populated() -> Registry<SqliteStore> {
  let reg = registry().await;
  reg.create(NewClan::new(1, "A", "Alpha").with_country("France")).await.unwrap();
  reg.create(NewClan::new(2, "B", "Bravo")).await.unwrap();
  reg
}

fn date() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 5, 1).unwrap() }

#[tokio::test]
async fn empty_store_snapshot_writes_nothing() {
  let dir = tempfile::tempdir().unwrap();
  let reg = registry().await;

  let written = export_seed_snapshot_on(&reg, dir.path(), date()).await.unwrap();
  assert!(written.is_none());
  assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn snapshot_round_trips_into_a_fresh_store() {
  let dir = tempfile::tempdir().unwrap();
  let source = populated().await;

  let snapshot = export_seed_snapshot_on(&source, dir.path(), date())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(snapshot.count, 2);
  let path = snapshot.path;
  assert_eq!(path.file_name().unwrap(), "clan_seed_20240501.json");

  let target = registry().await;
  assert_eq!(import_seed_snapshot(&target, &path).await.unwrap(), 2);

  let mut before = source.list_all().await.unwrap();
  let mut after = target.list_all().await.unwrap();
  before.sort_by_key(|c| c.id);
  after.sort_by_key(|c| c.id);
  assert_eq!(before, after);
}

#[tokio::test]
async fn same_day_snapshot_gets_a_suffix() {
  let dir = tempfile::tempdir().unwrap();
  let reg = populated().await;

  let first = export_seed_snapshot_on(&reg, dir.path(), date()).await.unwrap().unwrap().path;
  let second = export_seed_snapshot_on(&reg, dir.path(), date()).await.unwrap().unwrap().path;

  assert_ne!(first, second);
  assert_eq!(second.file_name().unwrap(), "clan_seed_20240501_1.json");
  assert!(first.exists());
}

#[tokio::test]
async fn snapshot_carries_country() {
  let dir = tempfile::tempdir().unwrap();
  let reg = populated().await;

  let path = export_seed_snapshot_on(&reg, dir.path(), date()).await.unwrap().unwrap().path;
  let entries: Vec<SeedEntry> = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
  let alpha = entries.iter().find(|e| e.clan_id == 1).unwrap();
  assert_eq!(alpha.country.as_deref(), Some("France"));
}

#[tokio::test]
async fn import_missing_file_is_seed_file_missing() {
  let dir = tempfile::tempdir().unwrap();
  let reg = registry().await;

  let err = import_seed_snapshot(&reg, dir.path().join("absent.json"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SeedFileMissing(_)));
}

#[tokio::test]
async fn import_into_populated_store_reports_duplicate_id() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("seed.json");
  std::fs::write(
    &path,
    r#"[{"clan_id": 1, "clan_tag": "NEW", "clan_name": "Newcomer", "country": "FRANCE"}]"#,
  )
  .unwrap();

  let reg = populated().await;
  let err = import_seed_snapshot(&reg, &path).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateId(1)));
}

#[tokio::test]
async fn flat_exports_create_parent_directories() {
  let dir = tempfile::tempdir().unwrap();
  let reg = populated().await;
  let csv_path = dir.path().join("export").join("clans.csv");
  let txt_path = dir.path().join("export").join("clans.txt");

  assert_eq!(export_delimited(&reg, &csv_path).await.unwrap(), 2);
  assert_eq!(export_plain_text(&reg, &txt_path).await.unwrap(), 2);

  let csv = std::fs::read_to_string(csv_path).unwrap();
  assert!(csv.starts_with("ID,Clan Tag,Clan Name\n"));
  assert!(csv.contains("1,A,Alpha\n"));

  let txt = std::fs::read_to_string(txt_path).unwrap();
  assert!(txt.contains("ID: 2\nClan Tag: B\nClan Name: Bravo\n\n"));
}

#[tokio::test]
async fn flat_export_overwrites_existing_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("clans.csv");
  std::fs::write(&path, "stale contents that are much longer than the export\n").unwrap();

  let reg = registry().await;
  assert_eq!(export_delimited(&reg, &path).await.unwrap(), 0);
  assert_eq!(std::fs::read_to_string(path).unwrap(), "ID,Clan Tag,Clan Name\n");
}

#[tokio::test]
async fn built_seed_imports_with_french_subset() {
  let dir = tempfile::tempdir().unwrap();
  let full = dir.path().join("full.json");
  let validated = dir.path().join("validated.json");
  let output = dir.path().join("seed").join("seed_data.json");

  std::fs::write(
    &full,
    r#"{"10": {"clan_tag": "X", "clan_name": "Xray"}, "11": {"clan_tag": "Y", "clan_name": "Yankee"}}"#,
  )
  .unwrap();
  std::fs::write(&validated, r#"["10", "99"]"#).unwrap();

  let build = build_seed_from_raw_dumps(&full, &validated, &output).await.unwrap();
  assert_eq!(build.entries, 2);
  assert_eq!(build.unmatched, vec!["99".to_owned()]);

  let reg = registry().await;
  assert_eq!(import_seed_snapshot(&reg, &build.path).await.unwrap(), 2);
  assert_eq!(reg.read(10).await.unwrap().unwrap().country, Country::France);
  assert_eq!(reg.read(11).await.unwrap().unwrap().country, Country::Unknown);
  assert_eq!(reg.list_by_country("france").await.unwrap().len(), 1);
}

// ─── Tag extraction ──────────────────────────────────────────────────────────

/// Resolves `NEW` exactly, answers `near` with a different tag, fails on
/// `DOWN`, and records every tag it is asked about.
#[derive(Default)]
struct FakeSearch {
  searched: Mutex<Vec<String>>,
}

impl ClanSearch for FakeSearch {
  async fn search_tag<'a>(&'a self, tag: &'a str) -> clanreg_core::Result<Option<ClanHit>> {
    self.searched.lock().unwrap().push(tag.to_owned());
    match tag {
      "NEW" => Ok(Some(ClanHit { id: 3, tag: "NEW".into(), name: "Newcomers".into() })),
      "near" => Ok(Some(ClanHit { id: 4, tag: "NEAR".into(), name: "Nearly".into() })),
      "DOWN" => Err(Error::UpstreamUnavailable("connection reset".into())),
      _ => Ok(None),
    }
  }
}

fn stamp() -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(12, 30, 0).unwrap()
}

fn extract_paths(dir: &tempfile::TempDir) -> ExtractPaths {
  ExtractPaths {
    tags:        dir.path().join("src.txt"),
    raw_dir:     dir.path().join("raw"),
    removed_dir: dir.path().join("removed"),
    base_dump:   dir.path().join("raw").join("Full_version_french_clan_list.json"),
  }
}

#[tokio::test]
async fn extract_extends_newest_dump_with_exact_matches_only() {
  let dir = tempfile::tempdir().unwrap();
  let paths = extract_paths(&dir);
  std::fs::create_dir_all(&paths.raw_dir).unwrap();
  std::fs::create_dir_all(&paths.removed_dir).unwrap();
  std::fs::write(
    paths.raw_dir.join("2024-01-01_00-00-00_french_clan_list.json"),
    r#"{"1": {"clan_tag": "A", "clan_name": "Alpha"}}"#,
  )
  .unwrap();
  std::fs::write(
    paths.raw_dir.join("2024-02-01_00-00-00_french_clan_list.json"),
    r#"{"1": {"clan_tag": "A", "clan_name": "Alpha"}, "2": {"clan_tag": "B", "clan_name": "Bravo"}}"#,
  )
  .unwrap();
  std::fs::write(paths.removed_dir.join("2024-01-01_00-00-00_removed_clan.json"), r#"["OLD"]"#)
    .unwrap();
  std::fs::write(&paths.tags, "B  NEW\nOLD NEW near\n B\n").unwrap();

  let search = FakeSearch::default();
  let report = extract_new_clans_at(&search, &paths, stamp()).await.unwrap();

  assert_eq!(*search.searched.lock().unwrap(), vec!["NEW", "near"]);
  assert_eq!(report.added, vec![3]);
  assert_eq!(report.rejected, vec!["near"]);
  assert_eq!(report.total, 3);

  assert_eq!(
    report.full_dump.file_name().unwrap(),
    "2024-06-01_12-30-00_french_clan_list.json"
  );
  let dump = parse_full_dump(&std::fs::read(&report.full_dump).unwrap()).unwrap();
  let ids: Vec<_> = dump.iter().map(|(id, _)| *id).collect();
  assert_eq!(ids, vec![1, 2, 3]);
  assert_eq!(dump[2].1.clan_name, "Newcomers");

  let removed: Vec<String> =
    serde_json::from_slice(&std::fs::read(&report.removed_dump).unwrap()).unwrap();
  assert_eq!(removed, vec!["OLD", "near"]);
}

#[tokio::test]
async fn extract_without_prior_dump_starts_empty() {
  let dir = tempfile::tempdir().unwrap();
  let paths = extract_paths(&dir);
  std::fs::write(&paths.tags, "NEW").unwrap();

  let report = extract_new_clans_at(&FakeSearch::default(), &paths, stamp()).await.unwrap();
  assert_eq!(report.total, 1);
  assert!(report.full_dump.starts_with(&paths.raw_dir));
  assert!(report.removed_dump.starts_with(&paths.removed_dir));
}

#[tokio::test]
async fn extract_search_failure_writes_nothing() {
  let dir = tempfile::tempdir().unwrap();
  let paths = extract_paths(&dir);
  std::fs::write(&paths.tags, "DOWN NEW").unwrap();

  let err = extract_new_clans_at(&FakeSearch::default(), &paths, stamp()).await.unwrap_err();
  assert!(matches!(err, Error::UpstreamUnavailable(_)));
  assert!(!paths.raw_dir.exists());
  assert!(!paths.removed_dir.exists());
}

#[tokio::test]
async fn extracted_dump_feeds_seed_build() {
  let dir = tempfile::tempdir().unwrap();
  let paths = extract_paths(&dir);
  std::fs::write(&paths.tags, "NEW").unwrap();
  let report = extract_new_clans_at(&FakeSearch::default(), &paths, stamp()).await.unwrap();

  let validated = dir.path().join("validated.json");
  std::fs::write(&validated, "[3]").unwrap();
  let seed = dir.path().join("seed.json");
  let build = build_seed_from_raw_dumps(&report.full_dump, &validated, &seed).await.unwrap();
  assert_eq!(build.entries, 1);
  assert!(build.unmatched.is_empty());
}
