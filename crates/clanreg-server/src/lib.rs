//! Configuration and router assembly for the `clanreg` binary.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use axum::Router;
use clanreg_api::{AppState, ExportPaths};
use clanreg_transfer::ExtractPaths;
use clanreg_core::{
  directory::{ClanDirectory, LanguageDiscovery},
  store::ClanStore,
};
use clanreg_wargaming::WargamingConfig;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Environment variables with this prefix override file settings, e.g.
/// `CLANREG_PORT=9000`.
pub const ENV_PREFIX: &str = "CLANREG";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `config.toml` and the
/// environment. Every key is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub database_path:       PathBuf,
  pub csv_export_path:     PathBuf,
  pub txt_export_path:     PathBuf,
  pub seed_dir:            PathBuf,
  pub seed_data_path:      PathBuf,
  pub full_dump_path:      PathBuf,
  pub validated_dump_path: PathBuf,
  pub tags_path:           PathBuf,
  pub raw_dir:             PathBuf,
  pub removed_dir:         PathBuf,
  pub wg_api_base:         String,
  pub wg_api_key:          Option<String>,
  pub wg_language:         String,
  pub profile_base:        String,
  pub http_timeout_secs:   u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "0.0.0.0".into(),
      port:                8000,
      database_path:       "data/database/clans.db".into(),
      csv_export_path:     "data/export/clans.csv".into(),
      txt_export_path:     "data/export/clans.txt".into(),
      seed_dir:            "data/seed".into(),
      seed_data_path:      "data/seed/seed_data.json".into(),
      full_dump_path:      "data/raw/Full_version_french_clan_list.json".into(),
      validated_dump_path: "data/raw/Safe_version_french_clan_list.json".into(),
      tags_path:           "data/raw/src.txt".into(),
      raw_dir:             "data/raw".into(),
      removed_dir:         "data/raw/removed".into(),
      wg_api_base:         "https://api.worldoftanks.eu".into(),
      wg_api_key:          None,
      wg_language:         "fr".into(),
      profile_base:        "https://eu.wargaming.net/clans/wot".into(),
      http_timeout_secs:   30,
    }
  }
}

impl ServerConfig {
  /// Read `path` if it exists, then apply `CLANREG_*` overrides.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn wargaming(&self) -> WargamingConfig {
    WargamingConfig {
      api_base:       self.wg_api_base.clone(),
      application_id: self.wg_api_key.clone().filter(|k| !k.trim().is_empty()),
      language:       self.wg_language.clone(),
      profile_base:   self.profile_base.clone(),
      timeout:        Duration::from_secs(self.http_timeout_secs),
    }
  }

  pub fn export_paths(&self) -> ExportPaths {
    ExportPaths {
      csv:      self.csv_export_path.clone(),
      txt:      self.txt_export_path.clone(),
      seed_dir: self.seed_dir.clone(),
    }
  }

  /// Inputs and outputs of the tag extraction job. New clans extend the
  /// newest stamped dump in `raw_dir`, or `full_dump_path` before the first run.
  pub fn extract_paths(&self) -> ExtractPaths {
    ExtractPaths {
      tags:        self.tags_path.clone(),
      raw_dir:     self.raw_dir.clone(),
      removed_dir: self.removed_dir.clone(),
      base_dump:   self.full_dump_path.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router with request tracing.
pub fn app<S, D>(state: AppState<S, D>) -> Router
where
  S: ClanStore + 'static,
  D: ClanDirectory + LanguageDiscovery + 'static,
{
  clanreg_api::api_router(state).layer(TraceLayer::new_for_http())
}
