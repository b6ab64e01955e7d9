//! Handlers for `/export` endpoints.
//!
//! Each writes to the path configured in [`crate::ExportPaths`] and reports
//! where the file went.

use std::path::PathBuf;

use axum::{Json, extract::State};
use clanreg_core::{
  Error,
  directory::{ClanDirectory, LanguageDiscovery},
  store::ClanStore,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportReport {
  pub message: String,
  pub path:    PathBuf,
  pub count:   usize,
}

/// `POST /export/csv`
pub async fn csv<S, D>(State(state): State<AppState<S, D>>) -> Result<Json<ExportReport>, ApiError>
where
  S: ClanStore,
  D: ClanDirectory + LanguageDiscovery,
{
  let path = state.paths.csv.clone();
  let count = clanreg_transfer::export_delimited(&state.registry, &path).await?;
  Ok(Json(ExportReport {
    message: format!("Exported clans to CSV: {}", path.display()),
    path,
    count,
  }))
}

/// `POST /export/txt`
pub async fn txt<S, D>(State(state): State<AppState<S, D>>) -> Result<Json<ExportReport>, ApiError>
where
  S: ClanStore,
  D: ClanDirectory + LanguageDiscovery,
{
  let path = state.paths.txt.clone();
  let count = clanreg_transfer::export_plain_text(&state.registry, &path).await?;
  Ok(Json(ExportReport {
    message: format!("Exported clans to TXT: {}", path.display()),
    path,
    count,
  }))
}

/// `POST /export/seed`. 404 when the store is empty.
pub async fn seed<S, D>(
  State(state): State<AppState<S, D>>,
) -> Result<Json<ExportReport>, ApiError>
where
  S: ClanStore,
  D: ClanDirectory + LanguageDiscovery,
{
  let snapshot = clanreg_transfer::export_seed_snapshot(&state.registry, &state.paths.seed_dir)
    .await?
    .ok_or(Error::NoRecords)?;
  Ok(Json(ExportReport {
    message: format!("Saved seed snapshot: {}", snapshot.path.display()),
    path:    snapshot.path,
    count:   snapshot.count,
  }))
}
