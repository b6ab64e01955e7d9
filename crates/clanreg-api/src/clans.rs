//! Handlers for `/clans` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/clans` | Every stored clan |
//! | `POST`   | `/clans` | Body: `{"clan_id", "clan_tag", "clan_name", "country"?}` |
//! | `GET`    | `/clans/:id` | 404 if not found |
//! | `PATCH`  | `/clans/:id` | Any of `clan_tag`, `clan_name`, `country` |
//! | `DELETE` | `/clans/:id` | 204 on success |
//! | `GET`    | `/clans/country/:name` | Any spelling the catalog accepts |
//! | `POST`   | `/clans/:id/upstream` | Optional `?country=<name>` |
//! | `GET`    | `/clans/:id/languages` | Scraped from the public profile |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use clanreg_core::{
  clan::{ClanId, ClanRecord, ClanUpdate, NewClan},
  directory::{ClanDirectory, LanguageDiscovery},
  store::ClanStore,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::AppState};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /clans`
pub async fn list<S, D>(
  State(state): State<AppState<S, D>>,
) -> Result<Json<Vec<ClanRecord>>, ApiError>
where
  S: ClanStore,
  D: ClanDirectory + LanguageDiscovery,
{
  Ok(Json(state.registry.list_all().await?))
}

/// `GET /clans/country/:name`
pub async fn by_country<S, D>(
  State(state): State<AppState<S, D>>,
  Path(name): Path<String>,
) -> Result<Json<Vec<ClanRecord>>, ApiError>
where
  S: ClanStore,
  D: ClanDirectory + LanguageDiscovery,
{
  Ok(Json(state.registry.list_by_country(&name).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /clans`
pub async fn create<S, D>(
  State(state): State<AppState<S, D>>,
  Json(body): Json<NewClan>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClanStore,
  D: ClanDirectory + LanguageDiscovery,
{
  let clan = state.registry.create(body).await?;
  Ok((StatusCode::CREATED, Json(clan)))
}

#[derive(Debug, Deserialize)]
pub struct UpstreamParams {
  pub country: Option<String>,
}

/// `POST /clans/:id/upstream[?country=<name>]`
pub async fn insert_upstream<S, D>(
  State(state): State<AppState<S, D>>,
  Path(id): Path<ClanId>,
  Query(params): Query<UpstreamParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClanStore,
  D: ClanDirectory + LanguageDiscovery,
{
  let clan = state
    .registry
    .insert_via_upstream(state.directory.as_ref(), id, params.country.as_deref())
    .await?;
  Ok((StatusCode::CREATED, Json(clan)))
}

// ─── Get / update / delete ────────────────────────────────────────────────────

/// `GET /clans/:id`
pub async fn get_one<S, D>(
  State(state): State<AppState<S, D>>,
  Path(id): Path<ClanId>,
) -> Result<Json<ClanRecord>, ApiError>
where
  S: ClanStore,
  D: ClanDirectory + LanguageDiscovery,
{
  let clan = state
    .registry
    .read(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("clan {id} not found")))?;
  Ok(Json(clan))
}

/// `PATCH /clans/:id`
pub async fn update<S, D>(
  State(state): State<AppState<S, D>>,
  Path(id): Path<ClanId>,
  Json(body): Json<ClanUpdate>,
) -> Result<Json<ClanRecord>, ApiError>
where
  S: ClanStore,
  D: ClanDirectory + LanguageDiscovery,
{
  Ok(Json(state.registry.update(id, body).await?))
}

/// `DELETE /clans/:id`
pub async fn delete<S, D>(
  State(state): State<AppState<S, D>>,
  Path(id): Path<ClanId>,
) -> Result<StatusCode, ApiError>
where
  S: ClanStore,
  D: ClanDirectory + LanguageDiscovery,
{
  state.registry.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Languages ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct LanguagesResponse {
  pub clan_id:   ClanId,
  pub languages: Vec<String>,
}

/// `GET /clans/:id/languages`
pub async fn languages<S, D>(
  State(state): State<AppState<S, D>>,
  Path(id): Path<ClanId>,
) -> Result<Json<LanguagesResponse>, ApiError>
where
  S: ClanStore,
  D: ClanDirectory + LanguageDiscovery,
{
  let languages = state.directory.discover(id).await?;
  Ok(Json(LanguagesResponse { clan_id: id, languages }))
}
