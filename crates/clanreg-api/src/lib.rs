//! JSON REST API for the clan registry.
//!
//! Exposes an axum [`Router`] over any [`ClanStore`] plus a collaborator that
//! acts as both the upstream [`ClanDirectory`] and the [`LanguageDiscovery`]
//! source. Transport, tracing layers and binding are the caller's concern.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = clanreg_api::api_router(state).layer(TraceLayer::new_for_http());
//! ```

pub mod clans;
pub mod countries;
pub mod error;
pub mod export;
pub mod state;

use axum::{
  Router,
  routing::{get, post},
};
use clanreg_core::{
  directory::{ClanDirectory, LanguageDiscovery},
  store::ClanStore,
};

pub use error::ApiError;
pub use state::{AppState, ExportPaths};

/// Build a fully-materialised API router for `state`.
pub fn api_router<S, D>(state: AppState<S, D>) -> Router<()>
where
  S: ClanStore + 'static,
  D: ClanDirectory + LanguageDiscovery + 'static,
{
  Router::new()
    // Clans
    .route("/clans", get(clans::list::<S, D>).post(clans::create::<S, D>))
    .route(
      "/clans/{id}",
      get(clans::get_one::<S, D>)
        .patch(clans::update::<S, D>)
        .delete(clans::delete::<S, D>),
    )
    .route("/clans/country/{name}", get(clans::by_country::<S, D>))
    .route("/clans/{id}/upstream", post(clans::insert_upstream::<S, D>))
    .route("/clans/{id}/languages", get(clans::languages::<S, D>))
    // Exports
    .route("/export/csv", post(export::csv::<S, D>))
    .route("/export/txt", post(export::txt::<S, D>))
    .route("/export/seed", post(export::seed::<S, D>))
    // Catalog
    .route("/countries", get(countries::list))
    .with_state(state)
}
