//! `GET /countries`: the closed country catalog in display form.

use axum::Json;
use clanreg_core::country::Country;

pub async fn list() -> Json<Vec<&'static str>> { Json(Country::names()) }
