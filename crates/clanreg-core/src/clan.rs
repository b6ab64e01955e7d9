//! Clan records and the validation stage that produces them.
//!
//! Requests arrive as raw, unvalidated values ([`NewClan`], [`ClanUpdate`]).
//! Validation is a separate pure step that turns them into a [`ClanRecord`]
//! or a [`ClanPatch`] before any store is touched.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, country::Country};

/// Numeric clan identifier assigned by the upstream directory.
pub type ClanId = u64;

// ─── ClanRecord ──────────────────────────────────────────────────────────────

/// A stored clan. Field names on the wire follow the seed-file schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClanRecord {
  #[serde(rename = "clan_id")]
  pub id:      ClanId,
  #[serde(rename = "clan_tag")]
  pub tag:     String,
  #[serde(rename = "clan_name")]
  pub name:    String,
  #[serde(default)]
  pub country: Country,
}

// ─── NewClan ─────────────────────────────────────────────────────────────────

/// Input to [`crate::registry::Registry::create`].
///
/// `country` is free text; it is normalised against the catalog during
/// [`NewClan::validate`] and defaults to [`Country::Unknown`] when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct NewClan {
  #[serde(rename = "clan_id")]
  pub id:      ClanId,
  #[serde(rename = "clan_tag")]
  pub tag:     String,
  #[serde(rename = "clan_name")]
  pub name:    String,
  #[serde(default)]
  pub country: Option<String>,
}

impl NewClan {
  pub fn new(id: ClanId, tag: impl Into<String>, name: impl Into<String>) -> Self {
    Self { id, tag: tag.into(), name: name.into(), country: None }
  }

  pub fn with_country(mut self, country: impl Into<String>) -> Self {
    self.country = Some(country.into());
    self
  }

  /// Rejects id `0`, which the upstream directory never assigns, and
  /// normalises the country.
  pub fn validate(self) -> Result<ClanRecord> {
    let id = validate_id(self.id)?;
    let country = Country::normalize_or_unknown(self.country.as_deref())?;
    Ok(ClanRecord { id, tag: self.tag, name: self.name, country })
  }
}

/// Clan ids are positive.
pub fn validate_id(id: ClanId) -> Result<ClanId> {
  if id == 0 { Err(Error::InvalidId(id)) } else { Ok(id) }
}

// ─── Updates ─────────────────────────────────────────────────────────────────

/// A raw partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClanUpdate {
  #[serde(default, rename = "clan_tag")]
  pub tag:     Option<String>,
  #[serde(default, rename = "clan_name")]
  pub name:    Option<String>,
  #[serde(default)]
  pub country: Option<String>,
}

impl ClanUpdate {
  /// Normalise the country, if supplied. Unlike inserts, a supplied country
  /// must name a catalog member; there is no fallback to `Unknown`.
  pub fn validate(self) -> Result<ClanPatch> {
    let country = self.country.as_deref().map(Country::normalize).transpose()?;
    Ok(ClanPatch { tag: self.tag, name: self.name, country })
  }
}

/// A validated partial update, ready to hand to a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClanPatch {
  pub tag:     Option<String>,
  pub name:    Option<String>,
  pub country: Option<Country>,
}

impl ClanPatch {
  /// Overwrite the fields of `record` that this patch carries.
  pub fn apply(self, record: &mut ClanRecord) {
    if let Some(tag) = self.tag {
      record.tag = tag;
    }
    if let Some(name) = self.name {
      record.name = name;
    }
    if let Some(country) = self.country {
      record.country = country;
    }
  }
}
