//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Ids are stored as signed 64-bit integers. Countries are written in their
//! canonical display spelling, but rows imported from older dumps may carry
//! upper-snake or lower-case spellings; decoding runs them back through the
//! catalog so every record leaves this crate canonical.

use clanreg_core::{
  clan::{ClanId, ClanRecord},
  country::Country,
};

use crate::{Error, Result};

// ─── ClanId ──────────────────────────────────────────────────────────────────

pub fn encode_id(id: ClanId) -> Result<i64> {
  i64::try_from(id).map_err(|_| Error::IdOutOfRange(id))
}

pub fn decode_id(raw: i64) -> Result<ClanId> {
  ClanId::try_from(raw).map_err(|_| Error::CorruptRow(format!("negative clan id {raw}")))
}

// ─── Country ─────────────────────────────────────────────────────────────────

pub fn encode_country(c: Country) -> &'static str { c.as_str() }

pub fn decode_country(s: &str) -> Result<Country> {
  Country::normalize(s).map_err(|_| Error::CorruptRow(format!("unknown country {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` that produces a [`RawClan`].
pub const CLAN_COLUMNS: &str = "clan_id, clan_tag, clan_name, country";

/// Raw values read directly from a `clans` row.
pub struct RawClan {
  pub clan_id:   i64,
  pub clan_tag:  String,
  pub clan_name: String,
  pub country:   String,
}

impl RawClan {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      clan_id:   row.get(0)?,
      clan_tag:  row.get(1)?,
      clan_name: row.get(2)?,
      country:   row.get(3)?,
    })
  }

  pub fn into_record(self) -> Result<ClanRecord> {
    Ok(ClanRecord {
      id:      decode_id(self.clan_id)?,
      tag:     self.clan_tag,
      name:    self.clan_name,
      country: decode_country(&self.country)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn legacy_country_spellings_decode() {
    assert_eq!(decode_country("FRANCE").unwrap(), Country::France);
    assert_eq!(decode_country("UNKNOWN").unwrap(), Country::Unknown);
    assert_eq!(decode_country("CZECH_REPUBLIC").unwrap(), Country::CzechRepublic);
    assert!(matches!(decode_country("??"), Err(Error::CorruptRow(_))));
  }

  #[test]
  fn ids_beyond_i64_are_rejected() {
    assert!(matches!(encode_id(u64::MAX), Err(Error::IdOutOfRange(_))));
    assert_eq!(encode_id(500_075_612).unwrap(), 500_075_612);
    assert!(decode_id(-1).is_err());
  }
}
