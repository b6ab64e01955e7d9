//! Decoding `wgn/clans/list` responses.
//!
//! The directory searches tags and names by prefix and returns
//! `{"status": "ok", "meta": {"count": n}, "data": [{"clan_id", "name", "tag"}]}`
//! ordered by relevance.

use clanreg_core::{clan::ClanId, directory::ClanHit};
use serde::Deserialize;

use crate::{
  Error, Result,
  info::{ApiFault, describe_fault},
};

#[derive(Deserialize)]
struct ListResponse {
  status: String,
  #[serde(default)]
  error:  Option<ApiFault>,
  #[serde(default)]
  data:   Option<Vec<ListEntry>>,
}

#[derive(Deserialize)]
struct ListEntry {
  clan_id: ClanId,
  tag:     String,
  name:    String,
}

/// Pick the result whose tag is exactly `tag`. Case matters: `ABC` and `abc`
/// are different clans.
pub fn parse_clan_search(tag: &str, body: &[u8]) -> Result<Option<ClanHit>> {
  let response: ListResponse = serde_json::from_slice(body)?;

  if response.status != "ok" {
    return Err(Error::Api(describe_fault(&response.status, response.error)));
  }

  Ok(
    response
      .data
      .unwrap_or_default()
      .into_iter()
      .find(|e| e.tag == tag)
      .map(|e| ClanHit { id: e.clan_id, tag: e.tag, name: e.name }),
  )
}
