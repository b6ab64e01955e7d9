//! Decoding `wgn/clans/info` responses.
//!
//! A successful response looks like
//! `{"status": "ok", "data": {"<id>": {"clan_id": …, "tag": …, "name": …}}}`;
//! an unknown id comes back as `"<id>": null`. Failures carry
//! `{"status": "error", "error": {"code": …, "message": …}}`.

use std::collections::HashMap;

use clanreg_core::{clan::ClanId, directory::UpstreamClan};
use serde::Deserialize;

use crate::{Error, Result};

#[derive(Deserialize)]
struct InfoResponse {
  status: String,
  #[serde(default)]
  error:  Option<ApiFault>,
  #[serde(default)]
  data:   HashMap<String, Option<InfoEntry>>,
}

#[derive(Deserialize)]
pub(crate) struct ApiFault {
  #[serde(default)]
  code:    Option<u32>,
  #[serde(default)]
  message: String,
}

/// Describe a non-`ok` response for [`Error::Api`].
pub(crate) fn describe_fault(status: &str, fault: Option<ApiFault>) -> String {
  fault.map_or_else(
    || format!("status {status:?}"),
    |f| match f.code {
      Some(code) => format!("{} ({code})", f.message),
      None => f.message,
    },
  )
}

#[derive(Deserialize)]
struct InfoEntry {
  tag:  String,
  name: String,
}

/// Extract the tag and name of clan `id` from a `wgn/clans/info` body.
pub fn parse_clan_info(id: ClanId, body: &[u8]) -> Result<UpstreamClan> {
  let mut response: InfoResponse = serde_json::from_slice(body)?;

  if response.status != "ok" {
    return Err(Error::Api(describe_fault(&response.status, response.error)));
  }

  response
    .data
    .remove(&id.to_string())
    .flatten()
    .map(|e| UpstreamClan { tag: e.tag, name: e.name })
    .ok_or(Error::Missing(id))
}
