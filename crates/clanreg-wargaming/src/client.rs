//! HTTP client for the Wargaming clan API and profile pages.

use std::time::Duration;

use clanreg_core::{
  clan::ClanId,
  directory::{ClanDirectory, ClanHit, ClanSearch, LanguageDiscovery, UpstreamClan},
};
use reqwest::Client;

use crate::{Error, Result, extract_languages, parse_clan_info, parse_clan_search};

/// Endpoints and credentials for [`WargamingClient`].
#[derive(Debug, Clone)]
pub struct WargamingConfig {
  /// Regional API root, e.g. `https://api.worldoftanks.eu`.
  pub api_base:       String,
  /// The `application_id` query parameter. Lookups fail without one.
  pub application_id: Option<String>,
  pub language:       String,
  /// Root of the public clan profile pages; the clan id is appended.
  pub profile_base:   String,
  pub timeout:        Duration,
}

impl Default for WargamingConfig {
  fn default() -> Self {
    Self {
      api_base:       "https://api.worldoftanks.eu".into(),
      application_id: None,
      language:       "fr".into(),
      profile_base:   "https://eu.wargaming.net/clans/wot".into(),
      timeout:        Duration::from_secs(30),
    }
  }
}

/// Async client for the Wargaming clan directory.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct WargamingClient {
  client: Client,
  config: WargamingConfig,
}

impl WargamingClient {
  pub fn new(config: WargamingConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn info_url(&self) -> String {
    format!("{}/wgn/clans/info/", self.config.api_base.trim_end_matches('/'))
  }

  fn list_url(&self) -> String {
    format!("{}/wgn/clans/list/", self.config.api_base.trim_end_matches('/'))
  }

  pub fn profile_url(&self, id: ClanId) -> String {
    format!("{}/{id}/", self.config.profile_base.trim_end_matches('/'))
  }

  /// `GET /wgn/clans/info/?clan_id=<id>`
  pub async fn clan_info(&self, id: ClanId) -> Result<UpstreamClan> {
    let application_id = self
      .config
      .application_id
      .as_deref()
      .ok_or(Error::NoApplicationId)?;

    let resp = self
      .client
      .get(self.info_url())
      .query(&[
        ("application_id", application_id),
        ("game", "wot"),
        ("language", self.config.language.as_str()),
        ("fields", "clan_id,name,tag"),
        ("clan_id", id.to_string().as_str()),
      ])
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      tracing::warn!(id, %status, "clan info request rejected");
      return Err(Error::Status { id, status });
    }
    let body = resp.bytes().await?;
    parse_clan_info(id, &body)
  }

  /// `GET /wgn/clans/list/?search=<tag>`, keeping only an exact tag match.
  pub async fn clan_search(&self, tag: &str) -> Result<Option<ClanHit>> {
    let application_id = self
      .config
      .application_id
      .as_deref()
      .ok_or(Error::NoApplicationId)?;

    let resp = self
      .client
      .get(self.list_url())
      .query(&[
        ("application_id", application_id),
        ("game", "wot"),
        ("language", self.config.language.as_str()),
        ("fields", "clan_id,name,tag"),
        ("search", tag),
      ])
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      tracing::warn!(tag, %status, "clan search rejected");
      return Err(Error::SearchStatus { tag: tag.to_owned(), status });
    }
    let body = resp.bytes().await?;
    parse_clan_search(tag, &body)
  }

  /// `GET <profile_base>/<id>/`, then the labels under `.language-list`.
  pub async fn profile_languages(&self, id: ClanId) -> Result<Vec<String>> {
    let resp = self.client.get(self.profile_url(id)).send().await?;

    let status = resp.status();
    if status.is_server_error() {
      tracing::warn!(id, %status, "profile page unavailable");
      return Err(Error::ProfileUnavailable { id, status });
    }
    if !status.is_success() {
      return Err(Error::Status { id, status });
    }
    let html = resp.text().await?;
    extract_languages(&html)?.ok_or(Error::NoLanguageList(id))
  }
}

impl ClanDirectory for WargamingClient {
  async fn lookup(&self, id: ClanId) -> clanreg_core::Result<UpstreamClan> {
    Ok(self.clan_info(id).await?)
  }
}

impl ClanSearch for WargamingClient {
  async fn search_tag<'a>(&'a self, tag: &'a str) -> clanreg_core::Result<Option<ClanHit>> {
    Ok(self.clan_search(tag).await?)
  }
}

impl LanguageDiscovery for WargamingClient {
  async fn discover(&self, id: ClanId) -> clanreg_core::Result<Vec<String>> {
    let languages = self.profile_languages(id).await?;
    tracing::debug!(id, count = languages.len(), "discovered clan languages");
    Ok(languages)
  }
}
