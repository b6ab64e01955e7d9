use clanreg_core::clan::ClanId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("HTTP request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("clan {id}: upstream answered {status}")]
  Status { id: ClanId, status: reqwest::StatusCode },

  /// A 5xx from the profile pages; the clan may well exist.
  #[error("clan {id}: profile page answered {status}")]
  ProfileUnavailable { id: ClanId, status: reqwest::StatusCode },

  #[error("clan search for {tag:?}: upstream answered {status}")]
  SearchStatus { tag: String, status: reqwest::StatusCode },

  #[error("clan {0} missing from upstream response")]
  Missing(ClanId),

  #[error("upstream API error: {0}")]
  Api(String),

  #[error("malformed upstream response: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("no Wargaming application id configured")]
  NoApplicationId,

  #[error("invalid selector: {0}")]
  Selector(String),

  #[error("clan {0} profile has no language list")]
  NoLanguageList(ClanId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for clanreg_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Status { id, .. } | Error::Missing(id) => Self::NotFoundUpstream(id),
      Error::NoLanguageList(id) => Self::LanguagesUnavailable(id),
      other => Self::UpstreamUnavailable(other.to_string()),
    }
  }
}
