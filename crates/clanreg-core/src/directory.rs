//! Contracts for the external collaborators: the upstream clan directory, its
//! tag search, and the language scraper.
//!
//! Neither retries; a failure surfaces immediately to the caller.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{Result, clan::ClanId};

/// Tag and display name as reported by the upstream directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamClan {
  pub tag:  String,
  pub name: String,
}

/// Looks up canonical clan details by id.
pub trait ClanDirectory: Send + Sync {
  /// Returns [`crate::Error::NotFoundUpstream`] when the directory does not
  /// know `id` (or answers with a non-success status) and
  /// [`crate::Error::UpstreamUnavailable`] when it cannot be reached.
  fn lookup(
    &self,
    id: ClanId,
  ) -> impl Future<Output = Result<UpstreamClan>> + Send + '_;
}

/// A clan returned by a tag search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClanHit {
  pub id:   ClanId,
  pub tag:  String,
  pub name: String,
}

/// Resolves clan tags to ids.
pub trait ClanSearch: Send + Sync {
  /// The clan whose tag is exactly `tag`, or `None` when the directory only
  /// knows near matches or nothing at all.
  fn search_tag<'a>(
    &'a self,
    tag: &'a str,
  ) -> impl Future<Output = Result<Option<ClanHit>>> + Send + 'a;
}

/// Discovers the languages a clan advertises on its public profile.
pub trait LanguageDiscovery: Send + Sync {
  /// Deduplicated, non-empty language labels in first-seen order.
  fn discover(
    &self,
    id: ClanId,
  ) -> impl Future<Output = Result<Vec<String>>> + Send + '_;
}
