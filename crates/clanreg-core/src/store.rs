//! The `ClanStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `clanreg-store-sqlite`).
//! Higher layers go through [`crate::registry::Registry`], which validates
//! input before calling into the store.

use std::future::Future;

use crate::{
  clan::{ClanId, ClanPatch, ClanRecord},
  country::Country,
};

/// Abstraction over a clan record store backend.
///
/// Every mutating method is atomic: on error the store is left exactly as it
/// was. Uniqueness of `id` and `tag` is enforced here, not by callers, and
/// violations must come back as [`crate::Error::DuplicateId`] /
/// [`crate::Error::DuplicateTag`] once converted.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ClanStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Persist a new record. Fails on a duplicate id or tag.
  fn insert(
    &self,
    clan: ClanRecord,
  ) -> impl Future<Output = Result<ClanRecord, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: ClanId,
  ) -> impl Future<Output = Result<Option<ClanRecord>, Self::Error>> + Send + '_;

  /// Apply a partial update and return the record as stored afterwards.
  fn update(
    &self,
    id: ClanId,
    patch: ClanPatch,
  ) -> impl Future<Output = Result<ClanRecord, Self::Error>> + Send + '_;

  /// Remove a record. Fails if it does not exist.
  fn delete(
    &self,
    id: ClanId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All records in storage iteration order.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<ClanRecord>, Self::Error>> + Send + '_;

  /// Records whose stored country is `country`, regardless of the casing
  /// convention the row was written with.
  fn list_by_country(
    &self,
    country: Country,
  ) -> impl Future<Output = Result<Vec<ClanRecord>, Self::Error>> + Send + '_;

  fn count(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
