//! [`Registry`]: the validated entry point over a [`ClanStore`].
//!
//! Every operation validates its input first and only then touches the store,
//! so validation failures never leave partial writes behind.

use std::sync::Arc;

use crate::{
  Result,
  clan::{ClanId, ClanRecord, ClanUpdate, NewClan, validate_id},
  country::Country,
  directory::ClanDirectory,
  store::ClanStore,
};

/// Validated clan operations over a shared store handle.
///
/// Cloning is cheap; clones share the same store.
pub struct Registry<S> {
  store: Arc<S>,
}

impl<S> Clone for Registry<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: ClanStore> Registry<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Insert a new clan. The country is normalised before the store is
  /// contacted; duplicate ids and tags are reported by the store.
  pub async fn create(&self, new: NewClan) -> Result<ClanRecord> {
    let record = new.validate()?;
    let stored = self.store.insert(record).await.map_err(Into::into)?;
    tracing::debug!(id = stored.id, tag = %stored.tag, "clan created");
    Ok(stored)
  }

  /// Fetch one clan. Absence is `Ok(None)`, not an error.
  pub async fn read(&self, id: ClanId) -> Result<Option<ClanRecord>> {
    self.store.get(id).await.map_err(Into::into)
  }

  /// Apply a partial update; only the fields present in `update` change.
  pub async fn update(&self, id: ClanId, update: ClanUpdate) -> Result<ClanRecord> {
    let patch = update.validate()?;
    self.store.update(id, patch).await.map_err(Into::into)
  }

  pub async fn delete(&self, id: ClanId) -> Result<()> {
    self.store.delete(id).await.map_err(Into::into)?;
    tracing::debug!(id, "clan deleted");
    Ok(())
  }

  pub async fn list_all(&self) -> Result<Vec<ClanRecord>> {
    self.store.list().await.map_err(Into::into)
  }

  /// Clans whose country matches `raw` after normalisation.
  pub async fn list_by_country(&self, raw: &str) -> Result<Vec<ClanRecord>> {
    let country = Country::normalize(raw)?;
    self.store.list_by_country(country).await.map_err(Into::into)
  }

  pub async fn count(&self) -> Result<usize> {
    self.store.count().await.map_err(Into::into)
  }

  /// Insert a clan known only by id, taking its tag and name from
  /// `directory`.
  ///
  /// The id and country are validated before the directory is called.
  pub async fn insert_via_upstream<D: ClanDirectory>(
    &self,
    directory: &D,
    id: ClanId,
    country: Option<&str>,
  ) -> Result<ClanRecord> {
    let id = validate_id(id)?;
    let country = Country::normalize_or_unknown(country)?;
    let upstream = directory.lookup(id).await?;
    tracing::info!(id, tag = %upstream.tag, "resolved clan from upstream directory");

    let record = ClanRecord { id, tag: upstream.tag, name: upstream.name, country };
    self.store.insert(record).await.map_err(Into::into)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  };

  use super::*;
  use crate::{Error, clan::ClanPatch, directory::UpstreamClan};

  /// A minimal in-process store, enough to exercise the registry's
  /// validation ordering.
  #[derive(Default)]
  struct MemoryStore {
    rows: Mutex<Vec<ClanRecord>>,
  }

  impl ClanStore for MemoryStore {
    type Error = Error;

    async fn insert(&self, clan: ClanRecord) -> Result<ClanRecord> {
      let mut rows = self.rows.lock().unwrap();
      if rows.iter().any(|r| r.id == clan.id) {
        return Err(Error::DuplicateId(clan.id));
      }
      if rows.iter().any(|r| r.tag == clan.tag) {
        return Err(Error::DuplicateTag(clan.tag));
      }
      rows.push(clan.clone());
      Ok(clan)
    }

    async fn get(&self, id: ClanId) -> Result<Option<ClanRecord>> {
      Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn update(&self, id: ClanId, patch: ClanPatch) -> Result<ClanRecord> {
      let mut rows = self.rows.lock().unwrap();
      let row = rows.iter_mut().find(|r| r.id == id).ok_or(Error::NotFound(id))?;
      patch.apply(row);
      Ok(row.clone())
    }

    async fn delete(&self, id: ClanId) -> Result<()> {
      let mut rows = self.rows.lock().unwrap();
      let before = rows.len();
      rows.retain(|r| r.id != id);
      if rows.len() == before { Err(Error::NotFound(id)) } else { Ok(()) }
    }

    async fn list(&self) -> Result<Vec<ClanRecord>> { Ok(self.rows.lock().unwrap().clone()) }

    async fn list_by_country(&self, country: Country) -> Result<Vec<ClanRecord>> {
      let rows = self.rows.lock().unwrap();
      Ok(rows.iter().filter(|r| r.country == country).cloned().collect())
    }

    async fn count(&self) -> Result<usize> { Ok(self.rows.lock().unwrap().len()) }
  }

  struct FixedDirectory {
    calls: AtomicUsize,
  }

  impl ClanDirectory for FixedDirectory {
    async fn lookup(&self, id: ClanId) -> Result<UpstreamClan> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      if id == 404 {
        return Err(Error::NotFoundUpstream(id));
      }
      Ok(UpstreamClan { tag: format!("T{id}"), name: format!("Clan {id}") })
    }
  }

  fn registry() -> Registry<MemoryStore> { Registry::new(Arc::new(MemoryStore::default())) }

  #[tokio::test]
  async fn invalid_country_never_reaches_the_store() {
    let reg = registry();
    let err = reg
      .create(NewClan::new(1, "ABC", "Alpha").with_country("Mordor"))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InvalidCountry(_)));
    assert_eq!(reg.count().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn upstream_insert_merges_directory_details() {
    let reg = registry();
    let dir = FixedDirectory { calls: AtomicUsize::new(0) };

    let record = reg.insert_via_upstream(&dir, 42, Some("france")).await.unwrap();
    assert_eq!(record, ClanRecord {
      id:      42,
      tag:     "T42".into(),
      name:    "Clan 42".into(),
      country: Country::France,
    });
    assert_eq!(reg.read(42).await.unwrap(), Some(record));
  }

  #[tokio::test]
  async fn upstream_insert_validates_country_before_lookup() {
    let reg = registry();
    let dir = FixedDirectory { calls: AtomicUsize::new(0) };

    let err = reg.insert_via_upstream(&dir, 42, Some("Atlantis")).await.unwrap_err();
    assert!(matches!(err, Error::InvalidCountry(_)));
    assert_eq!(dir.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn upstream_insert_rejects_zero_id_before_lookup() {
    let reg = registry();
    let dir = FixedDirectory { calls: AtomicUsize::new(0) };

    let err = reg.insert_via_upstream(&dir, 0, None).await.unwrap_err();
    assert!(matches!(err, Error::InvalidId(0)));
    assert_eq!(dir.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn upstream_not_found_propagates() {
    let reg = registry();
    let dir = FixedDirectory { calls: AtomicUsize::new(0) };

    let err = reg.insert_via_upstream(&dir, 404, None).await.unwrap_err();
    assert!(matches!(err, Error::NotFoundUpstream(404)));
    assert_eq!(reg.count().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn list_by_country_rejects_unknown_filter() {
    let reg = registry();
    let err = reg.list_by_country("Elbonia").await.unwrap_err();
    assert!(matches!(err, Error::InvalidCountry(_)));
  }
}
