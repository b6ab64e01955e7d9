//! [`SqliteStore`]: the SQLite implementation of [`ClanStore`].

use std::path::Path;

use clanreg_core::{
  clan::{ClanId, ClanPatch, ClanRecord},
  country::Country,
  store::ClanStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{CLAN_COLUMNS, RawClan, encode_country, encode_id},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A clan store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// Missing parent directories are created.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| Error::Core(e.into()))?;
    }
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened clan store");
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn select(&self, sql: String, params: Vec<String>) -> Result<Vec<ClanRecord>> {
    let raws: Vec<RawClan> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawClan::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawClan::into_record).collect()
  }
}

/// Turn a unique-constraint failure into the matching duplicate error.
///
/// `clan_id` is an `INTEGER PRIMARY KEY`, so SQLite reports it with the
/// primary-key extended code; `clan_tag` is a plain `UNIQUE` column.
fn classify_conflict(err: tokio_rusqlite::Error, id: ClanId, tag: Option<&str>) -> Error {
  if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(failure, message)) = &err
    && failure.code == rusqlite::ErrorCode::ConstraintViolation
  {
    let message = message.as_deref().unwrap_or_default();
    if let Some(tag) = tag
      && message.contains("clans.clan_tag")
    {
      return Error::DuplicateTag(tag.to_owned());
    }
    if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
      || message.contains("clans.clan_id")
    {
      return Error::DuplicateId(id);
    }
  }
  Error::Database(err)
}

// ─── ClanStore impl ──────────────────────────────────────────────────────────

impl ClanStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, clan: ClanRecord) -> Result<ClanRecord> {
    let id_val      = encode_id(clan.id)?;
    let tag         = clan.tag.clone();
    let name        = clan.name.clone();
    let country_str = encode_country(clan.country);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO clans (clan_id, clan_tag, clan_name, country) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_val, tag, name, country_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| classify_conflict(e, clan.id, Some(&clan.tag)))?;

    Ok(clan)
  }

  async fn get(&self, id: ClanId) -> Result<Option<ClanRecord>> {
    // No stored row can carry an id SQLite cannot represent.
    let Ok(id_val) = encode_id(id) else {
      return Ok(None);
    };

    let raw: Option<RawClan> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {CLAN_COLUMNS} FROM clans WHERE clan_id = ?1"),
            rusqlite::params![id_val],
            RawClan::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawClan::into_record).transpose()
  }

  async fn update(&self, id: ClanId, patch: ClanPatch) -> Result<ClanRecord> {
    let id_val  = encode_id(id).map_err(|_| Error::NotFound(id))?;
    let new_tag = patch.tag.clone();

    // Read-modify-write inside one transaction; dropping `tx` on any early
    // return rolls it back.
    let updated: Option<ClanRecord> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current = tx
          .query_row(
            &format!("SELECT {CLAN_COLUMNS} FROM clans WHERE clan_id = ?1"),
            rusqlite::params![id_val],
            RawClan::from_row,
          )
          .optional()?;

        let Some(raw) = current else {
          return Ok(None);
        };
        let mut record = raw
          .into_record()
          .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;
        patch.apply(&mut record);

        tx.execute(
          "UPDATE clans SET clan_tag = ?2, clan_name = ?3, country = ?4 WHERE clan_id = ?1",
          rusqlite::params![
            id_val,
            record.tag,
            record.name,
            encode_country(record.country)
          ],
        )?;
        tx.commit()?;
        Ok(Some(record))
      })
      .await
      .map_err(|e| match e {
        tokio_rusqlite::Error::Other(inner) => match inner.downcast::<Error>() {
          Ok(own) => *own,
          Err(other) => Error::Database(tokio_rusqlite::Error::Other(other)),
        },
        e => classify_conflict(e, id, new_tag.as_deref()),
      })?;

    updated.ok_or(Error::NotFound(id))
  }

  async fn delete(&self, id: ClanId) -> Result<()> {
    let id_val = encode_id(id).map_err(|_| Error::NotFound(id))?;

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM clans WHERE clan_id = ?1", rusqlite::params![id_val])?)
      })
      .await?;

    if removed == 0 {
      return Err(Error::NotFound(id));
    }
    Ok(())
  }

  async fn list(&self) -> Result<Vec<ClanRecord>> {
    self
      .select(format!("SELECT {CLAN_COLUMNS} FROM clans"), Vec::new())
      .await
  }

  async fn list_by_country(&self, country: Country) -> Result<Vec<ClanRecord>> {
    // Rows are written in display form, but older dumps used the upper-snake
    // key. Match either spelling, case-insensitively.
    self
      .select(
        format!(
          "SELECT {CLAN_COLUMNS} FROM clans
           WHERE country = ?1 COLLATE NOCASE
              OR REPLACE(UPPER(TRIM(country)), ' ', '_') = ?2"
        ),
        vec![encode_country(country).to_owned(), country.key()],
      )
      .await
  }

  async fn count(&self) -> Result<usize> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM clans", [], |r| r.get(0))?))
      .await?;
    Ok(n as usize)
  }
}
