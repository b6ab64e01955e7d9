//! SQL schema for the clan registry's SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- clan_id is the upstream directory's id, not a generated rowid.
CREATE TABLE IF NOT EXISTS clans (
    clan_id    INTEGER PRIMARY KEY,
    clan_tag   TEXT NOT NULL UNIQUE,
    clan_name  TEXT NOT NULL,
    country    TEXT NOT NULL DEFAULT 'Unknown'   -- canonical catalog spelling
);

CREATE INDEX IF NOT EXISTS clans_country_idx ON clans(country);

PRAGMA user_version = 1;
";
