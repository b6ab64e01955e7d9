//! Flat listings of every stored clan.
//!
//! Both formats list records in [`Registry::list_all`] order, create missing
//! parent directories, and overwrite whatever is already at the target path.

use std::{io, path::Path};

use clanreg_core::{Result, clan::ClanRecord, registry::Registry, store::ClanStore};

use crate::ensure_parent;

pub const CSV_HEADER: [&str; 3] = ["ID", "Clan Tag", "Clan Name"];

/// Render `clans` as CSV with a [`CSV_HEADER`] row.
pub fn render_delimited(clans: &[ClanRecord]) -> Result<Vec<u8>> {
  let mut writer = csv::Writer::from_writer(Vec::new());
  writer.write_record(CSV_HEADER).map_err(io::Error::from)?;
  for clan in clans {
    writer
      .write_record([clan.id.to_string().as_str(), &clan.tag, &clan.name])
      .map_err(io::Error::from)?;
  }
  Ok(writer.into_inner().map_err(|e| e.into_error())?)
}

/// Render `clans` as `ID:` / `Clan Tag:` / `Clan Name:` blocks separated by a
/// blank line.
pub fn render_plain_text(clans: &[ClanRecord]) -> String {
  clans
    .iter()
    .map(|c| format!("ID: {}\nClan Tag: {}\nClan Name: {}\n\n", c.id, c.tag, c.name))
    .collect()
}

/// Write every clan to `path` as CSV. Returns the number of records written.
pub async fn export_delimited<S: ClanStore>(
  registry: &Registry<S>,
  path: impl AsRef<Path>,
) -> Result<usize> {
  let path = path.as_ref();
  let clans = registry.list_all().await?;
  let bytes = render_delimited(&clans)?;

  ensure_parent(path).await?;
  tokio::fs::write(path, bytes).await?;

  tracing::info!(count = clans.len(), path = %path.display(), "exported clans to CSV");
  Ok(clans.len())
}

/// Write every clan to `path` as plain text. Returns the number of records
/// written.
pub async fn export_plain_text<S: ClanStore>(
  registry: &Registry<S>,
  path: impl AsRef<Path>,
) -> Result<usize> {
  let path = path.as_ref();
  let clans = registry.list_all().await?;

  ensure_parent(path).await?;
  tokio::fs::write(path, render_plain_text(&clans)).await?;

  tracing::info!(count = clans.len(), path = %path.display(), "exported clans to text");
  Ok(clans.len())
}

#[cfg(test)]
mod tests {
  use clanreg_core::country::Country;

  use super::*;

  fn clan(id: u64, tag: &str, name: &str) -> ClanRecord {
    ClanRecord { id, tag: tag.into(), name: name.into(), country: Country::Unknown }
  }

  #[test]
  fn delimited_has_header_and_quotes_commas() {
    let bytes = render_delimited(&[
      clan(500075612, "--C_N", "** Cosa ** Nostra **"),
      clan(7, "CMA", "Comma, Inc"),
    ])
    .unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(
      text,
      "ID,Clan Tag,Clan Name\n500075612,--C_N,** Cosa ** Nostra **\n7,CMA,\"Comma, Inc\"\n"
    );
  }

  #[test]
  fn delimited_empty_store_is_header_only() {
    let text = String::from_utf8(render_delimited(&[]).unwrap()).unwrap();
    assert_eq!(text, "ID,Clan Tag,Clan Name\n");
  }

  #[test]
  fn plain_text_blocks() {
    let text = render_plain_text(&[clan(1, "A", "Alpha"), clan(2, "B", "Bravo")]);
    assert_eq!(
      text,
      "ID: 1\nClan Tag: A\nClan Name: Alpha\n\nID: 2\nClan Tag: B\nClan Name: Bravo\n\n"
    );
  }
}
