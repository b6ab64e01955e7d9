//! clanreg binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and either serves the JSON API or runs one of the batch jobs.
//!
//! ```text
//! clanreg extract && clanreg build-seed && clanreg seed && clanreg serve
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clanreg_api::AppState;
use clanreg_core::registry::Registry;
use clanreg_server::ServerConfig;
use clanreg_store_sqlite::SqliteStore;
use clanreg_wargaming::WargamingClient;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Clan registry server and batch jobs")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (default).
  Serve,
  /// Load a seed file into the store.
  Seed {
    /// Seed file to load; defaults to `seed_data_path`.
    #[arg(long)]
    file: Option<PathBuf>,
  },
  /// Write a dated snapshot of the store into `seed_dir`.
  ExportSeed,
  /// Export every clan to `csv_export_path`.
  ExportCsv,
  /// Export every clan to `txt_export_path`.
  ExportTxt,
  /// Merge the raw dumps into `seed_data_path`.
  BuildSeed {
    /// Full dump to merge; defaults to `full_dump_path`.
    #[arg(long)]
    full: Option<PathBuf>,
  },
  /// Resolve new clan tags through the Wargaming search and write a stamped
  /// full dump into `raw_dir`.
  Extract {
    /// Whitespace-separated tag list; defaults to `tags_path`.
    #[arg(long)]
    tags: Option<PathBuf>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = ServerConfig::load(&cli.config)?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(&cfg, open_registry(&cfg).await?).await?,
    Command::Seed { file } => {
      let path = file.unwrap_or_else(|| cfg.seed_data_path.clone());
      clanreg_transfer::import_seed_snapshot(&open_registry(&cfg).await?, &path).await?;
    }
    Command::ExportSeed => {
      let registry = open_registry(&cfg).await?;
      if clanreg_transfer::export_seed_snapshot(&registry, &cfg.seed_dir).await?.is_none() {
        tracing::warn!("nothing to snapshot");
      }
    }
    Command::ExportCsv => {
      clanreg_transfer::export_delimited(&open_registry(&cfg).await?, &cfg.csv_export_path)
        .await?;
    }
    Command::ExportTxt => {
      clanreg_transfer::export_plain_text(&open_registry(&cfg).await?, &cfg.txt_export_path)
        .await?;
    }
    Command::BuildSeed { full } => {
      build_seed(&cfg, full.as_ref().unwrap_or(&cfg.full_dump_path)).await?;
    }
    Command::Extract { tags } => extract(&cfg, tags).await?,
  }

  Ok(())
}

async fn open_registry(cfg: &ServerConfig) -> anyhow::Result<Registry<SqliteStore>> {
  let store = SqliteStore::open(&cfg.database_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.database_path))?;
  Ok(Registry::new(Arc::new(store)))
}

async fn build_seed(cfg: &ServerConfig, full_dump: &Path) -> anyhow::Result<()> {
  let build = clanreg_transfer::build_seed_from_raw_dumps(
    full_dump,
    &cfg.validated_dump_path,
    &cfg.seed_data_path,
  )
  .await?;
  if !build.unmatched.is_empty() {
    tracing::warn!(ids = ?build.unmatched, "validated ids missing from full dump");
  }
  tracing::info!(entries = build.entries, path = %build.path.display(), "seed file ready");
  Ok(())
}

async fn extract(cfg: &ServerConfig, tags: Option<PathBuf>) -> anyhow::Result<()> {
  let mut paths = cfg.extract_paths();
  if let Some(tags) = tags {
    paths.tags = tags;
  }
  let client = WargamingClient::new(cfg.wargaming()).context("failed to build HTTP client")?;

  let report = clanreg_transfer::extract_new_clans(&client, &paths)
    .await
    .with_context(|| format!("tag extraction from {:?} failed", paths.tags))?;
  if !report.rejected.is_empty() {
    tracing::warn!(tags = ?report.rejected, "tags without an exact upstream match");
  }
  tracing::info!(
    added = report.added.len(),
    total = report.total,
    path = %report.full_dump.display(),
    "full dump extended"
  );
  Ok(())
}

async fn serve(cfg: &ServerConfig, registry: Registry<SqliteStore>) -> anyhow::Result<()> {
  let wargaming = cfg.wargaming();
  if wargaming.application_id.is_none() {
    tracing::warn!("wg_api_key is not set; upstream inserts will fail");
  }
  let client = WargamingClient::new(wargaming).context("failed to build HTTP client")?;

  let state = AppState::new(registry, Arc::new(client), cfg.export_paths());
  let app = clanreg_server::app(state);
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
