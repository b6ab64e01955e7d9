use std::{path::PathBuf, sync::Arc};

use clanreg_core::registry::Registry;

/// Where the export endpoints write their files.
#[derive(Debug, Clone)]
pub struct ExportPaths {
  pub csv:      PathBuf,
  pub txt:      PathBuf,
  pub seed_dir: PathBuf,
}

/// Shared handler state.
pub struct AppState<S, D> {
  pub registry:  Registry<S>,
  pub directory: Arc<D>,
  pub paths:     Arc<ExportPaths>,
}

impl<S, D> AppState<S, D> {
  pub fn new(registry: Registry<S>, directory: Arc<D>, paths: ExportPaths) -> Self {
    Self { registry, directory, paths: Arc::new(paths) }
  }
}

// Manual impl: neither `S` nor `D` need to be `Clone`.
impl<S, D> Clone for AppState<S, D> {
  fn clone(&self) -> Self {
    Self {
      registry:  self.registry.clone(),
      directory: Arc::clone(&self.directory),
      paths:     Arc::clone(&self.paths),
    }
  }
}
