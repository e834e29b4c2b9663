//! Term sources: TOML catalog files and in-memory catalogs
//!
//! Catalog format:
//!
//! ```toml
//! [[vocabulary]]
//! id = 1
//! name = "Topics"
//!
//! [[term]]
//! id = 10
//! vocabulary_id = 1
//! name = "Science"
//! pos = 0
//!
//! [[term]]
//! id = 11
//! vocabulary_id = 1
//! name = "Physics"
//! parents = [10]
//! status = "draft"
//! attributes = { slug = "physics" }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::TermCatalog;
use crate::infrastructure::traits::{FileSystem, TermSource};

/// Reads the catalog from a TOML file on every load.
pub struct TomlTermSource {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl TomlTermSource {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }
}

impl TermSource for TomlTermSource {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> ApplicationResult<TermCatalog> {
        if !self.fs.exists(&self.path) {
            return Err(ApplicationError::CatalogNotFound(self.path.clone()));
        }
        let content = self
            .fs
            .read_to_string(&self.path)
            .with_path_context("read term catalog", &self.path)?;
        let catalog: TermCatalog =
            toml::from_str(&content).map_err(|e| ApplicationError::InvalidCatalog {
                path: self.path.clone(),
                message: e.message().to_string(),
            })?;
        debug!(
            "load: {} vocabularies, {} terms",
            catalog.vocabularies.len(),
            catalog.terms.len()
        );
        Ok(catalog)
    }
}

/// Serves a fixed catalog, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTermSource {
    catalog: TermCatalog,
}

impl InMemoryTermSource {
    pub fn new(catalog: TermCatalog) -> Self {
        Self { catalog }
    }
}

impl TermSource for InMemoryTermSource {
    fn load(&self) -> ApplicationResult<TermCatalog> {
        Ok(self.catalog.clone())
    }
}
