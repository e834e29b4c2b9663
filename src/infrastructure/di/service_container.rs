//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::TaxonomyService;
use crate::config::Settings;
use crate::infrastructure::source::TomlTermSource;
use crate::infrastructure::traits::{FileSystem, RealFileSystem, TermSource};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Taxonomy hierarchy service
    pub taxonomy: TaxonomyService,
}

impl ServiceContainer {
    /// Create a container reading terms from `terms_file` on the real filesystem.
    pub fn new(settings: Settings, terms_file: PathBuf) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let source = Arc::new(TomlTermSource::new(Arc::clone(&fs), terms_file));
        Self::with_deps(settings, fs, source)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        source: Arc<dyn TermSource>,
    ) -> Self {
        let settings = Arc::new(settings);
        let taxonomy = TaxonomyService::new(source).with_step_budget(settings.max_steps);

        Self {
            settings,
            fs,
            taxonomy,
        }
    }
}
