//! Application services

pub mod taxonomy;

pub use taxonomy::{HierarchyReport, TaxonomyService, TreeRequest, VocabularySummary};
