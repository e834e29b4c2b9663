//! Domain layer: entities and hierarchy flattening
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod catalog;
pub mod entities;
pub mod error;
pub mod index;
pub mod materializer;
pub mod walker;

pub use builder::{build_tree, TreeBuilder};
pub use catalog::{TermCatalog, TermRow, TermStatus, Vocabulary};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use index::TermIndex;
pub use materializer::NodeMaterializer;
pub use walker::HierarchyWalker;
