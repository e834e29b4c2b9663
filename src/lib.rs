//! Taxonomy hierarchy flattening.
//!
//! Given the terms of a vocabulary, each with zero or more parent links, produce
//! the depth-annotated pre-order list of everything reachable from a root:
//!
//! ```
//! use taxotree::domain::{build_tree, TermRecord, UNBOUNDED, VIRTUAL_ROOT};
//!
//! let terms = vec![
//!     TermRecord::new(1, 1, "A"),
//!     TermRecord::new(2, 1, "B").with_parents([1]),
//!     TermRecord::new(3, 1, "C").with_parents([1]),
//!     TermRecord::new(4, 1, "D").with_parents([2, 3]),
//! ];
//! let tree = build_tree(1, &terms, VIRTUAL_ROOT, UNBOUNDED).unwrap();
//! let flat: Vec<_> = tree.iter().map(|n| (n.name.as_str(), n.depth)).collect();
//! assert_eq!(flat, [("A", 0), ("B", 1), ("D", 2), ("C", 1), ("D", 2)]);
//! ```
//!
//! Layers: `domain` (pure engine), `application` (services), `infrastructure`
//! (term sources, wiring), `cli` (commands and rendering).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{build_tree, TermRecord, TreeBuilder, TreeNode};
