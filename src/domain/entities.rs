//! Domain entities: core data structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier of a term, unique within its vocabulary.
pub type TermId = u64;

/// Identifier of a vocabulary.
pub type VocabularyId = u64;

/// Opaque term attributes, passed through to the output untouched.
pub type Attributes = BTreeMap<String, String>;

/// Sentinel parent id for terms without parents.
pub const VIRTUAL_ROOT: TermId = 0;

/// Depth bound meaning "no bound".
pub const UNBOUNDED: usize = usize::MAX;

/// A term as supplied by the persistence layer.
///
/// Input order of a term sequence defines sibling order within each parent group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    pub id: TermId,
    pub vocabulary_id: VocabularyId,
    pub name: String,
    /// Parent links; empty attaches the term to [`VIRTUAL_ROOT`]
    #[serde(default)]
    pub parent_ids: Vec<TermId>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl TermRecord {
    pub fn new(id: TermId, vocabulary_id: VocabularyId, name: impl Into<String>) -> Self {
        Self {
            id,
            vocabulary_id,
            name: name.into(),
            parent_ids: Vec::new(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_parents(mut self, parent_ids: impl IntoIterator<Item = TermId>) -> Self {
        self.parent_ids = parent_ids.into_iter().collect();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_ids.is_empty()
    }
}

/// One occurrence of a term in a flattened hierarchy.
///
/// Always an owned value: a term reached through several parents yields several
/// independent nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: TermId,
    pub vocabulary_id: VocabularyId,
    pub name: String,
    /// Zero-based distance from the requested root along this occurrence's path
    pub depth: usize,
    /// Parent through which this occurrence was reached
    pub via_parent: TermId,
    pub attributes: Attributes,
}

/// A single step of a hierarchy walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Visit {
    pub term_id: TermId,
    pub depth: usize,
    pub via_parent: TermId,
}
