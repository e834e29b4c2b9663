//! Turns walk visits into owned output nodes.

use crate::domain::entities::{TermRecord, TreeNode, Visit, VocabularyId};

/// Builds a fresh [`TreeNode`] per visit.
///
/// Nodes never alias the index's records or each other, so the occurrences of
/// a multi-parent term can be changed independently.
#[derive(Debug, Clone, Copy)]
pub struct NodeMaterializer {
    vocabulary_id: VocabularyId,
}

impl NodeMaterializer {
    pub fn new(vocabulary_id: VocabularyId) -> Self {
        Self { vocabulary_id }
    }

    /// Copy `term` into a node at the visit's depth; parent links are dropped.
    pub fn materialize(&self, term: &TermRecord, visit: &Visit) -> TreeNode {
        TreeNode {
            id: term.id,
            vocabulary_id: self.vocabulary_id,
            name: term.name.clone(),
            depth: visit.depth,
            via_parent: visit.via_parent,
            attributes: term.attributes.clone(),
        }
    }
}
