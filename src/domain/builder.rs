//! Tree builder: flattens a term hierarchy into a depth-annotated pre-order list.

use tracing::{debug, instrument, trace};

use crate::domain::entities::{TermId, TermRecord, TreeNode, VocabularyId, UNBOUNDED, VIRTUAL_ROOT};
use crate::domain::error::DomainResult;
use crate::domain::index::TermIndex;
use crate::domain::materializer::NodeMaterializer;
use crate::domain::walker::HierarchyWalker;

/// Constructs flattened trees from ordered term sequences.
///
/// Holds only request parameters; every [`build`](Self::build) creates its own
/// index, walker and output.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    vocabulary_id: VocabularyId,
    root: TermId,
    max_depth: usize,
    max_steps: Option<usize>,
}

impl TreeBuilder {
    pub fn new(vocabulary_id: VocabularyId) -> Self {
        Self {
            vocabulary_id,
            root: VIRTUAL_ROOT,
            max_depth: UNBOUNDED,
            max_steps: None,
        }
    }

    pub fn root(mut self, root: TermId) -> Self {
        self.root = root;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Flatten `terms` below the configured root.
    ///
    /// Empty input, an unknown vocabulary or a root without children give an
    /// empty list. Errors only on a cycle along the walked path or when the
    /// step budget is exhausted.
    #[instrument(level = "debug", skip(terms), fields(terms = terms.len()))]
    pub fn build(&self, terms: &[TermRecord]) -> DomainResult<Vec<TreeNode>> {
        let index = TermIndex::build(self.vocabulary_id, terms);
        if index.is_empty() {
            debug!("no terms for vocabulary {}", self.vocabulary_id);
            return Ok(Vec::new());
        }

        let materializer = NodeMaterializer::new(self.vocabulary_id);
        let walker = HierarchyWalker::new(&index, self.root, self.max_depth)
            .with_step_budget(self.max_steps);

        let mut tree = Vec::new();
        for visit in walker {
            let visit = visit?;
            match index.term(visit.term_id) {
                Some(term) => tree.push(materializer.materialize(term, &visit)),
                None => trace!(term = visit.term_id, "skipping visit without term"),
            }
        }

        debug!("flattened {} nodes", tree.len());
        Ok(tree)
    }
}

/// Flatten the hierarchy of `vocabulary_id` below `root` up to `max_depth`.
///
/// Pass [`VIRTUAL_ROOT`] and [`UNBOUNDED`] for the whole vocabulary.
pub fn build_tree(
    vocabulary_id: VocabularyId,
    terms: &[TermRecord],
    root: TermId,
    max_depth: usize,
) -> DomainResult<Vec<TreeNode>> {
    TreeBuilder::new(vocabulary_id)
        .root(root)
        .max_depth(max_depth)
        .build(terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_empty_input() {
        let tree = TreeBuilder::new(1).build(&[]).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_build_unknown_vocabulary() {
        let terms = vec![TermRecord::new(1, 1, "A")];
        let tree = TreeBuilder::new(2).build(&terms).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_build_from_dangling_root_emits_orphans() {
        // 2 was filtered upstream; asking for it explicitly still lists its children
        let terms = vec![
            TermRecord::new(1, 1, "A"),
            TermRecord::new(3, 1, "C").with_parents([2]),
        ];

        let tree = build_tree(1, &terms, 2, UNBOUNDED).unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!((tree[0].id, tree[0].depth, tree[0].via_parent), (3, 0, 2));
    }
}
