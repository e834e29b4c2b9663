//! Taxonomy service
//!
//! Loads a vocabulary's terms from a term source, applies the visibility
//! filter and display ordering, and hands the result to the hierarchy engine.

use std::collections::BTreeSet;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::domain::{
    DomainError, TermCatalog, TermId, TermIndex, TreeBuilder, TreeNode, VocabularyId, UNBOUNDED,
    VIRTUAL_ROOT,
};
use crate::infrastructure::traits::TermSource;

/// Parameters of one hierarchy request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRequest {
    pub vocabulary_id: VocabularyId,
    pub root: TermId,
    pub max_depth: usize,
    pub published_only: bool,
}

impl TreeRequest {
    /// Whole vocabulary, unbounded, all statuses.
    pub fn new(vocabulary_id: VocabularyId) -> Self {
        Self {
            vocabulary_id,
            root: VIRTUAL_ROOT,
            max_depth: UNBOUNDED,
            published_only: false,
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

    pub fn published_only(mut self, published_only: bool) -> Self {
        self.published_only = published_only;
        self
    }
}

/// A vocabulary with its term count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularySummary {
    pub id: VocabularyId,
    pub name: String,
    pub terms: usize,
}

/// Structural diagnostics for one vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyReport {
    pub vocabulary_id: VocabularyId,
    pub terms: usize,
    pub top_level: usize,
    /// Terms with more than one parent, in display order
    pub multi_parent: Vec<TermId>,
    /// Parent ids that do not resolve to a term of the vocabulary
    pub dangling_parents: Vec<TermId>,
    /// Nodes of the fully flattened hierarchy (multi-parent terms counted per path)
    pub occurrences: usize,
    /// Deepest depth reached, `None` for an empty hierarchy
    pub deepest: Option<usize>,
    /// Terms never reached from the virtual root
    pub unreachable: Vec<TermId>,
    /// Why the full walk failed, if it did
    pub problem: Option<DomainError>,
}

impl HierarchyReport {
    pub fn is_healthy(&self) -> bool {
        self.problem.is_none() && self.dangling_parents.is_empty() && self.unreachable.is_empty()
    }
}

/// Service for flattening and checking vocabulary hierarchies.
pub struct TaxonomyService {
    source: Arc<dyn TermSource>,
    max_steps: Option<usize>,
}

impl TaxonomyService {
    /// Create a new taxonomy service.
    pub fn new(source: Arc<dyn TermSource>) -> Self {
        Self {
            source,
            max_steps: None,
        }
    }

    /// Abort walks that expand more than `max_steps` frames.
    pub fn with_step_budget(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Flatten one vocabulary's hierarchy.
    ///
    /// An unknown vocabulary or root yields an empty list.
    #[instrument(level = "debug", skip(self))]
    pub fn tree(&self, request: &TreeRequest) -> ApplicationResult<Vec<TreeNode>> {
        let catalog = self.source.load()?;
        self.tree_from(&catalog, request)
    }

    /// Flatten several hierarchies from a single catalog snapshot.
    ///
    /// Each request is an independent engine invocation; they run in parallel.
    #[instrument(level = "debug", skip(self))]
    pub fn forest(&self, requests: &[TreeRequest]) -> ApplicationResult<Vec<Vec<TreeNode>>> {
        let catalog = self.source.load()?;
        requests
            .par_iter()
            .map(|request| self.tree_from(&catalog, request))
            .collect()
    }

    fn tree_from(&self, catalog: &TermCatalog, request: &TreeRequest) -> ApplicationResult<Vec<TreeNode>> {
        let terms = catalog.records(request.vocabulary_id, request.published_only);
        debug!(
            "tree: vocabulary={} terms={} root={} max_depth={}",
            request.vocabulary_id,
            terms.len(),
            request.root,
            request.max_depth
        );

        let tree = TreeBuilder::new(request.vocabulary_id)
            .root(request.root)
            .max_depth(request.max_depth)
            .max_steps(self.max_steps)
            .build(&terms)?;
        Ok(tree)
    }

    /// List vocabularies of the catalog.
    ///
    /// Vocabulary ids referenced only by terms are listed with an empty name.
    pub fn vocabularies(&self) -> ApplicationResult<Vec<VocabularySummary>> {
        let catalog = self.source.load()?;

        let mut ids: BTreeSet<VocabularyId> = catalog.vocabularies.iter().map(|v| v.id).collect();
        ids.extend(catalog.terms.iter().map(|t| t.vocabulary_id));

        Ok(ids
            .into_iter()
            .map(|id| VocabularySummary {
                id,
                name: catalog
                    .vocabulary(id)
                    .map(|v| v.name.clone())
                    .unwrap_or_default(),
                terms: catalog.term_count(id),
            })
            .collect())
    }

    /// Inspect the structure of one vocabulary, all statuses included.
    #[instrument(level = "debug", skip(self))]
    pub fn check(&self, vocabulary_id: VocabularyId) -> ApplicationResult<HierarchyReport> {
        let catalog = self.source.load()?;
        Ok(self.check_from(&catalog, vocabulary_id))
    }

    /// Check several vocabularies in parallel.
    pub fn check_all(&self, vocabulary_ids: &[VocabularyId]) -> ApplicationResult<Vec<HierarchyReport>> {
        let catalog = self.source.load()?;
        Ok(vocabulary_ids
            .par_iter()
            .map(|&id| self.check_from(&catalog, id))
            .collect())
    }

    fn check_from(&self, catalog: &TermCatalog, vocabulary_id: VocabularyId) -> HierarchyReport {
        let terms = catalog.records(vocabulary_id, false);
        let index = TermIndex::build(vocabulary_id, &terms);

        let multi_parent = terms
            .iter()
            .filter(|t| index.parents_of(t.id).is_some_and(|p| p.len() > 1))
            .map(|t| t.id)
            .collect();

        let walked = TreeBuilder::new(vocabulary_id)
            .max_steps(self.max_steps)
            .build(&terms);

        let (occurrences, deepest, unreachable, problem) = match walked {
            Ok(tree) => {
                let reached: BTreeSet<TermId> = tree.iter().map(|n| n.id).collect();
                let unreachable = terms
                    .iter()
                    .map(|t| t.id)
                    .filter(|id| !reached.contains(id))
                    .collect();
                (tree.len(), tree.iter().map(|n| n.depth).max(), unreachable, None)
            }
            Err(e) => {
                debug!("check: vocabulary={} walk failed: {}", vocabulary_id, e);
                (0, None, Vec::new(), Some(e))
            }
        };

        HierarchyReport {
            vocabulary_id,
            terms: index.len(),
            top_level: index.children_of(VIRTUAL_ROOT).len(),
            multi_parent,
            dangling_parents: index.dangling_parents(),
            occurrences,
            deepest,
            unreachable,
            problem,
        }
    }
}
