//! Lookup structures over a flat, ordered term sequence.

use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;
use tracing::{instrument, trace};

use crate::domain::entities::{TermId, TermRecord, VocabularyId, VIRTUAL_ROOT};

/// Read-only index of one vocabulary's terms.
///
/// Built once per hierarchy request and never mutated afterwards, so a single
/// index can be shared by any number of concurrent walkers.
#[derive(Debug, Clone, Default)]
pub struct TermIndex {
    children_of: HashMap<TermId, Vec<TermId>>,
    parents_of: HashMap<TermId, BTreeSet<TermId>>,
    term_by_id: HashMap<TermId, TermRecord>,
}

impl TermIndex {
    /// Group `terms` of `vocabulary_id` by parent.
    ///
    /// Child order within a parent group follows input order. Terms of other
    /// vocabularies are ignored; repeated parent ids on one term collapse into
    /// a single edge.
    #[instrument(level = "debug", skip(terms))]
    pub fn build<'a, I>(vocabulary_id: VocabularyId, terms: I) -> Self
    where
        I: IntoIterator<Item = &'a TermRecord>,
    {
        let mut index = Self::default();

        for term in terms {
            if term.vocabulary_id != vocabulary_id {
                trace!(term = term.id, "skipping term of vocabulary {}", term.vocabulary_id);
                continue;
            }
            if term.id == VIRTUAL_ROOT {
                trace!("skipping term with reserved id {}", VIRTUAL_ROOT);
                continue;
            }

            let parents: Vec<TermId> = if term.is_top_level() {
                vec![VIRTUAL_ROOT]
            } else {
                term.parent_ids.iter().copied().unique().collect()
            };

            for &parent in &parents {
                index.children_of.entry(parent).or_default().push(term.id);
            }

            index.parents_of.insert(term.id, parents.into_iter().collect());
            index.term_by_id.insert(term.id, term.clone());
        }

        index
    }

    /// Ordered children of `parent`; empty for unknown ids.
    pub fn children_of(&self, parent: TermId) -> &[TermId] {
        self.children_of
            .get(&parent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_children(&self, parent: TermId) -> bool {
        !self.children_of(parent).is_empty()
    }

    /// Parent ids of `term`, [`VIRTUAL_ROOT`] for top-level terms.
    pub fn parents_of(&self, term: TermId) -> Option<&BTreeSet<TermId>> {
        self.parents_of.get(&term)
    }

    pub fn term(&self, id: TermId) -> Option<&TermRecord> {
        self.term_by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.term_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term_by_id.is_empty()
    }

    /// Parent ids referenced by some term but not present as a term.
    ///
    /// Edges below these ids are unreachable from the virtual root.
    pub fn dangling_parents(&self) -> Vec<TermId> {
        let mut dangling: Vec<TermId> = self
            .children_of
            .keys()
            .copied()
            .filter(|&id| id != VIRTUAL_ROOT && !self.term_by_id.contains_key(&id))
            .collect();
        dangling.sort_unstable();
        dangling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Vec<TermRecord> {
        vec![
            TermRecord::new(1, 7, "A"),
            TermRecord::new(2, 7, "B").with_parents([1]),
            TermRecord::new(3, 7, "C").with_parents([1]),
            TermRecord::new(4, 7, "D").with_parents([2, 3]),
        ]
    }

    #[test]
    fn test_build_groups_children_in_input_order() {
        let terms = diamond();
        let index = TermIndex::build(7, &terms);

        assert_eq!(index.children_of(VIRTUAL_ROOT), &[1]);
        assert_eq!(index.children_of(1), &[2, 3]);
        assert_eq!(index.children_of(2), &[4]);
        assert_eq!(index.children_of(3), &[4]);
        assert!(index.children_of(4).is_empty());
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_build_records_parents() {
        let terms = diamond();
        let index = TermIndex::build(7, &terms);

        assert_eq!(index.parents_of(1), Some(&BTreeSet::from([VIRTUAL_ROOT])));
        assert_eq!(index.parents_of(4), Some(&BTreeSet::from([2, 3])));
        assert_eq!(index.parents_of(99), None);
    }

    #[test]
    fn test_build_ignores_other_vocabularies() {
        let mut terms = diamond();
        terms.push(TermRecord::new(5, 8, "foreign").with_parents([1]));
        let index = TermIndex::build(7, &terms);

        assert!(index.term(5).is_none());
        assert_eq!(index.children_of(1), &[2, 3]);
    }

    #[test]
    fn test_duplicate_parent_ids_collapse_to_one_edge() {
        let terms = vec![
            TermRecord::new(1, 7, "A"),
            TermRecord::new(2, 7, "B").with_parents([1, 1]),
        ];
        let index = TermIndex::build(7, &terms);

        assert_eq!(index.children_of(1), &[2]);
    }

    #[test]
    fn test_dangling_parent_is_kept_but_reported() {
        let terms = vec![
            TermRecord::new(1, 7, "A"),
            TermRecord::new(3, 7, "C").with_parents([2]),
        ];
        let index = TermIndex::build(7, &terms);

        assert_eq!(index.children_of(2), &[3]);
        assert!(index.term(2).is_none());
        assert_eq!(index.dangling_parents(), vec![2]);
    }

    #[test]
    fn test_reserved_root_id_is_not_indexed() {
        let terms = vec![TermRecord::new(0, 7, "zero"), TermRecord::new(1, 7, "A")];
        let index = TermIndex::build(7, &terms);

        assert_eq!(index.children_of(VIRTUAL_ROOT), &[1]);
        assert!(index.term(0).is_none());
        assert_eq!(index.len(), 1);
    }
}
