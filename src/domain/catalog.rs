//! Term catalog: the persisted shape of vocabularies and terms.
//!
//! Rows carry persistence concerns (display position, publication status)
//! that the hierarchy engine never sees; they are applied by the caller before
//! rows become [`TermRecord`]s.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Attributes, TermId, TermRecord, VocabularyId};

/// A named grouping of terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub id: VocabularyId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Publication status of a term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermStatus {
    #[default]
    Published,
    Draft,
}

/// A stored term with its parent links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRow {
    pub id: TermId,
    pub vocabulary_id: VocabularyId,
    pub name: String,
    #[serde(default)]
    pub parents: Vec<TermId>,
    /// Display position among siblings (ascending)
    #[serde(default)]
    pub pos: i64,
    #[serde(default)]
    pub status: TermStatus,
    #[serde(default)]
    pub attributes: Attributes,
}

impl TermRow {
    pub fn is_published(&self) -> bool {
        self.status == TermStatus::Published
    }

    pub fn to_record(&self) -> TermRecord {
        TermRecord {
            id: self.id,
            vocabulary_id: self.vocabulary_id,
            name: self.name.clone(),
            parent_ids: self.parents.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

/// All vocabularies and terms known to a term source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCatalog {
    #[serde(default, rename = "vocabulary")]
    pub vocabularies: Vec<Vocabulary>,
    #[serde(default, rename = "term")]
    pub terms: Vec<TermRow>,
}

impl TermCatalog {
    pub fn vocabulary(&self, id: VocabularyId) -> Option<&Vocabulary> {
        self.vocabularies.iter().find(|v| v.id == id)
    }

    /// Rows of one vocabulary, optionally published only, ordered by position.
    ///
    /// The sort is stable, so rows sharing a position keep catalog order.
    pub fn records(&self, vocabulary_id: VocabularyId, published_only: bool) -> Vec<TermRecord> {
        let mut rows: Vec<&TermRow> = self
            .terms
            .iter()
            .filter(|t| t.vocabulary_id == vocabulary_id)
            .filter(|t| !published_only || t.is_published())
            .collect();
        rows.sort_by_key(|t| t.pos);
        rows.into_iter().map(TermRow::to_record).collect()
    }

    pub fn term_count(&self, vocabulary_id: VocabularyId) -> usize {
        self.terms
            .iter()
            .filter(|t| t.vocabulary_id == vocabulary_id)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: TermId, pos: i64, status: TermStatus) -> TermRow {
        TermRow {
            id,
            vocabulary_id: 1,
            name: format!("t{id}"),
            parents: vec![],
            pos,
            status,
            attributes: Attributes::new(),
        }
    }

    #[test]
    fn test_records_sorted_by_position_and_filtered() {
        let catalog = TermCatalog {
            vocabularies: vec![],
            terms: vec![
                row(1, 2, TermStatus::Published),
                row(2, 1, TermStatus::Draft),
                row(3, 1, TermStatus::Published),
                row(4, 0, TermStatus::Published),
            ],
        };

        let all: Vec<TermId> = catalog.records(1, false).iter().map(|r| r.id).collect();
        let published: Vec<TermId> = catalog.records(1, true).iter().map(|r| r.id).collect();

        assert_eq!(all, vec![4, 2, 3, 1]);
        assert_eq!(published, vec![4, 3, 1]);
    }
}
