//! Domain-level errors

use itertools::Itertools;
use thiserror::Error;

use crate::domain::entities::TermId;

/// Domain errors represent violations of the input contract of a hierarchy walk.
/// "Nothing found" is never an error; it is an empty result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cycle detected in hierarchy at term {term_id} (path: {})", format_path(.path))]
    CycleDetected { term_id: TermId, path: Vec<TermId> },

    #[error("step budget of {budget} exhausted before traversal completed")]
    StepBudgetExceeded { budget: usize },
}

fn format_path(path: &[TermId]) -> String {
    path.iter().join(" -> ")
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
