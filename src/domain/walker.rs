//! Iterative depth-first walk over a [`TermIndex`].
//!
//! The walk is a stack machine instead of a recursion. The stack holds the
//! chain of parents whose child lists are still being expanded, so the number
//! of frames left after a pop is the depth of the children about to be
//! visited. A call-local cursor per parent remembers where sibling iteration
//! resumes once a descended subtree is finished.
//!
//! The walker is graph-aware: a term with several parents is visited once per
//! parent edge lying inside the traversal, each time with its own depth.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::domain::entities::{TermId, Visit, UNBOUNDED};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::index::TermIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Enter a parent, starting at its first child
    Descend(TermId),
    /// Continue a parent at its current cursor
    Resume(TermId),
}

impl Frame {
    fn term_id(self) -> TermId {
        match self {
            Frame::Descend(id) | Frame::Resume(id) => id,
        }
    }
}

/// Pre-order iterator of [`Visit`]s below `root`.
///
/// Yields `Err` at most once: on a cycle along the active path or when the
/// step budget runs out. The iterator is fused after an error.
#[derive(Debug)]
pub struct HierarchyWalker<'a> {
    index: &'a TermIndex,
    max_depth: usize,
    max_steps: Option<usize>,
    steps: usize,
    stack: Vec<Frame>,
    cursors: HashMap<TermId, usize>,
    on_path: HashSet<TermId>,
    done: bool,
}

impl<'a> HierarchyWalker<'a> {
    pub fn new(index: &'a TermIndex, root: TermId, max_depth: usize) -> Self {
        Self {
            index,
            max_depth,
            max_steps: None,
            steps: 0,
            stack: vec![Frame::Descend(root)],
            cursors: HashMap::new(),
            on_path: HashSet::from([root]),
            done: false,
        }
    }

    /// Walk without a depth bound.
    pub fn unbounded(index: &'a TermIndex, root: TermId) -> Self {
        Self::new(index, root, UNBOUNDED)
    }

    /// Limit the number of frames expanded before the walk gives up.
    pub fn with_step_budget(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    fn pop(&mut self) -> Option<Frame> {
        let frame = self.stack.pop()?;
        self.on_path.remove(&frame.term_id());
        Some(frame)
    }

    fn push(&mut self, frame: Frame) -> DomainResult<()> {
        let id = frame.term_id();
        if !self.on_path.insert(id) {
            let mut path: Vec<TermId> = self.stack.iter().map(|f| f.term_id()).collect();
            path.push(id);
            return Err(DomainError::CycleDetected { term_id: id, path });
        }
        self.stack.push(frame);
        Ok(())
    }

    fn step(&mut self) -> DomainResult<Option<Visit>> {
        while let Some(frame) = self.pop() {
            if let Some(budget) = self.max_steps {
                if self.steps >= budget {
                    return Err(DomainError::StepBudgetExceeded { budget });
                }
            }
            self.steps += 1;

            let parent = frame.term_id();
            let depth = self.stack.len();
            if depth >= self.max_depth {
                trace!(parent, depth, "depth bound reached, backtracking");
                continue;
            }

            let cursor = match frame {
                Frame::Descend(_) => 0,
                Frame::Resume(_) => self.cursors.get(&parent).copied().unwrap_or(0),
            };
            let Some(&child) = self.index.children_of(parent).get(cursor) else {
                // exhausted: drop the frame
                self.cursors.remove(&parent);
                continue;
            };
            self.cursors.insert(parent, cursor + 1);

            // Parent goes back first so its remaining siblings follow the
            // child's subtree. For a leaf child this is the same as continuing
            // in place: the next pop sees the same depth.
            // A child frame at the depth bound would only be discarded, so it
            // is never pushed and never checked against the active path.
            self.push(Frame::Resume(parent))?;
            if self.index.has_children(child) && depth + 1 < self.max_depth {
                self.push(Frame::Descend(child))?;
            }

            return Ok(Some(Visit {
                term_id: child,
                depth,
                via_parent: parent,
            }));
        }
        Ok(None)
    }
}

impl Iterator for HierarchyWalker<'_> {
    type Item = DomainResult<Visit>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(visit)) => Some(Ok(visit)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
