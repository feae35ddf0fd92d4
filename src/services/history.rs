//! Undo/redo over classification snapshots
//!
//! History keeps the last committed snapshot as a baseline. Committing moves
//! the previous baseline onto the undo stack, so undo returns to the state
//! as it was at the previous commit. Both stacks are bounded; the oldest
//! snapshot is evicted when a stack is full.

use std::collections::VecDeque;

use crate::models::{Snapshot, TransactionRow};

/// Default maximum number of snapshots per stack
pub const DEFAULT_DEPTH: usize = 100;

/// Linear undo/redo history
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Snapshot>,
    baseline: Option<Snapshot>,
    future: VecDeque<Snapshot>,
    depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_depth(DEFAULT_DEPTH)
    }
}

impl History {
    /// Create a history keeping at most `depth` snapshots per stack
    pub fn with_depth(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            past: VecDeque::with_capacity(depth.min(DEFAULT_DEPTH)),
            baseline: None,
            future: VecDeque::new(),
            depth,
        }
    }

    /// Record the current state as a new history point
    ///
    /// Any redo history is discarded.
    pub fn commit(&mut self, rows: &[TransactionRow]) {
        let snapshot = Snapshot::capture(rows);
        if let Some(previous) = self.baseline.replace(snapshot) {
            push_bounded(&mut self.past, previous, self.depth);
        }
        self.future.clear();
    }

    /// Step back one commit
    ///
    /// Returns the indices whose category type changed, or `None` when
    /// there is nothing to undo.
    pub fn undo(&mut self, rows: &mut [TransactionRow]) -> Option<Vec<usize>> {
        let target = self.past.pop_back()?;
        push_bounded(&mut self.future, Snapshot::capture(rows), self.depth);
        let changed = target.apply(rows);
        self.baseline = Some(target);
        Some(changed)
    }

    /// Step forward one undone commit
    pub fn redo(&mut self, rows: &mut [TransactionRow]) -> Option<Vec<usize>> {
        let target = self.future.pop_back()?;
        push_bounded(&mut self.past, Snapshot::capture(rows), self.depth);
        let changed = target.apply(rows);
        self.baseline = Some(target);
        Some(changed)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of snapshots on the undo stack
    pub fn undo_len(&self) -> usize {
        self.past.len()
    }

    /// Number of snapshots on the redo stack
    pub fn redo_len(&self) -> usize {
        self.future.len()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The last committed (or restored) snapshot
    pub fn baseline(&self) -> Option<&Snapshot> {
        self.baseline.as_ref()
    }

    /// Forget everything, e.g. after the rows themselves were replaced
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.baseline = None;
    }
}

fn push_bounded(stack: &mut VecDeque<Snapshot>, snapshot: Snapshot, depth: usize) {
    while stack.len() >= depth {
        stack.pop_front();
    }
    stack.push_back(snapshot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, RowStatus, TransactionType};
    use chrono::NaiveDate;

    fn pending_rows(count: usize) -> Vec<TransactionRow> {
        (0..count)
            .map(|i| {
                TransactionRow::new(
                    NaiveDate::from_ymd_opt(2025, 4, 1 + i as u32).unwrap(),
                    format!("ROW {}", i),
                    Money::from_cents(-500),
                    TransactionType::Debit,
                )
            })
            .collect()
    }

    #[test]
    fn test_end_to_end_undo_redo() {
        let mut rows = pending_rows(3);
        let mut history = History::default();

        let initial = Snapshot::capture(&rows);
        assert_eq!(initial.len(), 3);
        assert!(initial.states().iter().all(|s| s.category_type.is_none()));

        history.commit(&rows);
        rows[1].set_category(Some("Expenses".into()), Some("Rent".into()));
        history.commit(&rows);

        let changed = history.undo(&mut rows).unwrap();
        assert_eq!(changed, vec![1]);
        assert!(rows[1].category_type.is_none());
        assert!(rows[1].category_name.is_none());

        history.redo(&mut rows).unwrap();
        assert_eq!(rows[1].category_type.as_deref(), Some("Expenses"));
        assert_eq!(rows[1].category_name.as_deref(), Some("Rent"));
    }

    #[test]
    fn test_undo_restores_exact_prior_snapshot() {
        let mut rows = pending_rows(2);
        let mut history = History::default();

        rows[0].status = RowStatus::Validated;
        history.commit(&rows);
        let prior = Snapshot::capture(&rows);

        rows[1].set_category(Some("Taxes".into()), None);
        rows[0].status = RowStatus::Pending;
        history.commit(&rows);
        let pre_undo = Snapshot::capture(&rows);

        history.undo(&mut rows);
        assert_eq!(Snapshot::capture(&rows), prior);

        history.redo(&mut rows);
        assert_eq!(Snapshot::capture(&rows), pre_undo);
    }

    #[test]
    fn test_commit_after_undo_clears_redo() {
        let mut rows = pending_rows(1);
        let mut history = History::default();

        history.commit(&rows);
        rows[0].set_category(Some("Expenses".into()), None);
        history.commit(&rows);
        history.undo(&mut rows);
        assert!(history.can_redo());

        rows[0].set_category(Some("Taxes".into()), None);
        history.commit(&rows);
        assert!(!history.can_redo());
        assert!(history.redo(&mut rows).is_none());
        assert_eq!(rows[0].category_type.as_deref(), Some("Taxes"));
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut rows = pending_rows(1);
        let mut history = History::default();
        assert!(history.undo(&mut rows).is_none());
        assert!(history.redo(&mut rows).is_none());

        // A single commit has nothing before it
        history.commit(&rows);
        assert!(history.undo(&mut rows).is_none());
    }

    #[test]
    fn test_uncommitted_edit_is_redoable_after_undo() {
        let mut rows = pending_rows(1);
        let mut history = History::default();

        history.commit(&rows);
        rows[0].set_category(Some("Expenses".into()), None);
        history.commit(&rows);
        rows[0].set_category(Some("Draft".into()), None);

        history.undo(&mut rows);
        assert!(rows[0].category_type.is_none());
        history.redo(&mut rows);
        assert_eq!(rows[0].category_type.as_deref(), Some("Draft"));
    }

    #[test]
    fn test_depth_cap_evicts_oldest() {
        let mut rows = pending_rows(1);
        let mut history = History::with_depth(2);

        for name in ["a", "b", "c", "d"] {
            rows[0].set_category(Some(name.into()), None);
            history.commit(&rows);
        }
        assert_eq!(history.undo_len(), 2);

        history.undo(&mut rows);
        history.undo(&mut rows);
        assert_eq!(rows[0].category_type.as_deref(), Some("b"));
        assert!(history.undo(&mut rows).is_none());
        assert_eq!(history.redo_len(), 2);
    }

    #[test]
    fn test_zero_depth_is_clamped() {
        assert_eq!(History::with_depth(0).depth(), 1);
    }

    #[test]
    fn test_snapshots_are_owned_copies() {
        let mut rows = pending_rows(1);
        let mut history = History::default();
        history.commit(&rows);
        rows[0].set_category(Some("Expenses".into()), None);

        assert!(history.baseline().unwrap().states()[0].category_type.is_none());
    }
}
