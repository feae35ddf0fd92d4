//! Classification state snapshots
//!
//! A snapshot is the per-row `(category type, category name, status)`
//! projection of the review, in display order. It is the unit of undo/redo
//! and of transaction-state persistence.

use serde::{Deserialize, Serialize};

use super::transaction::{RowStatus, TransactionRow};

/// Classification state of one row
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RowState {
    #[serde(default, alias = "tipo")]
    pub category_type: Option<String>,

    #[serde(default, alias = "categoria")]
    pub category_name: Option<String>,

    #[serde(default)]
    pub status: RowStatus,
}

impl RowState {
    /// Project a row onto its classification state
    pub fn of(row: &TransactionRow) -> Self {
        Self {
            category_type: row.category_type.clone(),
            category_name: row.category_name.clone(),
            status: row.status,
        }
    }
}

/// Ordered classification state of every row
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Vec<RowState>);

impl Snapshot {
    /// Capture the classification state of `rows`
    pub fn capture(rows: &[TransactionRow]) -> Self {
        Self(rows.iter().map(RowState::of).collect())
    }

    /// Build a snapshot from explicit row states
    pub fn from_states(states: Vec<RowState>) -> Self {
        Self(states)
    }

    /// Overwrite the classification of `rows` with this snapshot
    ///
    /// Only rows with a corresponding entry are touched. Returns the indices
    /// whose category type changed; their category options must be
    /// re-derived by the caller.
    pub fn apply(&self, rows: &mut [TransactionRow]) -> Vec<usize> {
        if self.0.len() != rows.len() {
            tracing::warn!(
                snapshot_len = self.0.len(),
                row_count = rows.len(),
                "Snapshot length does not match row count; applying the overlap"
            );
        }

        let mut changed = Vec::new();
        for (index, (row, state)) in rows.iter_mut().zip(&self.0).enumerate() {
            if row.category_type != state.category_type {
                changed.push(index);
            }
            row.category_type = state.category_type.clone();
            row.category_name = state.category_name.clone();
            row.status = state.status;
        }
        changed
    }

    /// Row states in display order
    pub fn states(&self) -> &[RowState] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionType};
    use chrono::NaiveDate;

    fn rows(count: usize) -> Vec<TransactionRow> {
        (0..count)
            .map(|i| {
                TransactionRow::new(
                    NaiveDate::from_ymd_opt(2025, 1, 1 + i as u32).unwrap(),
                    format!("ROW {}", i),
                    Money::from_cents(100),
                    TransactionType::Debit,
                )
            })
            .collect()
    }

    #[test]
    fn test_capture_unclassified_rows() {
        let snapshot = Snapshot::capture(&rows(3));
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.states().iter().all(|s| *s == RowState::default()));
    }

    #[test]
    fn test_apply_reports_changed_types() {
        let mut rows = rows(3);
        rows[1].category_type = Some("Expenses".into());
        let snapshot = Snapshot::capture(&rows);

        rows[1].category_type = Some("Receipts".into());
        rows[2].category_name = Some("Rent".into());

        let changed = snapshot.apply(&mut rows);
        assert_eq!(changed, vec![1]);
        assert_eq!(rows[1].category_type.as_deref(), Some("Expenses"));
        assert!(rows[2].category_name.is_none());
    }

    #[test]
    fn test_apply_shorter_snapshot_leaves_extra_rows() {
        let mut rows = rows(3);
        let snapshot = Snapshot::from_states(vec![RowState {
            category_type: Some("Expenses".into()),
            category_name: None,
            status: RowStatus::Validated,
        }]);
        rows[2].category_type = Some("Receipts".into());

        snapshot.apply(&mut rows);
        assert_eq!(rows[0].status, RowStatus::Validated);
        assert_eq!(rows[2].category_type.as_deref(), Some("Receipts"));
    }

    #[test]
    fn test_apply_longer_snapshot_ignores_surplus() {
        let mut rows = rows(1);
        let snapshot = Snapshot::from_states(vec![RowState::default(); 4]);
        assert!(snapshot.apply(&mut rows).is_empty());
    }

    #[test]
    fn test_serializes_as_array() {
        let snapshot = Snapshot::capture(&rows(2));
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.starts_with('['));
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
