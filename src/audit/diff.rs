//! Diff generation for audit logging
//!
//! Human-readable change summaries: field-level for single entities,
//! row-level for classification snapshots.

use serde_json::Value;

use crate::models::Snapshot;

/// Summarize top-level field changes between two JSON values
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();
            for (key, before_val) in before_obj {
                match after_obj.get(key) {
                    Some(after_val) if after_val != before_val => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    Some(_) => {}
                    None => changes.push(format!("{}: {} -> (removed)", key, format_value(before_val))),
                }
            }
            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
                }
            }
            changes
        }
        _ if before != after => vec![format!("{} -> {}", format_value(before), format_value(after))],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

/// Summarize which rows differ between two snapshots
///
/// Rows are numbered from 1 as shown in listings.
pub fn snapshot_diff(before: &Snapshot, after: &Snapshot) -> Option<String> {
    let changed: Vec<String> = before
        .states()
        .iter()
        .zip(after.states())
        .enumerate()
        .filter(|(_, (b, a))| b != a)
        .map(|(i, _)| format!("#{}", i + 1))
        .collect();

    let mut parts = Vec::new();
    if !changed.is_empty() {
        parts.push(format!("{} row(s) changed: {}", changed.len(), changed.join(" ")));
    }
    if before.len() != after.len() {
        parts.push(format!("rows: {} -> {}", before.len(), after.len()));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RowState, RowStatus};
    use serde_json::json;

    #[test]
    fn test_field_change() {
        let before = json!({"category_name": "Rent", "memo": null});
        let after = json!({"category_name": "Rent", "memo": "office"});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "memo: null -> \"office\"");
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"a": 1});
        let after = json!({"b": [1, 2]});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("a: 1 -> (removed)"));
        assert!(diff.contains("b: (added) -> [2 items]"));
    }

    #[test]
    fn test_no_change() {
        let value = json!({"a": 1});
        assert!(generate_diff(&value, &value).is_none());
        assert!(generate_diff(&json!(3), &json!(3)).is_none());
    }

    #[test]
    fn test_long_strings_truncated_on_char_boundary() {
        let before = json!("é".repeat(60));
        let after = json!("x");
        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("...\" -> \"x\""));
    }

    #[test]
    fn test_snapshot_diff() {
        let empty = RowState::default();
        let edited = RowState {
            category_type: Some("Expenses".into()),
            category_name: None,
            status: RowStatus::Pending,
        };
        let before = Snapshot::from_states(vec![empty.clone(), empty.clone(), empty.clone()]);
        let after = Snapshot::from_states(vec![empty.clone(), edited, empty]);

        assert_eq!(
            snapshot_diff(&before, &after).as_deref(),
            Some("1 row(s) changed: #2")
        );
        assert!(snapshot_diff(&before, &before).is_none());
    }

    #[test]
    fn test_snapshot_diff_length_change() {
        let before = Snapshot::from_states(vec![RowState::default()]);
        let after = Snapshot::from_states(vec![RowState::default(); 2]);
        assert_eq!(snapshot_diff(&before, &after).as_deref(), Some("rows: 1 -> 2"));
    }
}
