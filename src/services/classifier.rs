//! Rule-based classification
//!
//! Rules are layered: every rule whose predicate matches is applied in list
//! order, so a later match overwrites what an earlier one wrote. Rows that
//! are no longer pending are never touched.

use crate::models::{CategoryChoices, Rule, Taxonomy, TransactionRow};

/// Outcome of classifying a batch of rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifySummary {
    /// Pending rows matched by at least one rule
    pub classified: usize,
    /// Pending rows no rule matched
    pub unmatched: usize,
    /// Validated or canceled rows left alone
    pub locked: usize,
}

/// Check whether a rule's predicate holds for a row
///
/// Criteria left unset pass. The contact criterion is matched against the
/// contact resolved by the import, not against a value a rule wrote.
pub fn matches(rule: &Rule, row: &TransactionRow) -> bool {
    if !rule
        .description_contains
        .iter()
        .all(|term| row.description.contains(term.as_str()))
    {
        return false;
    }

    if let Some(wanted) = contact_criterion(rule) {
        match row.contact.as_deref() {
            Some(label) if label.contains(wanted) => {}
            _ => return false,
        }
    }

    if !rule.transaction_type.is_wildcard()
        && !rule
            .transaction_type
            .label()
            .eq_ignore_ascii_case(row.transaction_type.label())
    {
        return false;
    }

    true
}

/// The rule's contact criterion, if it sets a non-empty one
fn contact_criterion(rule: &Rule) -> Option<&str> {
    rule.contact_equals.as_deref().filter(|wanted| !wanted.is_empty())
}

/// Apply every matching rule to a pending row, in order
///
/// Returns whether any rule matched. The taxonomy is accepted so callers
/// can pass the same context they use for category pickers; matching
/// itself does not consult it.
pub fn apply(row: &mut TransactionRow, rules: &[Rule], _taxonomy: &Taxonomy) -> bool {
    if !row.is_pending() {
        return false;
    }

    let mut matched = false;
    for rule in rules {
        if !matches(rule, row) {
            continue;
        }
        row.category_type = Some(rule.category_type.clone()).filter(|s| !s.is_empty());
        row.category_name = Some(rule.category_name.clone()).filter(|s| !s.is_empty());
        row.memo = Some(rule.memo.clone().unwrap_or_default());
        if let Some(contact) = contact_criterion(rule) {
            row.contact_override = Some(contact.to_string());
        }
        row.auto_classified = true;
        matched = true;
    }
    matched
}

/// Re-run the rule set over every row
///
/// Clears the auto-classified flag on pending rows first, since it is only
/// meaningful relative to the current rule set.
pub fn classify_rows(
    rows: &mut [TransactionRow],
    rules: &[Rule],
    taxonomy: &Taxonomy,
) -> ClassifySummary {
    let mut summary = ClassifySummary::default();

    for row in rows.iter_mut() {
        if !row.is_pending() {
            summary.locked += 1;
            continue;
        }

        row.auto_classified = false;
        if apply(row, rules, taxonomy) {
            summary.classified += 1;
        } else {
            summary.unmatched += 1;
        }
    }

    tracing::debug!(
        classified = summary.classified,
        unmatched = summary.unmatched,
        locked = summary.locked,
        rules = rules.len(),
        "Classified rows"
    );
    summary
}

/// Category types offered for a row's transaction type
pub fn category_options(row: &TransactionRow, taxonomy: &Taxonomy) -> Vec<String> {
    taxonomy.category_options(row.transaction_type)
}

/// Category names for a row, split by its current category type
pub fn suggested_categories(row: &TransactionRow, taxonomy: &Taxonomy) -> CategoryChoices {
    taxonomy.suggested_categories(row.category_type.as_deref().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, RowStatus, TransactionType};
    use chrono::NaiveDate;

    fn row(description: &str, transaction_type: TransactionType) -> TransactionRow {
        TransactionRow::new(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            description,
            Money::from_cents(-1000),
            transaction_type,
        )
    }

    fn taxonomy() -> Taxonomy {
        Taxonomy::default()
    }

    #[test]
    fn test_description_terms_all_required() {
        let rule = Rule::new(vec!["PIX".into(), "ACME".into()], "Receipts", "Sales");
        assert!(matches(&rule, &row("PIX RECEBIDO ACME", TransactionType::Credit)));
        assert!(!matches(&rule, &row("PIX RECEBIDO GLOBEX", TransactionType::Credit)));
        // Case-sensitive
        assert!(!matches(&rule, &row("pix recebido acme", TransactionType::Credit)));
    }

    #[test]
    fn test_empty_terms_match_everything() {
        let rule = Rule::new(vec![], "Expenses", "");
        assert!(matches(&rule, &row("ANYTHING", TransactionType::Undefined)));
    }

    #[test]
    fn test_transaction_type_criterion() {
        let rule = Rule::new(vec![], "Expenses", "").with_transaction_type(TransactionType::Debit);
        assert!(matches(&rule, &row("X", TransactionType::Debit)));
        assert!(!matches(&rule, &row("X", TransactionType::Credit)));
    }

    #[test]
    fn test_contact_criterion_needs_a_label() {
        let rule = Rule::new(vec![], "Expenses", "Rent").with_contact("IMOBILIARIA");
        let without = row("ALUGUEL", TransactionType::Debit);
        let with = row("ALUGUEL", TransactionType::Debit).with_contact("IMOBILIARIA CENTRO");
        assert!(!matches(&rule, &without));
        assert!(matches(&rule, &with));
    }

    #[test]
    fn test_empty_contact_criterion_is_unset() {
        let mut rule = Rule::new(vec!["PIX".into()], "Receipts", "Sales");
        rule.contact_equals = Some(String::new());

        let mut without = row("PIX RECEBIDO", TransactionType::Credit);
        let mut with = row("PIX RECEBIDO", TransactionType::Credit).with_contact("ACME");
        assert!(apply(&mut without, &[rule.clone()], &taxonomy()));
        assert!(apply(&mut with, &[rule], &taxonomy()));
        assert_eq!(without.category_type.as_deref(), Some("Receipts"));
        assert!(with.contact_override.is_none());
        assert_eq!(with.display_contact(), Some("ACME"));
    }

    #[test]
    fn test_apply_writes_classification() {
        let rule = Rule::new(vec!["ALUGUEL".into()], "Expenses", "Rent").with_contact("IMOB");
        let mut target = row("ALUGUEL MARCO", TransactionType::Debit).with_contact("IMOB SUL");

        assert!(apply(&mut target, &[rule], &taxonomy()));
        assert_eq!(target.category_type.as_deref(), Some("Expenses"));
        assert_eq!(target.category_name.as_deref(), Some("Rent"));
        assert_eq!(target.memo.as_deref(), Some(""));
        assert_eq!(target.contact_override.as_deref(), Some("IMOB"));
        assert_eq!(target.display_contact(), Some("IMOB"));
        assert!(target.auto_classified);
    }

    #[test]
    fn test_last_applied_wins() {
        let rules = vec![
            Rule::new(vec!["A".into()], "X1", ""),
            Rule::new(vec!["A".into()], "X2", ""),
        ];
        let mut target = row("A", TransactionType::Undefined);
        apply(&mut target, &rules, &taxonomy());
        assert_eq!(target.category_type.as_deref(), Some("X2"));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let rules = vec![
            Rule::new(vec!["PIX".into()], "Receipts", "Sales").with_contact("ACME"),
            Rule::new(vec!["PIX".into(), "ACME".into()], "Receipts", "Key account")
                .with_memo("vip"),
        ];
        let mut once = row("PIX ACME", TransactionType::Credit).with_contact("ACME LTDA");
        apply(&mut once, &rules, &taxonomy());
        let mut twice = once.clone();
        apply(&mut twice, &rules, &taxonomy());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_locked_rows_untouched() {
        let rules = vec![Rule::new(vec![], "Expenses", "Rent")];
        for status in [RowStatus::Validated, RowStatus::Canceled] {
            let mut target = row("ALUGUEL", TransactionType::Debit);
            target.status = status;
            let before = target.clone();
            assert!(!apply(&mut target, &rules, &taxonomy()));
            assert_eq!(target, before);
        }
    }

    #[test]
    fn test_classify_rows_summary() {
        let rules = vec![Rule::new(vec!["TARIFA".into()], "Expenses", "Bank fees")];
        let mut rows = vec![
            row("TARIFA PACOTE", TransactionType::Debit),
            row("PIX", TransactionType::Credit),
            row("TARIFA DOC", TransactionType::Debit),
        ];
        rows[1].auto_classified = true;
        rows[2].status = RowStatus::Validated;

        let summary = classify_rows(&mut rows, &rules, &taxonomy());
        assert_eq!(
            summary,
            ClassifySummary {
                classified: 1,
                unmatched: 1,
                locked: 1
            }
        );
        assert!(!rows[1].auto_classified);
        assert!(rows[2].category_type.is_none());
    }

    #[test]
    fn test_unmatched_row_keeps_earlier_values() {
        let mut rows = vec![row("TARIFA", TransactionType::Debit)];
        classify_rows(
            &mut rows,
            &[Rule::new(vec!["TARIFA".into()], "Expenses", "Bank fees")],
            &taxonomy(),
        );
        classify_rows(&mut rows, &[], &taxonomy());
        assert_eq!(rows[0].category_type.as_deref(), Some("Expenses"));
        assert!(!rows[0].auto_classified);
    }
}
