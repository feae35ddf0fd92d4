//! Rule display formatting

use crate::models::{Rule, TransactionType};

/// Format the rule list as a table, in application order
pub fn format_rule_list(rules: &[Rule]) -> String {
    if rules.is_empty() {
        return "No rules defined.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>3} {:12} {:30} {:9} {:20} {}\n",
        "#", "ID", "Description contains", "Type", "Contact", "Classification"
    ));
    output.push_str(&"-".repeat(100));
    output.push('\n');

    for (i, rule) in rules.iter().enumerate() {
        let terms = if rule.description_contains.is_empty() {
            "*".to_string()
        } else {
            rule.description_contains.join(" + ")
        };
        let transaction_type = match rule.transaction_type {
            TransactionType::Undefined => "any",
            other => other.label(),
        };

        output.push_str(&format!(
            "{:>3} {:12} {:30} {:9} {:20} {} / {}\n",
            i + 1,
            rule.id.short(),
            terms,
            transaction_type,
            rule.contact_equals.as_deref().unwrap_or("-"),
            rule.category_type,
            rule.category_name
        ));
    }

    output.push_str("\nLater rules override earlier ones on the same row.\n");
    output
}

/// Format rule details for display
pub fn format_rule_details(rule: &Rule) -> String {
    let mut output = String::new();

    output.push_str(&format!("Rule:          {}\n", rule.id));
    output.push_str(&format!(
        "Description:   {}\n",
        if rule.description_contains.is_empty() {
            "(any)".to_string()
        } else {
            rule.description_contains.join(", ")
        }
    ));
    output.push_str(&format!("Type:          {}\n", rule.transaction_type));
    if let Some(contact) = &rule.contact_equals {
        output.push_str(&format!("Contact:       {}\n", contact));
    }
    output.push_str(&format!("Category type: {}\n", rule.category_type));
    output.push_str(&format!("Category:      {}\n", rule.category_name));
    if let Some(memo) = &rule.memo {
        output.push_str(&format!("Memo:          {}\n", memo));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_list() {
        let rules = vec![
            Rule::new(vec!["TARIFA".into()], "Financial costs", "Bank fees")
                .with_transaction_type(TransactionType::Debit),
            Rule::new(vec![], "Receipts", "").with_contact("ACME"),
        ];
        let output = format_rule_list(&rules);
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[2].contains("TARIFA"));
        assert!(lines[2].contains("Debit"));
        assert!(lines[2].contains(&rules[0].id.short()));
        assert!(lines[3].contains("any"));
        assert!(lines[3].contains("ACME"));
    }

    #[test]
    fn test_empty_rule_list() {
        assert_eq!(format_rule_list(&[]), "No rules defined.");
    }

    #[test]
    fn test_rule_details() {
        let rule = Rule::new(vec!["DARF".into()], "Taxes", "Federal").with_memo("monthly");
        let output = format_rule_details(&rule);
        assert!(output.contains("Description:   DARF"));
        assert!(output.contains("Memo:          monthly"));
        assert!(!output.contains("Contact:"));
    }
}
