//! Review session
//!
//! A [`ReviewSession`] owns everything one review works on: the statement
//! rows, the rule list, the taxonomy, the undo/redo history and the
//! autosave schedule. It is built once and passed by reference; there is no
//! other copy of this state.

use std::io::Write;
use std::time::Instant;

use crate::codec;
use crate::config::Settings;
use crate::error::{ReviewError, ReviewResult};
use crate::models::{
    CategoryChoices, Rule, RuleField, RuleId, RuleValidationError, RowStatus, Snapshot, Taxonomy,
    TransactionRow,
};
use crate::storage::{Gateway, Storage};

use super::autosave::Autosave;
use super::classifier::{self, ClassifySummary};
use super::history::History;

/// Where the session's rules came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesOrigin {
    /// Saved rule state
    Saved,
    /// Rules file or built-in rules, used because nothing was saved
    Configured,
}

/// In-memory state of one review
#[derive(Debug)]
pub struct ReviewSession {
    rows: Vec<TransactionRow>,
    rules: Vec<Rule>,
    taxonomy: Taxonomy,
    history: History,
    autosave: Autosave,
}

impl ReviewSession {
    /// Create a session over already-loaded data
    pub fn new(
        rows: Vec<TransactionRow>,
        rules: Vec<Rule>,
        taxonomy: Taxonomy,
        settings: &Settings,
    ) -> Self {
        Self {
            rows,
            rules,
            taxonomy,
            history: History::with_depth(settings.history_depth),
            autosave: Autosave::new(settings.autosave_quiet_window()),
        }
    }

    /// Load rows, taxonomy, rules and any saved classification state
    ///
    /// The loaded state becomes the first history point.
    pub fn open(storage: &Storage, settings: &Settings) -> ReviewResult<(Self, RulesOrigin)> {
        let rows = storage.load_rows()?;
        let taxonomy = storage.load_taxonomy()?;
        let (rules, origin) = load_rules_with_fallback(storage)?;

        let mut session = Self::new(rows, rules, taxonomy, settings);

        match storage.gateway.load_state() {
            Ok(state) => {
                session.apply_snapshot(&state);
            }
            Err(e) if e.is_not_found() => {
                tracing::info!("No saved classification state; starting from the statement");
            }
            Err(e) => return Err(e),
        }

        session.history.commit(&session.rows);
        Ok((session, origin))
    }

    pub fn rows(&self) -> &[TransactionRow] {
        &self.rows
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn autosave(&self) -> &Autosave {
        &self.autosave
    }

    /// Current classification state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.rows)
    }

    // Rules

    /// Find a rule by full id or short reference
    pub fn find_rule(&self, reference: &str) -> ReviewResult<&Rule> {
        self.rules
            .iter()
            .find(|rule| rule.id.matches_reference(reference))
            .ok_or_else(|| ReviewError::rule_not_found(reference))
    }

    fn rule_position(&self, id: RuleId) -> ReviewResult<usize> {
        self.rules
            .iter()
            .position(|rule| rule.id == id)
            .ok_or_else(|| ReviewError::rule_not_found(id.to_string()))
    }

    /// Append a rule and re-run classification
    pub fn add_rule(&mut self, rule: Rule) -> ReviewResult<ClassifySummary> {
        rule.validate()
            .map_err(|e| ReviewError::Validation(e.to_string()))?;
        if self.rules.iter().any(|existing| existing.id == rule.id) {
            return Err(ReviewError::Duplicate {
                entity_type: "Rule",
                identifier: rule.id.to_string(),
            });
        }

        tracing::debug!(rule = %rule.id, "Adding rule");
        self.rules.push(rule);
        Ok(self.reclassify())
    }

    /// Edit one field of a rule and re-run classification
    ///
    /// The edit is rejected, leaving the rule unchanged, if the field name
    /// is unknown, the value does not parse, or the result is invalid.
    /// Returns the rule before and after the edit.
    pub fn update_rule_field(
        &mut self,
        id: RuleId,
        field: &str,
        value: &str,
    ) -> ReviewResult<(Rule, Rule)> {
        let field: RuleField = field
            .parse()
            .map_err(|e: RuleValidationError| ReviewError::Validation(e.to_string()))?;
        let position = self.rule_position(id)?;

        let before = self.rules[position].clone();
        let mut edited = before.clone();
        edited
            .set_field(field, value)
            .map_err(|e| ReviewError::Validation(e.to_string()))?;
        edited
            .validate()
            .map_err(|e| ReviewError::Validation(e.to_string()))?;

        self.rules[position] = edited.clone();
        self.reclassify();
        Ok((before, edited))
    }

    /// Remove a rule and re-run classification
    pub fn remove_rule(&mut self, id: RuleId) -> ReviewResult<Rule> {
        let position = self.rule_position(id)?;
        let removed = self.rules.remove(position);
        self.reclassify();
        Ok(removed)
    }

    /// Replace the whole rule list
    pub fn replace_rules(&mut self, rules: Vec<Rule>) -> ClassifySummary {
        self.rules = rules;
        self.reclassify()
    }

    /// Re-run every rule over the pending rows
    pub fn reclassify(&mut self) -> ClassifySummary {
        let summary = classifier::classify_rows(&mut self.rows, &self.rules, &self.taxonomy);
        self.autosave.notify_mutation(Instant::now());
        summary
    }

    // Rows

    fn row_mut(&mut self, index: usize) -> ReviewResult<&mut TransactionRow> {
        self.rows
            .get_mut(index)
            .ok_or_else(|| ReviewError::row_not_found(index))
    }

    fn row(&self, index: usize) -> ReviewResult<&TransactionRow> {
        self.rows
            .get(index)
            .ok_or_else(|| ReviewError::row_not_found(index))
    }

    /// Manually classify a row
    ///
    /// Returns the category names to offer for the new type.
    pub fn edit_row_category(
        &mut self,
        index: usize,
        category_type: Option<String>,
        category_name: Option<String>,
    ) -> ReviewResult<CategoryChoices> {
        self.row_mut(index)?.set_category(category_type, category_name);
        self.autosave.notify_mutation(Instant::now());
        self.category_choices(index)
    }

    /// Set a row's memo
    pub fn set_row_memo(&mut self, index: usize, memo: Option<String>) -> ReviewResult<()> {
        self.row_mut(index)?.memo = memo.filter(|m| !m.is_empty());
        self.autosave.notify_mutation(Instant::now());
        Ok(())
    }

    /// Move a row to a new review status
    pub fn set_row_status(&mut self, index: usize, status: RowStatus) -> ReviewResult<()> {
        self.row_mut(index)?
            .transition(status)
            .map_err(|e| ReviewError::Validation(e.to_string()))?;
        self.autosave.notify_mutation(Instant::now());
        Ok(())
    }

    /// Category types offered for a row
    pub fn category_options(&self, index: usize) -> ReviewResult<Vec<String>> {
        Ok(classifier::category_options(self.row(index)?, &self.taxonomy))
    }

    /// Category names for a row, suggested ones first
    pub fn category_choices(&self, index: usize) -> ReviewResult<CategoryChoices> {
        Ok(classifier::suggested_categories(self.row(index)?, &self.taxonomy))
    }

    // History

    /// Record the current state as a history point
    pub fn commit(&mut self) {
        self.history.commit(&self.rows);
    }

    /// Undo to the previous history point
    ///
    /// Returns the indices whose category type changed; their category
    /// choices should be refreshed. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Vec<usize>> {
        let changed = self.history.undo(&mut self.rows)?;
        self.autosave.notify_mutation(Instant::now());
        Some(changed)
    }

    /// Redo the last undone step
    pub fn redo(&mut self) -> Option<Vec<usize>> {
        let changed = self.history.redo(&mut self.rows)?;
        self.autosave.notify_mutation(Instant::now());
        Some(changed)
    }

    fn apply_snapshot(&mut self, snapshot: &Snapshot) -> Vec<usize> {
        if snapshot.len() != self.rows.len() {
            tracing::warn!(
                "{}",
                ReviewError::Validation(format!(
                    "saved state has {} rows, statement has {}",
                    snapshot.len(),
                    self.rows.len()
                ))
            );
        }
        snapshot.apply(&mut self.rows)
    }

    // Persistence

    /// Save now: record a history point if anything changed and push the
    /// state through the gateway
    pub fn save(&mut self, gateway: &Gateway) -> ReviewResult<Snapshot> {
        let snapshot = self.snapshot();
        if self.history.baseline() != Some(&snapshot) {
            self.history.commit(&self.rows);
        }
        gateway.save_state(&snapshot)?;
        Ok(snapshot)
    }

    /// Save if the autosave quiet window has elapsed
    pub fn flush_if_due(&mut self, gateway: &Gateway, now: Instant) -> ReviewResult<bool> {
        if !self.autosave.take_due(now) {
            return Ok(false);
        }
        self.save(gateway)?;
        Ok(true)
    }

    /// Save any pending change immediately
    pub fn flush(&mut self, gateway: &Gateway) -> ReviewResult<bool> {
        if !self.autosave.take_pending() {
            return Ok(false);
        }
        self.save(gateway)?;
        Ok(true)
    }

    /// Persist the rule list
    pub fn save_rules(&self, gateway: &Gateway) -> ReviewResult<()> {
        gateway.save_rules(&self.rules)
    }

    // Import / export

    /// Replace the rules from an exported JSON document
    ///
    /// The document is fully parsed first; on error the current rules are
    /// kept. Invalid entries are skipped.
    pub fn import_rules_json(&mut self, json: &str) -> ReviewResult<ClassifySummary> {
        let rules = codec::import_rules_json(json)?;
        tracing::info!(count = rules.len(), "Imported rules");
        Ok(self.replace_rules(rules))
    }

    /// Write the rules as pretty-printed JSON
    pub fn export_rules_json<W: Write>(&self, writer: &mut W) -> ReviewResult<()> {
        codec::export_rules_json(&self.rules, writer)
    }

    /// Apply an exported classification state
    ///
    /// The document is fully parsed first; on error nothing changes.
    /// Returns the indices whose category type changed.
    pub fn import_state_json(&mut self, json: &str) -> ReviewResult<Vec<usize>> {
        let state = codec::import_state_json(json)?;
        let changed = self.apply_snapshot(&state);
        self.history.commit(&self.rows);
        self.autosave.notify_mutation(Instant::now());
        Ok(changed)
    }

    /// Write the current classification state as pretty-printed JSON
    pub fn export_state_json<W: Write>(&self, writer: &mut W) -> ReviewResult<()> {
        codec::export_state_json(&self.snapshot(), writer)
    }
}

/// Load saved rule state, falling back to the configured rules when none
/// has been saved
pub fn load_rules_with_fallback(storage: &Storage) -> ReviewResult<(Vec<Rule>, RulesOrigin)> {
    match storage.gateway.load_rules() {
        Ok(rules) => Ok((rules, RulesOrigin::Saved)),
        Err(e) if e.is_not_found() => {
            tracing::info!("No saved rule state; using configured rules");
            Ok((storage.load_configured_rules()?, RulesOrigin::Configured))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ReviewPaths;
    use crate::models::{Money, TransactionType};
    use crate::storage::MemoryBackend;
    use chrono::NaiveDate;
    use std::time::Duration;
    use tempfile::TempDir;

    fn rows() -> Vec<TransactionRow> {
        let date = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        vec![
            TransactionRow::new(date, "TARIFA PACOTE", Money::from_cents(-2990), TransactionType::Debit),
            TransactionRow::new(date, "PIX RECEBIDO", Money::from_cents(50000), TransactionType::Credit)
                .with_contact("ACME LTDA"),
            TransactionRow::new(date, "ALUGUEL", Money::from_cents(-150000), TransactionType::Debit),
        ]
    }

    fn taxonomy() -> Taxonomy {
        crate::config::defaults::default_taxonomy().unwrap()
    }

    fn session(rules: Vec<Rule>) -> ReviewSession {
        ReviewSession::new(rows(), rules, taxonomy(), &Settings::default())
    }

    fn memory_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReviewPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::with_backend(paths, Box::new(MemoryBackend::new()));
        (temp_dir, storage)
    }

    fn later() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    #[test]
    fn test_add_rule_classifies_pending_rows() {
        let mut session = session(vec![]);
        let summary = session
            .add_rule(Rule::new(vec!["TARIFA".into()], "Financial costs", "Bank fees"))
            .unwrap();

        assert_eq!(summary.classified, 1);
        assert_eq!(session.rows()[0].category_name.as_deref(), Some("Bank fees"));
        assert!(session.rows()[0].auto_classified);
    }

    #[test]
    fn test_add_invalid_rule_rejected() {
        let mut session = session(vec![]);
        let err = session.add_rule(Rule::new(vec![], "", "")).unwrap_err();
        assert!(err.is_validation());
        assert!(session.rules().is_empty());
    }

    #[test]
    fn test_rule_identity_survives_removal() {
        let first = Rule::new(vec!["TARIFA".into()], "Financial costs", "Bank fees");
        let second = Rule::new(vec!["ALUGUEL".into()], "Expenses", "Rent");
        let second_id = second.id;
        let mut session = session(vec![first.clone(), second]);

        session.remove_rule(first.id).unwrap();
        session.update_rule_field(second_id, "memo", "office").unwrap();

        assert_eq!(session.rules().len(), 1);
        assert_eq!(session.rules()[0].memo.as_deref(), Some("office"));
        assert_eq!(session.rows()[2].memo.as_deref(), Some("office"));
        assert!(session.remove_rule(first.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_unknown_field_is_validation_error() {
        let rule = Rule::new(vec![], "Expenses", "");
        let id = rule.id;
        let mut session = session(vec![rule]);

        let err = session.update_rule_field(id, "colour", "red").unwrap_err();
        assert!(err.is_validation());

        // Blanking both categories would leave an invalid rule
        session.update_rule_field(id, "category_name", "").unwrap();
        let err = session.update_rule_field(id, "category_type", "").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(session.rules()[0].category_type, "Expenses");
    }

    #[test]
    fn test_find_rule_by_short_reference() {
        let rule = Rule::new(vec![], "Expenses", "");
        let short = rule.id.to_string();
        let session = session(vec![rule]);
        assert!(session.find_rule(&short).is_ok());
        assert!(session.find_rule("rul-zzzzzzzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_validated_rows_survive_rule_changes() {
        let mut session = session(vec![]);
        session.set_row_status(0, RowStatus::Validated).unwrap();
        session
            .add_rule(Rule::new(vec![], "Expenses", "Suppliers"))
            .unwrap();

        assert!(session.rows()[0].category_type.is_none());
        assert_eq!(session.rows()[2].category_name.as_deref(), Some("Suppliers"));
    }

    #[test]
    fn test_illegal_status_transition() {
        let mut session = session(vec![]);
        session.set_row_status(1, RowStatus::Canceled).unwrap();
        let err = session.set_row_status(1, RowStatus::Validated).unwrap_err();
        assert!(err.is_validation());
        assert!(session.set_row_status(9, RowStatus::Pending).unwrap_err().is_not_found());
    }

    #[test]
    fn test_edit_row_category_returns_choices() {
        let mut session = session(vec![]);
        let choices = session
            .edit_row_category(2, Some("Expenses".into()), None)
            .unwrap();
        assert!(choices.suggested.contains(&"Rent".to_string()));
        assert!(choices.other.contains(&"Sales".to_string()));
        assert!(session
            .category_options(2)
            .unwrap()
            .contains(&"Expenses".to_string()));
    }

    #[test]
    fn test_undo_redo_report_changed_rows() {
        let mut session = session(vec![]);
        session.commit();
        session
            .edit_row_category(1, Some("Receipts".into()), Some("Sales".into()))
            .unwrap();
        session.commit();

        assert_eq!(session.undo(), Some(vec![1]));
        assert!(session.rows()[1].category_type.is_none());
        assert_eq!(session.redo(), Some(vec![1]));
        assert!(session.redo().is_none());
    }

    #[test]
    fn test_autosave_commits_and_saves_once() {
        let (_temp, storage) = memory_storage();
        let mut session = session(vec![]);
        session.commit();

        session.edit_row_category(0, Some("Taxes".into()), None).unwrap();
        session.set_row_memo(0, Some("march".into())).unwrap();

        assert!(!session.flush_if_due(&storage.gateway, Instant::now()).unwrap());
        assert!(session.flush_if_due(&storage.gateway, later()).unwrap());
        assert!(!session.flush_if_due(&storage.gateway, later()).unwrap());

        let saved = storage.gateway.load_state().unwrap();
        assert_eq!(saved, session.snapshot());
        assert_eq!(session.history().undo_len(), 1);
    }

    #[test]
    fn test_save_after_undo_keeps_redo() {
        let (_temp, storage) = memory_storage();
        let mut session = session(vec![]);
        session.commit();
        session.edit_row_category(0, Some("Taxes".into()), None).unwrap();
        session.save(&storage.gateway).unwrap();

        session.undo().unwrap();
        assert!(session.flush(&storage.gateway).unwrap());
        assert!(session.history().can_redo());
        assert!(storage.gateway.load_state().unwrap().states()[0]
            .category_type
            .is_none());
    }

    #[test]
    fn test_import_rules_failure_keeps_rules() {
        let rule = Rule::new(vec!["TARIFA".into()], "Financial costs", "Bank fees");
        let mut session = session(vec![rule.clone()]);

        assert!(session.import_rules_json("[{\"broken\"").unwrap_err().is_parse());
        assert_eq!(session.rules(), &[rule]);
    }

    #[test]
    fn test_import_legacy_rules_with_blank_contact() {
        let mut session = session(vec![]);
        let json = r#"[
            {"descricao_contain": ["PIX"], "contato_igual": "", "tipo": "Receipts", "categoria": "Sales"},
            {"descricao_contain": ["TARIFA"], "contato_igual": "", "tipo": "", "categoria": ""},
            {"descricao_contain": ["ALUGUEL"], "contato_igual": "", "tipo": "Expenses", "categoria": "Rent"}
        ]"#;

        let summary = session.import_rules_json(json).unwrap();
        assert_eq!(session.rules().len(), 2);
        assert_eq!(summary.classified, 2);
        assert_eq!(session.rows()[1].category_type.as_deref(), Some("Receipts"));
        assert_eq!(session.rows()[1].display_contact(), Some("ACME LTDA"));
        assert_eq!(session.rows()[2].category_name.as_deref(), Some("Rent"));
        assert!(session.rows()[0].category_type.is_none());
    }

    #[test]
    fn test_rules_export_import_round_trip() {
        let source = session(vec![
            Rule::new(vec!["TARIFA".into()], "Financial costs", "Bank fees"),
            Rule::new(vec!["PIX".into()], "Receipts", "Sales").with_contact("ACME"),
        ]);
        let mut buffer = Vec::new();
        source.export_rules_json(&mut buffer).unwrap();

        let mut target = session(vec![]);
        let summary = target
            .import_rules_json(std::str::from_utf8(&buffer).unwrap())
            .unwrap();
        assert_eq!(target.rules(), source.rules());
        assert_eq!(summary.classified, 2);
        assert_eq!(target.rows()[1].display_contact(), Some("ACME"));
    }

    #[test]
    fn test_state_import_applies_and_commits() {
        let mut source = session(vec![]);
        source.edit_row_category(2, Some("Expenses".into()), Some("Rent".into())).unwrap();
        source.set_row_status(2, RowStatus::Validated).unwrap();
        let mut buffer = Vec::new();
        source.export_state_json(&mut buffer).unwrap();

        let mut target = session(vec![]);
        target.commit();
        let changed = target
            .import_state_json(std::str::from_utf8(&buffer).unwrap())
            .unwrap();
        assert_eq!(changed, vec![2]);
        assert_eq!(target.rows()[2].status, RowStatus::Validated);
        assert!(target.history().can_undo());

        assert!(target.import_state_json("nope").unwrap_err().is_parse());
        assert_eq!(target.rows()[2].status, RowStatus::Validated);
    }

    #[test]
    fn test_open_falls_back_to_default_rules() {
        let (_temp, storage) = memory_storage();
        let (session, origin) = ReviewSession::open(&storage, &Settings::default()).unwrap();
        assert_eq!(origin, RulesOrigin::Configured);
        assert!(!session.rules().is_empty());
    }

    #[test]
    fn test_open_applies_saved_state() {
        let (_temp, storage) = memory_storage();
        storage.save_rows(&rows()).unwrap();

        let mut first = session(vec![]);
        first.edit_row_category(1, Some("Receipts".into()), None).unwrap();
        first.save(&storage.gateway).unwrap();
        storage.gateway.save_rules(&[]).unwrap();

        let (reopened, origin) = ReviewSession::open(&storage, &Settings::default()).unwrap();
        assert_eq!(origin, RulesOrigin::Saved);
        assert!(reopened.rules().is_empty());
        assert_eq!(reopened.rows()[1].category_type.as_deref(), Some("Receipts"));
        assert!(reopened.history().baseline().is_some());
    }
}
