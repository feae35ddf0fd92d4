//! JSON export and import of rules and classification state
//!
//! Exports are pretty-printed and wrapped in a versioned envelope. Imports
//! accept either the envelope or a bare array (the format older exports and
//! hand-written files use), and are fully parsed and validated before the
//! caller is handed anything to install.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;

use crate::error::{ReviewError, ReviewResult};
use crate::models::{Rule, RuleId, Snapshot};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Exported rule set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub rules: Vec<Rule>,
}

/// Exported classification state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub state: Snapshot,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RulesDocument {
    Envelope(RulesExport),
    Bare(Vec<Rule>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StateDocument {
    Envelope(StateExport),
    Bare(Snapshot),
}

impl RulesExport {
    pub fn new(rules: &[Rule]) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            rules: rules.to_vec(),
        }
    }
}

impl StateExport {
    pub fn new(state: &Snapshot) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            state: state.clone(),
        }
    }
}

/// Write rules as pretty-printed JSON
pub fn export_rules_json<W: Write>(rules: &[Rule], writer: &mut W) -> ReviewResult<()> {
    serde_json::to_writer_pretty(writer, &RulesExport::new(rules))
        .map_err(|e| ReviewError::Export(e.to_string()))
}

/// Write classification state as pretty-printed JSON
pub fn export_state_json<W: Write>(state: &Snapshot, writer: &mut W) -> ReviewResult<()> {
    serde_json::to_writer_pretty(writer, &StateExport::new(state))
        .map_err(|e| ReviewError::Export(e.to_string()))
}

/// Parse and validate an exported rule set
///
/// Only a malformed document is an error. Rules that fail validation are
/// skipped with a warning. Duplicate ids are re-keyed so every imported rule
/// keeps a distinct identity.
pub fn import_rules_json(json_str: &str) -> ReviewResult<Vec<Rule>> {
    let document: RulesDocument =
        serde_json::from_str(json_str).map_err(|e| ReviewError::Parse(e.to_string()))?;

    let rules = match document {
        RulesDocument::Envelope(export) => {
            check_schema_version(&export.schema_version)?;
            export.rules
        }
        RulesDocument::Bare(rules) => rules,
    };

    let mut seen: HashSet<RuleId> = HashSet::new();
    let mut accepted = Vec::with_capacity(rules.len());
    for (index, mut rule) in rules.into_iter().enumerate() {
        if let Err(e) = rule.validate() {
            tracing::warn!(rule = index + 1, error = %e, "Skipping invalid rule");
            continue;
        }
        if !seen.insert(rule.id) {
            rule.id = RuleId::new();
            seen.insert(rule.id);
        }
        accepted.push(rule);
    }

    Ok(accepted)
}

/// Parse an exported classification state
pub fn import_state_json(json_str: &str) -> ReviewResult<Snapshot> {
    let document: StateDocument =
        serde_json::from_str(json_str).map_err(|e| ReviewError::Parse(e.to_string()))?;

    match document {
        StateDocument::Envelope(export) => {
            check_schema_version(&export.schema_version)?;
            Ok(export.state)
        }
        StateDocument::Bare(state) => Ok(state),
    }
}

fn check_schema_version(version: &str) -> ReviewResult<()> {
    let major = |v: &str| v.split('.').next().map(str::to_string);
    if major(version) != major(EXPORT_SCHEMA_VERSION) {
        return Err(ReviewError::Parse(format!(
            "Schema version mismatch: expected {}, got {}",
            EXPORT_SCHEMA_VERSION, version
        )));
    }
    Ok(())
}
