//! Built-in taxonomy and starter rules
//!
//! Used when the data directory has no taxonomy or rules file and no rule
//! state has been saved yet.

use crate::error::{ReviewError, ReviewResult};
use crate::models::{Rule, Taxonomy};

const DEFAULT_TAXONOMY: &str = include_str!("../../assets/default_taxonomy.json");
const DEFAULT_RULES: &str = include_str!("../../assets/default_rules.json");

/// The built-in category taxonomy
pub fn default_taxonomy() -> ReviewResult<Taxonomy> {
    serde_json::from_str(DEFAULT_TAXONOMY)
        .map_err(|e| ReviewError::Config(format!("Built-in taxonomy is invalid: {}", e)))
}

/// The starter rule set, each rule with a fresh id
pub fn default_rules() -> ReviewResult<Vec<Rule>> {
    serde_json::from_str(DEFAULT_RULES)
        .map_err(|e| ReviewError::Config(format!("Built-in rules are invalid: {}", e)))
}
