//! Category taxonomy
//!
//! The configured mapping between transaction types and category types, and
//! between category names and the category types they apply to. Both maps
//! keep the order in which they were configured; suggestion lists are
//! rendered in that order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::transaction::TransactionType;

/// Category taxonomy consulted by the classifier and the category pickers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Transaction type label -> category types offered for it
    #[serde(default, alias = "tipos_por_transacao", with = "ordered_map")]
    pub types_by_transaction: Vec<(String, Vec<String>)>,

    /// Category name -> category types it applies to
    #[serde(default, alias = "categorias_por_tipo", with = "ordered_map")]
    pub categories_by_type: Vec<(String, Vec<String>)>,
}

/// Category names split around the picker separator
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryChoices {
    /// Names configured for the selected type, shown first
    pub suggested: Vec<String>,
    /// Everything else, shown after the separator
    pub other: Vec<String>,
}

impl CategoryChoices {
    /// Flatten into picker order, with `separator` between the two groups
    pub fn flatten(&self, separator: &str) -> Vec<String> {
        let mut out = self.suggested.clone();
        if !self.suggested.is_empty() && !self.other.is_empty() {
            out.push(separator.to_string());
        }
        out.extend(self.other.iter().cloned());
        out
    }
}

impl Taxonomy {
    /// Category types configured for a transaction type, empty if none
    pub fn category_options(&self, transaction_type: TransactionType) -> Vec<String> {
        self.types_by_transaction
            .iter()
            .find(|(key, _)| {
                key.parse::<TransactionType>()
                    .map(|t| t == transaction_type)
                    .unwrap_or(false)
            })
            .map(|(_, types)| types.clone())
            .unwrap_or_default()
    }

    /// Partition every category name by whether `selected_type` applies to it
    pub fn suggested_categories(&self, selected_type: &str) -> CategoryChoices {
        let mut choices = CategoryChoices::default();
        for (name, types) in &self.categories_by_type {
            if types.iter().any(|t| t == selected_type) {
                choices.suggested.push(name.clone());
            } else {
                choices.other.push(name.clone());
            }
        }
        choices
    }

    /// Every category type mentioned for any transaction type, sorted
    pub fn all_category_types(&self) -> Vec<String> {
        self.types_by_transaction
            .iter()
            .flat_map(|(_, types)| types.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Check if the taxonomy has nothing configured
    pub fn is_empty(&self) -> bool {
        self.types_by_transaction.is_empty() && self.categories_by_type.is_empty()
    }
}

/// (De)serialize an ordered list of pairs as a JSON object, keeping key order
mod ordered_map {
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    type Pairs = Vec<(String, Vec<String>)>;

    pub fn serialize<S: Serializer>(pairs: &Pairs, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(pairs.len()))?;
        for (key, values) in pairs {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pairs, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = Pairs;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "an object mapping names to lists of strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Pairs, A::Error> {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, values)) = access.next_entry::<String, Vec<String>>()? {
                    pairs.push((key, values));
                }
                Ok(pairs)
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}
