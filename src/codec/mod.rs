//! Serialization formats for statement review
//!
//! - CSV: delimited text with sanitation, used by contacts and the report
//! - JSON: versioned export/import of rules and classification state
//! - Contacts: the contacts CSV column layout

pub mod contacts;
pub mod csv;
pub mod json;

pub use self::contacts::{decode_contacts, encode_contacts};
pub use self::csv::{CsvCodec, Record};
pub use self::json::{
    export_rules_json, export_state_json, import_rules_json, import_state_json,
    EXPORT_SCHEMA_VERSION,
};
