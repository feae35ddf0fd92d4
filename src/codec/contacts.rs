//! Contacts file format
//!
//! Contacts travel as `;`-delimited CSV with the column names of the
//! company registry export they were originally taken from.

use super::csv::{CsvCodec, Record};
use crate::error::ReviewResult;
use crate::models::Contact;

const TAX_ID: &str = "cpf_cnpj";
const DISPLAY_NAME: &str = "nome";
const LEGAL_NAME: &str = "razao_social";
const TRADE_NAME: &str = "nome_fantasia";

/// Column order written on export
pub const CONTACT_COLUMNS: [&str; 4] = [TAX_ID, DISPLAY_NAME, LEGAL_NAME, TRADE_NAME];

fn to_record(contact: &Contact) -> Record {
    Record::new()
        .with(TAX_ID, contact.tax_id.as_str())
        .with(DISPLAY_NAME, contact.display_name.as_str())
        .with(LEGAL_NAME, contact.legal_name.as_str())
        .with(TRADE_NAME, contact.trade_name.as_str())
}

fn from_record(record: &Record) -> Contact {
    let field = |name: &str| record.get(name).unwrap_or_default().to_string();
    Contact {
        tax_id: field(TAX_ID),
        legal_name: field(LEGAL_NAME),
        trade_name: field(TRADE_NAME),
        display_name: field(DISPLAY_NAME),
    }
}

/// Encode contacts as CSV text
pub fn encode_contacts(contacts: &[Contact]) -> ReviewResult<String> {
    let records: Vec<Record> = contacts.iter().map(to_record).collect();
    CsvCodec::contacts().encode(&records)
}

/// Decode contacts from CSV text; unknown columns are ignored
pub fn decode_contacts(raw: &str) -> ReviewResult<Vec<Contact>> {
    let records = CsvCodec::contacts().decode(raw)?;
    Ok(records.iter().map(from_record).collect())
}
