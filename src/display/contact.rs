//! Contact display formatting

use crate::models::Contact;

/// Format the contact list as a table
pub fn format_contact_list(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return "No contacts found.".to_string();
    }

    let name_width = contacts
        .iter()
        .map(|c| c.display_name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:20} {:name_width$} {}\n",
        "Tax ID",
        "Name",
        "Legal name",
        name_width = name_width
    ));
    output.push_str(&"-".repeat(20 + name_width + 30));
    output.push('\n');

    for contact in contacts {
        output.push_str(&format!(
            "{:20} {:name_width$} {}\n",
            contact.tax_id,
            contact.display_name,
            contact.legal_name,
            name_width = name_width
        ));
    }

    output
}
