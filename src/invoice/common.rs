//! Common utilities for invoice generation.
//!
//! Invoice identifiers, issue dates and file names.

use chrono::{Local, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

pub const INVOICE_ID_PREFIX: &str = "INV-";
const INVOICE_ID_BYTES: usize = 6;
const PDF_EXTENSION: &str = ".pdf";
// Most file systems cap a single name at 255 bytes.
const MAX_FILE_NAME_BYTES: usize = 255;

/// Generate a fresh invoice id such as `INV-3FA85F6457B2`.
///
/// The random part comes from a v4 UUID, which draws on the operating
/// system's secure random source. Ids are never checked against history.
pub fn generate_invoice_id() -> String {
    let uuid = Uuid::new_v4();
    let hex: String = uuid.as_bytes()[..INVOICE_ID_BYTES]
        .iter()
        .map(|byte| format!("{:02X}", byte))
        .collect();
    format!("{}{}", INVOICE_ID_PREFIX, hex)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_issue_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn whitespace_run() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Derive the document file name `{invoice_id}_{customer_name}.pdf`.
///
/// Whitespace runs collapse to a single `_`; characters that are not allowed
/// in file names (path separators, control characters) are dropped. Long
/// names are shortened before the extension is added, so it always survives.
pub fn derive_file_name(invoice_id: &str, customer_name: &str) -> String {
    let raw = format!("{}_{}", invoice_id, customer_name);
    let collapsed = whitespace_run().replace_all(&raw, "_");
    let mut stem = sanitize_filename::sanitize(collapsed.as_ref());
    truncate_on_char_boundary(&mut stem, MAX_FILE_NAME_BYTES - PDF_EXTENSION.len());
    stem.push_str(PDF_EXTENSION);
    stem
}

fn truncate_on_char_boundary(value: &mut String, max_bytes: usize) {
    if value.len() <= max_bytes {
        return;
    }
    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value.truncate(end);
}
