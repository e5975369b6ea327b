//! Common utilities for document generation.
//!
//! Shared helpers for company details, date formatting and markup escaping.

use chrono::{Datelike, Local, NaiveDate};

pub const COMPANY_NAME: &str = "Indus Technical Services LLC";
pub const COMPANY_ADDRESS: &str = "P.O. Box 241075 Dubai, UAE";

/// Format an ISO date (`2024-03-05`) as `05 March, 2024`.
///
/// Anything that does not parse is returned unchanged.
pub fn format_long_date(value: &str) -> String {
    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%d %B, %Y").to_string(),
        Err(_) => value.to_string(),
    }
}

/// Current calendar year in local time, used in the document footer.
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Escape special characters for HTML text and attribute values.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
