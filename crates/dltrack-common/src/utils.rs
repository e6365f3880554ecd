//! Shared date and number formatting helpers.

use chrono::{Local, NaiveDate};

/// Date format used in the ledger's `date` column.
pub const LEDGER_DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Formats a date for the ledger's `date` column.
pub fn format_ledger_date(date: NaiveDate) -> String {
    date.format(LEDGER_DATE_FORMAT).to_string()
}

/// Parses a ledger `date` cell.
pub fn parse_ledger_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), LEDGER_DATE_FORMAT).ok()
}

/// Formats a count with comma thousands separators (`1234567` -> `1,234,567`).
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Truncates a string to a maximum number of characters with an ellipsis.
pub fn truncate_string(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
