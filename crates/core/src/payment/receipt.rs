//! Receipt numbers: `REC-YYYYMMDD-NNNN`.

use chrono::NaiveDate;

/// Prefix of every receipt number.
pub const RECEIPT_PREFIX: &str = "REC";

/// Smallest four-digit suffix.
pub const RECEIPT_SUFFIX_MIN: u16 = 1000;

/// Largest four-digit suffix.
pub const RECEIPT_SUFFIX_MAX: u16 = 9999;

/// Formats a receipt number for a payment recorded on `date`.
///
/// `suffix` is clamped into the four-digit range.
#[must_use]
pub fn receipt_number(date: NaiveDate, suffix: u16) -> String {
    let suffix = suffix.clamp(RECEIPT_SUFFIX_MIN, RECEIPT_SUFFIX_MAX);
    format!("{RECEIPT_PREFIX}-{}-{suffix}", date.format("%Y%m%d"))
}

/// Returns true if `value` has the receipt number shape.
#[must_use]
pub fn is_receipt_number(value: &str) -> bool {
    let mut parts = value.split('-');
    let (Some(prefix), Some(date), Some(suffix), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    prefix == RECEIPT_PREFIX
        && NaiveDate::parse_from_str(date, "%Y%m%d").is_ok()
        && date.len() == 8
        && suffix.len() == 4
        && suffix.bytes().all(|b| b.is_ascii_digit())
        && !suffix.starts_with('0')
}
