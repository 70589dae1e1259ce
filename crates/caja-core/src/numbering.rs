//! # Invoice Numbering
//!
//! Formatting and parsing of sequential invoice numbers.
//!
//! ## Number Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Normal:   FAC-000042         (prefix + 6-digit zero-padded seq)    │
//! │  Fallback: FAC-20260807153012 (prefix + YYYYMMDDHHMMSS timestamp)   │
//! │                                                                     │
//! │  The fallback is produced when the MAX-suffix query fails; it       │
//! │  keeps numbers unique but breaks suffix monotonicity, so the        │
//! │  parser here only recognizes the strict 6-digit form, so fallback   │
//! │  numbers never feed back into the sequence.                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The database query that finds the current maximum suffix lives in
//! caja-app; this module owns the pure format/parse half so the sequence
//! rules are testable without a store.

use chrono::NaiveDateTime;

/// Prefix shared by all invoice numbers.
pub const INVOICE_PREFIX: &str = "FAC-";

/// Width of the zero-padded sequential suffix.
pub const SUFFIX_DIGITS: usize = 6;

/// Formats a sequential invoice number: `format_invoice_number(42)` is
/// `"FAC-000042"`.
pub fn format_invoice_number(seq: u32) -> String {
    format!("{INVOICE_PREFIX}{seq:0width$}", width = SUFFIX_DIGITS)
}

/// Parses the numeric suffix of a sequential invoice number.
///
/// Only the strict form is accepted: the `FAC-` prefix followed by
/// exactly six ASCII digits. Timestamp fallback numbers (14 digits) and
/// foreign formats return `None`.
pub fn parse_invoice_suffix(number: &str) -> Option<u32> {
    let suffix = number.strip_prefix(INVOICE_PREFIX)?;
    if suffix.len() != SUFFIX_DIGITS || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Returns the successor of the highest known suffix, or 1 when none
/// exists yet.
pub fn next_suffix(current_max: Option<u32>) -> u32 {
    current_max.map_or(1, |max| max + 1)
}

/// Formats the timestamp fallback number, e.g. `FAC-20260807153012`.
///
/// Unique under normal clock behavior, but NOT sequential; callers must
/// tolerate it appearing among regular numbers.
pub fn fallback_invoice_number(now: NaiveDateTime) -> String {
    format!("{INVOICE_PREFIX}{}", now.format("%Y%m%d%H%M%S"))
}

// =============================================================================
// Unit Tests
// =============================================================================
