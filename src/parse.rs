//! Text-to-number parsing for user input and CSV cells.
//!
//! A single locale convention is used (pt-BR): `.` is a thousands separator
//! and `,` is the decimal separator. Currency and percent symbols are
//! stripped. `"1.234,56"` parses as 1234.56 and `"0,94"` as 0.94. A `.` that
//! does not sit between full groups of three digits (`"0.94"`, `"1.2.3"`) is
//! rejected rather than guessed at.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ScreenerError;

/// Parse a pt-BR formatted number.
///
/// Empty input is an error here; use [`parse_bound`] when empty means "unset".
pub fn parse_number(text: &str) -> Result<Decimal, ScreenerError> {
    let cleaned: String = text
        .replace("R$", "")
        .replace('%', "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || cleaned == "-" {
        return Err(ScreenerError::Parse(format!("empty number: {:?}", text)));
    }

    let (sign, unsigned) = match cleaned.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", cleaned.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once(',') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    let digits = ungroup(int_part).ok_or_else(|| {
        ScreenerError::Parse(format!("misplaced thousands separator in {:?}", text))
    })?;

    let canonical = match frac_part {
        Some(frac) => format!("{}{}.{}", sign, digits, frac),
        None => format!("{}{}", sign, digits),
    };
    Decimal::from_str(&canonical)
        .map_err(|e| ScreenerError::Parse(format!("invalid number {:?}: {}", text, e)))
}

/// Drop `.` grouping from an integer part: 1-3 leading digits, then groups
/// of exactly three. `None` when the dots are anywhere else.
fn ungroup(int_part: &str) -> Option<String> {
    if !int_part.contains('.') {
        return Some(int_part.to_string());
    }
    let mut groups = int_part.split('.');
    let head = groups.next()?;
    if head.is_empty() || head.len() > 3 {
        return None;
    }
    let mut digits = head.to_string();
    for group in groups {
        if group.len() != 3 {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}

/// Parse a range bound typed by the user.
///
/// Blank or unparsable text yields `None`, which callers treat as an absent
/// bound. Never fails.
pub fn parse_bound(text: &str) -> Option<Decimal> {
    if text.trim().is_empty() {
        return None;
    }
    match parse_number(text) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Ignoring range bound: {}", e);
            None
        }
    }
}
