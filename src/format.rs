//! Display formatting for table cells
//!
//! Maps a raw cell value plus a column format to the string shown on screen,
//! using Brazilian locale conventions:
//! - Thousands separator: `.` (period)
//! - Decimal separator: `,` (comma)
//!
//! Formatting never fails. Anything that cannot be rendered per its format
//! falls back to the value's plain string form.

use std::collections::HashMap;
use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A raw cell as held by the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellValue {
    /// Missing value (null or not-a-number in the source file)
    #[default]
    Empty,
    Number(Decimal),
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<Option<Decimal>> for CellValue {
    fn from(value: Option<Decimal>) -> Self {
        value.map(CellValue::Number).unwrap_or(CellValue::Empty)
    }
}

impl From<Option<&str>> for CellValue {
    fn from(value: Option<&str>) -> Self {
        value
            .map(|s| CellValue::Text(s.to_string()))
            .unwrap_or(CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{}", n.normalize()),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// How a column is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatSpec {
    Text,
    /// `R$ 1.234,56`
    BrlCurrency,
    /// `12,34%` (value already in percent points)
    Percent,
    /// `1.234.567`
    IntegerGrouped,
    /// `1.234,5678` with the given number of decimal digits
    FixedFloat(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Center,
}

/// Alignment hint consumed by rendering surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAlignment {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl FormatSpec {
    pub fn is_numeric(self) -> bool {
        !matches!(self, FormatSpec::Text)
    }

    pub fn alignment(self) -> CellAlignment {
        let horizontal = if self.is_numeric() {
            HorizontalAlign::Right
        } else {
            HorizontalAlign::Left
        };
        CellAlignment {
            horizontal,
            vertical: VerticalAlign::Center,
        }
    }
}

/// Column name -> format lookup. Unknown columns render as text.
#[derive(Debug, Clone, Default)]
pub struct ColumnFormats {
    by_name: HashMap<String, FormatSpec>,
}

impl ColumnFormats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, spec: FormatSpec) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: FormatSpec) {
        self.by_name.insert(name.into(), spec);
    }

    pub fn get(&self, name: &str) -> Option<FormatSpec> {
        self.by_name.get(name).copied()
    }

    pub fn resolve(&self, name: &str) -> FormatSpec {
        self.get(name).unwrap_or(FormatSpec::Text)
    }
}

impl<S: Into<String>> FromIterator<(S, FormatSpec)> for ColumnFormats {
    fn from_iter<I: IntoIterator<Item = (S, FormatSpec)>>(iter: I) -> Self {
        let mut formats = ColumnFormats::new();
        for (name, spec) in iter {
            formats.insert(name, spec);
        }
        formats
    }
}

/// Render a cell according to its column format.
pub fn format_value(value: &CellValue, spec: FormatSpec) -> String {
    let number = match value {
        CellValue::Empty => return String::new(),
        CellValue::Text(s) => return s.clone(),
        CellValue::Number(n) => *n,
    };

    match spec {
        FormatSpec::Text => value.to_string(),
        FormatSpec::Percent => format!("{}%", format_fixed(number, 2, false)),
        FormatSpec::BrlCurrency => format!("R$ {}", format_fixed(number, 2, true)),
        FormatSpec::IntegerGrouped => match number.trunc().to_i128() {
            Some(int) => {
                let sign = if int < 0 { "-" } else { "" };
                format!("{}{}", sign, group_thousands(&int.unsigned_abs().to_string()))
            }
            None => value.to_string(),
        },
        FormatSpec::FixedFloat(precision) => format_fixed(number, precision, true),
    }
}

/// Fixed-point rendering with `,` as decimal separator and optional `.` grouping.
fn format_fixed(value: Decimal, precision: u32, grouped: bool) -> String {
    let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    let is_negative = rounded < Decimal::ZERO;

    let formatted = format!("{:.*}", precision as usize, rounded.abs());
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (formatted.as_str(), None),
    };

    let integer_part = if grouped {
        group_thousands(integer_part)
    } else {
        integer_part.to_string()
    };

    let sign = if is_negative { "-" } else { "" };
    match decimal_part {
        Some(dec) => format!("{}{},{}", sign, integer_part, dec),
        None => format!("{}{}", sign, integer_part),
    }
}

/// Insert `.` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let grouped: Vec<char> = digits
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec!['.', c]
            } else {
                vec![c]
            }
        })
        .collect();
    grouped.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn num(d: Decimal) -> CellValue {
        CellValue::Number(d)
    }

    #[test]
    fn test_empty_renders_blank_for_every_spec() {
        for spec in [
            FormatSpec::Text,
            FormatSpec::BrlCurrency,
            FormatSpec::Percent,
            FormatSpec::IntegerGrouped,
            FormatSpec::FixedFloat(2),
        ] {
            assert_eq!(format_value(&CellValue::Empty, spec), "");
        }
    }

    #[test]
    fn test_text_is_unmodified() {
        let v = CellValue::Text("HGLG11".to_string());
        assert_eq!(format_value(&v, FormatSpec::Text), "HGLG11");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_value(&num(dec!(12.34)), FormatSpec::Percent), "12,34%");
        assert_eq!(format_value(&num(dec!(0.08)), FormatSpec::Percent), "0,08%");
        assert_eq!(format_value(&num(dec!(7)), FormatSpec::Percent), "7,00%");
        // No thousands grouping for percentages
        assert_eq!(format_value(&num(dec!(1234.5)), FormatSpec::Percent), "1234,50%");
        assert_eq!(format_value(&num(dec!(-3.456)), FormatSpec::Percent), "-3,46%");
    }

    #[test]
    fn test_brl_currency() {
        assert_eq!(format_value(&num(dec!(1234.56)), FormatSpec::BrlCurrency), "R$ 1.234,56");
        assert_eq!(format_value(&num(dec!(0.99)), FormatSpec::BrlCurrency), "R$ 0,99");
        assert_eq!(
            format_value(&num(dec!(1234567.8)), FormatSpec::BrlCurrency),
            "R$ 1.234.567,80"
        );
        assert_eq!(format_value(&num(dec!(999.999)), FormatSpec::BrlCurrency), "R$ 1.000,00");
        assert_eq!(format_value(&num(dec!(-500)), FormatSpec::BrlCurrency), "R$ -500,00");
    }

    #[test]
    fn test_integer_grouped_truncates() {
        assert_eq!(format_value(&num(dec!(1234567)), FormatSpec::IntegerGrouped), "1.234.567");
        assert_eq!(format_value(&num(dec!(999.9)), FormatSpec::IntegerGrouped), "999");
        assert_eq!(format_value(&num(dec!(-1234.7)), FormatSpec::IntegerGrouped), "-1.234");
        assert_eq!(format_value(&num(dec!(0)), FormatSpec::IntegerGrouped), "0");
    }

    #[test]
    fn test_fixed_float() {
        assert_eq!(format_value(&num(dec!(0.9712)), FormatSpec::FixedFloat(2)), "0,97");
        assert_eq!(format_value(&num(dec!(1234.5)), FormatSpec::FixedFloat(3)), "1.234,500");
        assert_eq!(format_value(&num(dec!(1234.5)), FormatSpec::FixedFloat(0)), "1.235");
    }

    #[test]
    fn test_non_numeric_falls_back_to_plain_string() {
        let v = CellValue::Text("n/d".to_string());
        assert_eq!(format_value(&v, FormatSpec::Percent), "n/d");
        assert_eq!(format_value(&v, FormatSpec::BrlCurrency), "n/d");
        assert_eq!(format_value(&v, FormatSpec::IntegerGrouped), "n/d");
        assert_eq!(format_value(&v, FormatSpec::FixedFloat(2)), "n/d");
    }

    #[test]
    fn test_number_under_text_spec_uses_plain_form() {
        assert_eq!(format_value(&num(dec!(1.50)), FormatSpec::Text), "1.5");
    }

    #[test]
    fn test_alignment_hints() {
        assert_eq!(FormatSpec::Text.alignment().horizontal, HorizontalAlign::Left);
        for spec in [
            FormatSpec::BrlCurrency,
            FormatSpec::Percent,
            FormatSpec::IntegerGrouped,
            FormatSpec::FixedFloat(4),
        ] {
            let align = spec.alignment();
            assert_eq!(align.horizontal, HorizontalAlign::Right);
            assert_eq!(align.vertical, VerticalAlign::Center);
        }
    }

    #[test]
    fn test_column_formats_resolve_unknown_as_text() {
        let formats = ColumnFormats::new().with("DY", FormatSpec::Percent);
        assert_eq!(formats.resolve("DY"), FormatSpec::Percent);
        assert_eq!(formats.resolve("???"), FormatSpec::Text);
    }

    #[test]
    fn test_currency_shape_over_many_values() {
        let values = [dec!(0), dec!(1), dec!(12.3), dec!(1000), dec!(98765.43), dec!(10000000.01)];
        for v in values {
            let out = format_value(&num(v), FormatSpec::BrlCurrency);
            let body = out.strip_prefix("R$ ").expect("missing prefix");
            let (int_part, frac) = body.split_once(',').expect("missing decimal comma");
            assert_eq!(frac.len(), 2);
            for (i, group) in int_part.split('.').enumerate() {
                if i > 0 {
                    assert_eq!(group.len(), 3, "bad group in {}", out);
                }
                assert!(group.chars().all(|c| c.is_ascii_digit()));
            }
        }
    }
}
