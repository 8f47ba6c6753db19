use std::cmp::Ordering;

use chrono::NaiveDate;

/// How a column's values are compared when sorting.
///
/// Decided per column, never by looking at the values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    /// Case-sensitive string comparison.
    Text,
    /// Floating point comparison; unparseable values count as 0.
    Numeric,
    /// Calendar comparison of `DD-MM-YYYY` (or `YYYY-MM-DD`) dates.
    Date,
}

impl SortKind {
    /// Compares two field values according to this kind.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            SortKind::Text => a.cmp(b),
            SortKind::Numeric => parse_number(a).total_cmp(&parse_number(b)),
            SortKind::Date => parse_date(a).cmp(&parse_date(b)),
        }
    }
}

/// Parses a number, defaulting to 0.
pub fn parse_number(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

/// Parses a day in `DD-MM-YYYY` form, falling back to `YYYY-MM-DD`.
///
/// Unparseable dates sort before every valid date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%d-%m-%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()
}

/// Renders a number the way it is displayed and searched.
///
/// Whole numbers lose the trailing `.0` so `5000.0` searches as `5000`.
pub fn number_text(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
