use chrono::{Datelike, NaiveDate};

use crate::sheet::Cell;

/// Date layouts a bank export can declare. Everything normalizes to ISO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    Ymd,
    Dmy,
    DmyDotted,
    Mdy,
}

impl DateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ymd => "YYYY-MM-DD",
            Self::Dmy => "DD/MM/YYYY",
            Self::DmyDotted => "DD.MM.YYYY",
            Self::Mdy => "MM/DD/YYYY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "YYYY-MM-DD" => Some(Self::Ymd),
            "DD/MM/YYYY" => Some(Self::Dmy),
            "DD.MM.YYYY" => Some(Self::DmyDotted),
            "MM/DD/YYYY" => Some(Self::Mdy),
            _ => None,
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            Self::Ymd => "%Y-%m-%d",
            Self::Dmy => "%d/%m/%Y",
            Self::DmyDotted => "%d.%m.%Y",
            Self::Mdy => "%m/%d/%Y",
        }
    }
}

/// Retry order when the configured format fails on a cell. Recovers from a
/// profile saved with the wrong format setting.
pub const FALLBACK_FORMATS: [DateFormat; 4] = [
    DateFormat::Mdy,
    DateFormat::Dmy,
    DateFormat::Ymd,
    DateFormat::DmyDotted,
];

// Excel serials for 2009-07-06 through 2036-11-21; anything outside is
// treated as a plain number, not a date.
const EXCEL_SERIAL_MIN: f64 = 40_000.0;
const EXCEL_SERIAL_MAX: f64 = 50_000.0;

const FREE_TEXT_YEAR_MIN: i32 = 2000;
const FREE_TEXT_YEAR_MAX: i32 = 2100;

const FREE_TEXT_PATTERNS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%B %d, %Y",
];

/// Parse a raw date cell with an explicit format, falling back to an Excel
/// epoch serial and then a small set of free-text layouts. Total — returns
/// None on anything unparseable.
pub fn parse_date(raw: &str, format: DateFormat) -> Option<NaiveDate> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(cleaned, format.pattern()) {
        return Some(d);
    }
    if let Some(d) = excel_serial_date(cleaned) {
        return Some(d);
    }
    free_text_date(cleaned)
}

/// Preferred format first, then the fixed fallback order.
pub fn parse_date_any(raw: &str, preferred: DateFormat) -> Option<NaiveDate> {
    if let Some(d) = parse_date(raw, preferred) {
        return Some(d);
    }
    for fmt in FALLBACK_FORMATS {
        if let Some(d) = parse_date(raw, fmt) {
            return Some(d);
        }
    }
    None
}

fn excel_serial_date(s: &str) -> Option<NaiveDate> {
    let serial: f64 = s.parse().ok()?;
    if serial <= EXCEL_SERIAL_MIN || serial >= EXCEL_SERIAL_MAX {
        return None;
    }
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(chrono::Duration::days(serial as i64))
}

fn free_text_date(s: &str) -> Option<NaiveDate> {
    for pattern in FREE_TEXT_PATTERNS {
        if let Ok(d) = NaiveDate::parse_from_str(s, pattern) {
            if d.year() > FREE_TEXT_YEAR_MIN && d.year() < FREE_TEXT_YEAR_MAX {
                return Some(d);
            }
        }
    }
    None
}

/// Parse a raw amount cell. Numbers are taken as-is; strings are stripped of
/// whitespace and everything but digits, comma, period and minus, with comma
/// normalized to a decimal point. `invert` flips the sign after parsing.
pub fn parse_amount(cell: &Cell, invert: bool) -> Option<f64> {
    let amount = match cell {
        Cell::Empty => return None,
        Cell::Number(n) => *n,
        Cell::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !c.is_whitespace())
                .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
                .collect::<String>()
                .replace(',', ".");
            cleaned.parse::<f64>().ok()?
        }
    };
    Some(if invert { -amount } else { amount })
}
