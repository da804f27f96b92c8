//! Display formatting for dashboard figures.
//!
//! All functions are total: `None`, NaN and infinite inputs format as zero,
//! and unparsable dates format as `"-"`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

pub const DEFAULT_NUMBER_DECIMALS: usize = 0;
pub const DEFAULT_PERCENT_DECIMALS: usize = 1;

/// Placeholder shown for absent or invalid dates.
pub const MISSING_DATE: &str = "-";

/// Converts a decimal amount for the `f64` based formatters.
pub fn amount(value: Decimal) -> Option<f64> {
    value.to_f64()
}

fn finite(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// US dollars, rounded to whole units, with thousands separators.
///
/// `format_currency(Some(-1234.56)) == "-$1,235"`
pub fn format_currency(value: Option<f64>) -> String {
    let rounded = finite(value).round();
    if rounded == 0.0 {
        return "$0".to_string();
    }

    let grouped = group_thousands(&format!("{:.0}", rounded.abs()));
    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Grouped number with exactly `decimals` fractional digits.
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    let value = finite(value);
    let fixed = format!("{:.*}", decimals, value.abs());

    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::new();
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// `format_percent(Some(25.5), 1) == "25.5%"`
pub fn format_percent(value: Option<f64>, decimals: usize) -> String {
    format!("{:.*}%", decimals, finite(value))
}

/// `"Mon D, YYYY"`, or `"-"` when the input is absent or not a date.
///
/// Accepts plain dates (`2024-01-15`), RFC 3339 timestamps and the
/// timezone-less timestamps Postgres emits for `timestamp` columns.
pub fn format_date(value: Option<&str>) -> String {
    value
        .and_then(parse_date)
        .map(format_naive_date)
        .unwrap_or_else(|| MISSING_DATE.to_string())
}

pub fn format_naive_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Parses the date forms the backend views produce.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Short form for axis labels: `1.2M`, `1.2K`, or the rounded integer.
pub fn format_compact_number(value: Option<f64>) -> String {
    let value = finite(value);

    // thresholds sit where the shorter form would round up to the next unit
    if value >= 999_950.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 999.5 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{}", value.round() as i64)
    }
}

/// Inserts `,` every three digits of an unsigned digit string.
fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}
