//! Cell coercion: raw spreadsheet cells to numbers or ISO dates.
//!
//! Everything here fails soft. A cell that cannot be coerced yields `None`,
//! never an error, so one malformed cell can only ever cost its own field.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::grid::Cell;

/// Spreadsheet error tokens treated as blank. Matched case-insensitively
/// after stripping one optional leading `#`. Enumerated from observed
/// sheets; extend as new tokens show up.
pub const ERROR_TOKENS: &[&str] = &[
    "N/A", "DIV/0!", "VALUE!", "REF!", "NAME?", "NUM!", "NULL!",
];

/// Placeholder the sheet uses for "no value yet".
const DASH_PLACEHOLDER: &str = "--";

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Date-only formats accepted in text cells.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m/%d/%y"];

/// Date-time formats accepted in text cells.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// True when `s` is a recognized spreadsheet error token.
pub fn is_error_token(s: &str) -> bool {
    let token = s.trim();
    let token = token.strip_prefix('#').unwrap_or(token);
    ERROR_TOKENS.iter().any(|t| token.eq_ignore_ascii_case(t))
}

/// Coerce a cell to a finite number.
///
/// Numbers pass through untouched (idempotent). Strings are trimmed, error
/// tokens and the `--` placeholder become `None`, and a trailing `%` is
/// stripped with the value divided by 100: an explicit percent suffix is
/// unambiguous, so `"12.5%"` is 0.125. Columns that store whole numbers
/// meaning percents are the schema's concern, not this function's
/// (see [`crate::parse::schema::Coercion::Percent`]). NaN and infinities
/// never escape.
pub fn coerce_numeric(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => {
            let t = s.trim();
            if t.is_empty() || t == DASH_PLACEHOLDER || is_error_token(t) {
                return None;
            }
            match t.strip_suffix('%') {
                Some(bare) => bare.trim().parse::<f64>().ok().map(|n| n / 100.0),
                None => t.parse::<f64>().ok(),
            }
        }
        Cell::Bool(_) | Cell::Empty => None,
    };
    value.filter(|n| n.is_finite())
}

/// True when a text cell carries an explicit trailing `%`.
pub fn has_percent_suffix(cell: &Cell) -> bool {
    matches!(cell, Cell::Text(s) if s.trim().ends_with('%'))
}

/// Coerce a cell to a fully qualified ISO-8601 date-time string.
///
/// Numeric cells are read as Excel serial dates (1899-12-30 epoch, which
/// absorbs the 1900 leap-year quirk for modern dates); text cells are tried
/// against a small set of known formats. Anything else is `None`.
pub fn coerce_date(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Number(n) => serial_to_datetime(*n).map(|dt| dt.format(ISO_FORMAT).to_string()),
        Cell::Text(s) => parse_date_text(s.trim()).map(|dt| dt.format(ISO_FORMAT).to_string()),
        Cell::Bool(_) | Cell::Empty => None,
    }
}

fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    // Serial 1 is 1900-01-01; anything below that or absurdly far out is
    // not a date the sheet could contain.
    if !serial.is_finite() || serial < 1.0 || serial > 2_958_465.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let days = serial.floor() as i64;
    let secs = ((serial - serial.floor()) * 86_400.0).round() as i64;
    let date = epoch.checked_add_signed(Duration::days(days))?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    midnight.checked_add_signed(Duration::seconds(secs))
}

fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers_pass_through() {
        assert_eq!(coerce_numeric(&Cell::Number(42.5)), Some(42.5));
        assert_eq!(coerce_numeric(&Cell::Number(-3.0)), Some(-3.0));
    }

    #[test]
    fn coercion_is_idempotent() {
        let once = coerce_numeric(&Cell::Number(0.052)).unwrap();
        assert_eq!(coerce_numeric(&Cell::Number(once)), Some(0.052));
    }

    #[test]
    fn numeric_strings_parse() {
        assert_eq!(coerce_numeric(&Cell::text(" 12.5 ")), Some(12.5));
        assert_eq!(coerce_numeric(&Cell::text("-0.7")), Some(-0.7));
    }

    #[test]
    fn percent_suffix_divides_by_hundred() {
        assert_eq!(coerce_numeric(&Cell::text("12.5%")), Some(0.125));
        assert_eq!(coerce_numeric(&Cell::text("5.2%")), Some(0.052));
        assert_eq!(coerce_numeric(&Cell::text("100 %")), Some(1.0));
    }

    #[test]
    fn error_tokens_are_null() {
        for token in ["N/A", "#N/A", "#DIV/0!", "div/0!", "#VALUE!", "#REF!", "#NAME?", "#NUM!", "#NULL!"] {
            assert_eq!(coerce_numeric(&Cell::text(token)), None, "token {token}");
        }
    }

    #[test]
    fn dash_placeholder_is_null() {
        assert_eq!(coerce_numeric(&Cell::text("--")), None);
    }

    #[test]
    fn garbage_is_null() {
        assert_eq!(coerce_numeric(&Cell::text("not a number")), None);
        assert_eq!(coerce_numeric(&Cell::Empty), None);
        assert_eq!(coerce_numeric(&Cell::Bool(true)), None);
    }

    #[test]
    fn non_finite_is_null() {
        assert_eq!(coerce_numeric(&Cell::Number(f64::NAN)), None);
        assert_eq!(coerce_numeric(&Cell::Number(f64::INFINITY)), None);
        assert_eq!(coerce_numeric(&Cell::Number(f64::NEG_INFINITY)), None);
    }

    #[test]
    fn percent_suffix_detection() {
        assert!(has_percent_suffix(&Cell::text("7.5%")));
        assert!(!has_percent_suffix(&Cell::text("7.5")));
        assert!(!has_percent_suffix(&Cell::Number(7.5)));
    }

    #[test]
    fn iso_date_text() {
        assert_eq!(
            coerce_date(&Cell::text("2024-03-15")),
            Some("2024-03-15T00:00:00".to_string())
        );
    }

    #[test]
    fn us_date_text() {
        assert_eq!(
            coerce_date(&Cell::text("3/15/2024")),
            Some("2024-03-15T00:00:00".to_string())
        );
    }

    #[test]
    fn datetime_text_keeps_time() {
        assert_eq!(
            coerce_date(&Cell::text("2024-03-15 09:30:00")),
            Some("2024-03-15T09:30:00".to_string())
        );
    }

    #[test]
    fn excel_serial_date() {
        // 45366 is 2024-03-15 in the 1900 date system.
        assert_eq!(
            coerce_date(&Cell::Number(45366.0)),
            Some("2024-03-15T00:00:00".to_string())
        );
    }

    #[test]
    fn excel_serial_with_time_fraction() {
        assert_eq!(
            coerce_date(&Cell::Number(45366.5)),
            Some("2024-03-15T12:00:00".to_string())
        );
    }

    #[test]
    fn unparseable_dates_are_null() {
        assert_eq!(coerce_date(&Cell::text("soon")), None);
        assert_eq!(coerce_date(&Cell::text("")), None);
        assert_eq!(coerce_date(&Cell::Number(-5.0)), None);
        assert_eq!(coerce_date(&Cell::Empty), None);
    }
}
