//! Date display and parsing helpers
//!
//! Formatting never fails: a date that does not exist in the calendar
//! renders as [`INVALID_DATE`].

use crate::calendar::engine::CalendarEngine;
use crate::core::error::{CalendarError, Result};
use crate::core::types::CalDate;

/// Rendered in place of a date that does not exist
pub const INVALID_DATE: &str = "Invalid Date";

/// Pattern used by [`format_date`] when none is given
pub const DEFAULT_PATTERN: &str = "MMMM D, YYYY";

/// Year as shown to the user, honouring custom year names
pub fn display_year(engine: &CalendarEngine, year: i64) -> String {
    let data = engine.data();
    if data.use_custom_years && year >= 1 {
        if let Some(custom) = data.years.get((year - 1) as usize) {
            return custom.name.clone();
        }
    }
    year.to_string()
}

/// Render `date` using a token pattern
///
/// Tokens: `YYYY` year, `MMMM` month name, `MM`/`M` month number,
/// `DD`/`D` day. Anything else is copied through.
pub fn format_date(engine: &CalendarEngine, date: CalDate, pattern: Option<&str>) -> String {
    if !engine.is_valid_day(date) {
        return INVALID_DATE.to_string();
    }
    let Some(month) = engine.month(date.year, date.month) else {
        return INVALID_DATE.to_string();
    };

    let pattern = pattern.unwrap_or(DEFAULT_PATTERN);
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut rest = pattern;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("YYYY") {
            out.push_str(&display_year(engine, date.year));
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("MMMM") {
            out.push_str(&month.month.name);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("MM") {
            out.push_str(&format!("{:02}", date.month + 1));
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('M') {
            out.push_str(&(date.month + 1).to_string());
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("DD") {
            out.push_str(&format!("{:02}", date.day));
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('D') {
            out.push_str(&date.day.to_string());
            rest = tail;
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
    }
    out
}

/// Parse `"year-month-day"` with a 1-based month, e.g. `"-44-3-15"`
pub fn parse_date(text: &str) -> Result<CalDate> {
    let invalid = || CalendarError::InvalidDate(text.to_string());
    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, trimmed),
    };
    let mut parts = body.split('-');
    let year: i64 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    let month: usize = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    let day: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    if parts.next().is_some() || month == 0 || day == 0 {
        return Err(invalid());
    }
    Ok(CalDate::new(if negative { -year } else { year }, month - 1, day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::model::Year;
    use crate::calendar::presets;

    #[test]
    fn test_default_pattern() {
        let engine = CalendarEngine::with_defaults(presets::gregorian());
        assert_eq!(format_date(&engine, CalDate::new(2024, 2, 10), None), "March 10, 2024");
    }

    #[test]
    fn test_numeric_pattern() {
        let engine = CalendarEngine::with_defaults(presets::gregorian());
        assert_eq!(
            format_date(&engine, CalDate::new(2024, 2, 5), Some("YYYY-MM-DD")),
            "2024-03-05"
        );
        assert_eq!(format_date(&engine, CalDate::new(7, 10, 5), Some("D/M/YYYY")), "5/11/7");
    }

    #[test]
    fn test_invalid_dates_render_sentinel() {
        let engine = CalendarEngine::with_defaults(presets::gregorian());
        assert_eq!(format_date(&engine, CalDate::new(2023, 1, 29), None), INVALID_DATE);
        assert_eq!(format_date(&engine, CalDate::new(2023, 12, 1), None), INVALID_DATE);
    }

    #[test]
    fn test_custom_years() {
        let mut data = presets::gregorian();
        data.use_custom_years = true;
        data.years = vec![
            Year { name: "Year of the Rose".into() },
            Year { name: "Year of the Thorn".into() },
        ];
        let engine = CalendarEngine::with_defaults(data);
        assert_eq!(display_year(&engine, 2), "Year of the Thorn");
        assert_eq!(display_year(&engine, 3), "3");
        assert_eq!(
            format_date(&engine, CalDate::new(1, 0, 1), Some("D MMMM, YYYY")),
            "1 January, Year of the Rose"
        );
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-3-10").unwrap(), CalDate::new(2024, 2, 10));
        assert_eq!(parse_date(" -44-3-15 ").unwrap(), CalDate::new(-44, 2, 15));
        assert!(parse_date("2024-0-10").is_err());
        assert!(parse_date("2024-3").is_err());
        assert!(parse_date("2024-3-10-1").is_err());
        assert!(parse_date("soon").is_err());
    }
}
