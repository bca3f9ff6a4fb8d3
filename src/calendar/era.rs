//! Era resolution and era-relative year display

use std::cmp::Ordering;

use crate::calendar::model::Era;
use crate::core::types::CalDate;

/// Template used when an era has no format of its own
pub const DEFAULT_ERA_FORMAT: &str = "Year {{era_year}} - {{era_name}}";

/// Compare a (possibly partial) point against a full date
///
/// Missing month/day compare as "the whole year/month", so they are equal
/// to any date inside it.
fn compare_point(date: CalDate, year: i64, month: Option<usize>, day: Option<u32>) -> Ordering {
    match date.year.cmp(&year) {
        Ordering::Equal => {}
        other => return other,
    }
    let Some(month) = month else {
        return Ordering::Equal;
    };
    match date.month.cmp(&month) {
        Ordering::Equal => {}
        other => return other,
    }
    match day {
        Some(day) => date.day.cmp(&day),
        None => Ordering::Equal,
    }
}

/// Does `era` cover the (possibly partial) point?
pub fn era_covers(era: &Era, year: i64, month: Option<usize>, day: Option<u32>) -> bool {
    let Some(start) = era.start() else {
        return true;
    };
    if compare_point(start, year, month, day) == Ordering::Greater {
        return false;
    }
    match era.end() {
        Some(end) => compare_point(end, year, month, day) != Ordering::Less,
        None => true,
    }
}

/// The era in effect at a (possibly partial) point
///
/// `eras` must be in chronological order (see
/// [`crate::calendar::model::StaticCalendarData::sort_eras`]). The newest
/// covering dated era wins; otherwise the starting era, otherwise the
/// earliest era. Returns `None` only for an empty list.
pub fn resolve_era(eras: &[Era], year: i64, month: Option<usize>, day: Option<u32>) -> Option<&Era> {
    eras.iter()
        .rev()
        .filter(|era| !era.is_starting_era())
        .find(|era| era_covers(era, year, month, day))
        .or_else(|| eras.iter().find(|era| era.is_starting_era()))
        .or_else(|| eras.first())
}

/// Year number as counted by `era`
pub fn era_year(era: &Era, year: i64) -> i64 {
    match era.start() {
        Some(start) if era.restart => year - start.year + 1,
        _ => year,
    }
}

/// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st...
pub fn ordinal(n: i64) -> String {
    let abs = n.unsigned_abs();
    let suffix = match (abs % 10, abs % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Render the era's display template for `year`
pub fn format_era(era: &Era, year: i64) -> String {
    let template = if era.format.trim().is_empty() {
        DEFAULT_ERA_FORMAT
    } else {
        era.format.as_str()
    };
    let in_era = era_year(era, year);
    template
        .replace("{{abs_nth_year}}", &ordinal(year.abs()))
        .replace("{{era_nth_year}}", &ordinal(in_era))
        .replace("{{nth_year}}", &ordinal(year))
        .replace("{{abs_year}}", &year.abs().to_string())
        .replace("{{era_year}}", &in_era.to_string())
        .replace("{{era_name}}", &era.name)
        .replace("{{year}}", &year.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eras() -> Vec<Era> {
        let mut middle = Era::dated("middle", "Middle Age", CalDate::new(100, 3, 10));
        middle.kind = crate::calendar::model::EraKind::Dated {
            start: CalDate::new(100, 3, 10),
            end: Some(CalDate::new(200, 0, 1)),
        };
        let mut late = Era::dated("late", "Late Age", CalDate::new(500, 0, 1));
        late.restart = true;
        vec![Era::starting("dawn", "Dawn Age"), middle, late]
    }

    #[test]
    fn test_resolve_picks_latest_covering_era() {
        let eras = eras();
        let id = |y, m, d| resolve_era(&eras, y, m, d).map(|e| e.id.as_str());
        assert_eq!(id(50, None, None), Some("dawn"));
        assert_eq!(id(100, Some(3), Some(9)), Some("dawn"));
        assert_eq!(id(100, Some(3), Some(10)), Some("middle"));
        assert_eq!(id(150, Some(0), Some(1)), Some("middle"));
        assert_eq!(id(200, Some(0), Some(1)), Some("middle"));
        assert_eq!(id(200, Some(0), Some(2)), Some("dawn"));
        assert_eq!(id(600, None, None), Some("late"));
    }

    #[test]
    fn test_partial_points_match_whole_year() {
        let eras = eras();
        // Middle age starts during year 100, so the whole year matches
        assert_eq!(resolve_era(&eras, 100, None, None).map(|e| e.id.as_str()), Some("middle"));
        assert_eq!(resolve_era(&eras, 100, Some(3), None).map(|e| e.id.as_str()), Some("middle"));
        assert_eq!(resolve_era(&eras, 100, Some(2), None).map(|e| e.id.as_str()), Some("dawn"));
    }

    #[test]
    fn test_fallback_without_starting_era() {
        let eras = vec![Era::dated("only", "Only", CalDate::new(10, 0, 1))];
        assert_eq!(resolve_era(&eras, 1, None, None).map(|e| e.id.as_str()), Some("only"));
        assert!(resolve_era(&[], 1, None, None).is_none());
    }

    #[test]
    fn test_era_year_restart() {
        let eras = eras();
        assert_eq!(era_year(&eras[2], 500), 1);
        assert_eq!(era_year(&eras[2], 523), 24);
        assert_eq!(era_year(&eras[1], 150), 150);
        assert_eq!(era_year(&eras[0], 42), 42);
    }

    #[test]
    fn test_ordinals() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (21, "21st"),
            (102, "102nd"),
            (111, "111th"),
            (-3, "-3rd"),
        ];
        for (n, expected) in cases {
            assert_eq!(ordinal(n), expected);
        }
    }

    #[test]
    fn test_format_era_template() {
        let mut era = eras()[2].clone();
        era.format = "{{era_nth_year}} year of the {{era_name}} ({{year}}, {{abs_nth_year}})".into();
        assert_eq!(format_era(&era, 502), "3rd year of the Late Age (502, 502nd)");

        let mut before = Era::starting("bc", "Before Crowning");
        before.format = "{{abs_year}} {{era_name}} / {{nth_year}}".into();
        assert_eq!(format_era(&before, -12), "12 Before Crowning / -12th");

        assert_eq!(format_era(&eras()[0], 7), "Year 7 - Dawn Age");
    }
}
