//! Leap-day condition evaluation
//!
//! A leap day owns a chain of divisibility rules. Sorted by interval and
//! folded left to right, an inclusive rule that matches switches the leap
//! day on and an exclusive rule that matches switches it back off, so a
//! finer rule always has the last word. `[4, !100, 400]` is the Gregorian
//! rule.

use crate::calendar::model::LeapDayCondition;

/// Does a leap day governed by `conditions` occur in `year`?
///
/// Conditions with a zero interval are skipped; an empty chain never
/// applies.
pub fn test_leap_day(conditions: &[LeapDayCondition], offset: i64, year: i64) -> bool {
    let mut sorted: Vec<&LeapDayCondition> = conditions.iter().filter(|c| c.interval > 0).collect();
    sorted.sort_by_key(|c| c.interval);

    let mut verdict = false;
    for condition in sorted {
        let base = if condition.ignore_offset { year } else { year - offset };
        let matches = base.rem_euclid(condition.interval as i64) == 0;
        if !matches {
            continue;
        }
        if condition.exclusive {
            // Only a currently-true verdict can be vetoed
            if verdict {
                verdict = false;
            }
        } else {
            verdict = true;
        }
    }
    verdict
}

/// Parse the compact interval notation used by calendar exports:
/// comma separated intervals, `!` marks an exclusive rule and `+` a rule
/// that ignores the leap day's offset (`"400,!100,4"`, `"+!8,2"`).
///
/// Entries that do not parse are skipped.
pub fn parse_conditions(notation: &str) -> Vec<LeapDayCondition> {
    notation
        .split(',')
        .filter_map(|raw| {
            let mut text = raw.trim();
            let mut exclusive = false;
            let mut ignore_offset = false;
            loop {
                if let Some(rest) = text.strip_prefix('!') {
                    exclusive = true;
                    text = rest;
                } else if let Some(rest) = text.strip_prefix('+') {
                    ignore_offset = true;
                    text = rest;
                } else {
                    break;
                }
            }
            let interval = text.parse::<u32>().ok()?;
            Some(LeapDayCondition {
                interval,
                exclusive,
                ignore_offset,
            })
        })
        .collect()
}
