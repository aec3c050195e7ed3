//! Natural-language due-date parsing.
//!
//! Turns free-form phrases into absolute local timestamps:
//! - Fixed formats: `2026-02-15`, `01/02/2026 3:04PM`, `Jan 2, 2026 15:04`
//! - Day keywords: `today`, `tomorrow`, `yesterday` (09:00 default)
//! - Relative offsets: `in 2 days`, `in 3 hrs`, `in 1 month`
//! - Weekday targets: `next friday`, `next mon at 2pm`
//! - Keyword + time: `tomorrow at 5:30pm`
//! - Bare clock times: `5pm`, `17:00` (next occurrence)
//! - Idioms: `next week`, `next month`, `eod`, `eow`
//!
//! Recognizers are tried strictly in that order; the first match wins.
//! Several grammars could spuriously match the same input, so the order is
//! part of the contract, not an implementation detail.

use chrono::{
    DateTime, Datelike, Days, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Weekday,
};
use regex::Regex;
use std::sync::OnceLock;

/// Failure to turn a phrase into a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("empty date expression")]
    EmptyExpression,
    #[error("unable to parse date: {0:?}")]
    InvalidExpression(String),
}

/// Parse a date expression against the current wall clock.
pub fn parse_date(input: &str) -> Result<DateTime<Local>, DateError> {
    parse_date_at(input, Local::now())
}

/// Parse a date expression against an explicit reference instant.
///
/// All relative phrases ("tomorrow", "in 2 days", "5pm") anchor to `now`,
/// which makes the function a pure mapping of (input, now) and keeps tests
/// off the wall clock.
pub fn parse_date_at(input: &str, now: DateTime<Local>) -> Result<DateTime<Local>, DateError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateError::EmptyExpression);
    }

    // Fixed formats match against the original case; month abbreviations are
    // case-significant in some of their spellings. Everything after folds.
    let lower = trimmed.to_lowercase();

    parse_fixed_format(trimmed)
        .or_else(|| parse_day_keyword(&lower, now))
        .or_else(|| parse_relative(&lower, now))
        .or_else(|| parse_next_weekday(&lower, now))
        .or_else(|| parse_keyword_with_time(&lower, now))
        .or_else(|| parse_time_only(&lower, now))
        .or_else(|| parse_idiom(&lower, now))
        .ok_or_else(|| DateError::InvalidExpression(input.to_string()))
}

/// Formats carrying a time of day. Tried before the date-only list; the two
/// sets cannot match the same string, so only relative order within each
/// list matters.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M%p",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M%p",
    "%b %d, %Y %I:%M%p",
    "%b %d, %Y %H:%M",
    "%B %d, %Y %I:%M%p",
    "%B %d, %Y %H:%M",
];

/// Date-only formats; resolve to midnight local.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%b %d, %Y", "%B %d, %Y", "%d %b %Y"];

fn parse_fixed_format(input: &str) -> Option<DateTime<Local>> {
    for f in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, f) {
            return Local.from_local_datetime(&dt).earliest();
        }
    }
    for f in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(input, f) {
            return at_time(d, 0, 0);
        }
    }
    None
}

/// Bare day keywords default to 09:00 rather than midnight; a reminder due
/// at midnight is almost never what was meant.
fn parse_day_keyword(lower: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let date = match lower {
        "today" => now.date_naive(),
        "tomorrow" => now.date_naive().checked_add_days(Days::new(1))?,
        "yesterday" => now.date_naive().checked_sub_days(Days::new(1))?,
        _ => return None,
    };
    at_time(date, 9, 0)
}

struct DatePatterns {
    // "in 2 days", "in 45 min"
    relative: Regex,
    // "5pm", "5 pm"
    clock_12h_bare: Regex,
    // "5:30pm", "5:30 PM"
    clock_12h: Regex,
    // "17:00", "9:30"
    clock_24h: Regex,
}

impl DatePatterns {
    fn new() -> Self {
        Self {
            relative: Regex::new(r"^in\s+(\d+)\s+(minutes?|mins?|hours?|hrs?|days?|weeks?|months?)$").unwrap(),
            clock_12h_bare: Regex::new(r"^(\d{1,2})\s*(am|pm)$").unwrap(),
            clock_12h: Regex::new(r"^(\d{1,2}):(\d{2})\s*(am|pm)$").unwrap(),
            clock_24h: Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap(),
        }
    }
}

fn patterns() -> &'static DatePatterns {
    static PATTERNS: OnceLock<DatePatterns> = OnceLock::new();
    PATTERNS.get_or_init(DatePatterns::new)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
}

/// Unit stems, prefix-matched in order: "hr"/"hrs" and "hour"/"hours" both
/// land in the hour family.
const UNIT_STEMS: &[(&str, Unit)] = &[
    ("min", Unit::Minutes),
    ("hour", Unit::Hours),
    ("hr", Unit::Hours),
    ("day", Unit::Days),
    ("week", Unit::Weeks),
    ("month", Unit::Months),
];

fn parse_relative(lower: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let caps = patterns().relative.captures(lower)?;
    let amount: i64 = caps[1].parse().ok()?;
    let unit = UNIT_STEMS
        .iter()
        .find(|(stem, _)| caps[2].starts_with(stem))
        .map(|&(_, unit)| unit)?;

    match unit {
        Unit::Minutes => now.checked_add_signed(Duration::try_minutes(amount)?),
        Unit::Hours => now.checked_add_signed(Duration::try_hours(amount)?),
        Unit::Days => now.checked_add_days(Days::new(u64::try_from(amount).ok()?)),
        Unit::Weeks => {
            let days = amount.checked_mul(7)?;
            now.checked_add_days(Days::new(u64::try_from(days).ok()?))
        }
        // Calendar addition clamps: Jan 31 + 1 month = Feb 28/29.
        Unit::Months => now.checked_add_months(Months::new(u32::try_from(amount).ok()?)),
    }
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name {
        "sunday" | "sun" => Some(Weekday::Sun),
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        _ => None,
    }
}

/// `next <weekday> [at <time>]`. "next monday" said on a Monday means seven
/// days out, never today. A malformed `at` suffix is absorbed silently and
/// the 09:00 default applies.
fn parse_next_weekday(lower: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let parts: Vec<&str> = lower.split_whitespace().collect();
    if parts.len() < 2 || parts[0] != "next" {
        return None;
    }
    let target = weekday_from_name(parts[1])?;

    let mut days_ahead = i64::from(target.num_days_from_sunday())
        - i64::from(now.weekday().num_days_from_sunday());
    if days_ahead <= 0 {
        days_ahead += 7;
    }
    let date = now
        .date_naive()
        .checked_add_days(Days::new(days_ahead as u64))?;

    if parts.len() >= 4 && parts[2] == "at" {
        if let Some((hour, min)) = parse_clock(&parts[3..].join(" ")) {
            return at_time(date, hour, min);
        }
    }

    at_time(date, 9, 0)
}

/// `<today|tomorrow|yesterday> at <time>`. Unlike the weekday grammar, a
/// time that fails to parse fails the whole recognizer.
fn parse_keyword_with_time(lower: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let (day_part, time_part) = lower.split_once(" at ")?;
    let date = match day_part.trim() {
        "today" => now.date_naive(),
        "tomorrow" => now.date_naive().checked_add_days(Days::new(1))?,
        "yesterday" => now.date_naive().checked_sub_days(Days::new(1))?,
        _ => return None,
    };
    let (hour, min) = parse_clock(time_part)?;
    at_time(date, hour, min)
}

/// A standalone clock time means its next occurrence: if it already passed
/// today it rolls to the same time tomorrow.
fn parse_time_only(lower: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let (hour, min) = parse_clock(lower)?;
    let candidate = at_time(now.date_naive(), hour, min)?;
    if candidate < now {
        return at_time(now.date_naive().checked_add_days(Days::new(1))?, hour, min);
    }
    Some(candidate)
}

fn parse_idiom(lower: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    match lower {
        "next week" => at_time(now.date_naive().checked_add_days(Days::new(7))?, 9, 0),
        "next month" => at_time(now.date_naive().checked_add_months(Months::new(1))?, 9, 0),
        "end of day" | "eod" => at_time(now.date_naive(), 17, 0),
        "end of week" | "eow" => {
            // The coming Friday; on a Friday, eow means a week out.
            let mut days =
                (5 - i64::from(now.weekday().num_days_from_sunday())).rem_euclid(7);
            if days == 0 {
                days = 7;
            }
            at_time(now.date_naive().checked_add_days(Days::new(days as u64))?, 17, 0)
        }
        _ => None,
    }
}

/// Parse a clock time into (hour, minute), 24-hour. Three sub-grammars in
/// priority order: `H am|pm`, `H:MM am|pm`, `HH:MM`.
fn parse_clock(s: &str) -> Option<(u32, u32)> {
    let s = s.trim();
    let p = patterns();

    if let Some(caps) = p.clock_12h_bare.captures(s) {
        let hour = caps[1].parse().ok()?;
        return to_24_hour(hour, 0, &caps[2]);
    }
    if let Some(caps) = p.clock_12h.captures(s) {
        let hour = caps[1].parse().ok()?;
        let min = caps[2].parse().ok()?;
        return to_24_hour(hour, min, &caps[3]);
    }
    if let Some(caps) = p.clock_24h.captures(s) {
        let hour: u32 = caps[1].parse().ok()?;
        let min: u32 = caps[2].parse().ok()?;
        if hour > 23 || min > 59 {
            return None;
        }
        return Some((hour, min));
    }
    None
}

/// 12-hour to 24-hour: 12 AM is midnight, 12 PM is noon, other PM hours
/// gain twelve. Hour must be 1-12.
fn to_24_hour(hour: u32, min: u32, period: &str) -> Option<(u32, u32)> {
    if !(1..=12).contains(&hour) || min > 59 {
        return None;
    }
    let hour = match (period, hour) {
        ("am", 12) => 0,
        ("am", h) => h,
        ("pm", 12) => 12,
        ("pm", h) => h + 12,
        _ => return None,
    };
    Some((hour, min))
}

fn at_time(date: NaiveDate, hour: u32, min: u32) -> Option<DateTime<Local>> {
    let time = NaiveTime::from_hms_opt(hour, min, 0)?;
    Local.from_local_datetime(&date.and_time(time)).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    // Wednesday.
    fn reference() -> DateTime<Local> {
        local(2026, 3, 4, 10, 30)
    }

    #[test]
    fn fixed_datetime_formats_round_trip() {
        let t = local(2026, 3, 4, 15, 4);
        for f in DATETIME_FORMATS {
            let rendered = t.naive_local().format(f).to_string();
            let parsed = parse_date_at(&rendered, reference()).unwrap();
            assert_eq!(parsed, t, "format {f} rendered {rendered:?}");
        }
    }

    #[test]
    fn fixed_date_formats_resolve_to_midnight() {
        let t = local(2026, 3, 4, 0, 0);
        for f in DATE_FORMATS {
            let rendered = t.naive_local().format(f).to_string();
            let parsed = parse_date_at(&rendered, reference()).unwrap();
            assert_eq!(parsed, t, "format {f} rendered {rendered:?}");
        }
    }

    #[test]
    fn fixed_format_examples() {
        let now = reference();
        assert_eq!(parse_date_at("2026-02-15", now).unwrap(), local(2026, 2, 15, 0, 0));
        assert_eq!(
            parse_date_at("2026-02-15 3:04PM", now).unwrap(),
            local(2026, 2, 15, 15, 4)
        );
        assert_eq!(
            parse_date_at("2026-02-15 3:04pm", now).unwrap(),
            local(2026, 2, 15, 15, 4)
        );
        assert_eq!(
            parse_date_at("01/02/2026 15:04", now).unwrap(),
            local(2026, 1, 2, 15, 4)
        );
        assert_eq!(parse_date_at("Jan 2, 2026", now).unwrap(), local(2026, 1, 2, 0, 0));
        assert_eq!(
            parse_date_at("January 2, 2026 3:04PM", now).unwrap(),
            local(2026, 1, 2, 15, 4)
        );
        assert_eq!(parse_date_at("2 Jan 2026", now).unwrap(), local(2026, 1, 2, 0, 0));
        assert_eq!(parse_date_at("02 Jan 2026", now).unwrap(), local(2026, 1, 2, 0, 0));
    }

    #[test]
    fn day_keywords_default_to_nine_am() {
        // Late in the evening, "today" still means 09:00 of today.
        let now = local(2026, 3, 4, 22, 47);
        assert_eq!(parse_date_at("today", now).unwrap(), local(2026, 3, 4, 9, 0));
        assert_eq!(parse_date_at("tomorrow", now).unwrap(), local(2026, 3, 5, 9, 0));
        assert_eq!(parse_date_at("yesterday", now).unwrap(), local(2026, 3, 3, 9, 0));
        assert_eq!(parse_date_at("TOMORROW", now).unwrap(), local(2026, 3, 5, 9, 0));
    }

    #[test]
    fn relative_offsets_keep_clock_time() {
        let now = reference();
        assert_eq!(parse_date_at("in 2 days", now).unwrap(), local(2026, 3, 6, 10, 30));
        assert_eq!(parse_date_at("in 1 week", now).unwrap(), local(2026, 3, 11, 10, 30));
        assert_eq!(parse_date_at("in 45 minutes", now).unwrap(), local(2026, 3, 4, 11, 15));
        assert_eq!(parse_date_at("in 3 hrs", now).unwrap(), local(2026, 3, 4, 13, 30));
        assert_eq!(parse_date_at("in 3 hours", now).unwrap(), local(2026, 3, 4, 13, 30));
        assert_eq!(parse_date_at("in 2 min", now).unwrap(), local(2026, 3, 4, 10, 32));
    }

    #[test]
    fn relative_months_clamp_at_month_end() {
        let now = local(2026, 1, 31, 10, 0);
        assert_eq!(parse_date_at("in 1 month", now).unwrap(), local(2026, 2, 28, 10, 0));
    }

    #[test]
    fn negative_offsets_are_not_a_grammar() {
        let err = parse_date_at("in -3 days", reference()).unwrap_err();
        assert!(matches!(err, DateError::InvalidExpression(_)));
    }

    #[test]
    fn next_weekday_is_always_in_the_future() {
        let now = reference();
        // Wednesday -> next Friday is two days out.
        assert_eq!(parse_date_at("next friday", now).unwrap(), local(2026, 3, 6, 9, 0));
        // Wednesday -> next Monday skips to next week.
        assert_eq!(parse_date_at("next monday", now).unwrap(), local(2026, 3, 9, 9, 0));
        // Monday -> "next monday" is seven days out, never today.
        let monday = local(2026, 3, 9, 10, 0);
        assert_eq!(parse_date_at("next monday", monday).unwrap(), local(2026, 3, 16, 9, 0));
        // Abbreviations.
        assert_eq!(parse_date_at("next mon", now).unwrap(), local(2026, 3, 9, 9, 0));
    }

    #[test]
    fn next_weekday_with_time_suffix() {
        let now = reference();
        assert_eq!(
            parse_date_at("next friday at 2pm", now).unwrap(),
            local(2026, 3, 6, 14, 0)
        );
        assert_eq!(
            parse_date_at("next friday at 14:30", now).unwrap(),
            local(2026, 3, 6, 14, 30)
        );
    }

    #[test]
    fn next_weekday_absorbs_a_broken_time_suffix() {
        // The weekday still resolves; the unparseable time falls back to 09:00.
        let now = reference();
        assert_eq!(
            parse_date_at("next friday at 25:99", now).unwrap(),
            local(2026, 3, 6, 9, 0)
        );
        // Trailing junk without "at" is ignored the same way.
        assert_eq!(
            parse_date_at("next friday sharp", now).unwrap(),
            local(2026, 3, 6, 9, 0)
        );
    }

    #[test]
    fn keyword_with_time() {
        let now = reference();
        assert_eq!(parse_date_at("today at 5pm", now).unwrap(), local(2026, 3, 4, 17, 0));
        assert_eq!(
            parse_date_at("tomorrow at 5:30pm", now).unwrap(),
            local(2026, 3, 5, 17, 30)
        );
        assert_eq!(parse_date_at("yesterday at 8am", now).unwrap(), local(2026, 3, 3, 8, 0));
        assert_eq!(parse_date_at("today at 12am", now).unwrap(), local(2026, 3, 4, 0, 0));
        assert_eq!(parse_date_at("today at 12pm", now).unwrap(), local(2026, 3, 4, 12, 0));
    }

    #[test]
    fn keyword_with_broken_time_fails_outright() {
        // Asymmetric with the weekday grammar: no silent 09:00 fallback here.
        let err = parse_date_at("today at 25:99", reference()).unwrap_err();
        assert!(matches!(err, DateError::InvalidExpression(_)));
    }

    #[test]
    fn bare_time_rolls_forward_when_passed() {
        // 10:30 reference: 5pm is still ahead today.
        assert_eq!(parse_date_at("5pm", reference()).unwrap(), local(2026, 3, 4, 17, 0));
        // 18:00 reference: 5pm already passed, so tomorrow.
        let evening = local(2026, 3, 4, 18, 0);
        assert_eq!(parse_date_at("5pm", evening).unwrap(), local(2026, 3, 5, 17, 0));
        // Exactly at the target time counts as today, not tomorrow.
        let at_five = local(2026, 3, 4, 17, 0);
        assert_eq!(parse_date_at("17:00", at_five).unwrap(), local(2026, 3, 4, 17, 0));
        assert_eq!(parse_date_at("9:15", reference()).unwrap(), local(2026, 3, 5, 9, 15));
        assert_eq!(parse_date_at("0:30", evening).unwrap(), local(2026, 3, 5, 0, 30));
    }

    #[test]
    fn out_of_range_clock_times_fail() {
        let now = reference();
        assert!(parse_date_at("24:00", now).is_err());
        assert!(parse_date_at("12:60", now).is_err());
        assert!(parse_date_at("13pm", now).is_err());
        assert!(parse_date_at("0pm", now).is_err());
    }

    #[test]
    fn idioms() {
        let now = reference();
        assert_eq!(parse_date_at("next week", now).unwrap(), local(2026, 3, 11, 9, 0));
        assert_eq!(parse_date_at("next month", now).unwrap(), local(2026, 4, 4, 9, 0));
        assert_eq!(parse_date_at("eod", now).unwrap(), local(2026, 3, 4, 17, 0));
        assert_eq!(parse_date_at("end of day", now).unwrap(), local(2026, 3, 4, 17, 0));
        // Wednesday -> coming Friday.
        assert_eq!(parse_date_at("eow", now).unwrap(), local(2026, 3, 6, 17, 0));
        // On a Friday, eow is a week out.
        let friday = local(2026, 3, 6, 10, 0);
        assert_eq!(parse_date_at("end of week", friday).unwrap(), local(2026, 3, 13, 17, 0));
    }

    #[test]
    fn empty_and_unrecognized_inputs() {
        assert_eq!(parse_date_at("", reference()).unwrap_err(), DateError::EmptyExpression);
        assert_eq!(
            parse_date_at("   ", reference()).unwrap_err(),
            DateError::EmptyExpression
        );
        assert_eq!(
            parse_date_at("not a date", reference()).unwrap_err(),
            DateError::InvalidExpression("not a date".to_string())
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            parse_date_at("  tomorrow  ", reference()).unwrap(),
            local(2026, 3, 5, 9, 0)
        );
    }

    #[test]
    fn concurrent_parsing_matches_sequential() {
        let now = reference();
        let inputs = ["tomorrow", "in 2 days", "next friday at 2pm", "5pm", "eod", "2026-02-15"];
        let sequential: Vec<_> = inputs
            .iter()
            .map(|i| parse_date_at(i, now).unwrap())
            .collect();

        std::thread::scope(|scope| {
            let handles: Vec<_> = inputs
                .iter()
                .map(|i| scope.spawn(move || parse_date_at(i, now).unwrap()))
                .collect();
            for (handle, want) in handles.into_iter().zip(&sequential) {
                assert_eq!(handle.join().unwrap(), *want);
            }
        });
    }
}
