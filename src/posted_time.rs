//! Turning "posted X ago" strings into absolute timestamps.
//!
//! Job boards express posting time in several incompatible ways: word units
//! (`3 hours ago`), shorthand (`2d ago`), numeric dates (`10/03/2025`) and
//! month-name dates without a year (`Aug 08`). [`normalize`] tries each
//! family in a fixed order and returns `None` when nothing matches. Callers
//! drop records whose time is `None`.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use regex::Regex;

static WORD_UNITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(minute|hour|day|week)s?\s*ago").unwrap());

static SHORT_UNITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(m|h|d|w)\s*ago").unwrap());

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4}|\d{1,2})[/-](\d{1,2})[/-](\d{4}|\d{2})").unwrap()
});

static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\s+(\d{1,2})").unwrap()
});

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Layouts tried for numeric dates, in priority order.
///
/// Inputs such as `03-04-25` are genuinely ambiguous; the first layout that
/// yields a real calendar date wins. This is a heuristic, not an inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateLayout {
    /// `YYYY-MM-DD`
    YearMonthDay,
    /// `MM-DD-YYYY`
    MonthDayYear,
    /// `YY-MM-DD`
    ShortYearMonthDay,
    /// `MM-DD-YY`
    MonthDayShortYear,
}

const DATE_LAYOUTS: [DateLayout; 4] = [
    DateLayout::YearMonthDay,
    DateLayout::MonthDayYear,
    DateLayout::ShortYearMonthDay,
    DateLayout::MonthDayShortYear,
];

/// Normalize a raw posted-time string relative to `now`.
///
/// Returns `None` when the string matches no known pattern or describes an
/// impossible date.
#[must_use]
pub fn normalize(raw: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let lowered = raw.trim().to_lowercase();
    let text = lowered.replacen("reposted", "", 1);
    let text = text.trim();

    if let Some(caps) = WORD_UNITS.captures(text) {
        return subtract_units(now, &caps[1], &caps[2]);
    }

    if let Some(caps) = SHORT_UNITS.captures(text) {
        return subtract_units(now, &caps[1], &caps[2]);
    }

    if let Some(caps) = NUMERIC_DATE.captures(text) {
        if let Some(date) = parse_numeric_date(&caps[1], &caps[2], &caps[3]) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    if let Some(caps) = MONTH_DAY.captures(text) {
        return parse_month_day(&caps[1], &caps[2], now);
    }

    None
}

/// `now - count * unit`, where `unit` is a word (`hour`) or its initial (`h`).
fn subtract_units(now: NaiveDateTime, count: &str, unit: &str) -> Option<NaiveDateTime> {
    let count: i64 = count.parse().ok()?;
    let delta = match unit.as_bytes().first()? {
        b'm' => TimeDelta::try_minutes(count)?,
        b'h' => TimeDelta::try_hours(count)?,
        b'd' => TimeDelta::try_days(count)?,
        b'w' => TimeDelta::try_weeks(count)?,
        _ => return None,
    };
    now.checked_sub_signed(delta)
}

fn parse_numeric_date(first: &str, second: &str, third: &str) -> Option<NaiveDate> {
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| layout.parse(first, second, third))
}

impl DateLayout {
    fn parse(self, first: &str, second: &str, third: &str) -> Option<NaiveDate> {
        let (year, month, day) = match self {
            Self::YearMonthDay => (full_year(first)?, second, third),
            Self::MonthDayYear => (full_year(third)?, first, second),
            Self::ShortYearMonthDay => (short_year(first)?, second, third),
            Self::MonthDayShortYear => (short_year(third)?, first, second),
        };
        NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
    }
}

fn full_year(field: &str) -> Option<i32> {
    (field.len() == 4).then(|| field.parse().ok()).flatten()
}

/// Two-digit years pivot at 69: `69..=99` is the 1900s, `00..=68` the 2000s.
fn short_year(field: &str) -> Option<i32> {
    if field.len() != 2 {
        return None;
    }
    let yy: i32 = field.parse().ok()?;
    Some(if yy >= 69 { 1900 + yy } else { 2000 + yy })
}

/// Month name plus day in the current year, rolled back a year when that
/// would land in the future.
fn parse_month_day(month: &str, day: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let month = MONTHS.iter().position(|m| *m == month)? + 1;
    let month = u32::try_from(month).ok()?;
    let day: u32 = day.parse().ok()?;

    let posted = NaiveDate::from_ymd_opt(now.year(), month, day)?.and_hms_opt(0, 0, 0)?;
    if posted > now {
        return NaiveDate::from_ymd_opt(now.year() - 1, month, day)?.and_hms_opt(0, 0, 0);
    }
    Some(posted)
}
