//! Natural-language date/time parsing.
//!
//! Rule-based replacement for a full NLP date parser: a small set of
//! compiled patterns covering the expressions users actually type into a
//! scheduling chat ("tomorrow at 3pm", "Oct 5th at 10:00", "in 2 hours",
//! "next friday"). Ambiguous expressions prefer future interpretations, and
//! all results are timezone-aware in the local offset.
//!
//! Parsing is deterministic: callers inject `now`, so tests can pin it.

use std::sync::LazyLock;

use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Weekday,
};
use regex::Regex;

// ---------------------------------------------------------------------------
// Compiled patterns (compiled once, reused across calls)
// ---------------------------------------------------------------------------

struct TimePatterns {
    offset: Regex,
    numeric_date: Regex,
    month_date: Regex,
    tomorrow: Regex,
    today: Regex,
    weekday: Regex,
    time_colon: Regex,
    time_ampm: Regex,
    time_at_hour: Regex,
    noon: Regex,
    midnight: Regex,
}

static PATTERNS: LazyLock<TimePatterns> = LazyLock::new(|| TimePatterns {
    offset: Regex::new(r"\bin\s+(\d+|an?)\s+(minutes?|mins?|hours?|hrs?|days?|weeks?)\b")
        .expect("invalid offset regex"),
    numeric_date: Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})(?:[t\s]+(\d{1,2}):(\d{2}))?\b")
        .expect("invalid numeric date regex"),
    month_date: Regex::new(
        r"\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s+(\d{4}))?",
    )
    .expect("invalid month date regex"),
    tomorrow: Regex::new(r"\btomorrow\b").expect("invalid tomorrow regex"),
    today: Regex::new(r"\btoday\b").expect("invalid today regex"),
    weekday: Regex::new(r"\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .expect("invalid weekday regex"),
    time_colon: Regex::new(r"\b(\d{1,2}):(\d{2})\s*(am|pm)?\b").expect("invalid time regex"),
    time_ampm: Regex::new(r"\b(\d{1,2})\s*(am|pm)\b").expect("invalid am/pm time regex"),
    time_at_hour: Regex::new(r"\bat\s+(\d{1,2})\b").expect("invalid at-hour regex"),
    noon: Regex::new(r"\bnoon\b").expect("invalid noon regex"),
    midnight: Regex::new(r"\bmidnight\b").expect("invalid midnight regex"),
});

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Parse a date/time expression out of free text.
///
/// Strategies are tried most-specific first: duration offsets, calendar
/// dates (numeric, then month-name), relative day words, weekday names,
/// then bare times of day. A relative day without an explicit time keeps
/// `now`'s time of day; an absolute date without a time starts at midnight;
/// a bare time that already passed today rolls to tomorrow.
pub fn parse_datetime(text: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let text = text.to_lowercase();

    if let Some(dt) = parse_offset(&text, now) {
        return Some(dt);
    }

    let time = extract_time_of_day(&text);

    if let Some(parsed) = parse_numeric_date(&text) {
        let (date, inline_time) = parsed;
        let time = inline_time.or(time).unwrap_or(NaiveTime::MIN);
        return local_datetime(date, time);
    }

    if let Some((date, had_year)) = parse_month_date(&text, now) {
        let time = time.unwrap_or(NaiveTime::MIN);
        let candidate = local_datetime(date, time)?;
        // A passed date without an explicit year rolls to the next year.
        if !had_year && candidate <= now {
            if let Some(bumped) = NaiveDate::from_ymd_opt(date.year() + 1, date.month(), date.day())
                .and_then(|d| local_datetime(d, time))
            {
                return Some(bumped);
            }
        }
        return Some(candidate);
    }

    if let Some(days_ahead) = parse_relative_day(&text) {
        let date = now.date_naive() + Duration::days(days_ahead);
        let time = time.unwrap_or_else(|| now.time());
        return local_datetime(date, time);
    }

    if let Some(date) = parse_weekday(&text, now) {
        let time = time.unwrap_or_else(|| now.time());
        return local_datetime(date, time);
    }

    if let Some(time) = time {
        let today = local_datetime(now.date_naive(), time)?;
        if today > now {
            return Some(today);
        }
        return local_datetime(now.date_naive() + Duration::days(1), time);
    }

    None
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// "in 5 minutes", "in an hour", "in 3 days", "in 2 weeks".
fn parse_offset(text: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let caps = PATTERNS.offset.captures(text)?;
    let count: i64 = match &caps[1] {
        "a" | "an" => 1,
        digits => digits.parse().ok()?,
    };
    let unit = &caps[2];
    let duration = if unit.starts_with("min") {
        Duration::minutes(count)
    } else if unit.starts_with("hour") || unit.starts_with("hr") {
        Duration::hours(count)
    } else if unit.starts_with("day") {
        Duration::days(count)
    } else {
        Duration::weeks(count)
    };
    now.checked_add_signed(duration)
}

/// "2026-08-12", optionally with an inline "15:00" / "T15:00" time.
fn parse_numeric_date(text: &str) -> Option<(NaiveDate, Option<NaiveTime>)> {
    let caps = PATTERNS.numeric_date.captures(text)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let inline_time = match (caps.get(4), caps.get(5)) {
        (Some(hour), Some(minute)) => {
            build_time(hour.as_str().parse().ok()?, minute.as_str().parse().ok()?, None)
        }
        _ => None,
    };
    Some((date, inline_time))
}

/// "Oct 5th", "october 5, 2026". Returns the date and whether the year was
/// explicit.
fn parse_month_date(text: &str, now: DateTime<Local>) -> Option<(NaiveDate, bool)> {
    let caps = PATTERNS.month_date.captures(text)?;
    let month = match &caps[1] {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        _ => 12,
    };
    let day: u32 = caps[2].parse().ok()?;
    let (year, had_year) = match caps.get(3) {
        Some(year) => (year.as_str().parse().ok()?, true),
        None => (now.year(), false),
    };
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some((date, had_year))
}

/// "today", "tomorrow", "day after tomorrow" -> days ahead of `now`.
fn parse_relative_day(text: &str) -> Option<i64> {
    if text.contains("day after tomorrow") {
        return Some(2);
    }
    if PATTERNS.tomorrow.is_match(text) {
        return Some(1);
    }
    if PATTERNS.today.is_match(text) {
        return Some(0);
    }
    None
}

/// A weekday name -> the next future occurrence of that weekday.
fn parse_weekday(text: &str, now: DateTime<Local>) -> Option<NaiveDate> {
    let caps = PATTERNS.weekday.captures(text)?;
    let target = match &caps[1] {
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        _ => Weekday::Sun,
    };
    let today = now.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    let mut ahead = (wanted - today).rem_euclid(7);
    if ahead == 0 {
        ahead = 7;
    }
    Some(now.date_naive() + Duration::days(ahead))
}

/// Extract an explicit time of day: "10:30", "5pm", "at 14", "noon",
/// "midnight".
fn extract_time_of_day(text: &str) -> Option<NaiveTime> {
    if PATTERNS.noon.is_match(text) {
        return NaiveTime::from_hms_opt(12, 0, 0);
    }
    if PATTERNS.midnight.is_match(text) {
        return Some(NaiveTime::MIN);
    }
    if let Some(caps) = PATTERNS.time_colon.captures(text) {
        let hour = caps[1].parse().ok()?;
        let minute = caps[2].parse().ok()?;
        let meridiem = caps.get(3).map(|m| m.as_str());
        return build_time(hour, minute, meridiem);
    }
    if let Some(caps) = PATTERNS.time_ampm.captures(text) {
        let hour = caps[1].parse().ok()?;
        return build_time(hour, 0, Some(&caps[2]));
    }
    if let Some(caps) = PATTERNS.time_at_hour.captures(text) {
        let hour = caps[1].parse().ok()?;
        return build_time(hour, 0, None);
    }
    None
}

/// Combine an hour, minute, and optional meridiem into a `NaiveTime`.
fn build_time(hour: u32, minute: u32, meridiem: Option<&str>) -> Option<NaiveTime> {
    let hour = match meridiem {
        Some("pm") if (1..=12).contains(&hour) => hour % 12 + 12,
        Some("am") if (1..=12).contains(&hour) => hour % 12,
        Some(_) => return None,
        None if hour <= 23 => hour,
        None => return None,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Resolve a naive local datetime to a timezone-aware one. DST-ambiguous
/// times take the earliest interpretation; nonexistent times fall forward
/// an hour.
fn local_datetime(date: NaiveDate, time: NaiveTime) -> Option<DateTime<Local>> {
    let naive = date.and_time(time);
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => Local
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
