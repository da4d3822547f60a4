// src/parse/timestamp.rs
//! Timestamp reconstruction from fax text.
//!
//! Two patterns, tried in profile-declared order: a bare `M/D/YYYY` date
//! (time of day synthesized inside business hours) and `M/D/YYYY H:MM AM|PM`
//! (12-hour clock converted to 24-hour). Some templates print the day after
//! the transmission date, so a profile can ask for one calendar day to be
//! subtracted; the rollover is real date arithmetic, not string edits.

use chrono::{Days, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

/// Which pattern is tried first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternOrder {
    DateOnlyFirst,
    DateTimeFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampRule {
    pub order: PatternOrder,
    pub backdate_one_day: bool,
}

static RE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("date regex"));

static RE_DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})/(\d{1,2})/(\d{4})\s+(\d{1,2}):(\d{2})\s*([AP])\.?M\.?\b")
        .expect("date-time regex")
});

/// Extract `YYYY-MM-DD HH:MM:SS` from `text` per `rule`, or `None` when no
/// pattern matches or the matched date is not a real calendar date.
pub fn extract_timestamp<R: Rng + ?Sized>(
    text: &str,
    rule: &TimestampRule,
    rng: &mut R,
) -> Option<String> {
    match rule.order {
        PatternOrder::DateOnlyFirst => {
            from_date_only(text, rule, rng).or_else(|| from_date_time(text, rule))
        }
        PatternOrder::DateTimeFirst => {
            from_date_time(text, rule).or_else(|| from_date_only(text, rule, rng))
        }
    }
}

fn from_date_only<R: Rng + ?Sized>(
    text: &str,
    rule: &TimestampRule,
    rng: &mut R,
) -> Option<String> {
    let caps = RE_DATE.captures(text)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;

    let mut date = NaiveDate::from_ymd_opt(year, month, day)?;
    if rule.backdate_one_day {
        date = date.checked_sub_days(Days::new(1))?;
    }

    // Only a date on the page: pick a time inside business hours.
    let time = NaiveTime::from_hms_opt(
        rng.random_range(8..17),
        rng.random_range(0..60),
        rng.random_range(0..60),
    )?;
    Some(date.and_time(time).format("%Y-%m-%d %H:%M:%S").to_string())
}

fn from_date_time(text: &str, rule: &TimestampRule) -> Option<String> {
    let caps = RE_DATE_TIME.captures(text)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let hour12: u32 = caps[4].parse().ok()?;
    let minute: u32 = caps[5].parse().ok()?;
    let pm = caps[6].eq_ignore_ascii_case("p");

    let hour = match (hour12, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    let mut dt = date.and_time(time);
    if rule.backdate_one_day {
        dt = dt.checked_sub_days(Days::new(1))?;
    }
    Some(dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    const DATE_ONLY: TimestampRule = TimestampRule {
        order: PatternOrder::DateOnlyFirst,
        backdate_one_day: false,
    };
    const DATE_ONLY_BACKDATED: TimestampRule = TimestampRule {
        order: PatternOrder::DateOnlyFirst,
        backdate_one_day: true,
    };
    const DATE_TIME: TimestampRule = TimestampRule {
        order: PatternOrder::DateTimeFirst,
        backdate_one_day: false,
    };

    #[test]
    fn date_only_synthesizes_business_hours_time() {
        let out = extract_timestamp("Exam Date: 3/15/2024", &DATE_ONLY, &mut rng()).unwrap();
        let (date, time) = out.split_once(' ').unwrap();
        assert_eq!(date, "2024-03-15");
        let hour: u32 = time[0..2].parse().unwrap();
        assert!((8..17).contains(&hour), "hour {hour} outside 08..17");
    }

    #[test]
    fn backdating_crosses_month_and_leap_boundaries() {
        let out = extract_timestamp("3/1/2024", &DATE_ONLY_BACKDATED, &mut rng()).unwrap();
        assert!(out.starts_with("2024-02-29 "), "got {out}");

        let out = extract_timestamp("1/1/2024", &DATE_ONLY_BACKDATED, &mut rng()).unwrap();
        assert!(out.starts_with("2023-12-31 "), "got {out}");
    }

    #[test]
    fn twelve_hour_clock_converts() {
        let out = extract_timestamp("Sent 3/15/2024 12:05 AM ok", &DATE_TIME, &mut rng()).unwrap();
        assert_eq!(out, "2024-03-15 00:05:00");
        let out = extract_timestamp("Sent 3/15/2024 12:05 PM ok", &DATE_TIME, &mut rng()).unwrap();
        assert_eq!(out, "2024-03-15 12:05:00");
        let out = extract_timestamp("Sent 3/15/2024 3:45 pm ok", &DATE_TIME, &mut rng()).unwrap();
        assert_eq!(out, "2024-03-15 15:45:00");
    }

    #[test]
    fn backdated_date_time_subtracts_a_full_day() {
        let rule = TimestampRule {
            order: PatternOrder::DateTimeFirst,
            backdate_one_day: true,
        };
        let out = extract_timestamp("3/1/2024 9:00 AM", &rule, &mut rng()).unwrap();
        assert_eq!(out, "2024-02-29 09:00:00");
    }

    #[test]
    fn order_decides_which_pattern_wins() {
        // Both patterns match this text; the date-only-first rule ignores the
        // printed clock time and synthesizes its own.
        let text = "received 6/2/2025 4:30 PM";
        let out = extract_timestamp(text, &DATE_ONLY, &mut rng()).unwrap();
        let hour: u32 = out[11..13].parse().unwrap();
        assert!(out.starts_with("2025-06-02 "));
        assert!((8..17).contains(&hour));

        let out = extract_timestamp(text, &DATE_TIME, &mut rng()).unwrap();
        assert_eq!(out, "2025-06-02 16:30:00");
    }

    #[test]
    fn date_time_first_falls_back_to_bare_date() {
        let out = extract_timestamp("stamped 6/2/2025 only", &DATE_TIME, &mut rng()).unwrap();
        assert!(out.starts_with("2025-06-02 "));
    }

    #[test]
    fn impossible_dates_are_treated_as_absent() {
        assert!(extract_timestamp("13/40/2024", &DATE_ONLY, &mut rng()).is_none());
        assert!(extract_timestamp("2/30/2024", &DATE_ONLY, &mut rng()).is_none());
        assert!(extract_timestamp("no date here", &DATE_TIME, &mut rng()).is_none());
    }
}
