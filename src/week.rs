//! Calendar helpers: weekday names, ISO week keys, Monday arithmetic.
//!
//! All engine dates are typed (`chrono::NaiveDate`); there is no string
//! date path inside the core, so an unparseable date can only occur at
//! the caller's boundary and is rejected there. Week keys use the ISO
//! convention: Monday-start weeks, `YYYY-Www` with a zero-padded week
//! number (e.g. `2025-W02`).

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Number of days in a planning week.
pub const DAYS_PER_WEEK: u64 = 7;

/// Maps a weekday name to its offset from Monday (Monday=0 … Sunday=6).
///
/// Accepts French and English names, case-insensitively. Recurrence
/// sets come from commercial onboarding and may carry either language;
/// anything else yields `None` and the caller skips the entry.
pub fn weekday_offset(name: &str) -> Option<u64> {
    let offset = match name.trim().to_lowercase().as_str() {
        "lundi" | "monday" => 0,
        "mardi" | "tuesday" => 1,
        "mercredi" | "wednesday" => 2,
        "jeudi" | "thursday" => 3,
        "vendredi" | "friday" => 4,
        "samedi" | "saturday" => 5,
        "dimanche" | "sunday" => 6,
        _ => return None,
    };
    Some(offset)
}

/// ISO week key for a date: `YYYY-Www`, Monday-start.
///
/// Uses the ISO week-numbering year, so early-January dates that belong
/// to the previous ISO year key accordingly (2027-01-01 → `2026-W53`).
pub fn week_key(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

/// Monday of the week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as u64;
    date - Days::new(back)
}

/// Whether `date` is a Monday.
pub fn is_monday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Mon
}

/// The seven dates of the week starting at `monday`.
pub fn week_dates(monday: NaiveDate) -> Vec<NaiveDate> {
    (0..DAYS_PER_WEEK)
        .map(|offset| monday + Days::new(offset))
        .collect()
}

/// Last day (Sunday) of the week starting at `monday`.
pub fn week_end(monday: NaiveDate) -> NaiveDate {
    monday + Days::new(DAYS_PER_WEEK - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekday_offset_french_and_english() {
        assert_eq!(weekday_offset("Lundi"), Some(0));
        assert_eq!(weekday_offset("monday"), Some(0));
        assert_eq!(weekday_offset("MERCREDI"), Some(2));
        assert_eq!(weekday_offset("Wednesday"), Some(2));
        assert_eq!(weekday_offset("dimanche"), Some(6));
        assert_eq!(weekday_offset(" sunday "), Some(6));
    }

    #[test]
    fn test_weekday_offset_unknown() {
        assert_eq!(weekday_offset("Februar"), None);
        assert_eq!(weekday_offset(""), None);
        assert_eq!(weekday_offset("lundi,mardi"), None);
    }

    #[test]
    fn test_week_key_padded() {
        // 2025-01-06 is the Monday of ISO week 2.
        assert_eq!(week_key(date(2025, 1, 6)), "2025-W02");
        assert_eq!(week_key(date(2025, 6, 18)), "2025-W25");
    }

    #[test]
    fn test_week_key_iso_year_boundary() {
        // 2027-01-01 falls in ISO week 53 of 2026.
        assert_eq!(week_key(date(2027, 1, 1)), "2026-W53");
    }

    #[test]
    fn test_monday_of() {
        assert_eq!(monday_of(date(2025, 1, 8)), date(2025, 1, 6));
        assert_eq!(monday_of(date(2025, 1, 6)), date(2025, 1, 6));
        assert_eq!(monday_of(date(2025, 1, 12)), date(2025, 1, 6));
    }

    #[test]
    fn test_week_dates_and_end() {
        let days = week_dates(date(2025, 1, 6));
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date(2025, 1, 6));
        assert_eq!(days[6], date(2025, 1, 12));
        assert_eq!(week_end(date(2025, 1, 6)), date(2025, 1, 12));
        assert!(is_monday(date(2025, 1, 6)));
        assert!(!is_monday(date(2025, 1, 7)));
    }
}
