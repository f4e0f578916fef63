use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use serde::Serialize;

pub const DEFAULT_WINDOW_DAYS: u32 = 30;

const FIRST_HOUR: u32 = 9;
const LAST_HOUR: u32 = 17;

/// Weekdays in `[reference_date, reference_date + window_days)`, ascending.
pub fn available_dates(window_days: u32, reference_date: NaiveDate) -> Vec<NaiveDate> {
    (0..window_days)
        .filter_map(|offset| reference_date.checked_add_signed(Duration::days(offset as i64)))
        .filter(|date| is_weekday(*date))
        .collect()
}

/// The hourly grid 09:00 through 17:00 inclusive.
pub fn available_times() -> Vec<NaiveTime> {
    (FIRST_HOUR..=LAST_HOUR)
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .collect()
}

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn format_date_for_input(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Long British form, e.g. `Monday 16 June 2025`.
pub fn format_date_for_display(date: NaiveDate) -> String {
    date.format("%A %-d %B %Y").to_string()
}

/// The dates and times offered by one wizard opening.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookableSlots {
    pub dates: Vec<NaiveDate>,
    #[serde(serialize_with = "serialize_times")]
    pub times: Vec<NaiveTime>,
}

impl BookableSlots {
    pub fn generate(window_days: u32, reference_date: NaiveDate) -> Self {
        Self {
            dates: available_dates(window_days, reference_date),
            times: available_times(),
        }
    }

    pub fn empty() -> Self {
        Self {
            dates: Vec::new(),
            times: Vec::new(),
        }
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.dates.binary_search(&date).is_ok()
    }

    pub fn contains_time(&self, time: NaiveTime) -> bool {
        self.times.binary_search(&time).is_ok()
    }
}

fn serialize_times<S: serde::Serializer>(times: &[NaiveTime], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(times.iter().map(|t| format_time(*t)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_dates_from_monday() {
        // 2025-06-16 is a Monday
        let dates = available_dates(7, date("2025-06-16"));
        assert_eq!(dates.len(), 5);
        assert_eq!(dates.first(), Some(&date("2025-06-16")));
        assert_eq!(dates.last(), Some(&date("2025-06-20")));
    }

    #[test]
    fn test_dates_from_saturday_skip_weekend() {
        // 2025-06-14 is a Saturday
        let dates = available_dates(3, date("2025-06-14"));
        assert_eq!(dates, vec![date("2025-06-16")]);
    }

    #[test]
    fn test_zero_window_is_empty() {
        assert!(available_dates(0, date("2025-06-16")).is_empty());
    }

    #[test]
    fn test_times_grid() {
        let times = available_times();
        let formatted: Vec<String> = times.iter().map(|t| format_time(*t)).collect();
        assert_eq!(
            formatted,
            vec!["09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00"]
        );
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_display_format() {
        assert_eq!(format_date_for_display(date("2025-06-16")), "Monday 16 June 2025");
        assert_eq!(format_date_for_display(date("2025-07-04")), "Friday 4 July 2025");
        assert_eq!(format_date_for_input(date("2025-07-04")), "2025-07-04");
    }

    #[test]
    fn test_slots_membership() {
        let slots = BookableSlots::generate(30, date("2025-06-16"));
        assert!(slots.contains_date(date("2025-06-17")));
        assert!(!slots.contains_date(date("2025-06-21")));
        assert!(!slots.contains_date(date("2025-08-01")));
        assert!(slots.contains_time(NaiveTime::from_hms_opt(17, 0, 0).unwrap()));
        assert!(!slots.contains_time(NaiveTime::from_hms_opt(18, 0, 0).unwrap()));
        assert!(!slots.contains_time(NaiveTime::from_hms_opt(9, 30, 0).unwrap()));
    }

    proptest! {
        #[test]
        fn prop_window_never_contains_weekends(offset in 0i64..20_000) {
            let reference = date("2000-01-01") + Duration::days(offset);
            let dates = available_dates(30, reference);
            prop_assert!(dates.iter().all(|d| is_weekday(*d)));
        }

        #[test]
        fn prop_window_length_in_range(offset in 0i64..20_000) {
            let reference = date("2000-01-01") + Duration::days(offset);
            let dates = available_dates(30, reference);
            prop_assert!(dates.len() >= 20 && dates.len() <= 30);
            prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(dates.iter().all(|d| *d >= reference && *d < reference + Duration::days(30)));
        }

        #[test]
        fn prop_generation_is_deterministic(offset in 0i64..20_000) {
            let reference = date("2000-01-01") + Duration::days(offset);
            prop_assert_eq!(available_dates(30, reference), available_dates(30, reference));
        }
    }
}
