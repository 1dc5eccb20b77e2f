//! Slot grid generator.
//!
//! Every business day has the same 18 half-hour start times, 09:00 through
//! 17:30; the last slot ends at 18:00. This grid is the only source of legal
//! appointment times: the ledger trusts whatever it is handed.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// First start, in minutes after midnight.
pub const FIRST_SLOT_MINUTE: u32 = 9 * 60;
/// Last start, in minutes after midnight.
pub const LAST_SLOT_MINUTE: u32 = 17 * 60 + 30;
pub const SLOT_LENGTH_MINUTES: u32 = 30;
pub const SLOTS_PER_DAY: usize = 18;

/// Start times of the daily grid, ascending.
pub fn slot_times() -> Vec<NaiveTime> {
    (FIRST_SLOT_MINUTE..=LAST_SLOT_MINUTE)
        .step_by(SLOT_LENGTH_MINUTES as usize)
        .filter_map(|minute| NaiveTime::from_hms_opt(minute / 60, minute % 60, 0))
        .collect()
}

/// The canonical slots of `date`, ascending. Pure; does not look at weekdays.
pub fn daily_slots(date: NaiveDate) -> Vec<NaiveDateTime> {
    slot_times().into_iter().map(|time| date.and_time(time)).collect()
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Weekdays among the `window_days` calendar days starting at `today`.
///
/// Weekends inside the window are dropped, not replaced, so a window of 5
/// that spans a weekend yields 3 dates. Holidays are not considered.
pub fn upcoming_business_days(today: NaiveDate, window_days: u32) -> Vec<NaiveDate> {
    (0..u64::from(window_days))
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .filter(|date| is_business_day(*date))
        .collect()
}

/// True for a weekday date+time that lands exactly on a grid slot.
pub fn is_on_grid(at: NaiveDateTime) -> bool {
    is_business_day(at.date()) && slot_times().contains(&at.time())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{at, monday};

    #[test]
    fn grid_has_eighteen_half_hour_slots() {
        let slots = daily_slots(monday());
        assert_eq!(slots.len(), SLOTS_PER_DAY);
        assert_eq!(slots[0], at("2025-03-10", "09:00"));
        assert_eq!(slots[SLOTS_PER_DAY - 1], at("2025-03-10", "17:30"));
        for pair in slots.windows(2) {
            assert_eq!((pair[1] - pair[0]).num_minutes(), 30);
        }
    }

    #[test]
    fn grid_is_same_for_every_date() {
        let a: Vec<NaiveTime> = daily_slots(monday()).iter().map(|s| s.time()).collect();
        let b: Vec<NaiveTime> = daily_slots(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
            .iter()
            .map(|s| s.time())
            .collect();
        assert_eq!(a, b);
        assert_eq!(a, slot_times());
    }

    #[test]
    fn business_days_skip_weekend_inside_window() {
        // Thursday 2025-03-13 + 5 calendar days: Thu, Fri, (Sat, Sun), Mon.
        let thursday = NaiveDate::from_ymd_opt(2025, 3, 13).unwrap();
        let days = upcoming_business_days(thursday, 5);
        let expected: Vec<NaiveDate> = [13, 14, 17]
            .iter()
            .map(|d| NaiveDate::from_ymd_opt(2025, 3, *d).unwrap())
            .collect();
        assert_eq!(days, expected);
    }

    #[test]
    fn business_days_full_week_from_monday() {
        let days = upcoming_business_days(monday(), 5);
        assert_eq!(days.len(), 5);
        assert_eq!(days[0], monday());
        assert_eq!(days[4].weekday(), Weekday::Fri);
    }

    #[test]
    fn business_days_empty_window() {
        assert!(upcoming_business_days(monday(), 0).is_empty());
    }

    #[test]
    fn on_grid_checks() {
        assert!(is_on_grid(at("2025-03-10", "09:00")));
        assert!(is_on_grid(at("2025-03-10", "17:30")));
        assert!(!is_on_grid(at("2025-03-10", "18:00")));
        assert!(!is_on_grid(at("2025-03-10", "08:30")));
        assert!(!is_on_grid(at("2025-03-10", "09:15")));
        // Saturday
        assert!(!is_on_grid(at("2025-03-15", "10:00")));
    }
}
