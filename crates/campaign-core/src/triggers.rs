//! Trigger evaluation: calendar flags derived from the new date.
//!
//! [`TriggerFlags::evaluate`] is a pure function of a date. The orchestrator
//! calls it exactly once per tick, right after the clock advances, and
//! passes the result to every phase. Nothing caches flags across ticks: a
//! campaign can be loaded or have its date edited between ticks, so the
//! only safe source of "is it Monday" is the date itself.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A recurring calendar boundary that can gate a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// Every day.
    Daily,
    /// Mondays.
    Weekly,
    /// Mondays of odd ISO weeks.
    Biweekly,
    /// The first day of a month.
    Monthly,
    /// The second day of a month.
    SecondOfMonth,
    /// January 1st.
    Yearly,
}

/// Calendar flags for a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct TriggerFlags {
    /// The date is a Monday.
    pub is_monday: bool,
    /// The date is the first of a month.
    pub is_first_of_month: bool,
    /// The date is January 1st.
    pub is_first_of_year: bool,
    /// The date is the second of a month.
    pub is_second_of_month: bool,
    /// The date falls in an odd-numbered ISO week.
    pub is_odd_iso_week: bool,
}

impl TriggerFlags {
    /// Derive the flags for `date`.
    pub fn evaluate(date: NaiveDate) -> Self {
        Self {
            is_monday: date.weekday() == Weekday::Mon,
            is_first_of_month: date.day() == 1,
            is_first_of_year: date.ordinal() == 1,
            is_second_of_month: date.day() == 2,
            is_odd_iso_week: date.iso_week().week() % 2 == 1,
        }
    }

    /// Whether `trigger` fires on this date.
    pub const fn fires(&self, trigger: Trigger) -> bool {
        match trigger {
            Trigger::Daily => true,
            Trigger::Weekly => self.is_monday,
            Trigger::Biweekly => self.is_monday && self.is_odd_iso_week,
            Trigger::Monthly => self.is_first_of_month,
            Trigger::SecondOfMonth => self.is_second_of_month,
            Trigger::Yearly => self.is_first_of_year,
        }
    }

    /// Every trigger that fires on this date, in declaration order.
    pub fn active(&self) -> Vec<Trigger> {
        [
            Trigger::Daily,
            Trigger::Weekly,
            Trigger::Biweekly,
            Trigger::Monthly,
            Trigger::SecondOfMonth,
            Trigger::Yearly,
        ]
        .into_iter()
        .filter(|trigger| self.fires(*trigger))
        .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_of_month_on_a_saturday() {
        // 2025-02-01 is a Saturday.
        let flags = TriggerFlags::evaluate(date(2025, 2, 1));
        assert!(flags.is_first_of_month);
        assert!(!flags.is_monday);
        assert!(!flags.is_first_of_year);
        assert!(!flags.is_second_of_month);
    }

    #[test]
    fn monday_that_is_also_first_of_month() {
        // 2025-09-01 is a Monday.
        let flags = TriggerFlags::evaluate(date(2025, 9, 1));
        assert!(flags.is_monday);
        assert!(flags.is_first_of_month);
        assert!(flags.fires(Trigger::Weekly));
        assert!(flags.fires(Trigger::Monthly));
    }

    #[test]
    fn new_year() {
        let flags = TriggerFlags::evaluate(date(3026, 1, 1));
        assert!(flags.is_first_of_year);
        assert!(flags.is_first_of_month);
        assert_eq!(
            flags.active().contains(&Trigger::Yearly),
            flags.fires(Trigger::Yearly)
        );
    }

    #[test]
    fn second_of_month() {
        assert!(TriggerFlags::evaluate(date(3025, 7, 2)).is_second_of_month);
    }

    #[test]
    fn biweekly_requires_odd_iso_week() {
        // 2025-01-06 is the Monday of ISO week 2; 2025-01-13 of week 3.
        let even = TriggerFlags::evaluate(date(2025, 1, 6));
        let odd = TriggerFlags::evaluate(date(2025, 1, 13));
        assert!(even.is_monday && !even.fires(Trigger::Biweekly));
        assert!(odd.is_monday && odd.fires(Trigger::Biweekly));
    }

    #[test]
    fn flags_are_a_pure_function_of_date() {
        let a = TriggerFlags::evaluate(date(3025, 3, 3));
        let _other = TriggerFlags::evaluate(date(3025, 12, 25));
        let b = TriggerFlags::evaluate(date(3025, 3, 3));
        assert_eq!(a, b);
    }

    #[test]
    fn daily_always_fires() {
        let flags = TriggerFlags::evaluate(date(3025, 5, 14));
        assert_eq!(flags.active(), vec![Trigger::Daily]);
    }
}
