//! Simulation clock for the campaign.
//!
//! The clock is the single source of truth for the campaign date. It moves
//! forward by exactly one calendar day per committed tick and is never
//! advanced anywhere else in the pipeline.
//!
//! # Design Principles
//!
//! - Dates are calendar-accurate [`NaiveDate`] values (leap years, month
//!   lengths); advancing uses checked successor arithmetic.
//! - Calendar flags (weekday, month start) are never stored here. They are
//!   derived fresh every tick by [`crate::triggers`].
//! - [`SimulationClock::set_date`] exists for out-of-band manipulation
//!   (loading a saved campaign, editor tooling); it is not part of a tick.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// The date cannot advance past the last representable day.
    #[error("date overflow: cannot advance beyond {date}")]
    DateOverflow {
        /// The date that could not be advanced.
        date: NaiveDate,
    },
}

/// The campaign's current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationClock {
    date: NaiveDate,
}

impl SimulationClock {
    /// Create a clock showing `date`.
    pub const fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Return the current date.
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Advance by exactly one day. Returns the new date.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::DateOverflow`] if the current date is the last
    /// date chrono can represent.
    pub fn advance(&mut self) -> Result<NaiveDate, ClockError> {
        self.date = self
            .date
            .succ_opt()
            .ok_or(ClockError::DateOverflow { date: self.date })?;
        Ok(self.date)
    }

    /// Replace the current date outside of a tick.
    pub const fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
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
    fn advances_one_day() {
        let mut clock = SimulationClock::new(date(3025, 1, 1));
        assert_eq!(clock.advance().unwrap(), date(3025, 1, 2));
        assert_eq!(clock.date(), date(3025, 1, 2));
    }

    #[test]
    fn crosses_month_and_year_boundaries() {
        let mut clock = SimulationClock::new(date(2025, 1, 31));
        assert_eq!(clock.advance().unwrap(), date(2025, 2, 1));

        clock.set_date(date(3025, 12, 31));
        assert_eq!(clock.advance().unwrap(), date(3026, 1, 1));
    }

    #[test]
    fn respects_leap_years() {
        let mut clock = SimulationClock::new(date(3024, 2, 28));
        assert_eq!(clock.advance().unwrap(), date(3024, 2, 29));
        assert_eq!(clock.advance().unwrap(), date(3024, 3, 1));

        let mut clock = SimulationClock::new(date(3025, 2, 28));
        assert_eq!(clock.advance().unwrap(), date(3025, 3, 1));
    }

    #[test]
    fn overflow_is_an_error_and_leaves_date_untouched() {
        let mut clock = SimulationClock::new(NaiveDate::MAX);
        assert!(matches!(clock.advance(), Err(ClockError::DateOverflow { .. })));
        assert_eq!(clock.date(), NaiveDate::MAX);
    }
}
