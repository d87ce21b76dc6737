//! Source of "today" for date arithmetic.
//!
//! Anything that depends on the current date takes a `Clock` instead of
//! reading system time, so tests can pin the date.

use std::sync::Arc;

use chrono::{Local, NaiveDate};

/// Supplies the current calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

impl<C> Clock for Arc<C>
where
    C: Clock + ?Sized,
{
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Wall clock in the local timezone.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedClock(NaiveDate);

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self(today)
    }

    /// Returns `None` for an impossible calendar date.
    pub fn ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_returns_pinned_date() {
        let clock = FixedClock::ymd(2024, 2, 29).unwrap();
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn fixed_clock_rejects_impossible_date() {
        assert!(FixedClock::ymd(2023, 2, 29).is_none());
    }

    #[test]
    fn arc_clock_delegates() {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::ymd(2020, 1, 1).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }
}
