//! Simulation clock: owns the day counter and maps days to calendar dates.

use crate::types::Day;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub start_date:   NaiveDate,
    pub horizon_days: Day,
    /// The next day to simulate. Equals `horizon_days` once finished.
    next_day:         Day,
}

impl SimClock {
    pub fn new(start_date: NaiveDate, horizon_days: Day) -> Self {
        Self {
            start_date,
            horizon_days,
            next_day: 0,
        }
    }

    /// Advance one day. Returns the day just entered and its date,
    /// or None once the horizon is exhausted.
    pub fn advance(&mut self) -> Option<(Day, NaiveDate)> {
        if self.is_finished() {
            return None;
        }
        let day = self.next_day;
        self.next_day += 1;
        Some((day, self.date_for(day)))
    }

    pub fn date_for(&self, day: Day) -> NaiveDate {
        self.start_date
            .checked_add_days(Days::new(day))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn days_elapsed(&self) -> Day {
        self.next_day
    }

    pub fn remaining(&self) -> Day {
        self.horizon_days - self.next_day
    }

    pub fn is_finished(&self) -> bool {
        self.next_day >= self.horizon_days
    }
}
