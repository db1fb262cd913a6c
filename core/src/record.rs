//! Per-day records: the scratch state stages fill in, and the
//! immutable record the engine emits.

use crate::types::Day;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Working state for one simulated day.
/// Stages read what earlier stages wrote and fill in their own fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DayState {
    pub day:                 Day,
    pub date:                NaiveDate,
    pub raw_inbound:         f64,
    pub net_inbound:         f64,
    pub capacity:            f64,
    pub available_full_time: u32,
    pub available_part_time: u32,
    pub solved:              f64,
    pub backlog:             f64,
    pub est_wait_days:       f64,
}

impl DayState {
    pub fn new(day: Day, date: NaiveDate) -> Self {
        Self {
            day,
            date,
            raw_inbound: 0.0,
            net_inbound: 0.0,
            capacity: 0.0,
            available_full_time: 0,
            available_part_time: 0,
            solved: 0.0,
            backlog: 0.0,
            est_wait_days: 0.0,
        }
    }

    pub fn into_record(self) -> DayRecord {
        DayRecord {
            day:                 self.day,
            date:                self.date,
            raw_inbound:         self.raw_inbound,
            net_inbound:         self.net_inbound,
            capacity:            self.capacity,
            solved:              self.solved,
            backlog:             self.backlog,
            est_wait_days:       self.est_wait_days,
            est_wait_hours:      self.est_wait_days * 24.0,
            available_full_time: self.available_full_time,
            available_part_time: self.available_part_time,
        }
    }
}

/// One simulated day, as handed to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day:                 Day,
    pub date:                NaiveDate,
    pub raw_inbound:         f64,
    pub net_inbound:         f64,
    pub capacity:            f64,
    pub solved:              f64,
    /// End-of-day backlog.
    pub backlog:             f64,
    pub est_wait_days:       f64,
    pub est_wait_hours:      f64,
    pub available_full_time: u32,
    pub available_part_time: u32,
}

impl DayRecord {
    /// Display copy rounded the way the daily table shows it:
    /// counts to 2 decimals, wait days to 3, wait hours to 2.
    pub fn rounded(&self) -> Self {
        Self {
            raw_inbound:    round_to(self.raw_inbound, 2),
            net_inbound:    round_to(self.net_inbound, 2),
            capacity:       round_to(self.capacity, 2),
            solved:         round_to(self.solved, 2),
            backlog:        round_to(self.backlog, 2),
            est_wait_days:  round_to(self.est_wait_days, 3),
            est_wait_hours: round_to(self.est_wait_hours, 2),
            ..self.clone()
        }
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
