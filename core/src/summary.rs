//! Run-level KPIs derived from a finished record sequence.
//!
//! The engine never computes these itself; dashboards and the runner
//! derive them from the records it returns.

use crate::{
    capacity_stage::staff_hours,
    config::SimulationConfig,
    record::DayRecord,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub days:              usize,
    pub mean_wait_hours:   f64,
    pub p50_wait_hours:    f64,
    pub p90_wait_hours:    f64,
    pub max_backlog:       f64,
    pub final_backlog:     f64,
    pub total_solved:      f64,
    pub total_net_inbound: f64,
    /// total_solved / total_net_inbound; 0 when nothing arrived.
    pub clearance_rate:    f64,
    pub total_staff_hours: f64,
}

impl RunSummary {
    pub fn from_records(records: &[DayRecord], config: &SimulationConfig) -> Self {
        let days = records.len();
        if days == 0 {
            return Self::empty();
        }

        let total_solved: f64 = records.iter().map(|r| r.solved).sum();
        let total_net_inbound: f64 = records.iter().map(|r| r.net_inbound).sum();
        let mut waits: Vec<f64> = records.iter().map(|r| r.est_wait_hours).collect();
        waits.sort_by(|a, b| a.total_cmp(b));

        Self {
            days,
            mean_wait_hours: waits.iter().sum::<f64>() / days as f64,
            p50_wait_hours: percentile(&waits, 50.0),
            p90_wait_hours: percentile(&waits, 90.0),
            max_backlog: records.iter().map(|r| r.backlog).fold(0.0, f64::max),
            final_backlog: records[days - 1].backlog,
            total_solved,
            total_net_inbound,
            clearance_rate: if total_net_inbound > 0.0 {
                total_solved / total_net_inbound
            } else {
                0.0
            },
            total_staff_hours: records
                .iter()
                .map(|r| {
                    staff_hours(
                        r.available_full_time,
                        r.available_part_time,
                        config.part_time_hours_per_day,
                    )
                })
                .sum(),
        }
    }

    fn empty() -> Self {
        Self {
            days: 0,
            mean_wait_hours: 0.0,
            p50_wait_hours: 0.0,
            p90_wait_hours: 0.0,
            max_backlog: 0.0,
            final_backlog: 0.0,
            total_solved: 0.0,
            total_net_inbound: 0.0,
            clearance_rate: 0.0,
            total_staff_hours: 0.0,
        }
    }
}

/// Linear-interpolated percentile over an ascending slice.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (pct / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
        }
    }
}

/// Empirical CDF of estimated wait: ascending (hours, P(wait <= hours)).
pub fn wait_time_cdf(records: &[DayRecord]) -> Vec<(f64, f64)> {
    let mut waits: Vec<f64> = records.iter().map(|r| r.est_wait_hours).collect();
    waits.sort_by(|a, b| a.total_cmp(b));
    let n = waits.len() as f64;
    waits
        .into_iter()
        .enumerate()
        .map(|(i, w)| (w, (i + 1) as f64 / n))
        .collect()
}
