//! Queue stage: advances the backlog and estimates wait time.
//!
//! The queue is a single aggregate FIFO: work is drawn oldest-first,
//! but individual tickets are not tracked. The backlog is the only
//! value carried from one day into the next.

use crate::{
    config::SimulationConfig,
    record::DayState,
    rng::SimRng,
    stage::DailyStage,
};
use serde::{Deserialize, Serialize};

/// Minimum latency before an agent picks up a ticket.
pub const REACTION_TIME_HOURS: f64 = 0.5;

/// Queue wait reported when the day has no capacity at all.
pub const NO_CAPACITY_WAIT_DAYS: f64 = 999.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueueOutcome {
    pub solved:          f64,
    pub backlog:         f64,
    pub queue_wait_days: f64,
    pub est_wait_days:   f64,
}

/// Hands-on time for an average ticket.
pub fn processing_time_hours(weighted_factor: f64, agent_efficiency: f64) -> f64 {
    if agent_efficiency > 0.0 {
        weighted_factor / agent_efficiency
    } else {
        0.0
    }
}

/// One day of queue processing.
pub fn process_day(
    backlog: f64,
    net_inbound: f64,
    capacity: f64,
    processing_hours: f64,
) -> QueueOutcome {
    let demand = backlog + net_inbound;
    let solved = demand.min(capacity);
    let new_backlog = demand - solved;

    let queue_wait_days = if capacity > 0.0 {
        new_backlog / capacity
    } else {
        NO_CAPACITY_WAIT_DAYS
    };
    let est_wait_days = queue_wait_days + (processing_hours + REACTION_TIME_HOURS) / 24.0;

    QueueOutcome {
        solved,
        backlog: new_backlog,
        queue_wait_days,
        est_wait_days,
    }
}

pub struct QueueStage {
    backlog:          f64,
    processing_hours: f64,
}

impl QueueStage {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            backlog: 0.0,
            processing_hours: processing_time_hours(
                config.weighted_complexity_factor(),
                config.agent_efficiency,
            ),
        }
    }

    /// Backlog at the end of the last processed day.
    pub fn backlog(&self) -> f64 {
        self.backlog
    }
}

impl DailyStage for QueueStage {
    fn name(&self) -> &'static str { "queue" }

    fn update(&mut self, day: &mut DayState, _rng: &mut SimRng) {
        let outcome = process_day(self.backlog, day.net_inbound, day.capacity, self.processing_hours);
        self.backlog = outcome.backlog;

        day.solved = outcome.solved;
        day.backlog = outcome.backlog;
        day.est_wait_days = outcome.est_wait_days;
    }
}
