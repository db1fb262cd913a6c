//! Absence scheduler: planned leave, precomputed once per run.
//!
//! Each absence is a discrete (agent, day) event. The target count is
//! floor(horizon × rate × agents); every draw picks an agent then a day
//! uniformly, with replacement. Duplicate draws collapse onto the same
//! cell, so the realized count can fall short of the target.
//!
//! Rows are laid out full-time agents first, then part-time agents.

use crate::{rng::SimRng, types::Day};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsenceSchedule {
    total_agents: usize,
    horizon_days: usize,
    target:       u64,
    /// Row-major: agent * horizon_days + day.
    absent:       Vec<bool>,
}

impl AbsenceSchedule {
    /// A schedule with every agent present every day.
    /// A grid whose size overflows `usize` holds no agents at all.
    pub fn empty(total_agents: usize, horizon_days: Day) -> Self {
        let horizon_days = usize::try_from(horizon_days).unwrap_or(usize::MAX);
        let Some(cells) = total_agents.checked_mul(horizon_days) else {
            log::warn!("absence grid {total_agents} x {horizon_days} overflows, scheduling no absences");
            return Self { total_agents: 0, horizon_days, target: 0, absent: Vec::new() };
        };
        Self {
            total_agents,
            horizon_days,
            target: 0,
            absent: vec![false; cells],
        }
    }

    /// floor(horizon × rate × agents), multiplied in that order.
    pub fn target_absences(total_agents: usize, horizon_days: Day, absenteeism_rate: f64) -> u64 {
        // Negative products saturate to 0 on the cast.
        (horizon_days as f64 * absenteeism_rate * total_agents as f64).floor() as u64
    }

    pub fn generate(
        total_agents: usize,
        horizon_days: Day,
        absenteeism_rate: f64,
        rng: &mut SimRng,
    ) -> Self {
        let mut schedule = Self::empty(total_agents, horizon_days);
        let target = Self::target_absences(total_agents, horizon_days, absenteeism_rate);
        if schedule.total_agents == 0 || horizon_days == 0 || target == 0 {
            return schedule;
        }
        schedule.target = target;

        for _ in 0..target {
            let agent = rng.next_u64_below(total_agents as u64) as usize;
            let day = rng.next_u64_below(horizon_days) as usize;
            schedule.absent[agent * schedule.horizon_days + day] = true;
        }

        log::debug!(
            "absence schedule: agents={total_agents} days={horizon_days} target={target} realized={}",
            schedule.realized_absences()
        );
        schedule
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// Distinct absent (agent, day) cells. Always <= target().
    pub fn realized_absences(&self) -> usize {
        self.absent.iter().filter(|a| **a).count()
    }

    pub fn total_agents(&self) -> usize {
        self.total_agents
    }

    pub fn is_absent(&self, agent: usize, day: Day) -> bool {
        let day = day as usize;
        if agent >= self.total_agents || day >= self.horizon_days {
            return false;
        }
        self.absent[agent * self.horizon_days + day]
    }

    /// Number of agents in `agents` (row range) absent on `day`.
    pub fn absent_in(&self, agents: Range<usize>, day: Day) -> u32 {
        agents.filter(|agent| self.is_absent(*agent, day)).count() as u32
    }
}
