//! Capacity stage: turns available staff-hours into tickets per day.
//!
//! capacity = staff_hours × efficiency / weighted_complexity_factor
//!
//! The weighted factor is computed once per run from the static mix.

use crate::{
    absence_schedule::AbsenceSchedule,
    config::{SimulationConfig, FULL_TIME_HOURS_PER_DAY},
    record::DayState,
    rng::SimRng,
    stage::DailyStage,
    types::Day,
};

pub fn staff_hours(full_time: u32, part_time: u32, part_time_hours_per_day: f64) -> f64 {
    full_time as f64 * FULL_TIME_HOURS_PER_DAY + part_time as f64 * part_time_hours_per_day
}

/// Tickets processable in `hours`. Zero when the weighted factor is not
/// positive.
pub fn ticket_capacity(hours: f64, agent_efficiency: f64, weighted_factor: f64) -> f64 {
    if weighted_factor > 0.0 {
        (hours * agent_efficiency) / weighted_factor
    } else {
        0.0
    }
}

pub struct CapacityStage {
    schedule:                AbsenceSchedule,
    full_time_agents:        u32,
    part_time_agents:        u32,
    part_time_hours_per_day: f64,
    agent_efficiency:        f64,
    weighted_factor:         f64,
}

impl CapacityStage {
    pub fn new(config: &SimulationConfig, schedule: AbsenceSchedule) -> Self {
        Self {
            schedule,
            full_time_agents: config.full_time_agents,
            part_time_agents: config.part_time_agents,
            part_time_hours_per_day: config.part_time_hours_per_day,
            agent_efficiency: config.agent_efficiency,
            weighted_factor: config.weighted_complexity_factor(),
        }
    }

    pub fn schedule(&self) -> &AbsenceSchedule {
        &self.schedule
    }

    /// (available full-time, available part-time) on `day`.
    pub fn available_staff(&self, day: Day) -> (u32, u32) {
        let ft = self.full_time_agents as usize;
        let pt = self.part_time_agents as usize;
        let ft_absent = self.schedule.absent_in(0..ft, day);
        let pt_absent = self.schedule.absent_in(ft..ft + pt, day);
        (
            self.full_time_agents.saturating_sub(ft_absent),
            self.part_time_agents.saturating_sub(pt_absent),
        )
    }
}

impl DailyStage for CapacityStage {
    fn name(&self) -> &'static str { "capacity" }

    fn update(&mut self, day: &mut DayState, _rng: &mut SimRng) {
        let (ft, pt) = self.available_staff(day.day);
        let hours = staff_hours(ft, pt, self.part_time_hours_per_day);
        day.available_full_time = ft;
        day.available_part_time = pt;
        day.capacity = ticket_capacity(hours, self.agent_efficiency, self.weighted_factor);
    }
}
