//! The simulation engine: turns a config and a seed into the ordered
//! sequence of daily queue states.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   0. Absence scheduler   (once, at build)
//!   1. Arrival stage       (every day)
//!   2. Capacity stage      (every day)
//!   3. Queue stage         (every day)
//!
//! RULES:
//!   - Stages execute in registration order, every day.
//!   - Only the queue stage carries state across days (the backlog).
//!   - All randomness flows through the RngBank handed to build().
//!   - The engine never fails for an in-range config; divisions are
//!     guarded inside the stages.

use crate::{
    absence_schedule::AbsenceSchedule,
    arrival_stage::ArrivalStage,
    capacity_stage::CapacityStage,
    clock::SimClock,
    config::{SimulationConfig, MAX_HORIZON_DAYS},
    queue_stage::QueueStage,
    record::{DayRecord, DayState},
    rng::{RngBank, SimRng, StreamSlot},
    stage::DailyStage,
};

pub struct SimEngine {
    pub clock:    SimClock,
    pub rng_bank: RngBank,
    config:       SimulationConfig,
    stages:       Vec<(SimRng, Box<dyn DailyStage>)>,
}

impl SimEngine {
    /// An engine with no stages registered.
    pub fn new(config: SimulationConfig, rng_bank: RngBank) -> Self {
        Self {
            clock: SimClock::new(config.start_date, config.horizon_days),
            rng_bank,
            config,
            stages: Vec::new(),
        }
    }

    /// Build a fully wired engine with all stages registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(config: SimulationConfig, rng_bank: RngBank) -> Self {
        let mut absence_rng = rng_bank.for_stream(StreamSlot::Absence);
        let schedule = AbsenceSchedule::generate(
            config.total_agents(),
            config.horizon_days,
            config.absenteeism_rate,
            &mut absence_rng,
        );

        let arrivals = ArrivalStage::new(&config);
        let capacity = CapacityStage::new(&config, schedule);
        let queue = QueueStage::new(&config);

        let mut engine = SimEngine::new(config, rng_bank);
        // EXECUTION ORDER: fixed, documented, never reordered.
        engine.register(StreamSlot::Arrivals, Box::new(arrivals));
        engine.register(StreamSlot::Capacity, Box::new(capacity));
        engine.register(StreamSlot::Queue, Box::new(queue));
        engine
    }

    /// Register a stage. Call in the documented execution order.
    /// The stage's stream is created here and lives for the whole run.
    pub fn register(&mut self, slot: StreamSlot, stage: Box<dyn DailyStage>) {
        self.stages.push((self.rng_bank.for_stream(slot), stage));
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Names of registered stages, in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|(_, stage)| stage.name()).collect()
    }

    /// Simulate one day. Returns None once the horizon is exhausted.
    pub fn step(&mut self) -> Option<DayRecord> {
        let (day, date) = self.clock.advance()?;
        let mut state = DayState::new(day, date);

        for (rng, stage) in &mut self.stages {
            stage.update(&mut state, rng);
        }

        log::debug!(
            "day={day} inbound={:.2} capacity={:.2} solved={:.2} backlog={:.2} wait_days={:.3}",
            state.net_inbound,
            state.capacity,
            state.solved,
            state.backlog,
            state.est_wait_days
        );

        Some(state.into_record())
    }

    /// Run every remaining day of the horizon.
    pub fn run_to_end(&mut self) -> Vec<DayRecord> {
        log::info!(
            "run start: seed={} days={} ft={} pt={} avg_inbound={} volatility={}",
            self.rng_bank.seed(),
            self.config.horizon_days,
            self.config.full_time_agents,
            self.config.part_time_agents,
            self.config.avg_daily_tickets,
            self.config.volatility
        );

        let mut records = Vec::with_capacity(self.clock.remaining().min(MAX_HORIZON_DAYS) as usize);
        while let Some(record) = self.step() {
            records.push(record);
        }

        log::info!(
            "run complete: days={} final_backlog={:.2}",
            records.len(),
            records.last().map(|r| r.backlog).unwrap_or(0.0)
        );
        records
    }
}

/// Run one complete simulation. Same config + same bank seed gives
/// identical records.
pub fn run_simulation(config: &SimulationConfig, rng_bank: RngBank) -> Vec<DayRecord> {
    SimEngine::build(config.clone(), rng_bank).run_to_end()
}
