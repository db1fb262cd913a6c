//! Daily stage trait.
//!
//! RULE: Every per-day responsibility implements DailyStage.
//! The engine calls update() on each registered stage in
//! registration order, once per simulated day.
//! Execution order is fixed and documented in engine.rs.

use crate::{record::DayState, rng::SimRng};

/// The contract every per-day stage must fulfill.
pub trait DailyStage: Send {
    /// Unique stable name for this stage.
    fn name(&self) -> &'static str;

    /// Called once per day by the engine.
    ///
    /// - `day`: the day's working state; fields written by earlier
    ///   stages are already filled in
    /// - `rng`: this stage's deterministic stream for the whole run
    fn update(&mut self, day: &mut DayState, rng: &mut SimRng);
}
