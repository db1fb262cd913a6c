//! Shared primitive types used across the entire simulation.

use serde::{Deserialize, Serialize};

/// A simulated day. Day 0 is the first day of the planning horizon.
pub type Day = u64;

/// The canonical run identifier.
pub type RunId = String;

/// Mint a fresh run identifier.
/// Run ids are labels for persistence only; they never feed the RNG.
pub fn new_run_id() -> RunId {
    format!("run-{}", uuid::Uuid::new_v4())
}

/// Ticket complexity levels. Ordering is stable and used for
/// deterministic iteration over complexity tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

impl ComplexityLevel {
    pub const ALL: [ComplexityLevel; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low    => "low",
            Self::Medium => "medium",
            Self::High   => "high",
        }
    }
}
