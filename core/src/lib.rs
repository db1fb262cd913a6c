//! Ticket queue capacity simulator.
//!
//! Turns a staffing and traffic configuration into a day-by-day
//! trajectory of inbound, capacity, solved work, backlog and wait time.
//! Runs are deterministic given the seed of the RngBank passed in.

pub mod absence_schedule;
pub mod arrival_stage;
pub mod capacity_stage;
pub mod clock;
pub mod comparison;
pub mod config;
pub mod engine;
pub mod error;
pub mod queue_stage;
pub mod record;
pub mod rng;
pub mod stage;
pub mod store;
pub mod summary;
pub mod types;

pub use config::{ComplexityFactors, ComplexityMix, ScenarioOverrides, SimulationConfig};
pub use engine::{run_simulation, SimEngine};
pub use error::{SimError, SimResult};
pub use record::DayRecord;
pub use rng::RngBank;
pub use summary::RunSummary;
