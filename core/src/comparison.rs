//! Scenario comparison: two staffing strategies, one traffic pattern.
//!
//! Both scenarios run from the same seed. Because arrivals draw from
//! their own stream slot, both see identical inbound traffic even when
//! their absenteeism consumes a different number of absence draws.

use crate::{
    config::{ScenarioOverrides, SimulationConfig},
    engine::run_simulation,
    error::SimResult,
    record::DayRecord,
    rng::RngBank,
    summary::RunSummary,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPARISON_SEED: u64 = 42;

/// What a comparison needs: a shared environment and two staffing plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonRequest {
    pub base:       SimulationConfig,
    pub scenario_a: ScenarioOverrides,
    pub scenario_b: ScenarioOverrides,
    pub seed:       u64,
}

impl Default for ComparisonRequest {
    fn default() -> Self {
        Self {
            base: SimulationConfig {
                horizon_days: 60,
                avg_daily_tickets: 178.0,
                volatility: 0.25,
                ..SimulationConfig::default()
            },
            scenario_a: ScenarioOverrides::new(5, 0, 5.0, 0.05),
            scenario_b: ScenarioOverrides::new(5, 0, 5.0, 0.15),
            seed: DEFAULT_COMPARISON_SEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub config:  SimulationConfig,
    pub records: Vec<DayRecord>,
    pub summary: RunSummary,
}

/// B minus A. Positive wait/backlog deltas mean B is worse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonDelta {
    pub mean_wait_hours:   f64,
    pub max_backlog:       f64,
    pub total_staff_hours: f64,
    pub clearance_rate:    f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub seed:       u64,
    pub scenario_a: ScenarioResult,
    pub scenario_b: ScenarioResult,
    pub delta:      ComparisonDelta,
}

fn run_scenario(base: &SimulationConfig, overrides: &ScenarioOverrides, seed: u64) -> ScenarioResult {
    let config = base.with_overrides(overrides);
    let records = run_simulation(&config, RngBank::new(seed));
    let summary = RunSummary::from_records(&records, &config);
    ScenarioResult { config, records, summary }
}

pub fn compare_scenarios(
    base: &SimulationConfig,
    scenario_a: &ScenarioOverrides,
    scenario_b: &ScenarioOverrides,
    seed: u64,
) -> ScenarioComparison {
    let a = run_scenario(base, scenario_a, seed);
    let b = run_scenario(base, scenario_b, seed);

    let delta = ComparisonDelta {
        mean_wait_hours:   b.summary.mean_wait_hours - a.summary.mean_wait_hours,
        max_backlog:       b.summary.max_backlog - a.summary.max_backlog,
        total_staff_hours: b.summary.total_staff_hours - a.summary.total_staff_hours,
        clearance_rate:    b.summary.clearance_rate - a.summary.clearance_rate,
    };

    log::info!(
        "comparison seed={seed}: wait Δ={:+.2}h backlog Δ={:+.2} staff hours Δ={:+.1}",
        delta.mean_wait_hours,
        delta.max_backlog,
        delta.total_staff_hours
    );

    ScenarioComparison {
        seed,
        scenario_a: a,
        scenario_b: b,
        delta,
    }
}

impl ComparisonRequest {
    /// Validate both scenario configs as they will actually run.
    pub fn validate(&self) -> SimResult<()> {
        self.base.with_overrides(&self.scenario_a).validate()?;
        self.base.with_overrides(&self.scenario_b).validate()
    }

    pub fn run(&self) -> ScenarioComparison {
        compare_scenarios(&self.base, &self.scenario_a, &self.scenario_b, self.seed)
    }
}
