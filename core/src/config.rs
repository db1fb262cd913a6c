//! Simulation configuration: the record the configuration surface hands
//! to the engine.
//!
//! The engine trusts this record. Range checks live in `validate()`, which
//! the caller runs before starting a run.

use crate::{
    error::{SimError, SimResult},
    types::{ComplexityLevel, Day},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Working hours per full-time agent per day.
pub const FULL_TIME_HOURS_PER_DAY: f64 = 8.0;

pub const DEFAULT_COMPLEXITY_MIX: [(ComplexityLevel, f64); 3] = [
    (ComplexityLevel::Low, 0.5),
    (ComplexityLevel::Medium, 0.3),
    (ComplexityLevel::High, 0.2),
];

pub const DEFAULT_COMPLEXITY_FACTORS: [(ComplexityLevel, f64); 3] = [
    (ComplexityLevel::Low, 1.0),
    (ComplexityLevel::Medium, 1.5),
    (ComplexityLevel::High, 2.5),
];

/// Longest horizon a run may cover (100 years).
pub const MAX_HORIZON_DAYS: Day = 36_500;

/// Upper bound on agent-day cells in one absence schedule.
pub const MAX_SCHEDULE_CELLS: u64 = 100_000_000;

/// Tolerance for "proportions sum to 1".
const MIX_SUM_TOLERANCE: f64 = 1e-6;

fn default_factor(level: ComplexityLevel) -> f64 {
    DEFAULT_COMPLEXITY_FACTORS
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, f)| *f)
        .unwrap_or(1.0)
}

// ── Complexity tables ──────────────────────────────────────────────

/// Share of inbound tickets per complexity level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplexityMix(BTreeMap<ComplexityLevel, f64>);

impl ComplexityMix {
    pub fn new(shares: BTreeMap<ComplexityLevel, f64>) -> Self {
        Self(shares)
    }

    /// Build a mix from raw percentage inputs.
    /// If they do not add up to 100 they are scaled by their total.
    /// An all-zero input falls back to the default mix.
    pub fn from_percentages(low: f64, medium: f64, high: f64) -> Self {
        let total = low + medium + high;
        if total <= 0.0 {
            log::warn!("complexity mix totals {total}%, using default mix");
            return Self::default();
        }
        if (total - 100.0).abs() > MIX_SUM_TOLERANCE {
            log::warn!("complexity mix totals {total}%, normalizing");
        }
        Self(BTreeMap::from([
            (ComplexityLevel::Low, low / total),
            (ComplexityLevel::Medium, medium / total),
            (ComplexityLevel::High, high / total),
        ]))
    }

    /// Share for `level`, 0.0 if the level is absent.
    pub fn share(&self, level: ComplexityLevel) -> f64 {
        self.0.get(&level).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComplexityLevel, f64)> + '_ {
        self.0.iter().map(|(l, s)| (*l, *s))
    }

    /// Σ share × factor over the levels in this mix.
    /// Fixed for a whole run; the mix does not vary by day.
    pub fn weighted_factor(&self, factors: &ComplexityFactors) -> f64 {
        self.iter().map(|(level, share)| share * factors.factor(level)).sum()
    }
}

impl Default for ComplexityMix {
    fn default() -> Self {
        Self(DEFAULT_COMPLEXITY_MIX.into_iter().collect())
    }
}

/// Processing-time multiplier per complexity level, relative to Low = 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplexityFactors(BTreeMap<ComplexityLevel, f64>);

impl ComplexityFactors {
    pub fn new(factors: BTreeMap<ComplexityLevel, f64>) -> Self {
        Self(factors)
    }

    /// Factor for `level`; levels missing from the table use the default.
    pub fn factor(&self, level: ComplexityLevel) -> f64 {
        self.0
            .get(&level)
            .copied()
            .unwrap_or_else(|| default_factor(level))
    }
}

impl Default for ComplexityFactors {
    fn default() -> Self {
        Self(DEFAULT_COMPLEXITY_FACTORS.into_iter().collect())
    }
}

// ── Simulation config ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub horizon_days: Day,
    /// Mean of daily raw arrivals, before automation.
    pub avg_daily_tickets: f64,
    /// Coefficient of variation of daily arrivals.
    pub volatility: f64,
    pub full_time_agents: u32,
    pub part_time_agents: u32,
    /// Tickets per staff-hour at complexity factor 1.0.
    pub agent_efficiency: f64,
    pub part_time_hours_per_day: f64,
    /// Target fraction of staff-days lost to planned absence.
    pub absenteeism_rate: f64,
    pub complexity_mix: ComplexityMix,
    pub complexity_factors: ComplexityFactors,
    /// Fraction of raw arrivals deflected before reaching the queue.
    pub automation_rate: f64,
    /// Calendar date of day 0.
    pub start_date: NaiveDate,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            avg_daily_tickets: 100.0,
            volatility: 0.2,
            full_time_agents: 5,
            part_time_agents: 2,
            agent_efficiency: 5.0,
            part_time_hours_per_day: 4.0,
            absenteeism_rate: 0.05,
            complexity_mix: ComplexityMix::default(),
            complexity_factors: ComplexityFactors::default(),
            automation_rate: 0.1,
            start_date: chrono::Local::now().date_naive(),
        }
    }
}

impl SimulationConfig {
    /// Load a config from a JSON file. Missing fields take defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json(&content)?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Config with hardcoded defaults and a fixed start date,
    /// for use in tests.
    pub fn default_test() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn total_agents(&self) -> usize {
        self.full_time_agents as usize + self.part_time_agents as usize
    }

    pub fn weighted_complexity_factor(&self) -> f64 {
        self.complexity_mix.weighted_factor(&self.complexity_factors)
    }

    /// Apply a staffing scenario on top of this (shared) config.
    pub fn with_overrides(&self, overrides: &ScenarioOverrides) -> Self {
        Self {
            full_time_agents: overrides.full_time_agents,
            part_time_agents: overrides.part_time_agents,
            agent_efficiency: overrides.agent_efficiency,
            absenteeism_rate: overrides.absenteeism_rate,
            part_time_hours_per_day: overrides
                .part_time_hours_per_day
                .unwrap_or(self.part_time_hours_per_day),
            ..self.clone()
        }
    }

    /// Range checks the configuration surface must pass before a run.
    pub fn validate(&self) -> SimResult<()> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> SimError {
            SimError::InvalidConfig { field, reason: reason.into() }
        }

        if self.horizon_days == 0 {
            return Err(invalid("horizon_days", "must be at least 1"));
        }
        if self.horizon_days > MAX_HORIZON_DAYS {
            return Err(invalid(
                "horizon_days",
                format!("{} exceeds the {MAX_HORIZON_DAYS}-day limit", self.horizon_days),
            ));
        }
        let cells = (self.total_agents() as u64).checked_mul(self.horizon_days);
        if !cells.is_some_and(|c| c <= MAX_SCHEDULE_CELLS) {
            return Err(invalid(
                "full_time_agents",
                format!(
                    "{} agents over {} days exceeds {MAX_SCHEDULE_CELLS} agent-days",
                    self.total_agents(),
                    self.horizon_days
                ),
            ));
        }
        if !(self.avg_daily_tickets > 0.0 && self.avg_daily_tickets.is_finite()) {
            return Err(invalid("avg_daily_tickets", format!("{} is not a positive finite number", self.avg_daily_tickets)));
        }
        if !(self.volatility >= 0.0) {
            return Err(invalid("volatility", format!("{} is negative", self.volatility)));
        }
        // cv² must stay finite for the log-normal parameters to exist.
        if !(1.0 + self.volatility * self.volatility).ln().is_finite() {
            return Err(invalid("volatility", format!("{} is too large", self.volatility)));
        }
        if !(self.agent_efficiency >= 0.0 && self.agent_efficiency.is_finite()) {
            return Err(invalid("agent_efficiency", format!("{} is not a finite non-negative number", self.agent_efficiency)));
        }
        if !(self.part_time_hours_per_day > 0.0 && self.part_time_hours_per_day.is_finite()) {
            return Err(invalid(
                "part_time_hours_per_day",
                format!("{} is not positive", self.part_time_hours_per_day),
            ));
        }
        for (field, rate) in [
            ("absenteeism_rate", self.absenteeism_rate),
            ("automation_rate", self.automation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(invalid(field, format!("{rate} outside [0, 1]")));
            }
        }
        if let Some((level, share)) = self.complexity_mix.iter().find(|(_, s)| !(*s >= 0.0)) {
            return Err(invalid("complexity_mix", format!("{} share {share} is negative", level.name())));
        }
        let total = self.complexity_mix.total();
        if (total - 1.0).abs() > MIX_SUM_TOLERANCE {
            return Err(invalid("complexity_mix", format!("shares sum to {total}, expected 1")));
        }
        if let Some(level) = ComplexityLevel::ALL
            .into_iter()
            .find(|l| !(self.complexity_factors.factor(*l) >= 0.0))
        {
            return Err(invalid("complexity_factors", format!("{} factor is negative", level.name())));
        }
        Ok(())
    }
}

/// Staffing-only parameters that differ between compared scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOverrides {
    pub full_time_agents: u32,
    pub part_time_agents: u32,
    pub agent_efficiency: f64,
    pub absenteeism_rate: f64,
    #[serde(default)]
    pub part_time_hours_per_day: Option<f64>,
}

impl ScenarioOverrides {
    pub fn new(full_time_agents: u32, part_time_agents: u32, agent_efficiency: f64, absenteeism_rate: f64) -> Self {
        Self {
            full_time_agents,
            part_time_agents,
            agent_efficiency,
            absenteeism_rate,
            part_time_hours_per_day: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mix_weighted_factor_is_1_45() {
        let config = SimulationConfig::default_test();
        assert!((config.weighted_complexity_factor() - 1.45).abs() < 1e-12);
    }

    #[test]
    fn percentages_are_normalized() {
        let mix = ComplexityMix::from_percentages(50.0, 50.0, 100.0);
        assert!((mix.share(ComplexityLevel::Low) - 0.25).abs() < 1e-12);
        assert!((mix.share(ComplexityLevel::High) - 0.5).abs() < 1e-12);
        assert!((mix.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn all_zero_percentages_fall_back_to_default() {
        assert_eq!(ComplexityMix::from_percentages(0.0, 0.0, 0.0), ComplexityMix::default());
    }

    #[test]
    fn missing_factor_uses_default() {
        let factors = ComplexityFactors::new(BTreeMap::from([(ComplexityLevel::Low, 2.0)]));
        assert_eq!(factors.factor(ComplexityLevel::Low), 2.0);
        assert_eq!(factors.factor(ComplexityLevel::High), 2.5);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = SimulationConfig::from_json(
            r#"{ "horizon_days": 60, "complexity_mix": { "Low": 1.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.horizon_days, 60);
        assert_eq!(config.full_time_agents, 5);
        assert_eq!(config.weighted_complexity_factor(), 1.0);
    }

    #[test]
    fn validate_accepts_defaults() {
        SimulationConfig::default_test().validate().unwrap();
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        let cases: Vec<(&str, SimulationConfig)> = vec![
            ("horizon_days", SimulationConfig { horizon_days: 0, ..SimulationConfig::default_test() }),
            ("horizon_days", SimulationConfig { horizon_days: MAX_HORIZON_DAYS + 1, ..SimulationConfig::default_test() }),
            ("horizon_days", SimulationConfig { horizon_days: u64::MAX / 2, ..SimulationConfig::default_test() }),
            (
                "full_time_agents",
                SimulationConfig {
                    full_time_agents: u32::MAX,
                    horizon_days: MAX_HORIZON_DAYS,
                    ..SimulationConfig::default_test()
                },
            ),
            ("volatility", SimulationConfig { volatility: -0.1, ..SimulationConfig::default_test() }),
            ("volatility", SimulationConfig { volatility: 1e200, ..SimulationConfig::default_test() }),
            ("volatility", SimulationConfig { volatility: f64::INFINITY, ..SimulationConfig::default_test() }),
            ("avg_daily_tickets", SimulationConfig { avg_daily_tickets: f64::INFINITY, ..SimulationConfig::default_test() }),
            ("automation_rate", SimulationConfig { automation_rate: 1.5, ..SimulationConfig::default_test() }),
            ("absenteeism_rate", SimulationConfig { absenteeism_rate: -0.01, ..SimulationConfig::default_test() }),
            (
                "complexity_mix",
                SimulationConfig {
                    complexity_mix: ComplexityMix::new(BTreeMap::from([(ComplexityLevel::Low, 0.4)])),
                    ..SimulationConfig::default_test()
                },
            ),
        ];
        for (expected, config) in cases {
            match config.validate() {
                Err(SimError::InvalidConfig { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected InvalidConfig({expected}), got {other:?}"),
            }
        }
    }

    #[test]
    fn validate_accepts_the_largest_allowed_horizon() {
        let config = SimulationConfig { horizon_days: MAX_HORIZON_DAYS, ..SimulationConfig::default_test() };
        config.validate().unwrap();
        let volatile = SimulationConfig { volatility: 1e150, ..SimulationConfig::default_test() };
        volatile.validate().unwrap();
    }

    #[test]
    fn overrides_replace_only_staffing() {
        let base = SimulationConfig::default_test();
        let scenario = base.with_overrides(&ScenarioOverrides::new(10, 0, 7.0, 0.15));
        assert_eq!(scenario.full_time_agents, 10);
        assert_eq!(scenario.part_time_agents, 0);
        assert_eq!(scenario.absenteeism_rate, 0.15);
        assert_eq!(scenario.part_time_hours_per_day, base.part_time_hours_per_day);
        assert_eq!(scenario.avg_daily_tickets, base.avg_daily_tickets);
        assert_eq!(scenario.complexity_mix, base.complexity_mix);
    }
}
