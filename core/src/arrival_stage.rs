//! Arrival stage: each day's raw and net inbound ticket count.
//!
//! Raw arrivals are log-normal with mean `avg_daily_tickets` and
//! coefficient of variation `volatility`, so a day can never go
//! negative. Automation then deflects a fixed share of them.

use crate::{
    config::SimulationConfig,
    record::DayState,
    rng::SimRng,
    stage::DailyStage,
};

/// (mu, sigma) of the log-normal with the given mean and CV.
pub fn lognormal_params(mean: f64, cv: f64) -> (f64, f64) {
    let sigma = (1.0 + cv * cv).ln().sqrt();
    let mu = mean.ln() - 0.5 * sigma * sigma;
    (mu, sigma)
}

pub struct ArrivalStage {
    avg_daily_tickets: f64,
    volatility:        f64,
    automation_rate:   f64,
    mu:                f64,
    sigma:             f64,
}

impl ArrivalStage {
    pub fn new(config: &SimulationConfig) -> Self {
        let (mu, sigma) = lognormal_params(config.avg_daily_tickets, config.volatility);
        Self {
            avg_daily_tickets: config.avg_daily_tickets,
            volatility: config.volatility,
            automation_rate: config.automation_rate,
            mu,
            sigma,
        }
    }

    /// One day's raw inbound. Zero volatility is exact and draws nothing.
    pub fn draw_raw(&self, rng: &mut SimRng) -> f64 {
        if self.volatility > 0.0 {
            rng.lognormal(self.mu, self.sigma)
        } else {
            self.avg_daily_tickets
        }
    }

    pub fn deflect(&self, raw: f64) -> f64 {
        raw * (1.0 - self.automation_rate)
    }
}

impl DailyStage for ArrivalStage {
    fn name(&self) -> &'static str { "arrivals" }

    fn update(&mut self, day: &mut DayState, rng: &mut SimRng) {
        day.raw_inbound = self.draw_raw(rng);
        day.net_inbound = self.deflect(day.raw_inbound);
    }
}
