//! Run summary (KPI) tests.

use ticketflow_core::{
    engine::run_simulation,
    rng::RngBank,
    summary::{wait_time_cdf, RunSummary},
    SimulationConfig,
};

/// Clearance is solved over net inbound; staff hours follow availability.
#[test]
fn summary_matches_records() {
    let config = SimulationConfig { horizon_days: 60, ..SimulationConfig::default_test() };
    let records = run_simulation(&config, RngBank::new(42));
    let summary = RunSummary::from_records(&records, &config);

    let solved: f64 = records.iter().map(|r| r.solved).sum();
    let inbound: f64 = records.iter().map(|r| r.net_inbound).sum();
    let hours: f64 = records
        .iter()
        .map(|r| r.available_full_time as f64 * 8.0 + r.available_part_time as f64 * 4.0)
        .sum();

    assert_eq!(summary.days, 60);
    assert!((summary.total_solved - solved).abs() < 1e-9);
    assert!((summary.clearance_rate - solved / inbound).abs() < 1e-12);
    assert!((summary.total_staff_hours - hours).abs() < 1e-9);
    assert_eq!(summary.final_backlog, records[59].backlog);
    assert!(summary.max_backlog >= summary.final_backlog);
    assert!(summary.p50_wait_hours <= summary.p90_wait_hours);
    assert!(summary.clearance_rate <= 1.0 + 1e-9);
}

/// No staff: nothing clears and the peak backlog is the last day's.
#[test]
fn zero_staff_summary() {
    let config = SimulationConfig {
        horizon_days: 5,
        volatility: 0.0,
        full_time_agents: 0,
        part_time_agents: 0,
        automation_rate: 0.0,
        ..SimulationConfig::default_test()
    };
    let records = run_simulation(&config, RngBank::new(1));
    let summary = RunSummary::from_records(&records, &config);

    assert_eq!(summary.clearance_rate, 0.0);
    assert_eq!(summary.max_backlog, 500.0);
    assert_eq!(summary.total_net_inbound, 500.0);
    assert_eq!(summary.total_staff_hours, 0.0);
}

#[test]
fn empty_records_give_zero_summary() {
    let summary = RunSummary::from_records(&[], &SimulationConfig::default_test());
    assert_eq!(summary.days, 0);
    assert_eq!(summary.mean_wait_hours, 0.0);
    assert_eq!(summary.clearance_rate, 0.0);
}

/// The CDF is ascending and ends at probability 1.
#[test]
fn wait_cdf_is_monotone() {
    let config = SimulationConfig { horizon_days: 40, volatility: 0.6, ..SimulationConfig::default_test() };
    let records = run_simulation(&config, RngBank::new(13));
    let cdf = wait_time_cdf(&records);

    assert_eq!(cdf.len(), 40);
    for pair in cdf.windows(2) {
        assert!(pair[0].0 <= pair[1].0);
        assert!(pair[0].1 < pair[1].1);
    }
    assert_eq!(cdf.last().unwrap().1, 1.0);
    assert!(wait_time_cdf(&[]).is_empty());
}
