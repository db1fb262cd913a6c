//! Scenario comparison tests.

use ticketflow_core::{
    comparison::{compare_scenarios, ComparisonRequest},
    ScenarioOverrides, SimError, SimulationConfig,
};

/// Both scenarios see the same inbound traffic under one seed.
#[test]
fn scenarios_share_traffic() {
    let request = ComparisonRequest {
        base: SimulationConfig {
            horizon_days: 60,
            ..ComparisonRequest::default().base
        },
        ..ComparisonRequest::default()
    };
    let result = request.run();

    assert_eq!(result.scenario_a.records.len(), 60);
    assert_eq!(result.scenario_b.records.len(), 60);
    for (a, b) in result.scenario_a.records.iter().zip(result.scenario_b.records.iter()) {
        assert_eq!(a.raw_inbound, b.raw_inbound, "traffic diverged on day {}", a.day);
        assert_eq!(a.net_inbound, b.net_inbound);
    }
}

/// More staff in B: staff hours up, wait and backlog not worse.
#[test]
fn extra_staff_improves_b() {
    let base = SimulationConfig {
        horizon_days: 60,
        avg_daily_tickets: 178.0,
        volatility: 0.25,
        ..SimulationConfig::default_test()
    };
    let a = ScenarioOverrides::new(5, 0, 5.0, 0.0);
    let b = ScenarioOverrides::new(8, 0, 5.0, 0.0);
    let result = compare_scenarios(&base, &a, &b, 42);

    assert_eq!(result.delta.total_staff_hours, 60.0 * 3.0 * 8.0);
    assert!(result.delta.mean_wait_hours <= 0.0);
    assert!(result.delta.max_backlog <= 0.0);
    assert!(result.delta.clearance_rate >= 0.0);
}

/// Deltas are B minus A of the two summaries.
#[test]
fn delta_is_b_minus_a() {
    let result = ComparisonRequest::default().run();
    let a = &result.scenario_a.summary;
    let b = &result.scenario_b.summary;

    assert_eq!(result.seed, 42);
    assert_eq!(result.delta.mean_wait_hours, b.mean_wait_hours - a.mean_wait_hours);
    assert_eq!(result.delta.max_backlog, b.max_backlog - a.max_backlog);
    assert_eq!(result.delta.total_staff_hours, b.total_staff_hours - a.total_staff_hours);
}

/// A partial request fills the rest from the default comparison.
#[test]
fn request_parses_with_defaults() {
    let request: ComparisonRequest = serde_json::from_str(
        r#"{ "seed": 7, "scenario_b": { "full_time_agents": 9, "part_time_agents": 1,
             "agent_efficiency": 6.0, "absenteeism_rate": 0.1 } }"#,
    )
    .expect("parse request");

    assert_eq!(request.seed, 7);
    assert_eq!(request.scenario_b.full_time_agents, 9);
    assert_eq!(request.scenario_b.part_time_hours_per_day, None);
    assert_eq!(request.scenario_a, ComparisonRequest::default().scenario_a);
    assert_eq!(request.base.avg_daily_tickets, 178.0);
}

/// A scenario whose staffing overflows the absence grid is rejected
/// even when the shared base config is fine.
#[test]
fn validate_checks_each_scenario() {
    let mut request = ComparisonRequest::default();
    request.validate().expect("default request is valid");

    request.scenario_b = ScenarioOverrides::new(u32::MAX, u32::MAX, 5.0, 0.05);
    request.base.validate().expect("base alone is still valid");
    match request.validate() {
        Err(SimError::InvalidConfig { field, .. }) => assert_eq!(field, "full_time_agents"),
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}
