//! Run store tests.

use ticketflow_core::{
    engine::run_simulation,
    error::SimError,
    rng::RngBank,
    store::SimStore,
    SimulationConfig,
};

fn store() -> SimStore {
    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

/// Records read back equal the records written.
#[test]
fn day_records_round_trip() {
    let mut store = store();
    let config = SimulationConfig { horizon_days: 20, ..SimulationConfig::default_test() };
    let records = run_simulation(&config, RngBank::new(11));

    store.insert_run("store-test", 11, "baseline", &config).expect("insert run");
    store.append_day_records("store-test", &records).expect("append records");

    let loaded = store.day_records_for_run("store-test").expect("load records");
    assert_eq!(loaded, records);
    assert_eq!(store.run_config("store-test").expect("config"), config);
}

#[test]
fn list_runs_in_insertion_order() {
    let store = store();
    let config = SimulationConfig::default_test();
    store.insert_run("run-a", 1, "a", &config).unwrap();
    store.insert_run("run-b", u64::MAX, "b", &config).unwrap();

    let runs = store.list_runs().unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].run_id, "run-a");
    assert_eq!(runs[1].seed, u64::MAX);
    assert_eq!(runs[1].horizon_days, config.horizon_days);
}

#[test]
fn unknown_run_is_reported() {
    let store = store();
    match store.run_config("missing") {
        Err(SimError::RunNotFound { run_id }) => assert_eq!(run_id, "missing"),
        other => panic!("expected RunNotFound, got {other:?}"),
    }
    assert!(store.day_records_for_run("missing").unwrap().is_empty());
}

/// Records for an unregistered run violate the foreign key.
#[test]
fn records_require_a_run() {
    let mut store = store();
    let records = run_simulation(&SimulationConfig::default_test(), RngBank::new(1));
    assert!(store.append_day_records("ghost", &records).is_err());
}

/// The runner's default `:memory:` path opens through the file path.
#[test]
fn open_accepts_memory_path() {
    let mut store = SimStore::open(":memory:").expect("open :memory:");
    store.migrate().expect("migration");
    let config = SimulationConfig { horizon_days: 5, ..SimulationConfig::default_test() };
    let records = run_simulation(&config, RngBank::new(2));
    store.insert_run("mem", 2, "batch", &config).expect("insert run");
    store.append_day_records("mem", &records).expect("append records");
    assert_eq!(store.list_runs().expect("list").len(), 1);
}
