//! sim-runner: headless runner for the ticket queue simulator.
//!
//! Usage:
//!   sim-runner --seed 12345 --days 60 --config scenario.json --db runs.db
//!   sim-runner --seed 12345 --compare comparison.json
//!   sim-runner --ipc-mode
//!
//! Flags:
//!   --seed <u64>            master seed (default 42)
//!   --days <n>              override horizon_days
//!   --start-date YYYY-MM-DD override start_date
//!   --config <path>         JSON SimulationConfig (missing fields use defaults)
//!   --compare <path>        JSON ComparisonRequest; use "default" for the built-in one
//!   --db <path>             SQLite file for run history (default in-memory)
//!   --table                 print the daily table after the summary
//!   --ipc-mode              JSON-lines protocol on stdin/stdout

use anyhow::Result;
use chrono::NaiveDate;
use std::env;
use std::io::{self, BufRead, Write};
use ticketflow_core::{
    comparison::{ComparisonRequest, ScenarioComparison},
    engine::run_simulation,
    record::DayRecord,
    rng::RngBank,
    store::SimStore,
    types::{new_run_id, RunId},
    RunSummary, SimulationConfig,
};

const DEFAULT_SEED: u64 = 42;

fn default_seed() -> u64 {
    DEFAULT_SEED
}

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Run {
        #[serde(default)]
        config: SimulationConfig,
        #[serde(default = "default_seed")]
        seed: u64,
        #[serde(default)]
        label: Option<String>,
    },
    Compare {
        #[serde(default)]
        request: ComparisonRequest,
    },
    ListRuns,
    Quit,
}

#[derive(serde::Serialize)]
struct RunResponse {
    run_id:  RunId,
    seed:    u64,
    summary: RunSummary,
    records: Vec<DayRecord>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", DEFAULT_SEED);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let show_table = args.iter().any(|a| a == "--table");
    let db = flag_value(&args, "--db").unwrap_or(":memory:");

    let mut store = SimStore::open(db)?;
    store.migrate()?;

    if ipc_mode {
        return run_ipc_loop(&mut store);
    }

    if let Some(path) = flag_value(&args, "--compare") {
        let request = if path == "default" {
            ComparisonRequest::default()
        } else {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
            serde_json::from_str(&content)?
        };
        request.validate()?;
        let comparison = request.run();
        print_comparison(&comparison);
        return Ok(());
    }

    let mut config = match flag_value(&args, "--config") {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(days) = flag_value(&args, "--days").and_then(|d| d.parse().ok()) {
        config.horizon_days = days;
    }
    if let Some(date) = flag_value(&args, "--start-date") {
        config.start_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;
    }
    config.validate()?;

    println!("Ticket queue simulator: sim-runner");
    println!("  seed:      {seed}");
    println!("  days:      {}", config.horizon_days);
    println!("  staff:     {} FT / {} PT", config.full_time_agents, config.part_time_agents);
    println!("  db:        {db}");
    println!();

    let response = execute_run(&mut store, config, seed, "batch")?;
    print_summary(&response);
    if show_table {
        print_table(&response.records);
    }
    Ok(())
}

/// Run, persist, summarize.
fn execute_run(
    store: &mut SimStore,
    config: SimulationConfig,
    seed: u64,
    label: &str,
) -> Result<RunResponse> {
    let run_id = new_run_id();
    let records = run_simulation(&config, RngBank::new(seed));
    let summary = RunSummary::from_records(&records, &config);

    store.insert_run(&run_id, seed, label, &config)?;
    store.append_day_records(&run_id, &records)?;
    log::info!("stored {run_id}: {} days", records.len());

    Ok(RunResponse {
        run_id,
        seed,
        summary,
        records,
    })
}

fn run_ipc_loop(store: &mut SimStore) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Run { config, seed, label } => {
                if let Err(e) = config.validate() {
                    write_error(&mut stdout, &e.to_string())?;
                    continue;
                }
                let label = label.unwrap_or_else(|| "ipc".to_string());
                let response = execute_run(store, config, seed, &label)?;
                writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
            }
            IpcCommand::Compare { request } => {
                if let Err(e) = request.validate() {
                    write_error(&mut stdout, &e.to_string())?;
                    continue;
                }
                let comparison = request.run();
                writeln!(stdout, "{}", serde_json::to_string(&comparison)?)?;
            }
            IpcCommand::ListRuns => {
                let runs = store.list_runs()?;
                writeln!(stdout, "{}", serde_json::json!({ "runs": runs }))?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(response: &RunResponse) {
    let s = &response.summary;
    println!("=== RUN SUMMARY ===");
    println!("  run_id:         {}", response.run_id);
    println!("  days run:       {}", s.days);
    println!("  avg wait:       {:.1} hours", s.mean_wait_hours);
    println!("  p90 wait:       {:.1} hours", s.p90_wait_hours);
    println!("  max backlog:    {:.2} tickets", s.max_backlog);
    println!("  final backlog:  {:.2} tickets", s.final_backlog);
    println!("  total solved:   {:.2}", s.total_solved);
    println!("  clearance:      {:.1}%", s.clearance_rate * 100.0);
    println!("  staff hours:    {:.0}", s.total_staff_hours);
}

fn print_table(records: &[DayRecord]) {
    println!();
    println!(
        "{:<12} {:>10} {:>10} {:>10} {:>10} {:>10} {:>9} {:>9} {:>4} {:>4}",
        "date", "raw", "net", "capacity", "solved", "backlog", "wait_d", "wait_h", "ft", "pt"
    );
    for r in records.iter().map(DayRecord::rounded) {
        println!(
            "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>9.3} {:>9.2} {:>4} {:>4}",
            r.date.to_string(),
            r.raw_inbound,
            r.net_inbound,
            r.capacity,
            r.solved,
            r.backlog,
            r.est_wait_days,
            r.est_wait_hours,
            r.available_full_time,
            r.available_part_time
        );
    }
}

fn print_comparison(comparison: &ScenarioComparison) {
    let a = &comparison.scenario_a.summary;
    let b = &comparison.scenario_b.summary;
    let d = &comparison.delta;
    println!("=== SCENARIO COMPARISON (seed {}) ===", comparison.seed);
    println!("                      {:>12} {:>12} {:>12}", "A", "B", "B - A");
    println!("  avg wait (h)        {:>12.1} {:>12.1} {:>+12.1}", a.mean_wait_hours, b.mean_wait_hours, d.mean_wait_hours);
    println!("  max backlog         {:>12.2} {:>12.2} {:>+12.2}", a.max_backlog, b.max_backlog, d.max_backlog);
    println!("  staff hours         {:>12.0} {:>12.0} {:>+12.0}", a.total_staff_hours, b.total_staff_hours, d.total_staff_hours);
    println!(
        "  clearance           {:>11.1}% {:>11.1}% {:>+11.1}%",
        a.clearance_rate * 100.0,
        b.clearance_rate * 100.0,
        d.clearance_rate * 100.0
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
