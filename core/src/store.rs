//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The engine never reads the store; runs are written after they finish.

use crate::{
    config::SimulationConfig,
    error::{SimError, SimResult},
    record::DayRecord,
    types::RunId,
};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

/// Run metadata as listed from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRow {
    pub run_id:       RunId,
    pub seed:         u64,
    pub label:        String,
    pub version:      String,
    pub horizon_days: u64,
}

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    /// Open (or create) the database at `path`. Accepts SQLite URIs.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // In-memory databases answer "memory" and stay in that mode.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: u64,
        label: &str,
        config: &SimulationConfig,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, label, version, horizon_days, config_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                run_id,
                seed as i64,
                label,
                env!("CARGO_PKG_VERSION"),
                config.horizon_days as i64,
                serde_json::to_string(config)?,
            ],
        )?;
        Ok(())
    }

    pub fn list_runs(&self) -> SimResult<Vec<RunRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT run_id, seed, label, version, horizon_days FROM run ORDER BY rowid ASC",
        )?;
        let runs = stmt
            .query_map([], |row| {
                Ok(RunRow {
                    run_id:       row.get(0)?,
                    seed:         row.get::<_, i64>(1)? as u64,
                    label:        row.get(2)?,
                    version:      row.get(3)?,
                    horizon_days: row.get::<_, i64>(4)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(runs)
    }

    pub fn run_config(&self, run_id: &str) -> SimResult<SimulationConfig> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT config_json FROM run WHERE run_id = ?1",
                params![run_id],
                |row| row.get(0),
            )
            .optional()?;
        let json = json.ok_or_else(|| SimError::RunNotFound { run_id: run_id.to_string() })?;
        Ok(serde_json::from_str(&json)?)
    }

    // ── Day records ────────────────────────────────────────────

    /// Append a run's records in one transaction.
    pub fn append_day_records(&mut self, run_id: &str, records: &[DayRecord]) -> SimResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO day_record (
                    run_id, day, date, raw_inbound, net_inbound, capacity, solved,
                    backlog, est_wait_days, est_wait_hours,
                    available_full_time, available_part_time)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for r in records {
                stmt.execute(params![
                    run_id,
                    r.day as i64,
                    r.date,
                    r.raw_inbound,
                    r.net_inbound,
                    r.capacity,
                    r.solved,
                    r.backlog,
                    r.est_wait_days,
                    r.est_wait_hours,
                    r.available_full_time,
                    r.available_part_time,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn day_records_for_run(&self, run_id: &str) -> SimResult<Vec<DayRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT day, date, raw_inbound, net_inbound, capacity, solved, backlog,
                    est_wait_days, est_wait_hours, available_full_time, available_part_time
             FROM day_record WHERE run_id = ?1
             ORDER BY day ASC",
        )?;
        let records = stmt
            .query_map(params![run_id], |row| {
                Ok(DayRecord {
                    day:                 row.get::<_, i64>(0)? as u64,
                    date:                row.get(1)?,
                    raw_inbound:         row.get(2)?,
                    net_inbound:         row.get(3)?,
                    capacity:            row.get(4)?,
                    solved:              row.get(5)?,
                    backlog:             row.get(6)?,
                    est_wait_days:       row.get(7)?,
                    est_wait_hours:      row.get(8)?,
                    available_full_time: row.get(9)?,
                    available_part_time: row.get(10)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
