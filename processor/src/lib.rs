//! A processor simulation library
//!
//! This is used for running workloads on the [`scheduler`] crate's machine and
//! formatting what happened.

use std::fmt;

use scheduler::{Config, Machine, Process, SimulationError, Snapshot, Stats};
use tabled::settings::Style;
use tabled::{Table, Tabled};

mod workload;
pub use workload::{parse_task, parse_workload, ParseError};

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// One entry per tick.
    pub logs: Vec<Snapshot>,

    /// One entry per process, in input order.
    pub stats: Vec<Stats>,
}

/// The processor simulator.
pub struct Processor;

impl Processor {
    /// Runs `processes` on a machine built from `config`.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use processor::{parse_workload, Processor};
    /// use scheduler::Config;
    /// use std::num::NonZeroUsize;
    ///
    /// let procs = parse_workload("CPU(2);IO1(1);CPU(1)\nCPU(3)", 1).unwrap();
    /// let config = Config {
    ///     cpu_count: NonZeroUsize::new(1).unwrap(),
    ///     policy: scheduler::fcfs(),
    /// };
    /// let report = Processor::run(config, procs).unwrap();
    ///
    /// println!("{}", processor::format_logs(&report.logs));
    /// ```
    pub fn run(config: Config, processes: Vec<Process>) -> Result<Report, SimulationError> {
        let mut logs = Vec::new();
        let stats = Processor::run_with(config, processes, |snapshot| logs.push(snapshot.clone()))?;
        Ok(Report { logs, stats })
    }

    /// Same as [`Processor::run`], but hands every snapshot to `on_tick` as
    /// soon as it is taken instead of collecting them.
    pub fn run_with<F>(
        config: Config,
        processes: Vec<Process>,
        on_tick: F,
    ) -> Result<Vec<Stats>, SimulationError>
    where
        F: FnMut(&Snapshot),
    {
        Machine::new(config).run(processes, on_tick)
    }
}

/// Format the [`Processor`]'s logs to a [`String`], one line per tick.
///
/// * `logs` - the logs returned by the [`Processor`].
pub fn format_logs(logs: &[Snapshot]) -> String {
    let mut s = String::new();
    for log in logs {
        fmt::write(&mut s, format_args!("{log}\n")).unwrap();
    }
    s
}

#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "Process")]
    process: usize,
    #[tabled(rename = "Arrival")]
    arrival: usize,
    #[tabled(rename = "Service")]
    service: usize,
    #[tabled(rename = "Waiting")]
    waiting: usize,
    #[tabled(rename = "Finish time")]
    finish: usize,
    #[tabled(rename = "Turnaround (Tr)")]
    turnaround: usize,
    #[tabled(rename = "Tr/Ts")]
    normalized: String,
}

impl From<&Stats> for StatsRow {
    fn from(stats: &Stats) -> Self {
        StatsRow {
            process: stats.pid.get(),
            arrival: stats.entrance_tick,
            service: stats.service_ticks,
            waiting: stats.ready_or_blocked_ticks,
            finish: stats.exit_tick,
            turnaround: stats.turnaround_ticks,
            normalized: format!("{:.2}", stats.normalized_turnaround()),
        }
    }
}

/// Format the per-process statistics as a table.
pub fn format_stats(stats: &[Stats]) -> String {
    let rows: Vec<StatsRow> = stats.iter().map(StatsRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

/// Average turnaround and normalized turnaround over all processes.
pub fn summary(stats: &[Stats]) -> Option<(f64, f64)> {
    if stats.is_empty() {
        return None;
    }
    let count = stats.len() as f64;
    let turnaround = stats.iter().map(|s| s.turnaround_ticks as f64).sum::<f64>() / count;
    let normalized = stats.iter().map(Stats::normalized_turnaround).sum::<f64>() / count;
    Some((turnaround, normalized))
}

/// Writes the one line summary produced by [`summary`].
pub fn format_summary(stats: &[Stats]) -> String {
    let mut s = String::new();
    if let Some((turnaround, normalized)) = summary(stats) {
        fmt::write(
            &mut s,
            format_args!("Mean Tr: {turnaround:.2}, mean Tr/Ts: {normalized:.2}\n"),
        )
        .unwrap();
    }
    s
}
