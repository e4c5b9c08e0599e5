//! Parser for the workload text format.
//!
//! One process per line, tasks separated by `;`:
//!
//! ```text
//! CPU(5);IO1(2);CPU(1)
//! CPU(4);IO2(10);CPU(2);
//! ```

use std::error::Error;
use std::fmt::{self, Display};

use log::debug;
use scheduler::{Pid, Process, ResourceKind, Task, Tick};

/// A line of the workload could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    pub reason: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

impl Error for ParseError {}

/// Parses one task such as `IO1(2)`.
pub fn parse_task(task: &str) -> Result<Task, String> {
    let task = task.trim();
    let (name, rest) = task
        .split_once('(')
        .ok_or_else(|| format!("expected NAME(DURATION), got {task:?}"))?;
    let duration = rest
        .strip_suffix(')')
        .ok_or_else(|| format!("missing closing parenthesis in {task:?}"))?;

    let kind = match name.trim() {
        "CPU" => ResourceKind::Cpu,
        "IO1" => ResourceKind::Io1,
        "IO2" => ResourceKind::Io2,
        other => return Err(format!("unknown resource {other:?}")),
    };
    let total = duration
        .trim()
        .parse::<usize>()
        .map_err(|err| format!("bad duration {duration:?}: {err}"))?;

    Ok(Task::new(kind, total))
}

/// Parses a whole workload.
///
/// * `interval` - ticks between two consecutive arrivals. Process `n`
///                (starting from 1) arrives at `(n - 1) * interval`.
///
/// Blank lines are skipped and do not take a PID.
pub fn parse_workload(text: &str, interval: Tick) -> Result<Vec<Process>, ParseError> {
    let mut procs = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let tasks = line
            .split(';')
            .filter(|task| !task.trim().is_empty())
            .map(parse_task)
            .collect::<Result<Vec<Task>, String>>()
            .map_err(|reason| ParseError {
                line: number + 1,
                reason,
            })?;
        debug!("Tasks: {tasks:?}");

        let index = procs.len();
        let arrival = index.checked_mul(interval).ok_or_else(|| ParseError {
            line: number + 1,
            reason: format!("arrival tick of process {} overflows", index + 1),
        })?;
        procs.push(Process::new(Pid::new(index + 1), arrival, tasks));
    }
    Ok(procs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tasks() {
        assert_eq!(parse_task("CPU(5)"), Ok(Task::cpu(5)));
        assert_eq!(parse_task(" IO2(12) "), Ok(Task::io2(12)));
        assert!(parse_task("GPU(1)").is_err());
        assert!(parse_task("CPU(x)").is_err());
        assert!(parse_task("CPU(3").is_err());
        assert!(parse_task("CPU").is_err());
    }

    #[test]
    fn parses_workload_with_arrivals() {
        let text = "CPU(5);IO1(2);CPU(1)\n\nCPU(4);IO2(10);CPU(2);\n";
        let procs = parse_workload(text, 2).unwrap();

        assert_eq!(procs.len(), 2);
        assert_eq!(procs[0].pid(), Pid::new(1));
        assert_eq!(procs[0].arrival(), 0);
        assert_eq!(procs[0].tasks(), &[Task::cpu(5), Task::io1(2), Task::cpu(1)]);
        assert_eq!(procs[1].pid(), Pid::new(2));
        assert_eq!(procs[1].arrival(), 2);
        assert_eq!(procs[1].tasks().len(), 3);
    }

    #[test]
    fn reports_line_of_bad_task() {
        let err = parse_workload("CPU(1)\nCPU(2);DISK(3)", 1).unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.to_string().starts_with("line 2: unknown resource"));
    }

    #[test]
    fn huge_interval_overflows_on_second_process() {
        assert_eq!(parse_workload("CPU(1)", usize::MAX).unwrap()[0].arrival(), 0);

        let err = parse_workload("CPU(1)\n\nCPU(2)", usize::MAX).unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.reason, "arrival tick of process 2 overflows");
    }
}
