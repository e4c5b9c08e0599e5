//! Selection and eviction policies.
//!
//! A selection policy picks the next process to admit from a queue, an
//! eviction policy picks the processes that have to leave a resource. Both
//! work on [`Candidate`] snapshots taken at the start of the call, so they
//! never touch the process table directly.

use std::fmt::{self, Display};
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::{Pid, Process, ProcessState, SimulationError, Unavailable};

mod fcfs;
pub use fcfs::NonPreemptive;

mod round_robin;
pub use round_robin::RoundRobin;

mod spn;

mod srt;
pub use srt::ShortestRemainingTime;

mod hrrn;

/// What a policy gets to see about a process.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub pid: Pid,
    pub state: ProcessState,
    pub task_total: usize,
    pub task_remaining: usize,
    pub waiting_ticks: usize,
    pub running_ticks: usize,
}

impl Candidate {
    pub fn is_task_completed(&self) -> bool {
        matches!(
            self.state,
            ProcessState::Ready | ProcessState::Blocked | ProcessState::Terminated
        )
    }
}

impl From<&Process> for Candidate {
    fn from(process: &Process) -> Candidate {
        Candidate {
            pid: process.pid(),
            state: process.state(),
            task_total: process.task_total(),
            task_remaining: process.task_remaining(),
            waiting_ticks: process.waiting_ticks(),
            running_ticks: process.running_ticks(),
        }
    }
}

/// Picks one process from a queue snapshot.
pub trait Select {
    /// * `queue` - the queued processes, in queue order.
    fn select(&mut self, queue: &[Candidate]) -> Result<Pid, Unavailable>;
}

/// Picks the processes that have to leave a resource this tick.
pub trait Evict {
    /// * `running` - the processes holding a slot, in slot order.
    /// * `queue` - the processes waiting for the resource, in queue order.
    /// * `capacity` - the number of slots of the resource.
    fn choose_to_evict(
        &mut self,
        running: &[Candidate],
        queue: &[Candidate],
        capacity: usize,
    ) -> Result<Vec<Pid>, SimulationError>;
}

/// The selection policies.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Earliest enqueued first.
    Fifo,
    /// Smallest current task first.
    ShortestProcessNext,
    /// Smallest remaining time of the current task first.
    ShortestRemainingTime,
    /// Smallest `waiting / task total` first.
    HighestResponseRatio,
}

impl Select for Selection {
    fn select(&mut self, queue: &[Candidate]) -> Result<Pid, Unavailable> {
        match self {
            Selection::Fifo => fcfs::select(queue),
            Selection::ShortestProcessNext => spn::select(queue),
            Selection::ShortestRemainingTime => srt::select(queue),
            Selection::HighestResponseRatio => hrrn::select(queue),
        }
    }
}

/// The eviction policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eviction {
    NonPreemptive(NonPreemptive),
    RoundRobin(RoundRobin),
    ShortestRemainingTime(ShortestRemainingTime),
}

impl Evict for Eviction {
    fn choose_to_evict(
        &mut self,
        running: &[Candidate],
        queue: &[Candidate],
        capacity: usize,
    ) -> Result<Vec<Pid>, SimulationError> {
        match self {
            Eviction::NonPreemptive(evictor) => evictor.choose_to_evict(running, queue, capacity),
            Eviction::RoundRobin(evictor) => evictor.choose_to_evict(running, queue, capacity),
            Eviction::ShortestRemainingTime(evictor) => {
                evictor.choose_to_evict(running, queue, capacity)
            }
        }
    }
}

/// An eviction policy paired with a selection policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub eviction: Eviction,
    pub selection: Selection,
}

impl Policy {
    pub fn new(eviction: Eviction, selection: Selection) -> Policy {
        Policy {
            eviction,
            selection,
        }
    }
}

/// The scheduling algorithms that can drive the CPUs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Algorithm {
    Fcfs,
    /// Round robin with the quantum given on the command line.
    RoundRobin,
    /// Round robin with a fixed quantum.
    RoundRobinFixed(NonZeroUsize),
    Spn,
    Srt,
    Hrrn,
}

impl Algorithm {
    /// Builds the policy for this algorithm.
    ///
    /// * `quantum` - used by [`Algorithm::RoundRobin`] only.
    pub fn policy(&self, quantum: NonZeroUsize) -> Policy {
        match self {
            Algorithm::Fcfs => crate::fcfs(),
            Algorithm::RoundRobin => crate::round_robin(quantum),
            Algorithm::RoundRobinFixed(quantum) => crate::round_robin(*quantum),
            Algorithm::Spn => crate::spn(),
            Algorithm::Srt => crate::srt(),
            Algorithm::Hrrn => crate::hrrn(),
        }
    }
}

/// The algorithm name is not one of `fcfs`, `rr`, `rr1`, `rr4`, `spn`, `srt`, `hrrn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown scheduling algorithm {}, possible values: fcfs, rr, rr1, rr4, spn, srt, hrrn",
            self.0
        )
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fixed = |quantum: usize| {
            NonZeroUsize::new(quantum)
                .map(Algorithm::RoundRobinFixed)
                .ok_or_else(|| UnknownAlgorithm(s.to_string()))
        };
        match s {
            "fcfs" => Ok(Algorithm::Fcfs),
            "rr" => Ok(Algorithm::RoundRobin),
            "rr1" => fixed(1),
            "rr4" => fixed(4),
            "spn" => Ok(Algorithm::Spn),
            "srt" => Ok(Algorithm::Srt),
            "hrrn" => Ok(Algorithm::Hrrn),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Fcfs => write!(f, "fcfs"),
            Algorithm::RoundRobin => write!(f, "rr"),
            Algorithm::RoundRobinFixed(quantum) => write!(f, "rr{quantum}"),
            Algorithm::Spn => write!(f, "spn"),
            Algorithm::Srt => write!(f, "srt"),
            Algorithm::Hrrn => write!(f, "hrrn"),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A queued process with the given current task.
    pub(crate) fn queued(pid: usize, total: usize, remaining: usize, waiting: usize) -> Candidate {
        Candidate {
            pid: Pid::new(pid),
            state: ProcessState::Ready,
            task_total: total,
            task_remaining: remaining,
            waiting_ticks: waiting,
            running_ticks: 0,
        }
    }

    /// A process holding a CPU.
    pub(crate) fn running(pid: usize, remaining: usize, running_ticks: usize) -> Candidate {
        Candidate {
            pid: Pid::new(pid),
            state: ProcessState::Running,
            task_total: remaining + running_ticks,
            task_remaining: remaining,
            waiting_ticks: 0,
            running_ticks,
        }
    }

    /// A process still on a slot after its task finished.
    pub(crate) fn completed(pid: usize, state: ProcessState) -> Candidate {
        Candidate {
            pid: Pid::new(pid),
            state,
            task_total: 1,
            task_remaining: 1,
            waiting_ticks: 0,
            running_ticks: 0,
        }
    }

    #[test]
    fn parse_algorithm() {
        assert_eq!("fcfs".parse::<Algorithm>(), Ok(Algorithm::Fcfs));
        assert_eq!("rr".parse::<Algorithm>(), Ok(Algorithm::RoundRobin));
        assert_eq!(
            "rr4".parse::<Algorithm>(),
            Ok(Algorithm::RoundRobinFixed(NonZeroUsize::new(4).unwrap()))
        );
        assert_eq!("hrrn".parse::<Algorithm>().map(|a| a.to_string()), Ok("hrrn".to_string()));
        assert_eq!(
            "lottery".parse::<Algorithm>(),
            Err(UnknownAlgorithm("lottery".to_string()))
        );
    }

    #[test]
    fn round_robin_alias_ignores_quantum_flag() {
        let quantum = NonZeroUsize::new(7).unwrap();
        let policy = Algorithm::RoundRobinFixed(NonZeroUsize::new(1).unwrap()).policy(quantum);
        assert_eq!(policy, crate::round_robin(NonZeroUsize::new(1).unwrap()));
        assert_eq!(Algorithm::RoundRobin.policy(quantum), crate::round_robin(quantum));
    }

    #[test]
    fn completion_states() {
        assert!(completed(1, ProcessState::Blocked).is_task_completed());
        assert!(completed(1, ProcessState::Terminated).is_task_completed());
        assert!(!running(1, 2, 0).is_task_completed());
    }
}
