//! A CPU and IO scheduling simulator.
//!
//! This library provides the discrete tick engine: processes made of CPU and
//! IO tasks, one CPU pool and two IO devices with their queues, and the
//! policies that decide who gets admitted and who gets evicted.
//!

use std::num::NonZeroUsize;

mod scheduler;

pub use crate::scheduler::{Pid, ProcessState, ResourceKind, SimulationError, Tick, Unavailable};

mod process;
pub use process::{Process, ProcessTable, Stats, Task};

mod queue;
pub use queue::{ProcQueue, QueueEntry};

mod resource;
pub use resource::{CpuPool, Resource, ResourcePool, ResourceState};

pub mod schedulers;
use schedulers::{Eviction, NonPreemptive, RoundRobin, ShortestRemainingTime, Selection};
pub use schedulers::{Algorithm, Policy, UnknownAlgorithm};

mod wrapper;
pub use wrapper::SchedulerWrapper;

mod machine;
pub use machine::{Clock, Config, Machine, Snapshot};

/// Returns a first come first served policy.
///
/// A process keeps its CPU until its task completes, the queue is served in
/// arrival order.
pub fn fcfs() -> Policy {
    Policy::new(Eviction::NonPreemptive(NonPreemptive::new()), Selection::Fifo)
}

/// Returns a round robin policy.
///
/// * `quantum` - the number of ticks a process can hold a CPU before it is
///               evicted and sent to the back of the queue.
pub fn round_robin(quantum: NonZeroUsize) -> Policy {
    Policy::new(Eviction::RoundRobin(RoundRobin::new(quantum)), Selection::Fifo)
}

/// Returns a shortest process next policy.
///
/// Non-preemptive, the process with the shortest current task is admitted
/// first.
pub fn spn() -> Policy {
    Policy::new(
        Eviction::NonPreemptive(NonPreemptive::new()),
        Selection::ShortestProcessNext,
    )
}

/// Returns a shortest remaining time policy.
///
/// Preemptive, a queued process with less remaining time than a running
/// process takes its CPU.
pub fn srt() -> Policy {
    Policy::new(
        Eviction::ShortestRemainingTime(ShortestRemainingTime::new()),
        Selection::ShortestRemainingTime,
    )
}

/// Returns a highest response ratio next policy.
///
/// Non-preemptive. See [`Selection::HighestResponseRatio`] for the ratio used.
pub fn hrrn() -> Policy {
    Policy::new(
        Eviction::NonPreemptive(NonPreemptive::new()),
        Selection::HighestResponseRatio,
    )
}
