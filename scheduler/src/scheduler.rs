use std::error::Error;
use std::fmt::{self, Display};
use std::num::NonZeroUsize;

/// A point in simulated time.
pub type Tick = usize;

/// The PID of a process
///
/// The PID cannot be 0, PIDs start from 1.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Pid(NonZeroUsize);

impl Pid {
    /// Panics if `pid` is 0.
    pub fn new(pid: usize) -> Pid {
        Pid(NonZeroUsize::new(pid).expect("PIDs start from 1"))
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of resource a task needs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Cpu,
    Io1,
    Io2,
}

impl ResourceKind {
    pub fn is_io(&self) -> bool {
        matches!(self, ResourceKind::Io1 | ResourceKind::Io2)
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Cpu => write!(f, "CPU"),
            ResourceKind::Io1 => write!(f, "IO1"),
            ResourceKind::Io2 => write!(f, "IO2"),
        }
    }
}

/// The state of a process.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProcessState {
    /// Waiting in the CPU queue.
    Ready,

    /// Holding a CPU slot.
    Running,

    /// Waiting in one of the IO queues.
    Blocked,

    /// Holding an IO device.
    ReadsIo,

    /// All tasks are done. There are no transitions out of this state.
    Terminated,
}

impl Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessState::Ready => write!(f, "READY"),
            ProcessState::Running => write!(f, "RUNNING"),
            ProcessState::Blocked => write!(f, "BLOCKED"),
            ProcessState::ReadsIo => write!(f, "READS_IO"),
            ProcessState::Terminated => write!(f, "TERMINATED"),
        }
    }
}

/// Expected outcomes that the tick loop checks every tick.
///
/// None of these change any state. Callers log them at debug level and move on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// The queue has no entries.
    QueueEmpty,

    /// Every slot of the resource is busy.
    NoFreeResource,

    /// The queue has entries, but the policy did not find one to admit.
    NoEligibleProcess,
}

impl Display for Unavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unavailable::QueueEmpty => write!(f, "queue is empty"),
            Unavailable::NoFreeResource => write!(f, "no free resource"),
            Unavailable::NoEligibleProcess => write!(f, "no eligible process"),
        }
    }
}

impl Error for Unavailable {}

/// An invariant violation. The run cannot continue after one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// A task was served for longer than its total duration.
    TaskOverrun { pid: Pid, task: usize },

    /// Eviction was requested from a slot that holds nothing.
    ResourceAlreadyFree { resource: String, pid: Pid },

    /// The slot holds a different process than the one being evicted.
    OccupantMismatch {
        resource: String,
        expected: Pid,
        found: Pid,
    },

    /// The process is not in any slot of the resource.
    NotOccupying { resource: String, pid: Pid },

    /// A slot reported as free could not take the process.
    SlotBusy { resource: String, pid: Pid },

    /// A process was taken off an IO device before its task finished.
    PreemptedIo { pid: Pid },

    /// A BLOCKED process whose current task is not an IO task.
    BlockedOnCpu(Pid),

    /// A process held a CPU for longer than the round robin quantum.
    QuantumExceeded {
        pid: Pid,
        running: usize,
        quantum: usize,
    },

    /// A PID is not in the process table.
    UnknownProcess(Pid),

    /// Two processes in the workload share a PID.
    DuplicatePid(Pid),

    /// A process has no tasks.
    EmptyWorkload(Pid),

    /// A task has a total duration of 0.
    ZeroDuration { pid: Pid, task: usize },

    /// The first task of a process is not a CPU task.
    StartsWithIo(Pid),
}

impl Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::TaskOverrun { pid, task } => {
                write!(f, "process {pid} ran task {task} past its total time")
            }
            SimulationError::ResourceAlreadyFree { resource, pid } => {
                write!(f, "cannot evict process {pid}, resource {resource} is already free")
            }
            SimulationError::OccupantMismatch {
                resource,
                expected,
                found,
            } => {
                write!(
                    f,
                    "cannot evict process {expected} from {resource}, it is held by process {found}"
                )
            }
            SimulationError::NotOccupying { resource, pid } => {
                write!(f, "process {pid} does not occupy resource {resource}")
            }
            SimulationError::SlotBusy { resource, pid } => {
                write!(f, "cannot assign process {pid}, resource {resource} is busy")
            }
            SimulationError::PreemptedIo { pid } => {
                write!(
                    f,
                    "process {pid} evicted in READS_IO state but IO scheduling is nonpreemptive"
                )
            }
            SimulationError::BlockedOnCpu(pid) => {
                write!(f, "process {pid} is blocked but its current task is a CPU task")
            }
            SimulationError::QuantumExceeded {
                pid,
                running,
                quantum,
            } => {
                write!(
                    f,
                    "process {pid} has been running for {running} ticks, but quantum is {quantum}"
                )
            }
            SimulationError::UnknownProcess(pid) => write!(f, "unknown process {pid}"),
            SimulationError::DuplicatePid(pid) => write!(f, "duplicate process id {pid}"),
            SimulationError::EmptyWorkload(pid) => write!(f, "process {pid} has no tasks"),
            SimulationError::ZeroDuration { pid, task } => {
                write!(f, "task {task} of process {pid} has zero duration")
            }
            SimulationError::StartsWithIo(pid) => {
                write!(f, "process {pid} must start with a CPU task")
            }
        }
    }
}

impl Error for SimulationError {}
