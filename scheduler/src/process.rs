use std::collections::HashMap;

use log::{debug, info, warn};

use crate::ProcessState::{Blocked, ReadsIo, Ready, Running, Terminated};
use crate::{Pid, ProcessState, ResourceKind, SimulationError, Tick};

/// One contiguous demand for a single resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    kind: ResourceKind,
    total: usize,
    elapsed: usize,
}

impl Task {
    pub fn new(kind: ResourceKind, total: usize) -> Task {
        Task {
            kind,
            total,
            elapsed: 0,
        }
    }

    pub fn cpu(total: usize) -> Task {
        Task::new(ResourceKind::Cpu, total)
    }

    pub fn io1(total: usize) -> Task {
        Task::new(ResourceKind::Io1, total)
    }

    pub fn io2(total: usize) -> Task {
        Task::new(ResourceKind::Io2, total)
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn elapsed(&self) -> usize {
        self.elapsed
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.elapsed)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed == self.total
    }
}

/// Per-process timing statistics.
///
/// Only the process writes these, once per tick. They are read after the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub pid: Pid,
    pub entrance_tick: Tick,
    pub service_ticks: usize,
    pub ready_or_blocked_ticks: usize,
    /// First tick spent on a resource, `None` until then.
    pub start_tick: Option<Tick>,
    pub exit_tick: Tick,
    pub turnaround_ticks: usize,
}

impl Stats {
    fn new(pid: Pid, entrance_tick: Tick) -> Stats {
        Stats {
            pid,
            entrance_tick,
            service_ticks: 0,
            ready_or_blocked_ticks: 0,
            start_tick: None,
            exit_tick: 0,
            turnaround_ticks: 0,
        }
    }

    /// Turnaround divided by service time.
    pub fn normalized_turnaround(&self) -> f64 {
        if self.service_ticks == 0 {
            return 0.0;
        }
        self.turnaround_ticks as f64 / self.service_ticks as f64
    }
}

/// A simulated workload unit.
#[derive(Debug, Clone)]
pub struct Process {
    pid: Pid,
    arrival: Tick,
    state: ProcessState,
    current_task: usize,
    tasks: Vec<Task>,
    waiting_ticks: usize,
    blocked_ticks: usize,
    running_ticks: usize,
    stats: Stats,
}

impl Process {
    pub fn new(pid: Pid, arrival: Tick, tasks: Vec<Task>) -> Process {
        Process {
            pid,
            arrival,
            state: Ready,
            current_task: 0,
            tasks,
            waiting_ticks: 0,
            blocked_ticks: 0,
            running_ticks: 0,
            stats: Stats::new(pid, arrival),
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn arrival(&self) -> Tick {
        self.arrival
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The task the process is working on, `None` once every task is done.
    pub fn current_task(&self) -> Option<&Task> {
        self.tasks.get(self.current_task)
    }

    pub fn current_task_index(&self) -> usize {
        self.current_task
    }

    /// Total duration of the current task, 0 once every task is done.
    pub fn task_total(&self) -> usize {
        self.current_task().map_or(0, Task::total)
    }

    /// Remaining time of the current task, 0 once every task is done.
    pub fn task_remaining(&self) -> usize {
        self.current_task().map_or(0, Task::remaining)
    }

    /// Ticks spent READY since the process was last admitted to a resource.
    pub fn waiting_ticks(&self) -> usize {
        self.waiting_ticks
    }

    /// Ticks spent BLOCKED since the process was last admitted to a resource.
    pub fn blocked_ticks(&self) -> usize {
        self.blocked_ticks
    }

    /// Ticks spent on the current resource since admission.
    pub fn running_ticks(&self) -> usize {
        self.running_ticks
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// A process that still sits on a resource in one of these states has
    /// finished the task it was admitted for.
    pub fn is_task_completed(&self) -> bool {
        matches!(self.state, Blocked | Terminated | Ready)
    }

    /// Checks the workload before the run starts.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.tasks.is_empty() {
            return Err(SimulationError::EmptyWorkload(self.pid));
        }
        if let Some(task) = self.tasks.iter().position(|task| task.total == 0) {
            return Err(SimulationError::ZeroDuration {
                pid: self.pid,
                task,
            });
        }
        if self.tasks[0].kind != ResourceKind::Cpu {
            return Err(SimulationError::StartsWithIo(self.pid));
        }
        Ok(())
    }

    pub(crate) fn assign_to(&mut self, kind: ResourceKind) {
        self.state = if kind.is_io() { ReadsIo } else { Running };
        self.waiting_ticks = 0;
        self.blocked_ticks = 0;
        self.running_ticks = 0;
    }

    pub(crate) fn on_evict(&mut self) -> Result<(), SimulationError> {
        debug!("Process {} evicted in state {}", self.pid, self.state);
        self.running_ticks = 0;
        match self.state {
            Running => self.state = Ready,
            ReadsIo => return Err(SimulationError::PreemptedIo { pid: self.pid }),
            _ => {}
        }
        Ok(())
    }

    /// Advances the process by one tick.
    ///
    /// * `now` - the tick that has just been spent.
    pub fn tick(&mut self, now: Tick) -> Result<(), SimulationError> {
        let state = self.state;
        debug!("t{now} Process {} ticked. State: {state}", self.pid);

        let Some(task) = self.tasks.get_mut(self.current_task) else {
            warn!("t{now} Process {} is already terminated", self.pid);
            return Ok(());
        };

        match state {
            Ready => self.waiting_ticks += 1,
            Blocked => self.blocked_ticks += 1,
            Running | ReadsIo => {
                self.running_ticks += 1;
                task.elapsed += 1;
            }
            // covered by the `let else` above
            Terminated => {}
        }

        if task.elapsed > task.total {
            return Err(SimulationError::TaskOverrun {
                pid: self.pid,
                task: self.current_task,
            });
        }
        let finished = task.is_finished();

        self.record_tick(state, now);

        if finished {
            debug!("t{now} Process {} finished task {}", self.pid, self.current_task);
            self.complete_task(now);
        }
        Ok(())
    }

    fn record_tick(&mut self, state: ProcessState, now: Tick) {
        match state {
            Running | ReadsIo => {
                if self.stats.start_tick.is_none() {
                    self.stats.start_tick = Some(now);
                }
                self.stats.service_ticks += 1;
            }
            Ready | Blocked => self.stats.ready_or_blocked_ticks += 1,
            Terminated => {}
        }
    }

    fn complete_task(&mut self, now: Tick) {
        self.running_ticks = 0;
        self.current_task += 1;

        let Some(next) = self.tasks.get(self.current_task) else {
            info!("t{now} Process {} finished all tasks", self.pid);
            self.state = Terminated;
            self.stats.turnaround_ticks =
                self.stats.service_ticks + self.stats.ready_or_blocked_ticks;
            self.stats.exit_tick = self.stats.entrance_tick + self.stats.turnaround_ticks;
            return;
        };

        match next.kind {
            ResourceKind::Cpu => {
                self.state = Ready;
                debug!("t{now} Process {} ready", self.pid);
            }
            kind => {
                self.state = Blocked;
                debug!("t{now} Process {} blocked on {kind}", self.pid);
            }
        }
    }
}

/// Owns every process of a run. Everything else refers to processes by PID.
#[derive(Debug, Default)]
pub struct ProcessTable {
    procs: Vec<Process>,
    index: HashMap<Pid, usize>,
}

impl ProcessTable {
    pub fn new() -> ProcessTable {
        ProcessTable::default()
    }

    /// Takes ownership of `procs`, keeping their order.
    pub fn from_processes(procs: Vec<Process>) -> Result<ProcessTable, SimulationError> {
        let mut table = ProcessTable::new();
        for process in procs {
            table.insert(process)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, process: Process) -> Result<(), SimulationError> {
        let pid = process.pid();
        if self.index.contains_key(&pid) {
            return Err(SimulationError::DuplicatePid(pid));
        }
        self.index.insert(pid, self.procs.len());
        self.procs.push(process);
        Ok(())
    }

    pub fn get(&self, pid: Pid) -> Result<&Process, SimulationError> {
        self.index
            .get(&pid)
            .map(|&slot| &self.procs[slot])
            .ok_or(SimulationError::UnknownProcess(pid))
    }

    pub fn get_mut(&mut self, pid: Pid) -> Result<&mut Process, SimulationError> {
        match self.index.get(&pid) {
            Some(&slot) => Ok(&mut self.procs[slot]),
            None => Err(SimulationError::UnknownProcess(pid)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.procs.iter()
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }

    /// Statistics for every process, in insertion order.
    pub fn stats(&self) -> Vec<Stats> {
        self.procs.iter().map(Process::stats).collect()
    }
}
