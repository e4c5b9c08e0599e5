use std::fmt::{self, Display};
use std::num::NonZeroUsize;

use log::{debug, info};

use crate::schedulers::{Eviction, NonPreemptive, Policy, Selection};
use crate::{
    CpuPool, Pid, Process, ProcessState, ProcessTable, Resource, ResourceKind, ResourcePool,
    SchedulerWrapper, SimulationError, Stats, Tick,
};

/// What the machine is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub cpu_count: NonZeroUsize,
    /// Drives the CPUs. The IO devices are always first come first served.
    pub policy: Policy,
}

/// The simulated time. Only the machine advances it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    tick: Tick,
}

impl Clock {
    pub fn now(&self) -> Tick {
        self.tick
    }

    fn advance(&mut self) {
        self.tick += 1;
    }
}

/// Resource occupancy at one tick, taken after admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub tick: Tick,
    pub cpus: Vec<Option<Pid>>,
    pub io1: Option<Pid>,
    pub io2: Option<Pid>,
}

fn slot(f: &mut fmt::Formatter<'_>, occupant: &Option<Pid>) -> fmt::Result {
    match occupant {
        Some(pid) => write!(f, "{pid}"),
        None => write!(f, "-"),
    }
}

impl Display for Snapshot {
    /// `{tick} | {cpu} {cpu} ... | {io1} {io2}`, with `-` for a free slot.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>3} |", self.tick)?;
        for cpu in &self.cpus {
            write!(f, " ")?;
            slot(f, cpu)?;
        }
        write!(f, " | ")?;
        slot(f, &self.io1)?;
        write!(f, " ")?;
        slot(f, &self.io2)
    }
}

/// One shared CPU pool and two IO devices, driven tick by tick.
#[derive(Debug)]
pub struct Machine {
    cpu: SchedulerWrapper<CpuPool>,
    io1: SchedulerWrapper<Resource>,
    io2: SchedulerWrapper<Resource>,

    procs: ProcessTable,
    unscheduled: Vec<Pid>,
    active: Vec<Pid>,
    clock: Clock,
}

impl Machine {
    pub fn new(config: Config) -> Machine {
        let Policy {
            eviction,
            selection,
        } = config.policy;
        let fcfs = || Eviction::NonPreemptive(NonPreemptive::new());

        Machine {
            cpu: SchedulerWrapper::new("CPUs", CpuPool::new(config.cpu_count), selection, eviction),
            io1: SchedulerWrapper::new(
                "IO1",
                Resource::new("IO1", ResourceKind::Io1),
                Selection::Fifo,
                fcfs(),
            ),
            io2: SchedulerWrapper::new(
                "IO2",
                Resource::new("IO2", ResourceKind::Io2),
                Selection::Fifo,
                fcfs(),
            ),
            procs: ProcessTable::new(),
            unscheduled: Vec::new(),
            active: Vec::new(),
            clock: Clock::default(),
        }
    }

    /// Runs `processes` to completion.
    ///
    /// * `on_tick` - called once per tick with the resource occupancy.
    ///
    /// Returns the statistics of every process, in input order. The workload
    /// is validated before tick 0; any error aborts the run.
    pub fn run<F>(mut self, processes: Vec<Process>, mut on_tick: F) -> Result<Vec<Stats>, SimulationError>
    where
        F: FnMut(&Snapshot),
    {
        self.load(processes)?;
        info!("Running with {} CPUs", self.cpu.resource().capacity());
        info!("Total processes: {}", self.procs.len());

        while !self.all_done() {
            self.step(&mut on_tick)?;
        }
        Ok(self.procs.stats())
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn procs(&self) -> &ProcessTable {
        &self.procs
    }

    fn load(&mut self, processes: Vec<Process>) -> Result<(), SimulationError> {
        for process in &processes {
            process.validate()?;
        }
        self.unscheduled = processes.iter().map(Process::pid).collect();
        self.procs = ProcessTable::from_processes(processes)?;
        Ok(())
    }

    fn all_done(&self) -> bool {
        self.active.is_empty() && self.unscheduled.is_empty()
    }

    fn step<F>(&mut self, on_tick: &mut F) -> Result<(), SimulationError>
    where
        F: FnMut(&Snapshot),
    {
        self.evict()?;
        self.admit(on_tick)
    }

    /// First half of a tick: arrivals join the CPU queue and every wrapper
    /// evicts what its policy picks. Evicted processes stay buffered.
    fn evict(&mut self) -> Result<(), SimulationError> {
        let now = self.clock.now();
        self.check_for_new_procs(now)?;

        self.cpu.check_running_procs(&mut self.procs, now)?;
        self.io1.check_running_procs(&mut self.procs, now)?;
        self.io2.check_running_procs(&mut self.procs, now)
    }

    /// Second half of a tick: routes the evicted processes, admits, takes the
    /// snapshot and advances every active process.
    fn admit<F>(&mut self, on_tick: &mut F) -> Result<(), SimulationError>
    where
        F: FnMut(&Snapshot),
    {
        let now = self.clock.now();
        self.handle_all_evicted_procs(now)?;

        self.cpu.process_queue(&mut self.procs, now)?;
        self.io1.process_queue(&mut self.procs, now)?;
        self.io2.process_queue(&mut self.procs, now)?;

        on_tick(&self.snapshot());

        self.clock.advance();

        for &pid in &self.active {
            self.procs.get_mut(pid)?.tick(now)?;
        }
        Ok(())
    }

    fn check_for_new_procs(&mut self, now: Tick) -> Result<(), SimulationError> {
        let mut waiting = Vec::with_capacity(self.unscheduled.len());
        for &pid in &self.unscheduled {
            if self.procs.get(pid)?.arrival() > now {
                waiting.push(pid);
                continue;
            }
            info!("t{now} Process {pid} arrived");
            self.cpu.push_to_queue(pid, now);
            self.active.push(pid);
        }
        self.unscheduled = waiting;
        debug!("t{now} Unscheduled procs: {}", self.unscheduled.len());
        Ok(())
    }

    fn handle_all_evicted_procs(&mut self, now: Tick) -> Result<(), SimulationError> {
        let mut evicted = self.cpu.take_evicted();
        evicted.extend(self.io1.take_evicted());
        evicted.extend(self.io2.take_evicted());

        for pid in evicted {
            self.handle_evicted_proc(pid, now)?;
        }
        Ok(())
    }

    fn handle_evicted_proc(&mut self, pid: Pid, now: Tick) -> Result<(), SimulationError> {
        let process = self.procs.get(pid)?;
        match process.state() {
            ProcessState::Terminated => {
                info!("t{now} Process {pid} is done");
                self.active.retain(|&active| active != pid);
            }
            ProcessState::Running | ProcessState::Ready => self.cpu.push_to_queue(pid, now),
            ProcessState::Blocked => match process.current_task().map(|task| task.kind()) {
                Some(ResourceKind::Io1) => {
                    debug!("t{now} Process {pid} is blocked on IO1");
                    self.io1.push_to_queue(pid, now);
                }
                Some(ResourceKind::Io2) => {
                    debug!("t{now} Process {pid} is blocked on IO2");
                    self.io2.push_to_queue(pid, now);
                }
                _ => return Err(SimulationError::BlockedOnCpu(pid)),
            },
            ProcessState::ReadsIo => return Err(SimulationError::PreemptedIo { pid }),
        }
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        let occupant = |wrapper: &SchedulerWrapper<Resource>| wrapper.resource().occupant();
        Snapshot {
            tick: self.clock.now(),
            cpus: self
                .cpu
                .resource()
                .slots()
                .iter()
                .map(Resource::occupant)
                .collect(),
            io1: occupant(&self.io1),
            io2: occupant(&self.io2),
        }
    }
}
