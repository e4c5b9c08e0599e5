use std::fmt::{self, Display};
use std::num::NonZeroUsize;

use crate::{Pid, Process, ResourceKind, SimulationError, Unavailable};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResourceState {
    Free,
    Busy,
}

/// One unit of service capacity: a CPU core or a whole IO device.
#[derive(Debug, Clone)]
pub struct Resource {
    name: String,
    kind: ResourceKind,
    occupant: Option<Pid>,
}

impl Resource {
    pub fn new(name: impl Into<String>, kind: ResourceKind) -> Resource {
        Resource {
            name: name.into(),
            kind,
            occupant: None,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn state(&self) -> ResourceState {
        match self.occupant {
            Some(_) => ResourceState::Busy,
            None => ResourceState::Free,
        }
    }

    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn occupant(&self) -> Option<Pid> {
        self.occupant
    }

    /// Places `process` on this slot and moves it to RUNNING or READS_IO.
    pub fn assign(&mut self, process: &mut Process) -> Result<(), Unavailable> {
        if self.occupant.is_some() {
            return Err(Unavailable::NoFreeResource);
        }
        self.occupant = Some(process.pid());
        process.assign_to(self.kind);
        Ok(())
    }

    /// Frees the slot held by `process`.
    ///
    /// Fails if the slot is free or held by someone else, and if the process
    /// is still reading from an IO device.
    pub fn must_evict(&mut self, process: &mut Process) -> Result<(), SimulationError> {
        match self.occupant {
            None => Err(SimulationError::ResourceAlreadyFree {
                resource: self.name.clone(),
                pid: process.pid(),
            }),
            Some(found) if found != process.pid() => Err(SimulationError::OccupantMismatch {
                resource: self.name.clone(),
                expected: process.pid(),
                found,
            }),
            Some(_) => {
                self.occupant = None;
                process.on_evict()
            }
        }
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.occupant {
            Some(pid) => write!(f, "{pid}"),
            None => write!(f, "-"),
        }
    }
}

/// A set of slots managed together by one scheduler.
pub trait ResourcePool {
    fn name(&self) -> &str;

    /// Slots in their fixed search order.
    fn slots(&self) -> &[Resource];

    fn slots_mut(&mut self) -> &mut [Resource];

    fn capacity(&self) -> usize {
        self.slots().len()
    }

    /// Index of the first free slot.
    fn free_slot(&self) -> Result<usize, Unavailable> {
        self.slots()
            .iter()
            .position(Resource::is_free)
            .ok_or(Unavailable::NoFreeResource)
    }

    fn assign_to_free(&mut self, process: &mut Process) -> Result<usize, Unavailable> {
        let slot = self.free_slot()?;
        self.slots_mut()[slot].assign(process)?;
        Ok(slot)
    }

    /// Occupants in slot order.
    fn occupants(&self) -> Vec<Pid> {
        self.slots().iter().filter_map(Resource::occupant).collect()
    }

    fn must_evict(&mut self, process: &mut Process) -> Result<(), SimulationError> {
        let pid = process.pid();
        let Some(slot) = self
            .slots()
            .iter()
            .position(|slot| slot.occupant() == Some(pid))
        else {
            return Err(SimulationError::NotOccupying {
                resource: self.name().to_string(),
                pid,
            });
        };
        self.slots_mut()[slot].must_evict(process)
    }
}

impl ResourcePool for Resource {
    fn name(&self) -> &str {
        &self.name
    }

    fn slots(&self) -> &[Resource] {
        std::slice::from_ref(self)
    }

    fn slots_mut(&mut self) -> &mut [Resource] {
        std::slice::from_mut(self)
    }
}

/// A fixed number of CPU cores.
#[derive(Debug, Clone)]
pub struct CpuPool {
    name: String,
    cpus: Vec<Resource>,
}

impl CpuPool {
    pub fn new(count: NonZeroUsize) -> CpuPool {
        let cpus = (0..count.get())
            .map(|cpu| Resource::new(format!("CPU{cpu}"), ResourceKind::Cpu))
            .collect();
        CpuPool {
            name: String::from("CPUs"),
            cpus,
        }
    }
}

impl ResourcePool for CpuPool {
    fn name(&self) -> &str {
        &self.name
    }

    fn slots(&self) -> &[Resource] {
        &self.cpus
    }

    fn slots_mut(&mut self) -> &mut [Resource] {
        &mut self.cpus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ProcessState, Task};

    fn process(pid: usize) -> Process {
        Process::new(Pid::new(pid), 0, vec![Task::cpu(3), Task::io1(2)])
    }

    #[test]
    fn assign_to_free_cpu_pool() {
        let mut pool = CpuPool::new(NonZeroUsize::new(2).unwrap());
        let mut first = process(1);
        let mut second = process(2);

        assert_eq!(pool.assign_to_free(&mut first), Ok(0));
        assert_eq!(pool.slots()[0].state(), ResourceState::Busy);
        assert_eq!(pool.slots()[0].occupant(), Some(Pid::new(1)));
        assert_eq!(first.state(), ProcessState::Running);

        assert_eq!(pool.assign_to_free(&mut second), Ok(1));
        assert_eq!(pool.free_slot(), Err(Unavailable::NoFreeResource));
        assert_eq!(pool.occupants(), vec![Pid::new(1), Pid::new(2)]);
    }

    #[test]
    fn free_slot_is_first_match() {
        let mut pool = CpuPool::new(NonZeroUsize::new(3).unwrap());
        let mut procs: Vec<Process> = (1..=3).map(process).collect();
        for p in procs.iter_mut() {
            pool.assign_to_free(p).unwrap();
        }
        pool.must_evict(&mut procs[1]).unwrap();
        pool.must_evict(&mut procs[0]).unwrap();

        assert_eq!(pool.free_slot(), Ok(0));
        assert_eq!(procs[1].state(), ProcessState::Ready);
    }

    #[test]
    fn io_device_moves_process_to_reads_io() {
        let mut device = Resource::new("IO1", ResourceKind::Io1);
        let mut p = process(1);
        device.assign(&mut p).unwrap();

        assert_eq!(p.state(), ProcessState::ReadsIo);
        assert_eq!(device.assign(&mut process(2)), Err(Unavailable::NoFreeResource));
        assert_eq!(device.to_string(), "1");
    }

    #[test]
    fn evict_checks_occupant() {
        let mut cpu = Resource::new("CPU0", ResourceKind::Cpu);
        let mut first = process(1);
        let mut second = process(2);

        assert_eq!(
            cpu.must_evict(&mut first),
            Err(SimulationError::ResourceAlreadyFree {
                resource: String::from("CPU0"),
                pid: Pid::new(1)
            })
        );

        cpu.assign(&mut first).unwrap();
        assert_eq!(
            cpu.must_evict(&mut second),
            Err(SimulationError::OccupantMismatch {
                resource: String::from("CPU0"),
                expected: Pid::new(2),
                found: Pid::new(1)
            })
        );

        cpu.must_evict(&mut first).unwrap();
        assert!(cpu.is_free());
        assert_eq!(cpu.to_string(), "-");
    }

    #[test]
    fn pool_evict_of_stranger_fails() {
        let mut pool = CpuPool::new(NonZeroUsize::new(1).unwrap());
        let mut stranger = process(9);

        assert_eq!(
            pool.must_evict(&mut stranger),
            Err(SimulationError::NotOccupying {
                resource: String::from("CPUs"),
                pid: Pid::new(9)
            })
        );
    }
}
