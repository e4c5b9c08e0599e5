use std::mem;

use log::{debug, info};

use crate::schedulers::{Candidate, Evict, Eviction, Select, Selection};
use crate::{Pid, ProcQueue, ProcessTable, ResourcePool, SimulationError, Tick};

/// Binds one resource pool to its queue and its two policies.
///
/// Each tick the machine calls [`SchedulerWrapper::check_running_procs`] on
/// every wrapper, routes what was evicted, then calls
/// [`SchedulerWrapper::process_queue`] on every wrapper.
#[derive(Debug)]
pub struct SchedulerWrapper<R: ResourcePool> {
    name: String,
    resource: R,
    queue: ProcQueue,
    selection: Selection,
    eviction: Eviction,
    evicted: Vec<Pid>,
}

impl<R: ResourcePool> SchedulerWrapper<R> {
    pub fn new(
        name: impl Into<String>,
        resource: R,
        selection: Selection,
        eviction: Eviction,
    ) -> Self {
        let name = name.into();
        SchedulerWrapper {
            queue: ProcQueue::new(name.clone()),
            name,
            resource,
            selection,
            eviction,
            evicted: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn queue(&self) -> &ProcQueue {
        &self.queue
    }

    pub fn eviction(&self) -> &Eviction {
        &self.eviction
    }

    pub fn push_to_queue(&mut self, pid: Pid, now: Tick) {
        self.queue.push(pid, now);
    }

    /// Frees the slots of every process the eviction policy picks.
    ///
    /// The evicted processes are buffered until [`SchedulerWrapper::take_evicted`].
    pub fn check_running_procs(
        &mut self,
        procs: &mut ProcessTable,
        now: Tick,
    ) -> Result<(), SimulationError> {
        let running = candidates(self.resource.occupants(), procs)?;
        let queue = candidates(self.queue.pids(), procs)?;

        let chosen = self
            .eviction
            .choose_to_evict(&running, &queue, self.resource.capacity())?;
        for pid in chosen {
            info!("t{now} Evicting process {pid} from resource {}", self.name);
            self.resource.must_evict(procs.get_mut(pid)?)?;
            self.evicted.push(pid);
        }
        Ok(())
    }

    /// Admits at most one queued process to a free slot.
    ///
    /// Returns the admitted process, or `None` when there is no free slot or
    /// nothing to admit.
    pub fn process_queue(
        &mut self,
        procs: &mut ProcessTable,
        now: Tick,
    ) -> Result<Option<Pid>, SimulationError> {
        let slot = match self.resource.free_slot() {
            Ok(slot) => slot,
            Err(_) => {
                debug!("t{now} Resource {} is busy. Skipping scheduling", self.name);
                return Ok(None);
            }
        };

        let queue = candidates(self.queue.pids(), procs)?;
        let picked = self
            .selection
            .select(&queue)
            .and_then(|pid| self.queue.pick(pid));
        let pid = match picked {
            Ok(pid) => pid,
            Err(reason) => {
                debug!("t{now} Nothing to admit from queue {}: {reason}", self.queue.name());
                return Ok(None);
            }
        };

        let process = procs.get_mut(pid)?;
        if self.resource.slots_mut()[slot].assign(process).is_err() {
            return Err(SimulationError::SlotBusy {
                resource: self.name.clone(),
                pid,
            });
        }
        info!("t{now} Assigning process {pid} to resource {}", self.name);
        Ok(Some(pid))
    }

    pub fn evicted(&self) -> &[Pid] {
        &self.evicted
    }

    /// Drains the eviction buffer.
    pub fn take_evicted(&mut self) -> Vec<Pid> {
        mem::take(&mut self.evicted)
    }
}

fn candidates(
    pids: Vec<Pid>,
    procs: &ProcessTable,
) -> Result<Vec<Candidate>, SimulationError> {
    pids.into_iter()
        .map(|pid| procs.get(pid).map(Candidate::from))
        .collect()
}
