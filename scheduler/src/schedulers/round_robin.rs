use std::num::NonZeroUsize;

use crate::{Pid, SimulationError};

use super::{Candidate, Evict};

/// Evicts a process once it has held its resource for `quantum` ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRobin {
    quantum: NonZeroUsize,
}

impl RoundRobin {
    pub fn new(quantum: NonZeroUsize) -> Self {
        RoundRobin { quantum }
    }

    pub fn quantum(&self) -> NonZeroUsize {
        self.quantum
    }
}

impl Evict for RoundRobin {
    fn choose_to_evict(
        &mut self,
        running: &[Candidate],
        _queue: &[Candidate],
        _capacity: usize,
    ) -> Result<Vec<Pid>, SimulationError> {
        let quantum = self.quantum.get();
        let mut evicted = Vec::new();
        for process in running {
            if process.running_ticks > quantum {
                return Err(SimulationError::QuantumExceeded {
                    pid: process.pid,
                    running: process.running_ticks,
                    quantum,
                });
            }
            if process.running_ticks == quantum || process.is_task_completed() {
                evicted.push(process.pid);
            }
        }
        Ok(evicted)
    }
}
