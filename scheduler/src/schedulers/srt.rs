use crate::{Pid, SimulationError, Unavailable};

use super::{Candidate, Evict};

/// Takes the process with the least remaining time on its current task.
/// Ties go to the earliest queued.
pub(super) fn select(queue: &[Candidate]) -> Result<Pid, Unavailable> {
    queue
        .iter()
        .min_by_key(|candidate| candidate.task_remaining)
        .map(|candidate| candidate.pid)
        .ok_or(Unavailable::QueueEmpty)
}

/// Shortest remaining time preemption.
///
/// Every tick the policy evicts processes whose task completed, then lets
/// queued processes with less remaining time push out running ones.
///
/// Nobody is pushed out while a slot is free: each free slot spares the
/// running process with the least remaining time.
///
/// A process pushed out this way becomes *old*. Old processes never preempt
/// anyone, and a queue with nothing but old processes causes no preemption.
/// A process stops being old once its current task completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortestRemainingTime {
    old: Vec<Pid>,
}

impl ShortestRemainingTime {
    pub fn new() -> Self {
        ShortestRemainingTime::default()
    }

    /// Processes preempted earlier whose task has not completed yet.
    pub fn old(&self) -> &[Pid] {
        &self.old
    }

    fn is_old(&self, pid: Pid) -> bool {
        self.old.contains(&pid)
    }
}

impl Evict for ShortestRemainingTime {
    fn choose_to_evict(
        &mut self,
        running: &[Candidate],
        queue: &[Candidate],
        capacity: usize,
    ) -> Result<Vec<Pid>, SimulationError> {
        let mut evicted = Vec::new();
        let mut free = capacity.saturating_sub(running.len());

        for process in running.iter().filter(|p| p.is_task_completed()) {
            self.old.retain(|&pid| pid != process.pid);
            evicted.push(process.pid);
            free += 1;
        }

        // stable sorts, ties keep queue and slot order
        let mut contenders: Vec<&Candidate> = queue.iter().filter(|q| !self.is_old(q.pid)).collect();
        if contenders.is_empty() {
            return Ok(evicted);
        }
        contenders.sort_by_key(|q| q.task_remaining);

        let mut holders: Vec<&Candidate> = running
            .iter()
            .filter(|p| !p.is_task_completed())
            .collect();
        holders.sort_by_key(|p| p.task_remaining);

        let (mut q, mut c) = (0, 0);
        while q < contenders.len() && c < holders.len() {
            // a free slot spares the shortest holder left
            if free > 0 {
                free -= 1;
                c += 1;
                continue;
            }
            if contenders[q].task_remaining < holders[c].task_remaining {
                evicted.push(holders[c].pid);
                self.old.push(holders[c].pid);
                q += 1;
            }
            c += 1;
        }

        Ok(evicted)
    }
}
