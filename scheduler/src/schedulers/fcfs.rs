use crate::{Pid, SimulationError, Unavailable};

use super::{Candidate, Evict};

/// Takes the head of the queue.
pub(super) fn select(queue: &[Candidate]) -> Result<Pid, Unavailable> {
    queue
        .first()
        .map(|candidate| candidate.pid)
        .ok_or(Unavailable::QueueEmpty)
}

/// Lets every process keep its resource until its task completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonPreemptive;

impl NonPreemptive {
    pub fn new() -> Self {
        NonPreemptive
    }
}

impl Evict for NonPreemptive {
    fn choose_to_evict(
        &mut self,
        running: &[Candidate],
        _queue: &[Candidate],
        _capacity: usize,
    ) -> Result<Vec<Pid>, SimulationError> {
        Ok(running
            .iter()
            .filter(|process| process.is_task_completed())
            .map(|process| process.pid)
            .collect())
    }
}
