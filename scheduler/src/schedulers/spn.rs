use crate::{Pid, Unavailable};

use super::Candidate;

/// Takes the process with the shortest current task. Ties go to the
/// earliest queued.
pub(super) fn select(queue: &[Candidate]) -> Result<Pid, Unavailable> {
    queue
        .iter()
        .min_by_key(|candidate| candidate.task_total)
        .map(|candidate| candidate.pid)
        .ok_or(Unavailable::QueueEmpty)
}
