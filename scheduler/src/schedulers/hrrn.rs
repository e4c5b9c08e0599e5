use crate::{Pid, Unavailable};

use super::Candidate;

/// Takes the process with the smallest `waiting / task total` ratio, using
/// integer division. Ties go to the earliest queued.
///
/// Note the direction: this is the minimum of the plain ratio, not the
/// highest `(waiting + service) / service` of the textbook rule.
pub(super) fn select(queue: &[Candidate]) -> Result<Pid, Unavailable> {
    queue
        .iter()
        .min_by_key(|candidate| response_ratio(candidate))
        .map(|candidate| candidate.pid)
        .ok_or(Unavailable::QueueEmpty)
}

fn response_ratio(candidate: &Candidate) -> usize {
    candidate
        .waiting_ticks
        .checked_div(candidate.task_total)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedulers::tests::queued;

    #[test]
    fn smallest_ratio_wins() {
        // ratios: 10/2 = 5, 4/2 = 2, 9/3 = 3
        let queue = [queued(1, 2, 2, 10), queued(2, 2, 2, 4), queued(3, 3, 3, 9)];
        assert_eq!(select(&queue), Ok(Pid::new(2)));
    }

    #[test]
    fn integer_ratio_ties_go_to_queue_order() {
        // 5/3 and 3/2 both floor to 1
        let queue = [queued(1, 1, 1, 9), queued(2, 3, 3, 5), queued(3, 2, 2, 3)];
        assert_eq!(select(&queue), Ok(Pid::new(2)));
        assert_eq!(select(&[]), Err(Unavailable::QueueEmpty));
    }
}
