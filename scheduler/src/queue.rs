use std::collections::VecDeque;

use crate::{Pid, Tick, Unavailable};

/// A queued process and the tick it entered the queue.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub pid: Pid,
    pub enqueued_at: Tick,
}

/// Waiting list in front of one resource.
///
/// Entries keep insertion order. Removing one from the middle keeps the
/// relative order of the rest.
#[derive(Debug, Clone)]
pub struct ProcQueue {
    name: String,
    entries: VecDeque<QueueEntry>,
}

impl ProcQueue {
    pub fn new(name: impl Into<String>) -> ProcQueue {
        ProcQueue {
            name: name.into(),
            entries: VecDeque::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn push(&mut self, pid: Pid, now: Tick) {
        self.entries.push_back(QueueEntry {
            pid,
            enqueued_at: now,
        });
    }

    /// Removes the earliest entry.
    pub fn pop(&mut self) -> Result<Pid, Unavailable> {
        self.entries
            .pop_front()
            .map(|entry| entry.pid)
            .ok_or(Unavailable::QueueEmpty)
    }

    /// Removes `pid` wherever it sits in the queue.
    pub fn pick(&mut self, pid: Pid) -> Result<Pid, Unavailable> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.pid == pid)
            .ok_or(Unavailable::NoEligibleProcess)?;
        self.entries.remove(position);
        Ok(pid)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.entries.iter().any(|entry| entry.pid == pid)
    }

    pub fn entries(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    /// PIDs in queue order.
    pub fn pids(&self) -> Vec<Pid> {
        self.entries.iter().map(|entry| entry.pid).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
