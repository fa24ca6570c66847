//! Deferred work queue.
//!
//! Some measurements (text boxes in particular) are only correct after the
//! host has laid out freshly inserted content. The queue holds the work items
//! until the host drains it on its next tick; nothing here owns a timer or an
//! executor.

use std::collections::VecDeque;

/// FIFO of work deferred until the host's next tick.
#[derive(Debug, Clone, Default)]
pub struct DeferredQueue<T> {
    jobs: VecDeque<T>,
}

impl<T> DeferredQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            jobs: VecDeque::new(),
        }
    }

    /// Schedules a job for the next drain.
    pub fn defer(&mut self, job: T) {
        self.jobs.push_back(job);
    }

    /// Takes every pending job, oldest first.
    pub fn drain(&mut self) -> Vec<T> {
        self.jobs.drain(..).collect()
    }

    /// Whether any work is pending.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Number of pending jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut queue = DeferredQueue::new();
        queue.defer(1);
        queue.defer(2);
        queue.defer(3);
        assert_eq!(queue.drain(), vec![1, 2, 3]);
        assert!(queue.is_empty());
    }
}
