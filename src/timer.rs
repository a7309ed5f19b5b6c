//! Single-shot timers driven by the UI loop.
//!
//! Nothing here sleeps: entries carry a deadline and the owner asks for the
//! ones that are due whenever the loop wakes up. Entries with equal deadlines
//! fire in scheduling order.

use std::time::{Duration, Instant};

#[derive(Debug)]
struct TimerEntry<T> {
    deadline: Instant,
    seq: u64,
    task: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: Vec<TimerEntry<T>>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, task: T) {
        let deadline = now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;
        let pos = self
            .entries
            .iter()
            .position(|e| (e.deadline, e.seq) > (deadline, seq))
            .unwrap_or(self.entries.len());
        self.entries.insert(
            pos,
            TimerEntry {
                deadline,
                seq,
                task,
            },
        );
    }

    /// Remove and return every task whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let split = self
            .entries
            .iter()
            .position(|e| e.deadline > now)
            .unwrap_or(self.entries.len());
        self.entries.drain(..split).map(|e| e.task).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.first().map(|e| e.deadline)
    }

    /// Time left until the earliest entry, zero when one is already due.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: PartialEq> TimerQueue<T> {
    pub fn is_pending(&self, task: &T) -> bool {
        self.entries.iter().any(|e| &e.task == task)
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_tasks_come_out_in_deadline_order() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        q.schedule(t0, Duration::from_millis(50), "late");
        q.schedule(t0, Duration::ZERO, "now");
        q.schedule(t0, Duration::ZERO, "now-2");
        assert_eq!(q.take_due(t0), vec!["now", "now-2"]);
        assert!(q.take_due(t0 + Duration::from_millis(49)).is_empty());
        assert_eq!(q.take_due(t0 + Duration::from_millis(50)), vec!["late"]);
        assert!(q.is_empty());
    }

    #[test]
    fn time_until_next_saturates() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        assert_eq!(q.time_until_next(t0), None);
        q.schedule(t0, Duration::from_millis(10), 1);
        assert_eq!(q.time_until_next(t0), Some(Duration::from_millis(10)));
        assert_eq!(
            q.time_until_next(t0 + Duration::from_secs(1)),
            Some(Duration::ZERO)
        );
        assert!(q.is_pending(&1));
    }
}
