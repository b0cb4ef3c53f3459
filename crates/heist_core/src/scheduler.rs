//! Deferred actions
//!
//! A `Scheduler` holds actions that become due after a delay measured in
//! simulated seconds. It is owned by whatever needs delayed behavior (a
//! weapon's burst, a mission's UI hide, a blood splash lifetime) and is
//! advanced explicitly with [`Scheduler::poll`]. Dropping the owner drops
//! its pending actions, and [`Scheduler::cancel_all`] discards them early.

use std::fmt;

/// Handle to a scheduled action
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    #[inline]
    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

struct Task<T> {
    id: TaskId,
    remaining: f32,
    action: T,
}

/// Owned queue of delayed actions
pub struct Scheduler<T> {
    tasks: Vec<Task<T>>,
    next_id: u64,
}

/// Slack under which a task counts as due, absorbing float drift in accumulated deltas
const DUE_EPSILON: f32 = 1e-6;

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `action` to become due after `delay` seconds
    pub fn schedule(&mut self, delay: f32, action: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            remaining: delay.max(0.0),
            action,
        });
        id
    }

    /// Schedule actions at `start_delay`, `start_delay + interval`, ...
    pub fn schedule_sequence<I>(&mut self, start_delay: f32, interval: f32, actions: I) -> Vec<TaskId>
    where
        I: IntoIterator<Item = T>,
    {
        actions
            .into_iter()
            .enumerate()
            .map(|(i, action)| self.schedule(start_delay + interval * i as f32, action))
            .collect()
    }

    /// Cancel one task. Returns false if it already ran or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    /// Discard all pending actions
    pub fn cancel_all(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        count
    }

    /// Discard pending actions matching `predicate`
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !predicate(&task.action));
        before - self.tasks.len()
    }

    /// Advance time by `dt` and return every action that became due.
    ///
    /// Due actions come back ordered by due time, ties broken by the order
    /// they were scheduled in.
    pub fn poll(&mut self, dt: f32) -> Vec<T> {
        for task in &mut self.tasks {
            task.remaining -= dt;
        }

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.tasks.len() {
            if self.tasks[i].remaining <= DUE_EPSILON {
                due.push(self.tasks.remove(i));
            } else {
                i += 1;
            }
        }

        due.sort_by(|a, b| {
            a.remaining
                .partial_cmp(&b.remaining)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });
        due.into_iter().map(|task| task.action).collect()
    }

    /// Seconds until `id` becomes due
    pub fn remaining(&self, id: TaskId) -> Option<f32> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .map(|task| task.remaining.max(0.0))
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterate pending actions in scheduling order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.tasks.iter().map(|task| &task.action)
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Scheduler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.tasks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_returns_due_actions() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.5, "a");
        scheduler.schedule(1.0, "b");

        assert!(scheduler.poll(0.25).is_empty());
        assert_eq!(scheduler.poll(0.25), vec!["a"]);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.poll(0.5), vec!["b"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_due_order_follows_due_time() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.3, 3);
        scheduler.schedule(0.1, 1);
        scheduler.schedule(0.2, 2);
        scheduler.schedule(0.1, 4);

        assert_eq!(scheduler.poll(1.0), vec![1, 4, 2, 3]);
    }

    #[test]
    fn test_sequence_with_accumulated_steps() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_sequence(0.1, 0.1, [1, 2]);

        let mut fired = Vec::new();
        for _ in 0..5 {
            fired.extend(scheduler.poll(0.02));
        }
        assert_eq!(fired, vec![1]);
        for _ in 0..5 {
            fired.extend(scheduler.poll(0.02));
        }
        assert_eq!(fired, vec![1, 2]);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule(1.0, "a");
        scheduler.schedule(1.0, "b");

        assert!(scheduler.cancel(a));
        assert!(!scheduler.cancel(a));
        assert_eq!(scheduler.poll(1.0), vec!["b"]);
    }

    #[test]
    fn test_cancel_all_and_where() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1.0, 1);
        scheduler.schedule(1.0, 2);
        scheduler.schedule(1.0, 3);

        assert_eq!(scheduler.cancel_where(|n| *n % 2 == 1), 2);
        assert_eq!(scheduler.cancel_all(), 1);
        assert!(scheduler.poll(2.0).is_empty());
    }
}
