//! Cancellable one-shot tasks on a monotonic timeline.
//!
//! The game loop is single threaded: handlers run to completion and the
//! runtime polls [`TimerQueue::take_due`] on every tick. Recurring work (the
//! per-frame readout) re-arms itself from its own handler. Each consumer keeps
//! its pending handle in a [`TaskSlot`], which cancels the old handle before
//! arming a new one, so a slot never has more than one task in flight.

use crate::clock::Timestamp;

/// Work the game can defer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Redraw the live readout while the stopwatch runs
    Frame,
    /// Auto-hide the celebration banner
    HideCelebration,
    /// End the post-stop readout pulse
    ReleasePulse,
}

/// Identifies a scheduled task. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

pub trait Scheduler {
    fn schedule(&mut self, at: Timestamp, task: Task) -> TaskHandle;
    /// Cancel a pending task. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: TaskHandle);
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    handle: TaskHandle,
    at: Timestamp,
    task: Task,
}

/// In-memory deadline queue
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    pending: Vec<Pending>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every task due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: Timestamp) -> Vec<(TaskHandle, Task)> {
        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.at <= now {
                due.push(*p);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|p| (p.at, p.handle));
        due.into_iter().map(|p| (p.handle, p.task)).collect()
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, at: Timestamp, task: Task) -> TaskHandle {
        self.next_id += 1;
        let handle = TaskHandle(self.next_id);
        self.pending.push(Pending { handle, at, task });
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.pending.retain(|p| p.handle != handle);
    }
}

/// Holds at most one pending task of a given kind
#[derive(Debug, Default)]
pub struct TaskSlot {
    current: Option<TaskHandle>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever is pending, then schedule `task` at `at`.
    pub fn replace<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S, at: Timestamp, task: Task) {
        self.clear(scheduler);
        self.current = Some(scheduler.schedule(at, task));
    }

    pub fn clear<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.current.take() {
            scheduler.cancel(handle);
        }
    }

    /// Claim a fired handle. Returns false for anything this slot no longer
    /// owns, which makes stale fires no-ops.
    pub fn claim(&mut self, handle: TaskHandle) -> bool {
        if self.current == Some(handle) {
            self.current = None;
            true
        } else {
            false
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(ms: u64) -> Timestamp {
        Timestamp::from_duration(Duration::from_millis(ms))
    }

    #[test]
    fn due_tasks_fire_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(at(30), Task::ReleasePulse);
        q.schedule(at(10), Task::Frame);
        q.schedule(at(50), Task::HideCelebration);

        let due: Vec<Task> = q.take_due(at(40)).into_iter().map(|(_, t)| t).collect();
        assert_eq!(due, vec![Task::Frame, Task::ReleasePulse]);
        assert_eq!(q.len(), 1);
        assert!(q.take_due(at(40)).is_empty());
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut q = TimerQueue::new();
        let h = q.schedule(at(10), Task::Frame);
        q.cancel(h);
        assert!(q.take_due(at(100)).is_empty());
        q.cancel(h);
    }

    #[test]
    fn slot_replaces_instead_of_accumulating() {
        let mut q = TimerQueue::new();
        let mut slot = TaskSlot::new();
        for i in 0..10 {
            slot.replace(&mut q, at(1_600 + i), Task::HideCelebration);
        }
        assert_eq!(q.len(), 1);
        let due = q.take_due(at(10_000));
        assert_eq!(due.len(), 1);
        assert!(slot.claim(due[0].0));
        assert!(slot.current.is_none());
    }

    #[test]
    fn slot_rejects_stale_handles() {
        let mut q = TimerQueue::new();
        let mut slot = TaskSlot::new();
        slot.replace(&mut q, at(16), Task::Frame);
        let stale = slot.current.unwrap();
        slot.replace(&mut q, at(32), Task::Frame);
        assert!(!slot.claim(stale));
        assert!(slot.current.is_some());
        assert!(q.pending.iter().all(|p| p.handle != stale));
    }

    #[test]
    fn clear_cancels_pending() {
        let mut q = TimerQueue::new();
        let mut slot = TaskSlot::new();
        slot.replace(&mut q, at(16), Task::Frame);
        slot.clear(&mut q);
        assert!(q.is_empty());
        assert!(slot.current.is_none());
    }
}
