//! Delayed tasks.
//!
//! The browser front end backs [`Scheduler`] with real timers; tests use
//! [`ManualScheduler`] and step a virtual clock.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// A task the scheduler runs once.
pub type Task = Box<dyn FnOnce()>;

/// Trait for timer backends.
pub trait Scheduler {
    /// Run `task` once after `delay`. Dropping the returned handle cancels
    /// the task unless [`TaskHandle::detach`] was called.
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

/// Ownership of a scheduled task.
#[must_use = "dropping a TaskHandle cancels the task"]
pub struct TaskHandle {
    on_cancel: Option<Box<dyn FnOnce()>>,
}

impl TaskHandle {
    /// Handle that calls `on_cancel` when cancelled or dropped.
    pub fn new(on_cancel: impl FnOnce() + 'static) -> Self {
        Self {
            on_cancel: Some(Box::new(on_cancel)),
        }
    }

    pub fn cancel(self) {
        drop(self);
    }

    /// Let the task run regardless of this handle.
    pub fn detach(mut self) {
        self.on_cancel = None;
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.on_cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("attached", &self.on_cancel.is_some())
            .finish()
    }
}

struct Entry {
    id: u64,
    deadline: Duration,
    cancelled: Rc<Cell<bool>>,
    task: Task,
}

#[derive(Default)]
struct Queue {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
}

/// Deterministic scheduler on a virtual clock that only moves on
/// [`advance`](Self::advance).
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<Queue>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since creation.
    pub fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    /// Number of scheduled tasks that have neither run nor been cancelled.
    pub fn pending(&self) -> usize {
        self.queue
            .borrow()
            .entries
            .iter()
            .filter(|e| !e.cancelled.get())
            .count()
    }

    /// Move the clock forward by `by`, running every task that comes due in
    /// deadline order (ties in scheduling order). Tasks scheduled while
    /// advancing run too if they fall inside the window. Returns how many
    /// tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;
        loop {
            // The borrow must end before the task runs: tasks may schedule.
            let next = {
                let mut queue = self.queue.borrow_mut();
                queue.entries.retain(|e| !e.cancelled.get());
                let due = queue
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.deadline <= target)
                    .min_by_key(|(_, e)| (e.deadline, e.id))
                    .map(|(i, _)| i);
                due.map(|i| {
                    let entry = queue.entries.remove(i);
                    queue.now = entry.deadline;
                    entry
                })
            };
            match next {
                Some(entry) => {
                    (entry.task)();
                    ran += 1;
                }
                None => break,
            }
        }
        self.queue.borrow_mut().now = target;
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let cancelled = Rc::new(Cell::new(false));
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        let deadline = queue.now + delay;
        queue.entries.push(Entry {
            id,
            deadline,
            cancelled: cancelled.clone(),
            task,
        });
        TaskHandle::new(move || cancelled.set(true))
    }
}

/// Scheduler adapter that calls `notify` right after each task runs.
///
/// Lets a caller that owns the state a task mutates (a reactive signal, say)
/// learn that the task has fired.
pub struct Notifying<'a, T: ?Sized, F> {
    inner: &'a T,
    notify: F,
}

impl<'a, T: ?Sized, F> Notifying<'a, T, F> {
    pub fn new(inner: &'a T, notify: F) -> Self {
        Self { inner, notify }
    }
}

impl<T, F> Scheduler for Notifying<'_, T, F>
where
    T: Scheduler + ?Sized,
    F: Fn() + Clone + 'static,
{
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let notify = self.notify.clone();
        self.inner.schedule(
            delay,
            Box::new(move || {
                task();
                notify();
            }),
        )
    }
}
