//! Timer scheduling contracts used by debounced persistence.

use std::{cell::RefCell, fmt, rc::Rc};

/// One-shot callback run when a timer fires.
pub type TimerTask = Box<dyn FnOnce()>;

/// Opaque identifier for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Host service that runs one-shot tasks after a delay on the current thread.
pub trait TimerScheduler {
    /// Schedules `task` to run once after `delay_ms` milliseconds.
    fn schedule(&self, delay_ms: u32, task: TimerTask) -> TimerHandle;

    /// Cancels a pending timer. Cancelling a fired or unknown handle is a no-op.
    fn cancel(&self, handle: TimerHandle);
}

impl<S: TimerScheduler + ?Sized> TimerScheduler for Rc<S> {
    fn schedule(&self, delay_ms: u32, task: TimerTask) -> TimerHandle {
        (**self).schedule(delay_ms, task)
    }

    fn cancel(&self, handle: TimerHandle) {
        (**self).cancel(handle);
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Scheduler that drops every task. Used where timers are unavailable.
pub struct NoopScheduler;

impl TimerScheduler for NoopScheduler {
    fn schedule(&self, _delay_ms: u32, _task: TimerTask) -> TimerHandle {
        TimerHandle(0)
    }

    fn cancel(&self, _handle: TimerHandle) {}
}

struct PendingTimer {
    deadline_ms: u64,
    handle: TimerHandle,
    task: TimerTask,
}

#[derive(Default)]
struct ManualClock {
    now_ms: u64,
    next_handle: u64,
    pending: Vec<PendingTimer>,
}

#[derive(Clone, Default)]
/// Virtual-clock scheduler for tests and headless hosts.
///
/// Time only moves through [`ManualScheduler::advance`]; due tasks run in deadline order (ties
/// in scheduling order), each with the clock set to its own deadline.
pub struct ManualScheduler {
    clock: Rc<RefCell<ManualClock>>,
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clock = self.clock.borrow();
        f.debug_struct("ManualScheduler")
            .field("now_ms", &clock.now_ms)
            .field("pending", &clock.pending.len())
            .finish()
    }
}

impl ManualScheduler {
    /// Returns the current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.clock.borrow().now_ms
    }

    /// Returns how many timers are waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.clock.borrow().pending.len()
    }

    /// Moves the clock forward by `ms`, running every task that becomes due.
    ///
    /// Tasks may schedule further timers; those run too if they fall inside the window.
    pub fn advance(&self, ms: u64) {
        let target = self.now_ms().saturating_add(ms);
        loop {
            let due = {
                let mut clock = self.clock.borrow_mut();
                let next = clock
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.deadline_ms <= target)
                    .min_by_key(|(_, timer)| (timer.deadline_ms, timer.handle))
                    .map(|(index, _)| index);
                next.map(|index| {
                    let timer = clock.pending.remove(index);
                    clock.now_ms = timer.deadline_ms;
                    timer.task
                })
            };
            match due {
                Some(task) => task(),
                None => break,
            }
        }
        self.clock.borrow_mut().now_ms = target;
    }

    /// Runs every pending task regardless of deadline.
    pub fn run_all(&self) {
        let latest = self
            .clock
            .borrow()
            .pending
            .iter()
            .map(|timer| timer.deadline_ms)
            .max();
        if let Some(latest) = latest {
            self.advance(latest.saturating_sub(self.now_ms()));
        }
    }
}

impl TimerScheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: TimerTask) -> TimerHandle {
        let mut clock = self.clock.borrow_mut();
        clock.next_handle += 1;
        let handle = TimerHandle(clock.next_handle);
        let deadline_ms = clock.now_ms.saturating_add(u64::from(delay_ms));
        clock.pending.push(PendingTimer {
            deadline_ms,
            handle,
            task,
        });
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        self.clock
            .borrow_mut()
            .pending
            .retain(|timer| timer.handle != handle);
    }
}
