//! Trailing-edge debouncer.
//!
//! Each [`Debouncer::call`] cancels the pending timer and reschedules it, so only the arguments of
//! the last call in a burst ever reach the action. Nothing is queued. Every debouncer owns its
//! own timer.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use draft_host::{TimerHandle, TimerScheduler};

struct DebounceState<A> {
    generation: u64,
    pending: Option<A>,
    handle: Option<TimerHandle>,
}

struct DebounceInner<A> {
    action: Box<dyn Fn(A)>,
    wait_ms: u32,
    scheduler: Rc<dyn TimerScheduler>,
    state: RefCell<DebounceState<A>>,
}

impl<A> DebounceInner<A> {
    fn fire(&self, generation: u64) {
        let args = {
            let mut state = self.state.borrow_mut();
            if state.generation != generation {
                return;
            }
            state.handle = None;
            state.pending.take()
        };
        if let Some(args) = args {
            (self.action)(args);
        }
    }

    /// Detaches pending arguments and the timer, invalidating any in-flight fire.
    fn take_pending(&self) -> Option<A> {
        let (args, handle) = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            (state.pending.take(), state.handle.take())
        };
        if let Some(handle) = handle {
            self.scheduler.cancel(handle);
        }
        args
    }
}

/// Debounced wrapper around an action taking `A`.
///
/// Dropping the debouncer drops any pending call; owners that must not lose the final burst call
/// [`Debouncer::flush`] first.
pub struct Debouncer<A: 'static> {
    inner: Rc<DebounceInner<A>>,
}

impl<A: 'static> fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("wait_ms", &self.inner.wait_ms)
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Wraps `action` so bursts of calls collapse into one call `wait_ms` after the last one.
pub fn debounce<A: 'static>(
    scheduler: Rc<dyn TimerScheduler>,
    wait_ms: u32,
    action: impl Fn(A) + 'static,
) -> Debouncer<A> {
    Debouncer::new(scheduler, wait_ms, action)
}

impl<A: 'static> Debouncer<A> {
    /// Creates a debouncer; see [`debounce`].
    pub fn new(
        scheduler: Rc<dyn TimerScheduler>,
        wait_ms: u32,
        action: impl Fn(A) + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(DebounceInner {
                action: Box::new(action),
                wait_ms,
                scheduler,
                state: RefCell::new(DebounceState {
                    generation: 0,
                    pending: None,
                    handle: None,
                }),
            }),
        }
    }

    /// Returns the quiet period in milliseconds.
    pub fn wait_ms(&self) -> u32 {
        self.inner.wait_ms
    }

    /// Records `args` as the latest call and (re)starts the quiet period.
    pub fn call(&self, args: A) {
        let (generation, previous) = {
            let mut state = self.inner.state.borrow_mut();
            state.generation += 1;
            state.pending = Some(args);
            (state.generation, state.handle.take())
        };
        if let Some(previous) = previous {
            self.inner.scheduler.cancel(previous);
        }

        let weak: Weak<DebounceInner<A>> = Rc::downgrade(&self.inner);
        let handle = self.inner.scheduler.schedule(
            self.inner.wait_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.fire(generation);
                }
            }),
        );

        // Schedulers without an event loop may have run the task already.
        let mut state = self.inner.state.borrow_mut();
        if state.generation == generation && state.pending.is_some() {
            state.handle = Some(handle);
        }
    }

    /// Runs the pending call now, synchronously. Returns whether there was one.
    pub fn flush(&self) -> bool {
        match self.inner.take_pending() {
            Some(args) => {
                (self.inner.action)(args);
                true
            }
            None => false,
        }
    }

    /// Drops the pending call without running it. Returns whether there was one.
    pub fn cancel(&self) -> bool {
        self.inner.take_pending().is_some()
    }

    /// Returns whether a call is waiting for its quiet period to elapse.
    pub fn is_pending(&self) -> bool {
        self.inner.state.borrow().pending.is_some()
    }
}
