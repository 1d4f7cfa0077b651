//! `setTimeout`-backed timer scheduler.

use std::fmt;
#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, collections::HashMap, rc::Rc};

use draft_host::{TimerHandle, TimerScheduler, TimerTask};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

#[cfg(target_arch = "wasm32")]
type PendingTimers = Rc<RefCell<HashMap<i32, Closure<dyn FnMut()>>>>;

/// Browser scheduler backed by `window.setTimeout` / `window.clearTimeout`.
///
/// Each scheduled callback is owned here until it fires or is cancelled, so cancelled timers
/// release their task. Clones share the same set of pending timers.
#[derive(Clone, Default)]
pub struct WebTimerScheduler {
    #[cfg(target_arch = "wasm32")]
    pending: PendingTimers,
}

impl WebTimerScheduler {
    /// Number of timers scheduled and not yet fired or cancelled.
    pub fn pending_count(&self) -> usize {
        #[cfg(target_arch = "wasm32")]
        {
            self.pending.borrow().len()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            0
        }
    }
}

impl fmt::Debug for WebTimerScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebTimerScheduler")
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl TimerScheduler for WebTimerScheduler {
    fn schedule(&self, delay_ms: u32, task: TimerTask) -> TimerHandle {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = web_sys::window() else {
                // No event loop to defer to; write through immediately.
                task();
                return TimerHandle(0);
            };
            let task = Rc::new(RefCell::new(Some(task)));
            let timer_id = Rc::new(std::cell::Cell::new(None::<i32>));
            let callback = {
                let pending = self.pending.clone();
                let task = task.clone();
                let timer_id = timer_id.clone();
                Closure::<dyn FnMut()>::wrap(Box::new(move || {
                    if let Some(id) = timer_id.get() {
                        // wasm-bindgen defers freeing a closure dropped during its own call.
                        drop(pending.borrow_mut().remove(&id));
                    }
                    let next = task.borrow_mut().take();
                    if let Some(next) = next {
                        next();
                    }
                }))
            };
            let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
            match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay,
            ) {
                Ok(id) => {
                    timer_id.set(Some(id));
                    self.pending.borrow_mut().insert(id, callback);
                    TimerHandle(u64::from(id.unsigned_abs()))
                }
                Err(_) => {
                    drop(callback);
                    let next = task.borrow_mut().take();
                    if let Some(next) = next {
                        next();
                    }
                    TimerHandle(0)
                }
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = delay_ms;
            task();
            TimerHandle(0)
        }
    }

    fn cancel(&self, handle: TimerHandle) {
        #[cfg(target_arch = "wasm32")]
        {
            let Ok(id) = i32::try_from(handle.0) else {
                return;
            };
            if self.pending.borrow_mut().remove(&id).is_none() {
                return;
            }
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(id);
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = handle;
        }
    }
}
