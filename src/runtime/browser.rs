use std::{cell::RefCell, collections::HashMap, rc::Rc, time::Duration};

use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::Window;

use crate::{
    foundation::error::{ConfettiError, ConfettiResult},
    runtime::scheduler::{Scheduler, Task, TimerId},
};

#[derive(Default)]
struct Pending {
    next_id: u64,
    handles: HashMap<TimerId, i32>,
}

/// [`Scheduler`] over `window.setTimeout` and `window.queueMicrotask`.
///
/// A cleared timer's callback is never invoked, so its closure stays allocated on the
/// JS side.
#[derive(Clone)]
pub struct DomScheduler {
    window: Window,
    pending: Rc<RefCell<Pending>>,
}

impl DomScheduler {
    /// Scheduler over the global window.
    pub fn new() -> ConfettiResult<Self> {
        let window = web_sys::window().ok_or_else(|| ConfettiError::stage("no global window"))?;
        Ok(Self {
            window,
            pending: Rc::default(),
        })
    }
}

impl Scheduler for DomScheduler {
    fn set_timeout(&self, delay: Duration, task: Task) -> TimerId {
        let id = {
            let mut p = self.pending.borrow_mut();
            let id = TimerId(p.next_id);
            p.next_id += 1;
            id
        };
        let pending = Rc::clone(&self.pending);
        let callback = Closure::once_into_js(move || {
            pending.borrow_mut().handles.remove(&id);
            task();
        });
        let ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), ms)
        {
            Ok(handle) => {
                self.pending.borrow_mut().handles.insert(id, handle);
            }
            Err(err) => tracing::warn!(?err, "setTimeout failed"),
        }
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        let handle = self.pending.borrow_mut().handles.remove(&id);
        if let Some(handle) = handle {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    fn queue_microtask(&self, task: Task) {
        let callback = Closure::once_into_js(move || task());
        self.window.queue_microtask(callback.unchecked_ref());
    }
}
