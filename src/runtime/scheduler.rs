use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap, VecDeque},
    rc::Rc,
    time::Duration,
};

/// Deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Handle returned by [`Scheduler::set_timeout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Single-threaded deferral primitives of the host event loop.
///
/// Implementations never run a task synchronously from inside one of these calls.
pub trait Scheduler {
    /// Run `task` once `delay` has elapsed.
    fn set_timeout(&self, delay: Duration, task: Task) -> TimerId;

    /// Cancel a pending timer. Unknown or already-fired ids are ignored.
    fn clear_timeout(&self, id: TimerId);

    /// Run `task` once the current unit of synchronous work has completed.
    fn queue_microtask(&self, task: Task);
}

struct PendingTimer {
    id: TimerId,
    task: Task,
}

#[derive(Default)]
struct LoopState {
    now_ms: u64,
    next_id: u64,
    next_seq: u64,
    microtasks: VecDeque<Task>,
    // keyed by (deadline, registration order)
    timers: BTreeMap<(u64, u64), PendingTimer>,
    index: HashMap<TimerId, (u64, u64)>,
}

/// Virtual-time event loop.
///
/// Time only moves when the owner calls [`EventLoop::advance`] or
/// [`EventLoop::run_until_idle`]. Microtasks drain before the first timer and after
/// every timer, mirroring a browser task queue.
#[derive(Clone, Default)]
pub struct EventLoop {
    state: Rc<RefCell<LoopState>>,
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("EventLoop")
            .field("now_ms", &s.now_ms)
            .field("microtasks", &s.microtasks.len())
            .field("timers", &s.timers.len())
            .finish()
    }
}

impl EventLoop {
    /// Loop at virtual time zero with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        Duration::from_millis(self.state.borrow().now_ms)
    }

    /// Number of timers waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Number of queued microtasks.
    pub fn pending_microtasks(&self) -> usize {
        self.state.borrow().microtasks.len()
    }

    /// Whether `id` is still waiting to fire.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.state.borrow().index.contains_key(&id)
    }

    /// Drain the microtask queue, including microtasks queued while draining.
    pub fn run_microtasks(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.state.borrow_mut().microtasks.pop_front();
            let Some(task) = task else {
                break;
            };
            task();
            ran += 1;
        }
        ran
    }

    /// Move time forward by `by`, firing every timer due on the way. Returns how many fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.borrow().now_ms.saturating_add(duration_ms(by));
        self.run_microtasks();
        let mut fired = 0;
        while let Some(task) = self.pop_due(target) {
            task();
            fired += 1;
            self.run_microtasks();
        }
        let mut s = self.state.borrow_mut();
        s.now_ms = s.now_ms.max(target);
        fired
    }

    /// Fire timers until none remain. Returns how many fired.
    pub fn run_until_idle(&self) -> usize {
        self.run_microtasks();
        let mut fired = 0;
        while let Some(task) = self.pop_due(u64::MAX) {
            task();
            fired += 1;
            self.run_microtasks();
        }
        fired
    }

    fn pop_due(&self, until_ms: u64) -> Option<Task> {
        let mut s = self.state.borrow_mut();
        let key = *s.timers.first_key_value()?.0;
        if key.0 > until_ms {
            return None;
        }
        let timer = s.timers.remove(&key)?;
        s.index.remove(&timer.id);
        s.now_ms = s.now_ms.max(key.0);
        tracing::trace!(timer = timer.id.0, at_ms = key.0, "timer fired");
        Some(timer.task)
    }
}

impl Scheduler for EventLoop {
    fn set_timeout(&self, delay: Duration, task: Task) -> TimerId {
        let mut s = self.state.borrow_mut();
        let id = TimerId(s.next_id);
        s.next_id += 1;
        let key = (s.now_ms.saturating_add(duration_ms(delay)), s.next_seq);
        s.next_seq += 1;
        s.timers.insert(key, PendingTimer { id, task });
        s.index.insert(id, key);
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        let mut s = self.state.borrow_mut();
        if let Some(key) = s.index.remove(&id) {
            s.timers.remove(&key);
        }
    }

    fn queue_microtask(&self, task: Task) {
        self.state.borrow_mut().microtasks.push_back(task);
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/scheduler.rs"]
mod tests;
