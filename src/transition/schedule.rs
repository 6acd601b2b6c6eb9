use std::{cell::RefCell, collections::BTreeSet, rc::Rc, time::Instant};

/// Handle for one pending "call me at the next display refresh" request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequestId(pub u64);

/// Host side of display-refresh scheduling.
///
/// A request fires at most once; an engine that wants another frame requests again from inside
/// its frame callback.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequestId;

    /// Withdraw a request that has not fired yet. Unknown or already-fired ids are ignored.
    fn cancel_frame(&mut self, id: FrameRequestId);
}

/// Something that paints when one of its frame requests fires.
pub trait FrameTarget {
    /// Returns `true` when `id` belonged to this target.
    fn on_frame(&mut self, id: FrameRequestId, now: Instant) -> bool;
}

#[derive(Debug, Default)]
struct RefreshQueue {
    next_id: u64,
    pending: BTreeSet<FrameRequestId>,
    fired: u64,
}

/// Single-threaded refresh driver.
///
/// Clones share one queue, so an engine can own a clone as its [`FrameScheduler`] while the host
/// keeps another to [`RefreshLoop::dispatch`] refresh ticks.
#[derive(Clone, Debug, Default)]
pub struct RefreshLoop {
    queue: Rc<RefCell<RefreshQueue>>,
}

impl RefreshLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests registered and not yet fired or cancelled.
    pub fn active_registrations(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    pub fn has_pending(&self) -> bool {
        self.active_registrations() > 0
    }

    /// Total requests fired so far.
    pub fn fired(&self) -> u64 {
        self.queue.borrow().fired
    }

    /// Fire every request pending at the start of this refresh, offering each to `targets`.
    ///
    /// Requests made while dispatching wait for the next refresh; requests cancelled while
    /// dispatching do not fire. Returns how many fired.
    pub fn dispatch(&self, now: Instant, targets: &mut [&mut dyn FrameTarget]) -> usize {
        let due: Vec<FrameRequestId> = self.queue.borrow().pending.iter().copied().collect();
        let mut fired = 0;
        for id in due {
            {
                let mut q = self.queue.borrow_mut();
                if !q.pending.remove(&id) {
                    continue;
                }
                q.fired += 1;
            }
            fired += 1;
            for target in targets.iter_mut() {
                if target.on_frame(id, now) {
                    break;
                }
            }
        }
        fired
    }
}

impl FrameScheduler for RefreshLoop {
    fn request_frame(&mut self) -> FrameRequestId {
        let mut q = self.queue.borrow_mut();
        q.next_id += 1;
        let id = FrameRequestId(q.next_id);
        q.pending.insert(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        self.queue.borrow_mut().pending.remove(&id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/schedule.rs"]
mod tests;
