//! Self-rescheduling animation loop.
//!
//! The loop is either `Running` or `Cancelled`; there is no paused state.
//! Pausing a diagram means turning auto-rotate off while frames keep coming.
//!
//! Frames are requested from a [`FrameScheduler`]. In the browser that is
//! `requestAnimationFrame`; headless code and tests use [`ManualScheduler`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// One-shot callback run when a requested frame fires.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Identifier of a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u32);

/// Source of animation frames.
pub trait FrameScheduler {
    /// Run `callback` once on the next frame. `None` when the request was
    /// refused; the callback is dropped without running.
    fn request(&self, callback: FrameCallback) -> Option<FrameHandle>;

    /// Drop a pending request. Unknown or already-fired handles are ignored.
    fn cancel(&self, handle: FrameHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    /// Terminal. Also reached when the scheduler refuses a frame.
    Cancelled,
}

struct LoopState {
    state: DriverState,
    pending: Option<FrameHandle>,
}

/// Handle that stops an animation loop started by [`start_animation`].
///
/// Clones share the same loop.
#[derive(Clone)]
pub struct CancelToken {
    inner: Rc<RefCell<LoopState>>,
    cancel_pending: Rc<dyn Fn(FrameHandle)>,
}

impl CancelToken {
    /// Stop the loop. Safe to call any number of times, including from
    /// inside the frame callback.
    pub fn cancel(&self) {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            if inner.state == DriverState::Cancelled {
                return;
            }
            inner.state = DriverState::Cancelled;
            inner.pending.take()
        };
        if let Some(handle) = pending {
            (self.cancel_pending)(handle);
        }
        log::debug!("animation loop cancelled");
    }

    pub fn state(&self) -> DriverState {
        self.inner.borrow().state
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == DriverState::Cancelled
    }
}

/// Start a loop that calls `on_frame` once per frame until cancelled.
pub fn start_animation<S, F>(scheduler: Rc<S>, on_frame: F) -> CancelToken
where
    S: FrameScheduler + 'static,
    F: FnMut() + 'static,
{
    let inner = Rc::new(RefCell::new(LoopState {
        state: DriverState::Running,
        pending: None,
    }));
    let on_frame: Rc<RefCell<dyn FnMut()>> = Rc::new(RefCell::new(on_frame));
    schedule_next(&scheduler, &inner, &on_frame);

    let canceller = Rc::clone(&scheduler);
    CancelToken {
        inner,
        cancel_pending: Rc::new(move |handle| canceller.cancel(handle)),
    }
}

fn schedule_next<S: FrameScheduler + 'static>(
    scheduler: &Rc<S>,
    inner: &Rc<RefCell<LoopState>>,
    on_frame: &Rc<RefCell<dyn FnMut()>>,
) {
    let next_scheduler = Rc::clone(scheduler);
    let next_inner = Rc::clone(inner);
    let next_frame = Rc::clone(on_frame);

    let handle = scheduler.request(Box::new(move || {
        if next_inner.borrow().state == DriverState::Cancelled {
            return;
        }
        next_inner.borrow_mut().pending = None;

        {
            let mut frame = next_frame.borrow_mut();
            (*frame)();
        }

        // on_frame may have cancelled the loop
        if next_inner.borrow().state == DriverState::Running {
            schedule_next(&next_scheduler, &next_inner, &next_frame);
        }
    }));

    let mut inner = inner.borrow_mut();
    match handle {
        Some(handle) => inner.pending = Some(handle),
        None => {
            log::warn!("animation loop stopped: frame request refused");
            inner.state = DriverState::Cancelled;
            inner.pending = None;
        }
    }
}

/// Scheduler driven by hand: each [`ManualScheduler::run_frame`] fires the
/// callbacks requested since the previous call.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<Vec<(FrameHandle, FrameCallback)>>,
    next_id: Cell<u32>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every pending callback. Returns how many ran.
    ///
    /// Requests made while firing are queued for the next call.
    pub fn run_frame(&self) -> usize {
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback();
        }
        count
    }

    /// Number of requests waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request(&self, callback: FrameCallback) -> Option<FrameHandle> {
        let id = self.next_id.get().wrapping_add(1);
        self.next_id.set(id);
        let handle = FrameHandle(id);
        self.queue.borrow_mut().push((handle, callback));
        Some(handle)
    }

    fn cancel(&self, handle: FrameHandle) {
        self.queue.borrow_mut().retain(|(h, _)| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_loop(scheduler: &Rc<ManualScheduler>) -> (CancelToken, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let token = start_animation(Rc::clone(scheduler), move || counter.set(counter.get() + 1));
        (token, count)
    }

    #[test]
    fn loop_reschedules_every_frame() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (token, count) = counting_loop(&scheduler);

        assert_eq!(count.get(), 0);
        for expected in 1..=5 {
            assert_eq!(scheduler.run_frame(), 1);
            assert_eq!(count.get(), expected);
        }
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(token.state(), DriverState::Running);
    }

    #[test]
    fn cancel_stops_further_frames() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (token, count) = counting_loop(&scheduler);

        scheduler.run_frame();
        scheduler.run_frame();
        token.cancel();
        assert!(token.is_cancelled());
        assert_eq!(scheduler.pending(), 0);

        for _ in 0..10 {
            scheduler.run_frame();
        }
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn cancel_is_idempotent_and_shared_by_clones() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (token, count) = counting_loop(&scheduler);
        let other = token.clone();

        other.cancel();
        token.cancel();
        other.cancel();
        scheduler.run_frame();

        assert_eq!(count.get(), 0);
        assert_eq!(token.state(), DriverState::Cancelled);
    }

    #[test]
    fn cancel_from_inside_frame() {
        let scheduler = Rc::new(ManualScheduler::new());
        let slot: Rc<RefCell<Option<CancelToken>>> = Rc::new(RefCell::new(None));
        let count = Rc::new(Cell::new(0));

        let frame_slot = Rc::clone(&slot);
        let frame_count = Rc::clone(&count);
        let token = start_animation(Rc::clone(&scheduler), move || {
            frame_count.set(frame_count.get() + 1);
            if frame_count.get() == 3 {
                if let Some(token) = frame_slot.borrow().as_ref() {
                    token.cancel();
                }
            }
        });
        *slot.borrow_mut() = Some(token);

        for _ in 0..8 {
            scheduler.run_frame();
        }
        assert_eq!(count.get(), 3);
        assert_eq!(scheduler.pending(), 0);
    }

    /// Grants `budget` requests, then refuses.
    struct LimitedScheduler {
        frames: ManualScheduler,
        budget: Cell<u32>,
    }

    impl FrameScheduler for LimitedScheduler {
        fn request(&self, callback: FrameCallback) -> Option<FrameHandle> {
            let left = self.budget.get();
            if left == 0 {
                return None;
            }
            self.budget.set(left - 1);
            self.frames.request(callback)
        }

        fn cancel(&self, handle: FrameHandle) {
            self.frames.cancel(handle);
        }
    }

    #[test]
    fn refused_request_cancels_the_loop() {
        let scheduler = Rc::new(LimitedScheduler {
            frames: ManualScheduler::new(),
            budget: Cell::new(0),
        });
        let token = start_animation(Rc::clone(&scheduler), || {});
        assert!(token.is_cancelled());
        assert_eq!(scheduler.frames.pending(), 0);
        token.cancel();
    }

    #[test]
    fn loop_ends_when_scheduler_stops_granting_frames() {
        let scheduler = Rc::new(LimitedScheduler {
            frames: ManualScheduler::new(),
            budget: Cell::new(3),
        });
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let token = start_animation(Rc::clone(&scheduler), move || counter.set(counter.get() + 1));

        for _ in 0..6 {
            scheduler.frames.run_frame();
        }
        assert_eq!(count.get(), 3);
        assert_eq!(token.state(), DriverState::Cancelled);
    }

    #[test]
    fn independent_loops_do_not_interfere() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (first, first_count) = counting_loop(&scheduler);
        let (_second, second_count) = counting_loop(&scheduler);

        scheduler.run_frame();
        first.cancel();
        scheduler.run_frame();
        scheduler.run_frame();

        assert_eq!(first_count.get(), 1);
        assert_eq!(second_count.get(), 3);
    }
}
