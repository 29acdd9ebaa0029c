use std::cell::Cell;
use std::rc::Rc;

use crate::gfx::Backend;
use crate::time::{ClockSource, FrameClock, FrameTime};

use super::driver::FrameDriver;

/// Requests that the host call back for another frame.
pub trait FrameScheduler {
    fn schedule_next(&mut self);
}

/// Cancels a [`FrameLoop`]. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    stopped: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

/// Steps a [`FrameDriver`] once per host callback and asks for the next one.
pub struct FrameLoop<C> {
    clock: FrameClock<C>,
    handle: LoopHandle,
    last: Option<FrameTime>,
}

impl<C: ClockSource> FrameLoop<C> {
    pub fn new(source: C) -> Self {
        Self {
            clock: FrameClock::new(source),
            handle: LoopHandle::default(),
            last: None,
        }
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Timing of the most recent drawn frame.
    pub fn last_frame(&self) -> Option<FrameTime> {
        self.last
    }

    /// Draws one frame and schedules the next.
    ///
    /// Returns `false` without touching the driver once the loop is stopped.
    pub fn tick<B, S>(&mut self, driver: &mut FrameDriver<B>, backend: &mut B, scheduler: &mut S) -> bool
    where
        B: Backend,
        S: FrameScheduler + ?Sized,
    {
        if self.handle.is_stopped() {
            return false;
        }

        let ft = self.clock.tick();
        driver.draw(backend, ft.elapsed);
        self.last = Some(ft);

        scheduler.schedule_next();
        true
    }
}
