use std::time::Duration;

use super::ClockSource;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time since the clock source's origin. Never decreases.
    pub elapsed: Duration,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Elapsed time in seconds, the unit of the `time` uniform.
    #[inline]
    pub fn seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

/// Produces `FrameTime` snapshots from a [`ClockSource`].
///
/// The source is trusted for the value but not for ordering: a reading older
/// than the previous one is clamped so elapsed time stays monotonic.
#[derive(Debug, Clone)]
pub struct FrameClock<C> {
    source: C,
    last: Duration,
    frame_index: u64,
}

impl<C: ClockSource> FrameClock<C> {
    pub fn new(source: C) -> Self {
        Self {
            source,
            last: Duration::ZERO,
            frame_index: 0,
        }
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = self.source.now();
        if now < self.last {
            log::trace!("clock went backwards by {:?}; holding", self.last - now);
        }
        self.last = self.last.max(now);

        let ft = FrameTime {
            elapsed: self.last,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}
