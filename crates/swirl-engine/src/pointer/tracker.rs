use crate::coords::{ScreenPoint, SurfaceMetrics};

use super::buffer::{MAX_POINTERS, PointerBuffer};

/// Accumulates active pointer coordinates into a [`PointerBuffer`].
///
/// The tracker owns the only pointer buffer in the system. Input handling
/// mutates it in place; the frame driver reads it once per frame.
///
/// Coordinate convention: screen points arrive in logical pixels with a
/// top-left origin and are stored in device pixels with a bottom-left origin,
/// matching the GPU viewport:
///
/// - `x = screen_x * dpr`
/// - `y = device_height - screen_y * dpr`
#[derive(Debug, Default, Clone)]
pub struct PointerTracker {
    buffer: PointerBuffer,
    metrics: SurfaceMetrics,
    active: usize,
}

impl PointerTracker {
    pub fn new(metrics: SurfaceMetrics) -> Self {
        Self {
            buffer: PointerBuffer::new(),
            metrics,
            active: 0,
        }
    }

    /// Resets every slot to zero.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.active = 0;
    }

    /// Clears the buffer, then stores up to `max_count` points in order.
    ///
    /// Points past `max_count` (or past [`MAX_POINTERS`]) are dropped.
    pub fn set_from_list(&mut self, points: &[ScreenPoint], max_count: usize) {
        self.clear();

        let limit = max_count.min(MAX_POINTERS);
        for (i, p) in points.iter().take(limit).enumerate() {
            self.buffer.set_pair(i, self.to_device(*p));
            self.active = i + 1;
        }

        if points.len() > limit {
            log::trace!("dropped {} pointers over capacity", points.len() - limit);
        }
    }

    /// Converts a screen point into the stored device-space pair.
    pub fn to_device(&self, p: ScreenPoint) -> [f32; 2] {
        let dpr = self.metrics.scale_factor;
        [p.x * dpr, self.metrics.height as f32 - p.y * dpr]
    }

    pub fn set_metrics(&mut self, metrics: SurfaceMetrics) {
        self.metrics = metrics;
    }

    #[inline]
    pub fn metrics(&self) -> SurfaceMetrics {
        self.metrics
    }

    #[inline]
    pub fn buffer(&self) -> &PointerBuffer {
        &self.buffer
    }

    /// Number of pairs written by the last update.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active
    }
}
