use crate::coords::{ScreenPoint, SurfaceMetrics};

/// Kind of primary pointing device, as a `(pointer: coarse)` media query would
/// report it.
///
/// Mouse events are honoured only on `Fine` devices.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum PointerPrecision {
    #[default]
    Fine,
    Coarse,
}

/// Platform-agnostic input events consumed by the [`InputAdapter`].
///
/// Touch events carry the full set of touches still on the surface, in the
/// order they went down. Coordinates are logical pixels, top-left origin.
///
/// [`InputAdapter`]: super::InputAdapter
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    TouchStart(Vec<ScreenPoint>),
    TouchMove(Vec<ScreenPoint>),
    /// A touch lifted or was cancelled.
    TouchEnd,

    MouseDown,
    MouseMove(ScreenPoint),
    MouseUp,

    /// Drawable size or pixel ratio changed.
    Resize(SurfaceMetrics),
}
