/// Pointer position in logical pixels.
///
/// Origin is the top-left corner of the window, +X right, +Y down. This is the
/// space native pointer and touch events arrive in.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for ScreenPoint {
    #[inline]
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}
