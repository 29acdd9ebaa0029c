/// Drawable surface size in device pixels plus the device pixel ratio.
///
/// The drawable is `logical size × scale_factor`, truncated to whole pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceMetrics {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f32,
}

impl SurfaceMetrics {
    /// Builds metrics from a logical (CSS-style) size and a device pixel ratio.
    pub fn from_logical(width: f32, height: f32, scale_factor: f32) -> Self {
        let scale_factor = sanitize_scale(scale_factor);
        Self {
            width: (width.max(0.0) * scale_factor).floor() as u32,
            height: (height.max(0.0) * scale_factor).floor() as u32,
            scale_factor,
        }
    }

    /// Builds metrics from a size already expressed in device pixels.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width,
            height,
            scale_factor: sanitize_scale(scale_factor as f32),
        }
    }

    /// Returns `(width, height)` as floats, the layout of the `resolution` uniform.
    #[inline]
    pub fn resolution(self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for SurfaceMetrics {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            scale_factor: 1.0,
        }
    }
}

fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 { scale } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_logical_scales_and_truncates() {
        let m = SurfaceMetrics::from_logical(640.5, 800.0, 2.0);
        assert_eq!(m.width, 1281);
        assert_eq!(m.height, 1600);
        assert_eq!(m.scale_factor, 2.0);

        let m = SurfaceMetrics::from_logical(100.0, 100.0, 1.5);
        assert_eq!((m.width, m.height), (150, 150));

        let m = SurfaceMetrics::from_logical(101.0, 33.0, 1.25);
        assert_eq!((m.width, m.height), (126, 41)); // 126.25, 41.25
    }

    #[test]
    fn invalid_scale_falls_back_to_one() {
        assert_eq!(SurfaceMetrics::from_logical(10.0, 10.0, 0.0).scale_factor, 1.0);
        assert_eq!(SurfaceMetrics::from_logical(10.0, 10.0, f32::NAN).scale_factor, 1.0);
        assert_eq!(SurfaceMetrics::from_physical(10, 10, -2.0).scale_factor, 1.0);
    }

    #[test]
    fn resolution_is_device_pixels() {
        let m = SurfaceMetrics::from_physical(1920, 1080, 1.0);
        assert_eq!(m.resolution(), [1920.0, 1080.0]);
        assert!(!m.is_empty());
        assert!(SurfaceMetrics::default().is_empty());
    }
}
