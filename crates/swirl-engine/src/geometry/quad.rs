use anyhow::{Context, Result};

use crate::gfx::Backend;

/// Floats per vertex (`x`, `y`).
pub const QUAD_COMPONENTS: u32 = 2;

/// Two triangles covering normalized device coordinates `[-1, 1]²`.
#[rustfmt::skip]
pub const FULLSCREEN_QUAD: [f32; 12] = [
    -1.0, -1.0,
     1.0, -1.0,
    -1.0,  1.0,
    -1.0,  1.0,
     1.0, -1.0,
     1.0,  1.0,
];

/// Vertex count of [`FULLSCREEN_QUAD`].
pub const QUAD_VERTEX_COUNT: u32 = FULLSCREEN_QUAD.len() as u32 / QUAD_COMPONENTS;

/// The uploaded full-screen quad. Created once and reused every frame.
pub struct GeometryHandle<Buf> {
    buffer: Buf,
    vertex_count: u32,
}

impl<Buf> GeometryHandle<Buf> {
    /// Uploads [`FULLSCREEN_QUAD`].
    pub fn upload<B>(backend: &mut B) -> Result<Self>
    where
        B: Backend<Buffer = Buf>,
    {
        let buffer = backend
            .create_vertex_buffer(&FULLSCREEN_QUAD)
            .context("failed to upload full-screen quad")?;

        Ok(Self {
            buffer,
            vertex_count: QUAD_VERTEX_COUNT,
        })
    }

    #[inline]
    pub fn buffer(&self) -> &Buf {
        &self.buffer
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn destroy<B>(self, backend: &mut B)
    where
        B: Backend<Buffer = Buf>,
    {
        backend.destroy_buffer(self.buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::recording::{Call, RecordingBackend};

    fn triangle_area(t: &[f32]) -> f32 {
        let (ax, ay, bx, by, cx, cy) = (t[0], t[1], t[2], t[3], t[4], t[5]);
        ((bx - ax) * (cy - ay) - (cx - ax) * (by - ay)).abs() * 0.5
    }

    #[test]
    fn quad_is_six_vertices_in_ndc() {
        assert_eq!(QUAD_VERTEX_COUNT, 6);
        assert!(FULLSCREEN_QUAD.iter().all(|v| *v == -1.0 || *v == 1.0));
    }

    #[test]
    fn quad_covers_the_whole_viewport() {
        // NDC square has area 4; two non-overlapping halves of area 2 each.
        let (a, b) = FULLSCREEN_QUAD.split_at(6);
        assert_eq!(triangle_area(a), 2.0);
        assert_eq!(triangle_area(b), 2.0);
    }

    #[test]
    fn upload_creates_one_buffer() {
        let mut backend = RecordingBackend::default();
        let geometry = GeometryHandle::upload(&mut backend).unwrap();

        assert_eq!(geometry.vertex_count(), 6);
        assert_eq!(backend.calls, [Call::CreateBuffer(12)]);

        geometry.destroy(&mut backend);
        assert_eq!(backend.calls.last(), Some(&Call::DestroyBuffer));
    }

    #[test]
    fn upload_failure_propagates() {
        let mut backend = RecordingBackend {
            fail_create_buffer: true,
            ..Default::default()
        };
        assert!(GeometryHandle::upload(&mut backend).is_err());
    }
}
