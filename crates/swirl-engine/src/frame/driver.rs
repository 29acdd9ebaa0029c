use std::time::Duration;

use anyhow::Result;

use crate::coords::SurfaceMetrics;
use crate::geometry::{GeometryHandle, QUAD_COMPONENTS};
use crate::gfx::{Backend, Color};
use crate::pointer::PointerTracker;
use crate::program::{ProgramHandle, ShaderSources, build_program};

/// GPU resources acquired at startup and held for the driver's lifetime.
struct Scene<B: Backend> {
    program: ProgramHandle<B::Program>,
    geometry: GeometryHandle<B::Buffer>,
}

enum DriverState<B: Backend> {
    Uninitialized,
    Running(Scene<B>),
}

/// Owns the render context and draws one frame per call.
///
/// State machine: `Uninitialized → Running`, entered once by [`start`].
/// There is no terminal state short of [`shutdown`], which consumes the driver.
///
/// The pointer tracker lives here; input handling borrows it through
/// [`pointers_mut`].
///
/// [`start`]: FrameDriver::start
/// [`shutdown`]: FrameDriver::shutdown
/// [`pointers_mut`]: FrameDriver::pointers_mut
pub struct FrameDriver<B: Backend> {
    state: DriverState<B>,
    pointers: PointerTracker,
    clear_color: Color,
    applied_viewport: Option<(u32, u32)>,
}

impl<B: Backend> FrameDriver<B> {
    pub fn new(metrics: SurfaceMetrics) -> Self {
        Self {
            state: DriverState::Uninitialized,
            pointers: PointerTracker::new(metrics),
            clear_color: Color::BLACK,
            applied_viewport: None,
        }
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Builds the program and uploads the quad, then enters `Running`.
    ///
    /// Shader build failures do not fail this call; see
    /// [`ProgramHandle::failures`]. Calling `start` twice is an error.
    pub fn start(&mut self, backend: &mut B, sources: &ShaderSources) -> Result<()> {
        anyhow::ensure!(self.is_uninitialized(), "frame driver is already running");

        let program = build_program(backend, sources)?;
        let geometry = match GeometryHandle::upload(backend) {
            Ok(g) => g,
            Err(e) => {
                program.destroy(backend);
                return Err(e);
            }
        };

        self.state = DriverState::Running(Scene { program, geometry });
        log::info!("frame driver running");
        Ok(())
    }

    fn is_uninitialized(&self) -> bool {
        matches!(self.state, DriverState::Uninitialized)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.state, DriverState::Running(_))
    }

    /// The built program, once running.
    pub fn program(&self) -> Option<&ProgramHandle<B::Program>> {
        match &self.state {
            DriverState::Running(scene) => Some(&scene.program),
            DriverState::Uninitialized => None,
        }
    }

    #[inline]
    pub fn pointers(&self) -> &PointerTracker {
        &self.pointers
    }

    /// Input handling writes pointers and surface metrics through this. A
    /// metrics change re-applies the viewport on the next frame.
    #[inline]
    pub fn pointers_mut(&mut self) -> &mut PointerTracker {
        &mut self.pointers
    }

    /// Draws one frame at `now` (time since start).
    ///
    /// Does nothing before `start`. Never fails: a broken program makes the
    /// backend skip the draw.
    pub fn draw(&mut self, backend: &mut B, now: Duration) {
        let DriverState::Running(scene) = &self.state else {
            return;
        };

        let metrics = self.pointers.metrics();
        let size = (metrics.width, metrics.height);
        if self.applied_viewport != Some(size) {
            backend.set_viewport(size.0, size.1);
            self.applied_viewport = Some(size);
            log::debug!("viewport set to {}x{}", size.0, size.1);
        }

        backend.clear(self.clear_color);

        let loc = scene.program.locations();
        backend.use_program(scene.program.program());
        backend.bind_vertex_buffer(scene.geometry.buffer(), loc.position, QUAD_COMPONENTS);

        backend.uniform_f32(loc.time, now.as_secs_f32());
        backend.uniform_vec2(loc.resolution, metrics.resolution());
        backend.uniform_vec2_array(loc.pointers, self.pointers.buffer().as_slice());

        backend.draw_triangles(0, scene.geometry.vertex_count());
    }

    /// Releases the program and geometry.
    pub fn shutdown(self, backend: &mut B) {
        if let DriverState::Running(scene) = self.state {
            scene.program.destroy(backend);
            scene.geometry.destroy(backend);
        }
    }
}
