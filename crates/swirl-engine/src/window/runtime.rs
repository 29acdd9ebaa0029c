use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::frame::{FrameDriver, FrameLoop, FrameScheduler};
use crate::gfx::{Color, WgpuBackend};
use crate::input::platform::{TouchSet, metrics_for, translate_window_event};
use crate::input::{InputAdapter, PointerPrecision};
use crate::program::ShaderSources;
use crate::time::SystemClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// Whether mouse input should drive the pointers.
    pub pointer: PointerPrecision,

    pub clear_color: Color,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "swirl".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            pointer: PointerPrecision::Fine,
            clear_color: Color::BLACK,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the viewer window and runs until it is closed.
    pub fn run(config: RuntimeConfig, gpu_init: GpuInit, sources: ShaderSources) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = Viewer::new(config, gpu_init, sources);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowSurface {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Asks winit for another `RedrawRequested`.
struct RedrawScheduler<'a>(&'a Window);

impl FrameScheduler for RedrawScheduler<'_> {
    fn schedule_next(&mut self) {
        self.0.request_redraw();
    }
}

/// Everything tied to the one open window.
struct ViewerWindow {
    surface: WindowSurface,
    backend: WgpuBackend,
    driver: FrameDriver<WgpuBackend>,
    input: InputAdapter,
    touches: TouchSet,
    frames: FrameLoop<SystemClock>,
}

impl ViewerWindow {
    fn open(
        event_loop: &ActiveEventLoop,
        config: &RuntimeConfig,
        gpu_init: GpuInit,
        sources: &ShaderSources,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let surface = WindowSurfaceTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let mut backend = surface.with_gpu(|gpu| {
            WgpuBackend::new(gpu.device().clone(), gpu.queue().clone(), gpu.surface_format())
        });

        let metrics = surface.with_window(|w| metrics_for(w.inner_size(), w.scale_factor()));
        let mut driver = FrameDriver::new(metrics).with_clear_color(config.clear_color);
        driver
            .start(&mut backend, sources)
            .context("failed to start frame driver")?;

        Ok(Self {
            surface,
            backend,
            driver,
            input: InputAdapter::new(config.pointer),
            touches: TouchSet::new(),
            frames: FrameLoop::new(SystemClock::new()),
        })
    }

    fn request_redraw(&self) {
        self.surface.borrow_window().request_redraw();
    }

    fn route_input(&mut self, event: &WindowEvent) {
        let window = self.surface.borrow_window();
        if let Some(ev) = translate_window_event(window, &mut self.touches, event) {
            self.input.handle(self.driver.pointers_mut(), &ev);
        }
    }

    fn resize_surface(&mut self) {
        let size = self.surface.borrow_window().inner_size();
        self.surface.with_gpu_mut(|gpu| gpu.resize(size));
    }

    /// Draws one frame. Returns `false` when the runtime must exit.
    fn redraw(&mut self) -> bool {
        let size = self.surface.with_gpu(|gpu| gpu.size());
        if size.width == 0 || size.height == 0 {
            return true;
        }

        let mut frame = match self.surface.with_gpu(|gpu| gpu.begin_frame()) {
            Ok(frame) => frame,
            Err(err) => {
                let action = self.surface.with_gpu_mut(|gpu| gpu.handle_surface_error(err.clone()));
                log::debug!("surface error {err:?}: {action:?}");
                return match action {
                    SurfaceErrorAction::Fatal => {
                        log::error!("fatal surface error: {err}");
                        false
                    }
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        self.request_redraw();
                        true
                    }
                };
            }
        };

        let mut scheduler = RedrawScheduler(self.surface.borrow_window());
        if !self.frames.tick(&mut self.driver, &mut self.backend, &mut scheduler) {
            return true;
        }

        self.backend
            .encode(&mut frame.encoder, &frame.view, (size.width, size.height));
        self.surface.with_gpu(|gpu| gpu.submit(frame));
        true
    }

    fn close(mut self) {
        self.frames.handle().stop();
        self.driver.shutdown(&mut self.backend);
    }
}

struct Viewer {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    sources: ShaderSources,

    window: Option<ViewerWindow>,
}

impl Viewer {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, sources: ShaderSources) -> Self {
        Self {
            config,
            gpu_init,
            sources,
            window: None,
        }
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(win) = self.window.take() {
            win.close();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        match ViewerWindow::open(event_loop, &self.config, self.gpu_init.clone(), &self.sources) {
            Ok(win) => {
                win.request_redraw();
                self.window = Some(win);
            }
            Err(e) => {
                log::error!("failed to open viewer window: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(win) = self.window.as_mut() else {
            return;
        };

        win.route_input(&event);

        match event {
            WindowEvent::CloseRequested => self.exit(event_loop),

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                win.resize_surface();
                win.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                if !win.redraw() {
                    self.exit(event_loop);
                }
            }

            _ => {}
        }
    }
}
