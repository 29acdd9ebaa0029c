use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Touch, TouchPhase, WindowEvent};
use winit::window::Window;

use crate::coords::{ScreenPoint, SurfaceMetrics};
use crate::input::InputEvent;

/// Touches currently on the surface, in the order they went down.
///
/// winit reports touches one at a time; this set rebuilds the full list the
/// input adapter expects on every start/move.
#[derive(Debug, Clone, Default)]
pub struct TouchSet {
    touches: Vec<(u64, ScreenPoint)>,
}

impl TouchSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.touches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    pub fn points(&self) -> Vec<ScreenPoint> {
        self.touches.iter().map(|(_, p)| *p).collect()
    }

    /// Applies one touch update and returns the event for the adapter.
    pub fn apply(&mut self, id: u64, phase: TouchPhase, point: ScreenPoint) -> InputEvent {
        match phase {
            TouchPhase::Started => {
                self.upsert(id, point);
                InputEvent::TouchStart(self.points())
            }
            TouchPhase::Moved => {
                self.upsert(id, point);
                InputEvent::TouchMove(self.points())
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.retain(|(t, _)| *t != id);
                InputEvent::TouchEnd
            }
        }
    }

    fn upsert(&mut self, id: u64, point: ScreenPoint) {
        match self.touches.iter_mut().find(|(t, _)| *t == id) {
            Some(slot) => slot.1 = point,
            None => self.touches.push((id, point)),
        }
    }
}

/// Translates a winit `WindowEvent` into an `InputEvent`.
///
/// Returns `None` for events the input adapter does not consume.
pub fn translate_window_event(
    window: &Window,
    touches: &mut TouchSet,
    event: &WindowEvent,
) -> Option<InputEvent> {
    match event {
        WindowEvent::Touch(Touch {
            id,
            phase,
            location,
            ..
        }) => {
            let point = to_logical(window.scale_factor(), *location);
            Some(touches.apply(*id, *phase, point))
        }

        WindowEvent::MouseInput { state, .. } => Some(match state {
            ElementState::Pressed => InputEvent::MouseDown,
            ElementState::Released => InputEvent::MouseUp,
        }),

        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::MouseMove(to_logical(
            window.scale_factor(),
            *position,
        ))),

        WindowEvent::Resized(size) => Some(InputEvent::Resize(metrics_for(*size, window.scale_factor()))),

        WindowEvent::ScaleFactorChanged { scale_factor, .. } => Some(InputEvent::Resize(metrics_for(
            window.inner_size(),
            *scale_factor,
        ))),

        _ => None,
    }
}

/// Surface metrics for a window's inner size.
pub fn metrics_for(size: PhysicalSize<u32>, scale_factor: f64) -> SurfaceMetrics {
    SurfaceMetrics::from_physical(size.width, size.height, scale_factor)
}

fn to_logical(scale: f64, pos: PhysicalPosition<f64>) -> ScreenPoint {
    let logical = pos.to_logical::<f64>(scale);
    ScreenPoint::new(logical.x as f32, logical.y as f32)
}
