//! Native event translation.

mod winit;

pub use self::winit::{TouchSet, metrics_for, translate_window_event};
