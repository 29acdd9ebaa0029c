//! Bundled WGSL assets.

use swirl_engine::program::ShaderSources;

pub const VERTEX: &str = include_str!("../shaders/fullscreen.wgsl");
pub const FRAGMENT: &str = include_str!("../shaders/swirls.wgsl");

pub fn sources() -> ShaderSources {
    ShaderSources::new(VERTEX, FRAGMENT)
}
