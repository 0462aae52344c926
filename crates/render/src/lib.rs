//! Viewport: camera, resize handling, navigation and the animation loop,
//! behind a renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the scene; only per-frame callbacks and the host mutate it.
//! - The camera aspect always matches the current viewport size.
//!
//! [`DebugTextRenderer`] renders to text for headless runs and tests; the
//! GPU backend lives in `donutfield-render-wgpu` behind the same trait.

mod camera;
mod clock;
mod renderer;
mod viewport;

pub use camera::PerspectiveCamera;
pub use clock::Clock;
pub use renderer::{DebugTextRenderer, Renderer};
pub use viewport::{
    FixedFrames, FrameSource, FullscreenHost, MAX_PIXEL_RATIO, Viewport, ViewportError,
    clamp_pixel_ratio,
};

pub fn crate_info() -> &'static str {
    "donutfield-render v0.1.0"
}
