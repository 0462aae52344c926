use crate::{Clock, PerspectiveCamera, Renderer};
use donutfield_common::{NodeId, ViewportSize};
use donutfield_input::{NavAction, OrbitControls, OrbitView};
use donutfield_scene::{Node, Scene};
use thiserror::Error;

/// Upper bound on the device pixel ratio used for the framebuffer.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Clamp a device pixel ratio to `(0, MAX_PIXEL_RATIO]`. Non-finite or
/// non-positive ratios fall back to 1.
pub fn clamp_pixel_ratio(device_pixel_ratio: f32) -> f32 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

#[derive(Debug, Error)]
pub enum ViewportError {
    #[error("fullscreen request failed: {0}")]
    Fullscreen(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// The window or display that owns the viewport's drawing surface.
pub trait FullscreenHost {
    type Error: std::error::Error + Send + Sync + 'static;

    fn is_fullscreen(&self) -> bool;
    fn request_fullscreen(&mut self) -> Result<(), Self::Error>;
    fn exit_fullscreen(&mut self) -> Result<(), Self::Error>;
}

/// Decides whether the loop renders another frame.
pub trait FrameSource {
    fn next_frame(&mut self) -> bool;

    /// Fixed time step in seconds, or `None` to follow the wall clock.
    fn fixed_step(&self) -> Option<f32> {
        None
    }
}

/// A frame source that yields a set number of frames.
#[derive(Debug, Clone)]
pub struct FixedFrames {
    remaining: u64,
    step: Option<f32>,
}

impl FixedFrames {
    pub fn new(frames: u64) -> Self {
        Self {
            remaining: frames,
            step: None,
        }
    }

    /// Frames advance the clock by `step` seconds each instead of real time.
    pub fn with_step(frames: u64, step: f32) -> Self {
        Self {
            remaining: frames,
            step: Some(step),
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl FrameSource for FixedFrames {
    fn next_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    fn fixed_step(&self) -> Option<f32> {
        self.step
    }
}

/// Owns the scene, camera, navigation controls and renderer, and drives
/// the animation loop.
///
/// # Invariants
/// - `camera.aspect() == size.aspect()` after construction and every resize.
/// - The pixel ratio handed to the renderer never exceeds [`MAX_PIXEL_RATIO`].
pub struct Viewport<R: Renderer> {
    renderer: R,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    size: ViewportSize,
    pixel_ratio: f32,
    clock: Clock,
    frames: u64,
}

impl<R: Renderer> Viewport<R> {
    pub fn new(mut renderer: R, size: ViewportSize, device_pixel_ratio: f32) -> Self {
        let pixel_ratio = clamp_pixel_ratio(device_pixel_ratio);
        renderer.resize(size, pixel_ratio);
        let camera = PerspectiveCamera::new(size.aspect());
        tracing::info!(
            width = size.width,
            height = size.height,
            pixel_ratio,
            "viewport created"
        );
        Self {
            renderer,
            scene: Scene::new(),
            camera,
            controls: OrbitControls::damped(),
            size,
            pixel_ratio,
            clock: Clock::new(),
            frames: 0,
        }
    }

    pub fn add(&mut self, node: impl Into<Node>) -> NodeId {
        self.scene.add(node)
    }

    pub fn add_all<N: Into<Node>>(&mut self, nodes: impl IntoIterator<Item = N>) -> Vec<NodeId> {
        nodes.into_iter().map(|n| self.scene.add(n)).collect()
    }

    /// Unregister a node. Unknown ids are ignored.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.scene.remove(id)
    }

    pub fn remove_all(&mut self, ids: impl IntoIterator<Item = NodeId>) -> Vec<Node> {
        ids.into_iter().filter_map(|id| self.scene.remove(id)).collect()
    }

    pub fn resize(&mut self, size: ViewportSize, device_pixel_ratio: f32) {
        self.size = size;
        self.pixel_ratio = clamp_pixel_ratio(device_pixel_ratio);
        self.camera.set_aspect(size.aspect());
        self.renderer.resize(size, self.pixel_ratio);
        tracing::debug!(
            width = size.width,
            height = size.height,
            pixel_ratio = self.pixel_ratio,
            "viewport resized"
        );
    }

    /// Enter fullscreen if the host is windowed, otherwise leave it.
    /// Returns whether fullscreen was requested.
    pub fn toggle_fullscreen<H: FullscreenHost>(&self, host: &mut H) -> Result<bool, ViewportError> {
        let enter = !host.is_fullscreen();
        let result = if enter {
            host.request_fullscreen()
        } else {
            host.exit_fullscreen()
        };
        result.map_err(|e| ViewportError::Fullscreen(Box::new(e)))?;
        tracing::info!(fullscreen = enter, "fullscreen toggled");
        Ok(enter)
    }

    /// Translate a pointer gesture into camera motion.
    pub fn navigate(&mut self, action: NavAction) {
        let view = OrbitView {
            eye: self.camera.position,
            fov_y: self.camera.fov_y(),
            viewport_height: self.size.height as f32,
        };
        self.controls.apply(action, &view);
    }

    /// One loop iteration on the wall clock.
    pub fn frame(&mut self, per_frame: impl FnOnce(&mut Scene, &Clock)) -> R::Output {
        self.clock.tick();
        self.render_frame(per_frame)
    }

    /// Render frames until `frames` runs out. Returns how many were rendered.
    pub fn run<S: FrameSource>(
        &mut self,
        frames: &mut S,
        mut per_frame: impl FnMut(&mut Scene, &Clock),
    ) -> u64 {
        let mut count = 0;
        while frames.next_frame() {
            match frames.fixed_step() {
                Some(step) => self.clock.advance(step),
                None => self.clock.tick(),
            }
            self.render_frame(&mut per_frame);
            count += 1;
        }
        tracing::debug!(frames = count, "loop finished");
        count
    }

    fn render_frame(&mut self, per_frame: impl FnOnce(&mut Scene, &Clock)) -> R::Output {
        per_frame(&mut self.scene, &self.clock);
        self.controls.update(&mut self.camera.position);
        self.camera.target = self.controls.target;
        self.frames += 1;
        self.renderer.render(&self.scene, &self.camera)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Frames rendered since creation.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
