use crate::PerspectiveCamera;
use donutfield_common::ViewportSize;
use donutfield_scene::Scene;
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and camera and produces output. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Resize the drawing surface. `pixel_ratio` is already clamped.
    fn resize(&mut self, size: ViewportSize, pixel_ratio: f32);

    /// Render one frame.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Self::Output;
}

/// Text renderer for headless runs, logging and tests.
///
/// Produces a readable summary of each frame and keeps the most recent one.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    size: ViewportSize,
    pixel_ratio: f32,
    frames: u64,
    last: String,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last(&self) -> &str {
        &self.last
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn resize(&mut self, size: ViewportSize, pixel_ratio: f32) {
        self.size = size;
        self.pixel_ratio = pixel_ratio;
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> String {
        self.frames += 1;
        let (w, h) = self.size.physical(self.pixel_ratio);
        let eye = camera.position;
        let target = camera.target;

        let mut out = String::new();
        // writing into a String cannot fail
        let _ = writeln!(
            out,
            "=== Frame {} ({}x{} @{}x, {w}x{h} px) ===",
            self.frames, self.size.width, self.size.height, self.pixel_ratio
        );
        let _ = writeln!(
            out,
            "Nodes: {} Instances: {}",
            scene.len(),
            scene.instance_count()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.3}",
            eye.x,
            eye.y,
            eye.z,
            target.x,
            target.y,
            target.z,
            camera.fov_degrees,
            camera.aspect()
        );
        for (id, node) in scene.nodes() {
            let t = node.transform();
            let (yaw, _, _) = t.rotation.to_euler(glam::EulerRot::YXZ);
            let _ = writeln!(
                out,
                "  [{id}] {} x{} pos=({:.2}, {:.2}, {:.2}) yaw={:.3}",
                node.kind(),
                node.instance_count(),
                t.position.x,
                t.position.y,
                t.position.z,
                yaw
            );
        }

        self.last.clone_from(&out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use donutfield_common::MatcapPreset;
    use donutfield_scene::{Geometry, Group, Material, Mesh, SharedMaterial};
    use std::sync::Arc;

    fn triangle() -> Mesh {
        let geometry = Geometry::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0.0, 0.0, 1.0]; 3],
            vec![0, 1, 2],
        );
        Mesh::new(
            Arc::new(geometry),
            SharedMaterial::new(Material::matcap(MatcapPreset::Clay)),
        )
    }

    #[test]
    fn debug_renderer_empty_scene() {
        let mut renderer = DebugTextRenderer::new();
        renderer.resize(ViewportSize::new(800, 600), 1.0);
        let output = renderer.render(&Scene::new(), &PerspectiveCamera::new(4.0 / 3.0));

        assert!(output.contains("Frame 1 (800x600"));
        assert!(output.contains("Nodes: 0 Instances: 0"));
        assert!(output.contains("fov=75"));
    }

    #[test]
    fn debug_renderer_lists_nodes() {
        let mut scene = Scene::new();
        scene.add(triangle());
        let mut group = Group::new();
        group.add(triangle());
        group.add(triangle());
        scene.add(group);

        let mut renderer = DebugTextRenderer::new();
        renderer.resize(ViewportSize::new(100, 100), 2.0);
        let output = renderer.render(&scene, &PerspectiveCamera::default());

        assert!(output.contains("200x200 px"));
        assert!(output.contains("Nodes: 2 Instances: 3"));
        assert!(output.contains("mesh x1"));
        assert!(output.contains("group x2"));
        assert_eq!(renderer.last(), output);
        assert_eq!(renderer.frames(), 1);
    }
}
