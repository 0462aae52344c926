use bytemuck::{Pod, Zeroable};
use donutfield_common::MatcapPreset;
use donutfield_scene::{Geometry, Scene};
use glam::Mat4;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-instance vertex data: model matrix columns and material parameters.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    /// `x` is the opacity; the rest is reserved.
    pub params: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, opacity: f32) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            params: [opacity, 0.0, 0.0, 0.0],
        }
    }

    pub fn opacity(&self) -> f32 {
        self.params[0]
    }
}

/// One instanced draw: a geometry, a matcap and a range of instances.
#[derive(Debug, Clone)]
pub struct DrawBatch {
    pub geometry: Arc<Geometry>,
    pub matcap: MatcapPreset,
    pub transparent: bool,
    pub first_instance: u32,
    pub instance_count: u32,
}

/// Everything needed to draw one frame.
#[derive(Debug, Default)]
pub struct FrameBatches {
    pub batches: Vec<DrawBatch>,
    pub instances: Vec<InstanceData>,
}

impl FrameBatches {
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

struct Pending {
    geometry: Arc<Geometry>,
    matcap: MatcapPreset,
    transparent: bool,
    opacity: f32,
    models: Vec<Mat4>,
}

/// Group the scene's visible meshes by shared geometry and material.
///
/// Opaque batches come first, then transparent ones, each in the order their
/// first mesh appears in the scene. Invisible and empty meshes are skipped.
pub fn collect_batches(scene: &Scene) -> FrameBatches {
    let mut slots: HashMap<(usize, usize), Option<usize>> = HashMap::new();
    let mut pending: Vec<Pending> = Vec::new();

    scene.for_each_mesh(|world, mesh| {
        let key = (Arc::as_ptr(&mesh.geometry) as usize, mesh.material.key());
        let slot = *slots.entry(key).or_insert_with(|| {
            let material = mesh.material.get();
            if !material.visible || mesh.geometry.is_empty() {
                return None;
            }
            pending.push(Pending {
                geometry: Arc::clone(&mesh.geometry),
                matcap: material.matcap,
                transparent: material.transparent,
                opacity: material.effective_opacity(),
                models: Vec::new(),
            });
            Some(pending.len() - 1)
        });
        if let Some(index) = slot {
            pending[index].models.push(world);
        }
    });

    pending.sort_by_key(|p| p.transparent);

    let mut frame = FrameBatches::default();
    for p in pending {
        let first_instance = frame.instances.len() as u32;
        frame
            .instances
            .extend(p.models.iter().map(|m| InstanceData::new(*m, p.opacity)));
        frame.batches.push(DrawBatch {
            geometry: p.geometry,
            matcap: p.matcap,
            transparent: p.transparent,
            first_instance,
            instance_count: p.models.len() as u32,
        });
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use donutfield_scene::{Group, Material, Mesh, SharedMaterial};
    use glam::Vec3;

    fn triangle() -> Arc<Geometry> {
        Arc::new(Geometry::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0.0, 0.0, 1.0]; 3],
            vec![0, 1, 2],
        ))
    }

    #[test]
    fn empty_scene_has_no_batches() {
        assert!(collect_batches(&Scene::new()).is_empty());
    }

    #[test]
    fn shared_geometry_and_material_form_one_batch() {
        let geometry = triangle();
        let material = SharedMaterial::new(Material::matcap(MatcapPreset::Slime).transparent());
        let mut group = Group::new();
        for i in 0..10 {
            let mut mesh = Mesh::new(Arc::clone(&geometry), material.clone());
            mesh.transform.position = Vec3::new(i as f32, 0.0, 0.0);
            group.add(mesh);
        }
        group.transform.position.y = 2.0;
        let mut scene = Scene::new();
        scene.add(group);

        let frame = collect_batches(&scene);
        assert_eq!(frame.batches.len(), 1);
        assert_eq!(frame.batches[0].instance_count, 10);
        assert_eq!(frame.instances.len(), 10);
        assert_eq!(frame.instances[3].model_3, [3.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn opaque_batches_draw_first() {
        let clear = SharedMaterial::new(Material::matcap(MatcapPreset::Clay).transparent());
        let solid = SharedMaterial::new(Material::matcap(MatcapPreset::Taffy));
        let mut scene = Scene::new();
        scene.add(Mesh::new(triangle(), clear));
        scene.add(Mesh::new(triangle(), solid));

        let frame = collect_batches(&scene);
        assert_eq!(frame.batches.len(), 2);
        assert!(!frame.batches[0].transparent);
        assert_eq!(frame.batches[0].matcap, MatcapPreset::Taffy);
        assert!(frame.batches[1].transparent);
        assert_eq!(frame.batches[1].first_instance, 1);
    }

    #[test]
    fn material_state_flows_into_instances() {
        let material = SharedMaterial::new(Material::matcap(MatcapPreset::Clay).transparent());
        let mut scene = Scene::new();
        scene.add(Mesh::new(triangle(), material.clone()));

        material.set_opacity(0.4);
        let frame = collect_batches(&scene);
        assert!((frame.instances[0].opacity() - 0.4).abs() < 1e-6);

        material.set_visible(false);
        assert!(collect_batches(&scene).is_empty());
    }
}
