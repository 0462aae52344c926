use crate::{BuildError, TextParams, TorusParams, text_geometry, torus_geometry};
use donutfield_assets::FontSource;
use donutfield_scene::{Group, Mesh, SharedMaterial};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;
use std::sync::Arc;

/// Build a text mesh whose bounding box is centred on the origin.
///
/// Resolves once the font has loaded and the glyph geometry is built.
/// Font failures are returned to the caller.
pub async fn create_text_mesh<F: FontSource>(
    text: &str,
    font: &F,
    material: SharedMaterial,
    params: TextParams,
) -> Result<Mesh, BuildError> {
    let font = font.load().await?;
    let mut geometry = text_geometry(&font, text, params)?;
    geometry.center();
    tracing::debug!(
        text,
        triangles = geometry.triangle_count(),
        "text mesh built"
    );
    Ok(Mesh::new(Arc::new(geometry), material))
}

/// Build `count` tori scattered around the origin.
///
/// Each torus gets a uniform scale in `[0, 1)`, a position inside the cube
/// `[-spawn_radius, spawn_radius]^3` and rotations in `[0, PI)` about X, Y
/// and Z (applied in that order). All instances share one geometry and the
/// given material.
pub fn create_shape_cloud<R: Rng + ?Sized>(
    count: usize,
    spawn_radius: f32,
    material: &SharedMaterial,
    rng: &mut R,
) -> Group {
    let mut group = Group::with_capacity(count);
    if count == 0 {
        return group;
    }

    let geometry = Arc::new(torus_geometry(&TorusParams::default()));
    let diameter = spawn_radius * 2.0;
    for _ in 0..count {
        let mut torus = Mesh::new(Arc::clone(&geometry), material.clone());
        let scale: f32 = rng.random();
        let offset = Vec3::new(rng.random(), rng.random(), rng.random());
        torus.transform.scale = Vec3::splat(scale);
        torus.transform.position = offset * diameter - Vec3::splat(spawn_radius);
        torus.transform.rotate_x(rng.random::<f32>() * PI);
        torus.transform.rotate_y(rng.random::<f32>() * PI);
        torus.transform.rotate_z(rng.random::<f32>() * PI);
        group.add(torus);
    }

    tracing::debug!(count, spawn_radius, "shape cloud built");
    group
}
