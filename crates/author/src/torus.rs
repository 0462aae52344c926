use donutfield_scene::Geometry;
use glam::Vec3;
use std::f32::consts::TAU;

/// Torus shape parameters. The ring lies in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusParams {
    /// Distance from the centre of the torus to the centre of the tube.
    pub radius: f32,
    /// Radius of the tube.
    pub tube: f32,
    /// Segments around the tube cross-section.
    pub radial_segments: u32,
    /// Segments around the ring.
    pub tubular_segments: u32,
}

impl Default for TorusParams {
    fn default() -> Self {
        Self {
            radius: 0.5,
            tube: 0.2,
            radial_segments: 64,
            tubular_segments: 128,
        }
    }
}

/// Generate an indexed torus with smooth normals.
pub fn torus_geometry(params: &TorusParams) -> Geometry {
    let radial = params.radial_segments.max(3);
    let tubular = params.tubular_segments.max(3);
    let vertex_count = ((radial + 1) * (tubular + 1)) as usize;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let ring = params.radius + params.tube * v.cos();
            let vertex = Vec3::new(ring * u.cos(), ring * u.sin(), params.tube * v.sin());
            let center = Vec3::new(params.radius * u.cos(), params.radius * u.sin(), 0.0);
            positions.push(vertex.to_array());
            normals.push((vertex - center).normalize_or_zero().to_array());
        }
    }

    let row = tubular + 1;
    let mut indices = Vec::with_capacity((radial * tubular * 6) as usize);
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Geometry::new(positions, normals, indices)
}
