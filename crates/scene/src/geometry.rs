use glam::Vec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Indexed triangle mesh with per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    indices: Vec<u32>,
}

impl Geometry {
    /// Build a geometry from raw buffers.
    ///
    /// # Panics
    /// Panics if `positions` and `normals` differ in length or an index is
    /// out of range. Both are programming errors in a generator.
    pub fn new(positions: Vec<[f32; 3]>, normals: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        assert_eq!(
            positions.len(),
            normals.len(),
            "every vertex needs exactly one normal"
        );
        assert!(
            indices.iter().all(|&i| (i as usize) < positions.len()),
            "index out of range"
        );
        Self {
            positions,
            normals,
            indices,
        }
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Bounding box of all vertices, `None` for an empty geometry.
    pub fn bounding_box(&self) -> Option<Aabb> {
        let mut iter = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Aabb { min, max })
    }

    /// Move every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            *p = (Vec3::from_array(*p) + offset).to_array();
        }
    }

    /// Translate the geometry so its bounding box is centred on the origin.
    /// Returns the applied offset.
    pub fn center(&mut self) -> Vec3 {
        let Some(bounds) = self.bounding_box() else {
            return Vec3::ZERO;
        };
        let offset = -bounds.center();
        self.translate(offset);
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(offset: f32) -> Geometry {
        Geometry::new(
            vec![
                [offset, 0.0, 0.0],
                [offset + 2.0, 0.0, 0.0],
                [offset, 4.0, 1.0],
            ],
            vec![[0.0, 0.0, 1.0]; 3],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn empty_geometry_has_no_bounds() {
        let mut g = Geometry::default();
        assert!(g.bounding_box().is_none());
        assert_eq!(g.center(), Vec3::ZERO);
    }

    #[test]
    fn bounding_box_spans_vertices() {
        let bounds = triangle(1.0).bounding_box().unwrap();
        assert_eq!(bounds.min, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 4.0, 1.0));
        assert_eq!(bounds.size(), Vec3::new(2.0, 4.0, 1.0));
    }

    #[test]
    fn center_moves_bounds_to_origin() {
        let mut g = triangle(5.0);
        let offset = g.center();
        assert_eq!(offset, Vec3::new(-6.0, -2.0, -0.5));
        let bounds = g.bounding_box().unwrap();
        assert!(bounds.center().abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    #[should_panic(expected = "index out of range")]
    fn rejects_bad_indices() {
        Geometry::new(vec![[0.0; 3]], vec![[0.0; 3]], vec![0, 1, 2]);
    }
}
