use crate::{Geometry, SharedMaterial};
use donutfield_common::Transform;
use glam::Mat4;
use std::sync::Arc;

/// A renderable: shared geometry drawn with a shared material.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Arc<Geometry>,
    pub material: SharedMaterial,
    pub transform: Transform,
}

impl Mesh {
    pub fn new(geometry: Arc<Geometry>, material: SharedMaterial) -> Self {
        Self {
            geometry,
            material,
            transform: Transform::default(),
        }
    }
}

/// A transformable collection of meshes.
#[derive(Debug, Clone, Default)]
pub struct Group {
    pub transform: Transform,
    children: Vec<Mesh>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            transform: Transform::default(),
            children: Vec::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, mesh: Mesh) {
        self.children.push(mesh);
    }

    pub fn children(&self) -> &[Mesh] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A top-level scene node.
#[derive(Debug, Clone)]
pub enum Node {
    Mesh(Mesh),
    Group(Group),
}

impl Node {
    pub fn transform(&self) -> &Transform {
        match self {
            Self::Mesh(m) => &m.transform,
            Self::Group(g) => &g.transform,
        }
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        match self {
            Self::Mesh(m) => &mut m.transform,
            Self::Group(g) => &mut g.transform,
        }
    }

    /// Number of meshes this node contributes.
    pub fn instance_count(&self) -> usize {
        match self {
            Self::Mesh(_) => 1,
            Self::Group(g) => g.len(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mesh(_) => "mesh",
            Self::Group(_) => "group",
        }
    }

    /// Visit every mesh with its world matrix.
    pub fn for_each_mesh(&self, mut f: impl FnMut(Mat4, &Mesh)) {
        match self {
            Self::Mesh(m) => f(m.transform.matrix(), m),
            Self::Group(g) => {
                let parent = g.transform.matrix();
                for child in g.children() {
                    f(parent * child.transform.matrix(), child);
                }
            }
        }
    }
}

impl From<Mesh> for Node {
    fn from(mesh: Mesh) -> Self {
        Self::Mesh(mesh)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Material;
    use donutfield_common::MatcapPreset;
    use glam::{Quat, Vec3};

    fn mesh() -> Mesh {
        Mesh::new(
            Arc::new(Geometry::default()),
            SharedMaterial::new(Material::matcap(MatcapPreset::Clay)),
        )
    }

    #[test]
    fn group_world_matrix_includes_parent() {
        let mut child = mesh();
        child.transform.position = Vec3::new(1.0, 0.0, 0.0);
        let mut group = Group::new();
        group.add(child);
        group.transform.rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);

        let node = Node::from(group);
        let mut positions = Vec::new();
        node.for_each_mesh(|m, _| positions.push(m.transform_point3(Vec3::ZERO)));
        assert_eq!(positions.len(), 1);
        assert!(positions[0].abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn instance_counts() {
        let mut group = Group::with_capacity(2);
        group.add(mesh());
        group.add(mesh());
        assert_eq!(Node::from(group).instance_count(), 2);
        assert_eq!(Node::from(mesh()).instance_count(), 1);
        assert_eq!(Node::from(Group::new()).instance_count(), 0);
    }
}
