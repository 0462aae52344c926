//! Scene graph: the nodes a viewport renders.
//!
//! # Invariants
//! - Geometry is shared between instances by `Arc`, never copied per instance.
//! - Material parameters have a single source of truth; every mesh holding a
//!   [`SharedMaterial`] observes edits made through any other holder.
//! - Every registration change is recorded in the scene event log.

pub mod geometry;
pub mod material;
pub mod node;
pub mod scene;

pub use geometry::{Aabb, Geometry};
pub use material::{Material, SharedMaterial};
pub use node::{Group, Mesh, Node};
pub use scene::{Scene, SceneEvent};

pub fn crate_info() -> &'static str {
    "donutfield-scene v0.1.0"
}
