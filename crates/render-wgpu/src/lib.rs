//! wgpu render backend for the donut field.
//!
//! Draws every scene mesh with a matcap material. Meshes sharing geometry
//! and material are batched into one instanced draw, so a cloud of tens of
//! thousands of tori costs a handful of draw calls.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - GPU buffers for a geometry live only as long as some mesh holds it.

mod batch;
mod gpu;
mod shaders;

pub use batch::{DrawBatch, FrameBatches, InstanceData, collect_batches};
pub use gpu::{GpuError, SurfaceFrame, TargetSizes, WgpuRenderer};
