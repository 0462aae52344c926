//! Shared types used across the donutfield crates.

mod matcap;
mod types;

pub use matcap::MatcapPreset;
pub use types::{NodeId, Transform, ViewportSize};
