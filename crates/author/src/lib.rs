//! Scene content factories.
//!
//! Produces the renderable content the viewport displays: a floating text
//! mesh built from a typeface and a cloud of randomly transformed tori.
//! Factories never mutate existing content; callers replace the old node
//! with a freshly built one.

mod factory;
mod text;
mod torus;

pub use factory::{create_shape_cloud, create_text_mesh};
pub use text::{TextParams, text_geometry};
pub use torus::{TorusParams, torus_geometry};

use donutfield_assets::AssetError;

/// Errors from building content.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("tessellation failed: {0}")]
    Tessellation(String),
}

pub fn crate_info() -> &'static str {
    "donutfield-author v0.1.0"
}
