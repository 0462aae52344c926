//! Navigation input: host pointer events become [`NavAction`]s, which
//! [`OrbitControls`] turn into camera motion.
//!
//! # Invariants
//! - Controls only move the camera; they never touch scene content.
//! - Disabled controls ignore new actions but still settle pending damping.

pub mod action;
pub mod orbit;
pub mod pointer;

pub use action::NavAction;
pub use orbit::{OrbitControls, OrbitView};
pub use pointer::{DOUBLE_CLICK, PointerButton, PointerTracker};

pub fn crate_info() -> &'static str {
    "donutfield-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
