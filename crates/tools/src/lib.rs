//! Developer tooling: the debug panel's model and a scene inspector.
//!
//! # Invariants
//! - Panel values stay inside their slider bounds after `PanelState::clamp`.
//! - Tools read the scene; edits go through shared materials and the host.

mod inspector;
mod panel;

pub use inspector::{NodeInfo, SceneInspector, SceneSummary};
pub use panel::{MaterialControls, PanelCommand, PanelState};

pub fn crate_info() -> &'static str {
    "donutfield-tools v0.1.0"
}
