use donutfield_common::{MatcapPreset, Transform};
use donutfield_input::OrbitControls;
use donutfield_scene::{Material, SharedMaterial};
use glam::Quat;
use std::ops::RangeInclusive;

/// Slider values for one material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialControls {
    pub opacity: f32,
    pub matcap: MatcapPreset,
    pub visible: bool,
}

impl MaterialControls {
    pub const OPACITY_RANGE: RangeInclusive<f32> = 0.0..=1.0;
    pub const OPACITY_STEP: f32 = 0.01;

    pub fn from_material(material: &Material) -> Self {
        Self {
            opacity: material.opacity,
            matcap: material.matcap,
            visible: material.visible,
        }
    }

    /// Push the values into `material`. Every mesh sharing it sees the change.
    pub fn apply(&self, material: &SharedMaterial) {
        material.update(|m| {
            m.opacity = self.opacity;
            m.matcap = self.matcap;
            m.visible = self.visible;
        });
    }
}

/// Actions the panel's buttons ask the host to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    RebuildText,
    RebuildDonuts,
    ToggleFullscreen,
}

/// Everything the debug panel edits.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub text: String,
    pub text_material: MaterialControls,
    pub donut_material: MaterialControls,
    /// Divisor of elapsed seconds giving the donut group's yaw.
    pub rotation: f32,
    pub count: u32,
    pub radius: f32,
    pub spin: bool,
    pub enable_damping: bool,
    pub controls_enabled: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            text: "Hello World!".to_owned(),
            text_material: MaterialControls {
                opacity: 1.0,
                matcap: MatcapPreset::Clay,
                visible: true,
            },
            donut_material: MaterialControls {
                opacity: 1.0,
                matcap: MatcapPreset::Slime,
                visible: true,
            },
            rotation: 16.0,
            count: 50,
            radius: 10.0,
            spin: true,
            enable_damping: true,
            controls_enabled: true,
        }
    }
}

impl PanelState {
    pub const ROTATION_RANGE: RangeInclusive<f32> = -16.0..=16.0;
    pub const ROTATION_STEP: f32 = 0.5;
    pub const COUNT_RANGE: RangeInclusive<u32> = 1..=50_000;
    pub const RADIUS_RANGE: RangeInclusive<f32> = 0.5..=250.0;
    pub const RADIUS_STEP: f32 = 0.5;

    /// Force every value back inside its slider bounds. NaN resets to the default.
    pub fn clamp(&mut self) {
        let defaults = Self::default();
        self.rotation = clamp_or(self.rotation, &Self::ROTATION_RANGE, defaults.rotation);
        self.radius = clamp_or(self.radius, &Self::RADIUS_RANGE, defaults.radius);
        self.count = self
            .count
            .clamp(*Self::COUNT_RANGE.start(), *Self::COUNT_RANGE.end());
        for (controls, fallback) in [
            (&mut self.text_material, defaults.text_material.opacity),
            (&mut self.donut_material, defaults.donut_material.opacity),
        ] {
            controls.opacity =
                clamp_or(controls.opacity, &MaterialControls::OPACITY_RANGE, fallback);
        }
    }

    /// Yaw of the donut group at `elapsed` seconds, or `None` when it should
    /// not move. A zero divisor counts as not spinning.
    pub fn spin_angle(&self, elapsed: f32) -> Option<f32> {
        if !self.spin || self.rotation == 0.0 {
            return None;
        }
        Some(elapsed / self.rotation)
    }

    /// Spin the donut group's transform for this frame.
    pub fn apply_spin(&self, transform: &mut Transform, elapsed: f32) {
        if let Some(angle) = self.spin_angle(elapsed) {
            transform.rotation = Quat::from_rotation_y(angle);
        }
    }

    pub fn apply_navigation(&self, controls: &mut OrbitControls) {
        controls.enable_damping = self.enable_damping;
        controls.enabled = self.controls_enabled;
    }
}

fn clamp_or(value: f32, range: &RangeInclusive<f32>, fallback: f32) -> f32 {
    if value.is_nan() {
        tracing::warn!(fallback, "panel value was NaN, reset");
        return fallback;
    }
    value.clamp(*range.start(), *range.end())
}
