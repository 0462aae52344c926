use crate::NavAction;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Keeps the polar angle away from the poles so the view never flips.
const POLE_EPSILON: f32 = 1e-6;

/// Camera state the controls need to interpret an action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitView {
    pub eye: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Height of the viewport in pixels; drags are measured against it.
    pub viewport_height: f32,
}

/// Orbit/pan/zoom navigation around a target point, with optional inertia.
///
/// Actions accumulate into pending deltas; [`OrbitControls::update`] applies
/// them to the camera once per frame. With damping enabled only a fraction
/// of the pending motion is applied each frame and the rest decays, which
/// gives the camera its glide.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enabled: bool,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enabled: true,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Damped controls, as the viewport uses them.
    pub fn damped() -> Self {
        Self {
            enable_damping: true,
            ..Self::default()
        }
    }

    /// Queue an action. Ignored while the controls are disabled.
    pub fn apply(&mut self, action: NavAction, view: &OrbitView) {
        if !self.enabled {
            tracing::trace!(?action, "controls disabled, action dropped");
            return;
        }
        let height = view.viewport_height.max(1.0);
        match action {
            NavAction::Rotate { dx, dy } => {
                self.delta_theta -= TAU * dx / height * self.rotate_speed;
                self.delta_phi -= TAU * dy / height * self.rotate_speed;
            }
            NavAction::Pan { dx, dy } => {
                let offset = view.eye - self.target;
                let target_distance = offset.length() * (view.fov_y / 2.0).tan();
                let forward = (-offset).normalize_or_zero();
                let right = forward.cross(Vec3::Y).normalize_or_zero();
                let up = right.cross(forward);
                let per_pixel = 2.0 * target_distance / height * self.pan_speed;
                self.pan_offset += right * (-dx * per_pixel) + up * (dy * per_pixel);
            }
            NavAction::Zoom(steps) => {
                self.scale *= 0.95_f32.powf(self.zoom_speed * steps);
            }
        }
    }

    /// Apply pending motion to `eye`. Returns whether the camera moved.
    pub fn update(&mut self, eye: &mut Vec3) -> bool {
        let offset = *eye - self.target;
        let radius = offset.length();
        let (mut theta, mut phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, PI / 2.0)
        };

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.delta_theta * step;
        phi = (phi + self.delta_phi * step).clamp(POLE_EPSILON, PI - POLE_EPSILON);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * step;

        let new_offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        let new_eye = self.target + new_offset;
        let moved = new_eye.distance_squared(*eye) > 1e-12;
        *eye = new_eye;

        let decay = 1.0 - step;
        self.delta_theta *= decay;
        self.delta_phi *= decay;
        self.pan_offset *= decay;
        self.scale = 1.0;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(eye: Vec3) -> OrbitView {
        OrbitView {
            eye,
            fov_y: 75.0_f32.to_radians(),
            viewport_height: 600.0,
        }
    }

    #[test]
    fn idle_update_keeps_camera() {
        let mut controls = OrbitControls::damped();
        let mut eye = Vec3::new(0.0, 0.0, 3.0);
        assert!(!controls.update(&mut eye));
        assert!(eye.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-5));
    }

    #[test]
    fn quarter_drag_orbits_quarter_turn() {
        let mut controls = OrbitControls::new();
        let mut eye = Vec3::new(0.0, 0.0, 3.0);
        controls.apply(NavAction::Rotate { dx: 150.0, dy: 0.0 }, &view(eye));
        assert!(controls.update(&mut eye));
        assert!(eye.abs_diff_eq(Vec3::new(-3.0, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn damping_glides_to_the_same_place() {
        let mut controls = OrbitControls::damped();
        let mut eye = Vec3::new(0.0, 0.0, 3.0);
        controls.apply(NavAction::Rotate { dx: 150.0, dy: 0.0 }, &view(eye));

        controls.update(&mut eye);
        // first frame covers only a small part of the turn
        assert!(eye.x > -0.5);

        for _ in 0..600 {
            controls.update(&mut eye);
        }
        assert!(eye.abs_diff_eq(Vec3::new(-3.0, 0.0, 0.0), 1e-3));
    }

    #[test]
    fn disabled_controls_ignore_actions() {
        let mut controls = OrbitControls::new();
        controls.enabled = false;
        let mut eye = Vec3::new(0.0, 0.0, 3.0);
        controls.apply(NavAction::Zoom(5.0), &view(eye));
        controls.apply(NavAction::Rotate { dx: 100.0, dy: 40.0 }, &view(eye));
        assert!(!controls.update(&mut eye));
    }

    #[test]
    fn zoom_dollies_and_clamps() {
        let mut controls = OrbitControls::new();
        let mut eye = Vec3::new(0.0, 0.0, 3.0);
        controls.apply(NavAction::Zoom(1.0), &view(eye));
        controls.update(&mut eye);
        assert!((eye.length() - 2.85).abs() < 1e-5);

        controls.max_distance = 4.0;
        controls.apply(NavAction::Zoom(-100.0), &view(eye));
        controls.update(&mut eye);
        assert!((eye.length() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn pan_moves_target_and_eye_together() {
        let mut controls = OrbitControls::new();
        let mut eye = Vec3::new(0.0, 0.0, 3.0);
        controls.apply(NavAction::Pan { dx: 60.0, dy: 0.0 }, &view(eye));
        controls.update(&mut eye);
        assert!(controls.target.x < 0.0);
        assert!(controls.target.y.abs() < 1e-6);
        assert!((eye - controls.target).abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-4));
    }

    #[test]
    fn polar_angle_never_flips() {
        let mut controls = OrbitControls::new();
        let mut eye = Vec3::new(0.0, 0.0, 3.0);
        controls.apply(NavAction::Rotate { dx: 0.0, dy: 10_000.0 }, &view(eye));
        controls.update(&mut eye);
        assert!(eye.y > 2.99);
        assert!(eye.length() > 2.99);
    }
}
