/// A navigation gesture, in screen pixels.
///
/// Hosts translate raw pointer events into actions; the controls never see
/// platform events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavAction {
    /// Orbit around the target by a pointer drag.
    Rotate { dx: f32, dy: f32 },
    /// Move the target in the view plane by a pointer drag.
    Pan { dx: f32, dy: f32 },
    /// Dolly towards (positive) or away from (negative) the target, in wheel steps.
    Zoom(f32),
}

impl NavAction {
    pub fn is_zero(&self) -> bool {
        match *self {
            Self::Rotate { dx, dy } | Self::Pan { dx, dy } => dx == 0.0 && dy == 0.0,
            Self::Zoom(steps) => steps == 0.0,
        }
    }
}
