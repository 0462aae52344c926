use crate::NavAction;
use glam::Vec2;
use std::time::{Duration, Instant};

/// Two presses of the primary button closer than this are a double click.
pub const DOUBLE_CLICK: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Turns raw pointer events into navigation actions.
///
/// Primary drag rotates, secondary drag pans, the wheel zooms. Positions
/// are in logical pixels.
#[derive(Debug, Default)]
pub struct PointerTracker {
    held: Option<PointerButton>,
    position: Option<Vec2>,
    last_primary_press: Option<Instant>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press. Returns true when it completes a double click.
    pub fn press(&mut self, button: PointerButton, now: Instant) -> bool {
        self.held = Some(button);
        if button != PointerButton::Primary {
            return false;
        }
        let double = self
            .last_primary_press
            .is_some_and(|prev| now.saturating_duration_since(prev) <= DOUBLE_CLICK);
        // a third press starts a new pair
        self.last_primary_press = if double { None } else { Some(now) };
        double
    }

    pub fn release(&mut self, button: PointerButton) {
        if self.held == Some(button) {
            self.held = None;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.held.is_some()
    }

    /// Record a cursor move and return the drag it produces, if any.
    pub fn moved(&mut self, position: Vec2) -> Option<NavAction> {
        let previous = self.position.replace(position)?;
        let delta = position - previous;
        let action = match self.held? {
            PointerButton::Primary => NavAction::Rotate {
                dx: delta.x,
                dy: delta.y,
            },
            PointerButton::Secondary => NavAction::Pan {
                dx: delta.x,
                dy: delta.y,
            },
        };
        (!action.is_zero()).then_some(action)
    }

    /// The cursor left the window; the next move starts a fresh drag.
    pub fn left(&mut self) {
        self.position = None;
        self.held = None;
    }

    /// A wheel turn. Only the direction counts; positive zooms in.
    pub fn wheel(&mut self, delta_y: f32) -> Option<NavAction> {
        (delta_y != 0.0).then(|| NavAction::Zoom(delta_y.signum()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_without_button_do_nothing() {
        let mut p = PointerTracker::new();
        assert_eq!(p.moved(Vec2::new(10.0, 10.0)), None);
        assert_eq!(p.moved(Vec2::new(20.0, 10.0)), None);
    }

    #[test]
    fn primary_drag_rotates_secondary_pans() {
        let mut p = PointerTracker::new();
        let t = Instant::now();
        p.moved(Vec2::new(10.0, 10.0));
        p.press(PointerButton::Primary, t);
        assert_eq!(
            p.moved(Vec2::new(15.0, 8.0)),
            Some(NavAction::Rotate { dx: 5.0, dy: -2.0 })
        );
        p.release(PointerButton::Primary);
        assert!(!p.is_dragging());

        p.press(PointerButton::Secondary, t);
        assert_eq!(
            p.moved(Vec2::new(15.0, 18.0)),
            Some(NavAction::Pan { dx: 0.0, dy: 10.0 })
        );
        assert_eq!(p.moved(Vec2::new(15.0, 18.0)), None);
    }

    #[test]
    fn double_click_window() {
        let mut p = PointerTracker::new();
        let t = Instant::now();
        assert!(!p.press(PointerButton::Primary, t));
        assert!(p.press(PointerButton::Primary, t + Duration::from_millis(200)));
        assert!(!p.press(PointerButton::Primary, t + Duration::from_millis(300)));
        assert!(!p.press(PointerButton::Primary, t + Duration::from_millis(900)));
        assert!(!p.press(PointerButton::Secondary, t + Duration::from_millis(950)));
    }

    #[test]
    fn leaving_resets_drag() {
        let mut p = PointerTracker::new();
        p.moved(Vec2::ZERO);
        p.press(PointerButton::Primary, Instant::now());
        p.left();
        assert_eq!(p.moved(Vec2::new(100.0, 0.0)), None);
    }

    #[test]
    fn wheel_direction() {
        let mut p = PointerTracker::new();
        assert_eq!(p.wheel(3.0), Some(NavAction::Zoom(1.0)));
        assert_eq!(p.wheel(-0.2), Some(NavAction::Zoom(-1.0)));
        assert_eq!(p.wheel(0.0), None);
    }
}
