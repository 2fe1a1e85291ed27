use crate::models::session::Session;
use kurbo::{Point, Vec2};

/// Two-state pan machine: `Idle` or `Dragging` with the last recorded
/// pointer position. No intermediate states; cancelling a drag is just
/// returning to `Idle` without committing a pending move.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PanState {
    Idle,
    Dragging { last: Point },
}

/// Translates raw pointer/touch coordinates into background pan offsets.
///
/// Panning is only available while a background layer is active; without
/// one the down transition is refused and the controller stays idle.
#[derive(Debug, Clone, Copy)]
pub struct PanController {
    state: PanState,
}

impl PanController {
    pub fn new() -> Self {
        Self {
            state: PanState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, PanState::Dragging { .. })
    }

    /// Idle -> Dragging on pointer/touch-down. Returns whether the
    /// transition was accepted.
    pub fn pointer_down(&mut self, session: &Session, pos: Point) -> bool {
        if session.background().is_none() {
            return false;
        }
        self.state = PanState::Dragging { last: pos };
        true
    }

    /// While dragging, accumulate the delta from the last position into
    /// the layer's pan offset and advance the last position. The session
    /// emits a change event; drivers coalesce the resulting re-render.
    pub fn pointer_move(&mut self, session: &mut Session, pos: Point) -> Option<Vec2> {
        let PanState::Dragging { last } = self.state else {
            return None;
        };
        let delta = pos - last;
        self.state = PanState::Dragging { last: pos };
        if session.pan_by(delta) {
            Some(delta)
        } else {
            // Layer vanished mid-drag; cancel.
            self.state = PanState::Idle;
            None
        }
    }

    /// Dragging -> Idle on pointer/touch-up.
    pub fn pointer_up(&mut self) {
        self.state = PanState::Idle;
    }

    /// Dragging -> Idle when the pointer leaves the surface bounds.
    pub fn pointer_leave(&mut self) {
        self.state = PanState::Idle;
    }
}

impl Default for PanController {
    fn default() -> Self {
        Self::new()
    }
}
