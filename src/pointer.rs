use rapier2d::prelude::*;

use crate::draggable_world::DraggableWorld;

/// A single-pointer event in world meters. Mouse and touch both map onto this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point<Real>),
    Move(Point<Real>),
    Up,
}

/// Turn polled button state into at most one event per frame.
///
/// `was_down` is last frame's state; a move is only reported while the button is held.
pub fn poll_pointer(was_down: bool, is_down: bool, position: Point<Real>) -> Option<PointerEvent> {
    match (was_down, is_down) {
        (false, true) => Some(PointerEvent::Down(position)),
        (true, true) => Some(PointerEvent::Move(position)),
        (true, false) => Some(PointerEvent::Up),
        (false, false) => None,
    }
}

impl DraggableWorld {
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(point) => {
                self.pointer_down(point);
            }
            PointerEvent::Move(point) => self.pointer_move(point),
            PointerEvent::Up => self.pointer_up(),
        }
    }
}
