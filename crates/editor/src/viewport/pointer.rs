//! Screen-space pointer to normalized device coordinates

use egui::{Pos2, Rect};
use glam::Vec2;

/// Raw pointer sample as delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum RawPointer {
    /// Mouse or pen position in page coordinates
    Mouse(Pos2),
    /// Active touch points in page coordinates; only the first one is used
    Touch(Vec<Pos2>),
}

impl RawPointer {
    /// Position that drives the pointer, if any
    pub fn position(&self) -> Option<Pos2> {
        match self {
            RawPointer::Mouse(pos) => Some(*pos),
            RawPointer::Touch(touches) => touches.first().copied(),
        }
    }
}

/// Map a page position into [-1, 1] x [-1, 1] relative to `viewport`.
/// Screen-down maps to negative y. Positions outside the viewport map
/// outside the unit square.
pub fn map_position(pos: Pos2, viewport: Rect) -> Vec2 {
    Vec2::new(
        (pos.x - viewport.left()) / viewport.width() * 2.0 - 1.0,
        -((pos.y - viewport.top()) / viewport.height()) * 2.0 + 1.0,
    )
}

/// Map a raw pointer sample; `None` for a touch event without touches
pub fn map_pointer(raw: &RawPointer, viewport: Rect) -> Option<Vec2> {
    raw.position().map(|pos| map_position(pos, viewport))
}
