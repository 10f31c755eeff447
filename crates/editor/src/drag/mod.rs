//! Plane-constrained drag controller
//!
//! Hover detection, selection and movement of blocks across a fixed
//! horizontal plane. The controller never owns the scene; every handler
//! receives the ray for the current pointer and the scene to query or move.

mod controller;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use shared::ObjectId;

pub use controller::DragControls;

/// Session events, in the order they happen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DragEvent {
    HoverOn { object: ObjectId },
    HoverOff { object: ObjectId },
    DragStart { object: ObjectId },
    Drag { object: ObjectId },
    DragEnd { object: ObjectId },
}

impl DragEvent {
    /// Object the event refers to
    pub fn object(&self) -> &ObjectId {
        match self {
            DragEvent::HoverOn { object }
            | DragEvent::HoverOff { object }
            | DragEvent::DragStart { object }
            | DragEvent::Drag { object }
            | DragEvent::DragEnd { object } => object,
        }
    }
}

/// Cursor affordance the host should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    #[default]
    Auto,
    Pointer,
    Move,
}

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Hovering,
    Dragging,
}

/// State held while a drag is active
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Dragged node
    pub object: ObjectId,
    /// Plane intersection minus the object's world position at drag start
    pub offset: Vec3,
    /// Inverse of the parent's world matrix at drag start
    pub parent_inverse: Mat4,
}
