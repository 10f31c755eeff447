use glam::Vec3;
use shared::ObjectId;

use super::{Cursor, DragEvent, DragPhase, DragSession};
use crate::state::scene::SceneState;
use crate::viewport::layers::{Layer, Layers};
use crate::viewport::picking::{ray_plane, Plane, Ray, SpatialIndex};

/// Drags blocks across a horizontal plane
pub struct DragControls {
    /// When false, an active drag keeps its session but stops moving the target
    pub enabled: bool,
    /// Drag this node whenever anything pickable is hit
    pub transform_group: Option<ObjectId>,
    plane: Plane,
    layers: Layers,
    active: bool,
    hovered: Option<ObjectId>,
    session: Option<DragSession>,
    cursor: Cursor,
    events: Vec<DragEvent>,
}

impl DragControls {
    /// Controller picking on `layer` and dragging across `plane`
    pub fn new(plane: Plane, layer: Layer) -> Self {
        Self {
            enabled: true,
            transform_group: None,
            plane,
            layers: Layers::only(layer),
            active: true,
            hovered: None,
            session: None,
            cursor: Cursor::Auto,
            events: Vec::new(),
        }
    }

    /// Start listening to pointer input
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Stop listening to pointer input. An active drag ends here, since no
    /// terminating pointer event can reach an inactive controller.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.end_drag();
        if let Some(previous) = self.hovered.take() {
            self.events.push(DragEvent::HoverOff { object: previous });
        }
        self.cursor = Cursor::Auto;
    }

    /// Deactivate and drop every queued event
    pub fn dispose(&mut self) {
        self.deactivate();
        self.events.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn set_plane(&mut self, plane: Plane) {
        self.plane = plane;
    }

    pub fn phase(&self) -> DragPhase {
        if self.session.is_some() {
            DragPhase::Dragging
        } else if self.hovered.is_some() {
            DragPhase::Hovering
        } else {
            DragPhase::Idle
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Currently dragged node
    pub fn selected(&self) -> Option<&ObjectId> {
        self.session.as_ref().map(|s| &s.object)
    }

    pub fn hovered(&self) -> Option<&ObjectId> {
        self.hovered.as_ref()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<DragEvent> {
        std::mem::take(&mut self.events)
    }

    /// Mouse/pen move: moves the dragged target, or tracks hover when idle
    pub fn pointer_move(&mut self, ray: &Ray, scene: &mut SceneState) {
        if !self.active {
            return;
        }

        if self.session.is_some() && self.enabled {
            self.move_selected(ray, scene);
            return;
        }

        let hit = scene.intersect_first(ray, self.layers).map(|h| h.owner);
        match hit {
            Some(owner) => {
                if self.hovered.as_ref() != Some(&owner) {
                    if let Some(previous) = self.hovered.take() {
                        self.events.push(DragEvent::HoverOff { object: previous });
                    }
                    tracing::debug!("Hover on {}", owner);
                    self.events.push(DragEvent::HoverOn {
                        object: owner.clone(),
                    });
                    self.hovered = Some(owner);
                }
                if self.session.is_none() {
                    self.cursor = Cursor::Pointer;
                }
            }
            None => {
                if let Some(previous) = self.hovered.take() {
                    tracing::debug!("Hover off {}", previous);
                    self.events.push(DragEvent::HoverOff { object: previous });
                    if self.session.is_none() {
                        self.cursor = Cursor::Auto;
                    }
                }
            }
        }
    }

    /// Mouse/pen press: starts a drag if a pickable block is under the pointer
    pub fn pointer_down(&mut self, ray: &Ray, scene: &SceneState) {
        if !self.active || self.session.is_some() {
            return;
        }

        let Some(hit) = scene.intersect_first(ray, self.layers) else {
            return;
        };

        let object = match &self.transform_group {
            Some(group) if scene.contains(group) => group.clone(),
            _ => hit.owner,
        };

        let parent_inverse = scene.parent_inverse(&object);
        let offset = match (ray_plane(ray, &self.plane), scene.world_position(&object)) {
            (Some(intersection), Some(world)) => intersection - world,
            _ => {
                tracing::debug!("Drag plane missed at drag start of {}", object);
                Vec3::ZERO
            }
        };

        tracing::debug!("Drag start {} (offset {:?})", object, offset);
        self.session = Some(DragSession {
            object: object.clone(),
            offset,
            parent_inverse,
        });
        self.cursor = Cursor::Move;
        self.events.push(DragEvent::DragStart { object });
    }

    /// Mouse release or pointer leaving the surface: ends the drag
    pub fn pointer_cancel(&mut self) {
        if !self.active {
            return;
        }
        self.end_drag();
        self.cursor = if self.hovered.is_some() {
            Cursor::Pointer
        } else {
            Cursor::Auto
        };
    }

    /// Touch start behaves like a press at the first touch point
    pub fn touch_start(&mut self, ray: &Ray, scene: &SceneState) {
        self.pointer_down(ray, scene);
    }

    /// Touch move only drags; touch has no hover
    pub fn touch_move(&mut self, ray: &Ray, scene: &mut SceneState) {
        if !self.active {
            return;
        }
        if self.session.is_some() && self.enabled {
            self.move_selected(ray, scene);
        }
    }

    pub fn touch_end(&mut self) {
        if !self.active {
            return;
        }
        self.end_drag();
        self.cursor = Cursor::Auto;
    }

    fn move_selected(&mut self, ray: &Ray, scene: &mut SceneState) {
        let Some(session) = &self.session else {
            return;
        };
        // A ray parallel to the plane skips this update only
        if let Some(intersection) = ray_plane(ray, &self.plane) {
            let local = session
                .parent_inverse
                .transform_point3(intersection - session.offset);
            scene.set_position(&session.object, local);
        }
        self.events.push(DragEvent::Drag {
            object: session.object.clone(),
        });
    }

    fn end_drag(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!("Drag end {}", session.object);
            self.events.push(DragEvent::DragEnd {
                object: session.object,
            });
        }
    }
}
