//! Node creation, parenting and per-node state

use glam::{Quat, Vec3};
use shared::ObjectId;

use super::{BlockBody, ConnectionPoint, SceneError, SceneNode, SceneState};
use crate::viewport::layers::Layer;

impl SceneState {
    /// Add a block attached to the scene root and return its ID
    pub fn add_block(
        &mut self,
        position: Vec3,
        size: Vec3,
        color: u32,
        connection_points: &[Vec3],
    ) -> ObjectId {
        self.save_undo();

        let id = uuid::Uuid::new_v4().to_string();
        let index = self.block_count() + 1;
        self.nodes.push(SceneNode {
            id: id.clone(),
            name: format!("Block {}", index),
            parent: None,
            position,
            rotation: Quat::IDENTITY,
            body: Some(BlockBody {
                size,
                color,
                layer: Layer::Draggable,
            }),
            connection_points: connection_points
                .iter()
                .copied()
                .map(ConnectionPoint::new)
                .collect(),
            highlighted: false,
        });
        self.version += 1;
        id
    }

    /// Add an empty group attached to the scene root and return its ID
    pub fn add_group(&mut self, name: impl Into<String>, position: Vec3) -> ObjectId {
        self.save_undo();

        let id = uuid::Uuid::new_v4().to_string();
        self.nodes.push(SceneNode {
            id: id.clone(),
            name: name.into(),
            parent: None,
            position,
            rotation: Quat::IDENTITY,
            body: None,
            connection_points: Vec::new(),
            highlighted: false,
        });
        self.version += 1;
        id
    }

    /// Attach `child` to `parent` (or to the root for `None`).
    /// The child's local transform is kept as-is.
    pub fn set_parent(&mut self, child: &str, parent: Option<&str>) -> Result<(), SceneError> {
        if !self.contains(child) {
            return Err(SceneError::NotFound(child.to_string()));
        }
        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(SceneError::NotFound(parent.to_string()));
            }
            if parent == child || self.is_ancestor(child, parent) {
                return Err(SceneError::ParentCycle {
                    child: child.to_string(),
                    parent: parent.to_string(),
                });
            }
        }

        self.save_undo();
        if let Some(node) = self.get_mut(child) {
            node.parent = parent.map(str::to_string);
        }
        self.version += 1;
        Ok(())
    }

    /// Whether `ancestor` appears in the parent chain of `node`
    pub fn is_ancestor(&self, ancestor: &str, node: &str) -> bool {
        let mut current = self.get(node).and_then(|n| n.parent.as_deref());
        let mut steps = 0;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                return false;
            }
            current = self.get(id).and_then(|n| n.parent.as_deref());
        }
        false
    }

    /// Rotate a node 90° about the vertical axis. Returns false for unknown IDs.
    pub fn rotate_quarter_turn(&mut self, id: &str) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        node.rotation = (Quat::from_rotation_y(std::f32::consts::FRAC_PI_2) * node.rotation).normalize();
        self.version += 1;
        true
    }

    /// Set the selected/emissive state of a node
    pub fn set_highlighted(&mut self, id: &str, highlighted: bool) {
        if let Some(node) = self.get_mut(id) {
            if node.highlighted != highlighted {
                node.highlighted = highlighted;
                self.version += 1;
            }
        }
    }

    /// Remove every node
    pub fn clear(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        self.save_undo();
        self.nodes.clear();
        self.version += 1;
    }
}
