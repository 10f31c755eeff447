//! Scene snapshot import/export

use std::collections::HashSet;

use glam::{Quat, Vec3};
use shared::{NodeDescription, NodeKind, SceneDescription};

use super::{BlockBody, ConnectionPoint, SceneError, SceneNode, SceneState};
use crate::viewport::layers::Layer;

impl SceneState {
    /// Snapshot of the current scene
    pub fn to_description(&self) -> SceneDescription {
        SceneDescription {
            version: 1,
            nodes: self
                .nodes
                .iter()
                .map(|node| NodeDescription {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    parent: node.parent.clone(),
                    position: node.position.to_array(),
                    rotation: node.rotation.to_array(),
                    kind: match &node.body {
                        Some(body) => NodeKind::Block {
                            size: body.size.to_array(),
                            color: body.color,
                        },
                        None => NodeKind::Group,
                    },
                    connection_points: node
                        .connection_points
                        .iter()
                        .map(|cp| cp.offset.to_array())
                        .collect(),
                })
                .collect(),
        }
    }

    /// Replace the scene with a snapshot (undoable)
    pub fn load_description(&mut self, scene: &SceneDescription) -> Result<(), SceneError> {
        let mut seen = HashSet::new();
        for node in &scene.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(SceneError::InvalidScene(format!("duplicate node id '{}'", node.id)));
            }
        }

        let nodes: Vec<SceneNode> = scene
            .nodes
            .iter()
            .map(|desc| SceneNode {
                id: desc.id.clone(),
                name: desc.name.clone(),
                parent: desc.parent.clone(),
                position: Vec3::from(desc.position),
                rotation: Quat::from_array(desc.rotation).normalize(),
                body: match desc.kind {
                    NodeKind::Block { size, color } => Some(BlockBody {
                        size: Vec3::from(size),
                        color,
                        layer: Layer::Draggable,
                    }),
                    NodeKind::Group => None,
                },
                connection_points: desc
                    .connection_points
                    .iter()
                    .map(|&p| ConnectionPoint::new(Vec3::from(p)))
                    .collect(),
                highlighted: false,
            })
            .collect();

        let candidate = SceneState {
            nodes,
            ..Default::default()
        };
        for node in &candidate.nodes {
            if let Some(parent) = node.parent.as_deref() {
                if !candidate.contains(parent) {
                    return Err(SceneError::InvalidScene(format!(
                        "node '{}' references missing parent '{}'",
                        node.id, parent
                    )));
                }
                if parent == node.id || candidate.is_ancestor(&node.id, parent) {
                    return Err(SceneError::ParentCycle {
                        child: node.id.clone(),
                        parent: parent.to_string(),
                    });
                }
            }
        }

        self.save_undo();
        self.nodes = candidate.nodes;
        self.version += 1;
        Ok(())
    }

    /// Export the current scene as JSON
    pub fn export_json(&self) -> String {
        serde_json::to_string_pretty(&self.to_description()).unwrap_or_default()
    }

    /// Load a scene from JSON string
    pub fn load_json(&mut self, json: &str) -> Result<(), SceneError> {
        let scene: SceneDescription = serde_json::from_str(json)
            .map_err(|e| SceneError::InvalidScene(format!("JSON parse error: {e}")))?;
        self.load_description(&scene)
    }
}
