//! Scene state management
//!
//! The scene is a flat list of nodes linked by parent IDs. A node with a
//! body is a placeable block; a node without one is a group. Connection
//! points are owned by their block and never exist on their own.

mod history;
mod node_ops;
mod persistence;
mod query;
mod transform_ops;

use glam::{Quat, Vec3};
use shared::ObjectId;

use crate::viewport::layers::Layer;

/// Scene mutation failures
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// No node with this ID
    NotFound(ObjectId),
    /// Re-parenting would make a node its own ancestor
    ParentCycle { child: ObjectId, parent: ObjectId },
    /// Imported scene is inconsistent
    InvalidScene(String),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::NotFound(id) => write!(f, "Node '{}' not found", id),
            SceneError::ParentCycle { child, parent } => {
                write!(f, "Cannot attach '{}' to its descendant '{}'", child, parent)
            }
            SceneError::InvalidScene(msg) => write!(f, "Invalid scene: {}", msg),
        }
    }
}

impl std::error::Error for SceneError {}

/// Box-shaped body mesh of a block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockBody {
    /// Full extents (width, height, depth)
    pub size: Vec3,
    /// 0xRRGGBB
    pub color: u32,
    pub layer: Layer,
}

/// Point used for proximity alignment with other blocks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionPoint {
    /// Offset in the owning block's local space
    pub offset: Vec3,
    pub layer: Layer,
}

impl ConnectionPoint {
    pub fn new(offset: Vec3) -> Self {
        Self {
            offset,
            layer: Layer::Connection,
        }
    }
}

/// A node in the scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: ObjectId,
    pub name: String,
    /// `None` means attached to the scene root
    pub parent: Option<ObjectId>,
    /// Position relative to the parent
    pub position: Vec3,
    /// Rotation relative to the parent
    pub rotation: Quat,
    /// Body mesh; `None` for groups
    pub body: Option<BlockBody>,
    pub connection_points: Vec<ConnectionPoint>,
    /// Selected/emissive state
    pub highlighted: bool,
}

impl SceneNode {
    pub fn is_block(&self) -> bool {
        self.body.is_some()
    }
}

/// Scene graph with undo/redo history
#[derive(Default)]
pub struct SceneState {
    /// Nodes in creation order
    pub(crate) nodes: Vec<SceneNode>,
    /// Undo stack - previous states
    pub(crate) undo_stack: Vec<Vec<SceneNode>>,
    /// Redo stack - undone states
    pub(crate) redo_stack: Vec<Vec<SceneNode>>,
    /// Monotonically increasing version counter for cache invalidation
    pub(crate) version: u64,
}

impl SceneState {
    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// All nodes in creation order
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Placeable blocks in creation order
    pub fn blocks(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter().filter(|n| n.is_block())
    }

    pub fn block_count(&self) -> usize {
        self.blocks().count()
    }

    /// Get a node by ID
    pub fn get(&self, id: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Get mutable node by ID
    pub fn get_mut(&mut self, id: &str) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Save current state to undo stack
    pub(crate) fn save_undo(&mut self) {
        self.undo_stack.push(self.nodes.clone());
        if self.undo_stack.len() > 100 {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }
}
