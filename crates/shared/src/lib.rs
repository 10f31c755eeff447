use serde::{Deserialize, Serialize};

/// Unique identifier of a node in the scene
pub type ObjectId = String;

fn default_version() -> u32 {
    1
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

/// What a scene node carries besides its transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// Pure transform node; its children move with it
    Group,
    /// Box-shaped placeable body
    Block {
        /// Full extents (width, height, depth)
        size: [f32; 3],
        /// 0xRRGGBB
        color: u32,
    },
}

/// Serializable snapshot of one scene node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    /// Parent node; `None` means attached to the scene root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ObjectId>,
    /// Position relative to the parent
    pub position: [f32; 3],
    /// Rotation quaternion relative to the parent (x, y, z, w)
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    pub kind: NodeKind,
    /// Connection point offsets in the node's local space
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connection_points: Vec<[f32; 3]>,
}

impl NodeDescription {
    pub fn is_block(&self) -> bool {
        matches!(self.kind, NodeKind::Block { .. })
    }
}

/// Scene snapshot, nodes listed parents-first in creation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SceneDescription {
    #[serde(default = "default_version")]
    pub version: u32,
    pub nodes: Vec<NodeDescription>,
}

impl SceneDescription {
    /// Look up a node by ID
    pub fn find(&self, id: &str) -> Option<&NodeDescription> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// All placeable blocks in the snapshot
    pub fn blocks(&self) -> impl Iterator<Item = &NodeDescription> {
        self.nodes.iter().filter(|n| n.is_block())
    }
}
