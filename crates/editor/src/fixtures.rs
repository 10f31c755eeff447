//! Factory functions for creating test data.
//!
//! Scene descriptions with blocks in the default placement layout, used by
//! tests and scripts.

use shared::*;

/// Connection points of a default placed block
pub fn default_connection_points() -> Vec<[f32; 3]> {
    vec![[-0.5, 0.0, 0.0], [0.5, 0.0, 0.0], [0.0, 0.0, 0.25]]
}

// ── Node factories ──────────────────────────────────────────────

/// Default-sized block centered at `position`
pub fn block_node(id: &str, position: [f32; 3]) -> NodeDescription {
    NodeDescription {
        id: id.to_string(),
        name: id.to_string(),
        parent: None,
        position,
        rotation: [0.0, 0.0, 0.0, 1.0],
        kind: NodeKind::Block {
            size: [1.0, 0.5, 0.5],
            color: 0x8899aa,
        },
        connection_points: default_connection_points(),
    }
}

/// Block parented under `parent`, with a local position
pub fn child_block_node(id: &str, parent: &str, position: [f32; 3]) -> NodeDescription {
    NodeDescription {
        parent: Some(parent.to_string()),
        ..block_node(id, position)
    }
}

pub fn group_node(id: &str, position: [f32; 3]) -> NodeDescription {
    NodeDescription {
        id: id.to_string(),
        name: id.to_string(),
        parent: None,
        position,
        rotation: [0.0, 0.0, 0.0, 1.0],
        kind: NodeKind::Group,
        connection_points: Vec::new(),
    }
}

// ── Scene factories ─────────────────────────────────────────────

pub fn scene(nodes: Vec<NodeDescription>) -> SceneDescription {
    SceneDescription { version: 1, nodes }
}

/// Two blocks on the ground whose facing points are 0.5 apart
pub fn scene_two_blocks() -> SceneDescription {
    scene(vec![
        block_node("a", [0.0, 0.25, 0.0]),
        block_node("b", [1.5, 0.25, 0.0]),
    ])
}

/// Two blocks whose facing points are 0.125 apart
pub fn scene_near_snap() -> SceneDescription {
    scene(vec![
        block_node("a", [0.375, 0.25, 0.0]),
        block_node("b", [1.5, 0.25, 0.0]),
    ])
}

/// A group at (2, 0, 0) holding one block at local (0, 0.25, 0)
pub fn scene_grouped_block() -> SceneDescription {
    scene(vec![
        group_node("g", [2.0, 0.0, 0.0]),
        child_block_node("a", "g", [0.0, 0.25, 0.0]),
    ])
}
