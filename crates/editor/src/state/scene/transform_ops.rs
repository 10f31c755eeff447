//! Transform/drag operations

use glam::{Mat4, Vec3};

use super::{SceneNode, SceneState};

fn local_matrix(node: &SceneNode) -> Mat4 {
    Mat4::from_rotation_translation(node.rotation, node.position)
}

impl SceneState {
    /// Save undo state once at the beginning of a drag operation
    pub fn begin_drag(&mut self) {
        self.save_undo();
        self.version += 1;
    }

    /// World matrix of a node. A parent ID that no longer resolves is
    /// treated as the scene root.
    pub fn world_matrix(&self, id: &str) -> Option<Mat4> {
        let node = self.get(id)?;
        let mut matrix = local_matrix(node);
        let mut parent = node.parent.as_deref();
        let mut steps = 0;
        while let Some(pid) = parent {
            let Some(p) = self.get(pid) else { break };
            matrix = local_matrix(p) * matrix;
            parent = p.parent.as_deref();
            steps += 1;
            if steps > self.nodes.len() {
                break;
            }
        }
        Some(matrix)
    }

    /// World matrix of a node's parent; identity for root nodes
    pub fn parent_world_matrix(&self, id: &str) -> Mat4 {
        self.get(id)
            .and_then(|n| n.parent.as_deref())
            .and_then(|pid| self.world_matrix(pid))
            .unwrap_or(Mat4::IDENTITY)
    }

    /// Inverse of the parent's world matrix; identity for root nodes or a
    /// degenerate parent transform
    pub fn parent_inverse(&self, id: &str) -> Mat4 {
        let parent = self.parent_world_matrix(id);
        if parent == Mat4::IDENTITY || parent.determinant().abs() < f32::EPSILON {
            return Mat4::IDENTITY;
        }
        parent.inverse()
    }

    /// World-space position of a node's origin
    pub fn world_position(&self, id: &str) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.w_axis.truncate())
    }

    /// World-space positions of a node's connection points, in declaration order
    pub fn connection_points_world(&self, id: &str) -> Vec<Vec3> {
        let (Some(node), Some(matrix)) = (self.get(id), self.world_matrix(id)) else {
            return Vec::new();
        };
        node.connection_points
            .iter()
            .map(|cp| matrix.transform_point3(cp.offset))
            .collect()
    }

    /// Set a node's parent-local position
    pub fn set_position(&mut self, id: &str, position: Vec3) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        node.position = position;
        self.version += 1;
        true
    }

    /// Move a node by a world-space vector
    pub fn translate_world(&mut self, id: &str, delta: Vec3) -> bool {
        let local_delta = self.parent_inverse(id).transform_vector3(delta);
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        node.position += local_delta;
        self.version += 1;
        true
    }
}
