//! Undo/redo functionality

use super::SceneState;

impl SceneState {
    /// Undo last change
    pub fn undo(&mut self) {
        if let Some(prev) = self.undo_stack.pop() {
            self.redo_stack.push(std::mem::replace(&mut self.nodes, prev));
            self.clear_highlights();
            self.version += 1;
        }
    }

    /// Redo last undone change
    pub fn redo(&mut self) {
        if let Some(next) = self.redo_stack.pop() {
            self.undo_stack.push(std::mem::replace(&mut self.nodes, next));
            self.clear_highlights();
            self.version += 1;
        }
    }

    /// Snapshots may have been taken mid-drag; selection never survives a restore
    fn clear_highlights(&mut self) {
        for node in &mut self.nodes {
            node.highlighted = false;
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn test_undo_redo_block_creation() {
        let mut scene = SceneState::default();
        scene.add_block(Vec3::ZERO, Vec3::ONE, 0xff0000, &[]);
        scene.add_block(Vec3::X, Vec3::ONE, 0x00ff00, &[]);
        assert_eq!(scene.block_count(), 2);

        scene.undo();
        assert_eq!(scene.block_count(), 1);
        scene.undo();
        assert_eq!(scene.block_count(), 0);
        assert!(!scene.can_undo());

        scene.redo();
        scene.redo();
        assert_eq!(scene.block_count(), 2);
        assert!(!scene.can_redo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut scene = SceneState::default();
        scene.add_block(Vec3::ZERO, Vec3::ONE, 0, &[]);
        scene.undo();
        assert!(scene.can_redo());
        scene.add_block(Vec3::ZERO, Vec3::ONE, 0, &[]);
        assert!(!scene.can_redo());
    }

    #[test]
    fn test_restore_drops_highlight() {
        let mut scene = SceneState::default();
        let id = scene.add_block(Vec3::ZERO, Vec3::ONE, 0, &[]);
        scene.set_highlighted(&id, true);
        scene.add_block(Vec3::X, Vec3::ONE, 0, &[]);

        scene.undo();
        assert!(!scene.get(&id).unwrap().highlighted);
        scene.set_highlighted(&id, true);
        scene.redo();
        assert!(!scene.get(&id).unwrap().highlighted);
    }

    #[test]
    fn test_undo_bumps_version() {
        let mut scene = SceneState::default();
        scene.add_block(Vec3::ZERO, Vec3::ONE, 0, &[]);
        let v = scene.version();
        scene.undo();
        assert!(scene.version() > v);
    }
}
