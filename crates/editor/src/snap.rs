//! Connection-point snapping after a drag
//!
//! Every connection point of the released block is compared with every
//! connection point of every other block. One pair within the threshold is
//! chosen by [`SnapPolicy`] and the released block is translated so that its
//! point lands exactly on the other block's point.

use glam::Vec3;
use serde::Serialize;
use shared::ObjectId;

use crate::state::scene::SceneState;
use crate::state::settings::{SnapPolicy, SnapSettings};

/// Pairs at or below this distance are already aligned and never move
const ALIGNED_EPSILON: f32 = 1e-6;

/// A chosen connection-point pair and the translation that closes it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapCorrection {
    /// Block that moves
    pub object: ObjectId,
    /// Block it snaps onto
    pub target: ObjectId,
    /// Index into the moving block's connection points
    pub source_point: usize,
    /// Index into the target block's connection points
    pub target_point: usize,
    /// Distance before the correction
    pub distance: f32,
    /// World-space translation applied to `object`
    pub delta: Vec3,
}

/// Find the correction for `moved` without applying it.
///
/// Iteration order: other blocks in creation order, then the moving block's
/// points in declaration order, then the target's points in declaration order.
pub fn find_snap(scene: &SceneState, moved: &str, settings: &SnapSettings) -> Option<SnapCorrection> {
    if !settings.enabled {
        return None;
    }

    let sources = scene.connection_points_world(moved);
    if sources.is_empty() {
        return None;
    }

    let mut chosen: Option<SnapCorrection> = None;

    for other in scene.blocks() {
        // Descendants move together with the dragged node
        if other.id == moved || scene.is_ancestor(moved, &other.id) {
            continue;
        }
        let targets = scene.connection_points_world(&other.id);

        for (i, source) in sources.iter().enumerate() {
            for (j, target) in targets.iter().enumerate() {
                let distance = source.distance(*target);
                if distance >= settings.threshold {
                    continue;
                }

                let candidate = SnapCorrection {
                    object: moved.to_string(),
                    target: other.id.clone(),
                    source_point: i,
                    target_point: j,
                    distance,
                    delta: *target - *source,
                };

                match settings.policy {
                    SnapPolicy::First => return finish(Some(candidate)),
                    SnapPolicy::Last => chosen = Some(candidate),
                    SnapPolicy::Closest => {
                        if chosen.as_ref().map_or(true, |c| distance < c.distance) {
                            chosen = Some(candidate);
                        }
                    }
                }
            }
        }
    }

    finish(chosen)
}

fn finish(chosen: Option<SnapCorrection>) -> Option<SnapCorrection> {
    chosen.filter(|c| c.distance > ALIGNED_EPSILON)
}

/// Find and apply the correction for `moved`. Returns the applied correction.
pub fn resolve_snap(
    scene: &mut SceneState,
    moved: &str,
    settings: &SnapSettings,
) -> Option<SnapCorrection> {
    let correction = find_snap(scene, moved, settings)?;
    scene.translate_world(moved, correction.delta);
    tracing::debug!(
        "Snapped {} onto {} (point {} -> {}, distance {:.4})",
        correction.object,
        correction.target,
        correction.source_point,
        correction.target_point,
        correction.distance
    );
    Some(correction)
}

/// Distance between connection point `i` of `a` and point `j` of `b`
pub fn point_distance(scene: &SceneState, a: &str, i: usize, b: &str, j: usize) -> Option<f32> {
    let pa: Vec3 = *scene.connection_points_world(a).get(i)?;
    let pb: Vec3 = *scene.connection_points_world(b).get(j)?;
    Some(pa.distance(pb))
}
