//! Placement marker and new-block placement

use glam::Vec3;
use rand::Rng;
use serde::Serialize;
use shared::ObjectId;

use crate::state::scene::SceneState;
use crate::state::settings::{GroundSettings, PlacementSettings};
use crate::viewport::picking::{ray_plane, Plane, Ray};

/// Where the pointer currently projects onto the ground
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PlacementMarker {
    pub position: Vec3,
    pub visible: bool,
}

impl PlacementMarker {
    /// Project `ray` onto the ground plane. The marker hides when the ray
    /// misses the plane or lands outside the ground. Returns visibility.
    pub fn update(&mut self, ray: &Ray, ground: &GroundSettings) -> bool {
        let hit = ray_plane(ray, &Plane::horizontal(ground.height)).filter(|p| {
            p.x.abs() <= ground.half_extent && p.z.abs() <= ground.half_extent
        });
        match hit {
            Some(point) => {
                self.position = point;
                self.visible = true;
            }
            None => self.visible = false,
        }
        self.visible
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Add a block resting on `marker` with a random color and the configured
/// connection points
pub fn place_new_object(
    scene: &mut SceneState,
    marker: Vec3,
    settings: &PlacementSettings,
    rng: &mut impl Rng,
) -> ObjectId {
    let size = Vec3::from(settings.size);
    let position = marker + Vec3::new(0.0, size.y * 0.5, 0.0);
    let color = rng.gen_range(0..=0xFF_FFFF);
    let points: Vec<Vec3> = settings
        .connection_points
        .iter()
        .copied()
        .map(Vec3::from)
        .collect();

    let id = scene.add_block(position, size, color, &points);
    tracing::info!("Placed block {} at {:?}", id, position);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn down(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y)
    }

    #[test]
    fn test_marker_follows_ground() {
        let mut marker = PlacementMarker::default();
        assert!(marker.update(&down(1.5, -2.0), &GroundSettings::default()));
        assert_eq!(marker.position, Vec3::new(1.5, 0.0, -2.0));
    }

    #[test]
    fn test_marker_hides_off_ground() {
        let mut marker = PlacementMarker::default();
        assert!(!marker.update(&down(11.0, 0.0), &GroundSettings::default()));
        // Looking up never reaches the ground
        assert!(!marker.update(&Ray::new(Vec3::Y, Vec3::Y), &GroundSettings::default()));
        assert!(!marker.visible);
    }

    #[test]
    fn test_placed_block_rests_on_marker() {
        let mut scene = SceneState::default();
        let mut rng = StdRng::seed_from_u64(7);
        let id = place_new_object(&mut scene, Vec3::new(1.5, 0.0, 0.0), &PlacementSettings::default(), &mut rng);

        let node = scene.get(&id).unwrap();
        assert_eq!(node.position, Vec3::new(1.5, 0.25, 0.0));
        assert!(node.body.as_ref().unwrap().color <= 0xFF_FFFF);
        assert_eq!(
            scene.connection_points_world(&id),
            vec![
                Vec3::new(1.0, 0.25, 0.0),
                Vec3::new(2.0, 0.25, 0.0),
                Vec3::new(1.5, 0.25, 0.25),
            ]
        );
    }

    #[test]
    fn test_placement_is_undoable() {
        let mut scene = SceneState::default();
        let mut rng = StdRng::seed_from_u64(1);
        place_new_object(&mut scene, Vec3::ZERO, &PlacementSettings::default(), &mut rng);
        scene.undo();
        assert_eq!(scene.block_count(), 0);
    }
}
