//! Ray queries against block bodies and connection points

use glam::Vec3;

use super::SceneState;
use crate::viewport::layers::{Layer, Layers};
use crate::viewport::picking::{ray_aabb, Aabb, Hit, Ray, SpatialIndex};

/// Pick size of a connection point marker
const CONNECTION_POINT_SIZE: f32 = 0.1;

impl SpatialIndex for SceneState {
    fn intersect(&self, ray: &Ray, layers: Layers) -> Vec<Hit> {
        let mut hits = Vec::new();

        for node in &self.nodes {
            let Some(world) = self.world_matrix(&node.id) else {
                continue;
            };

            if let Some(body) = node.body.as_ref().filter(|b| layers.contains(b.layer)) {
                // Test in body space so rotated blocks pick correctly
                let inv = world.inverse();
                let local = Ray::new(
                    inv.transform_point3(ray.origin),
                    inv.transform_vector3(ray.direction),
                );
                if let Some(t) = ray_aabb(&local, &Aabb::centered(body.size)) {
                    hits.push(Hit {
                        owner: node.id.clone(),
                        distance: t,
                        point: ray.at(t),
                    });
                }
            }

            if layers.contains(Layer::Connection) {
                for cp in node.connection_points.iter().filter(|cp| cp.layer == Layer::Connection) {
                    let center = world.transform_point3(cp.offset);
                    let aabb = Aabb {
                        min: center - Vec3::splat(CONNECTION_POINT_SIZE * 0.5),
                        max: center + Vec3::splat(CONNECTION_POINT_SIZE * 0.5),
                    };
                    if let Some(t) = ray_aabb(ray, &aabb) {
                        hits.push(Hit {
                            owner: node.id.clone(),
                            distance: t,
                            point: ray.at(t),
                        });
                    }
                }
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
