use glam::Vec3;
use shared::ObjectId;

use super::layers::Layers;

/// A ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Infinite plane `normal · p + constant = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Plane {
    /// Horizontal plane through `y = height`, facing up
    pub fn horizontal(height: f32) -> Self {
        Self {
            normal: Vec3::Y,
            constant: -height,
        }
    }

    /// Signed distance from the plane to `point`
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box of `size` centered on the origin
    pub fn centered(size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: -half,
            max: half,
        }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Ray-plane intersection. `None` when the ray is parallel to the plane
/// or the plane lies behind the ray origin.
pub fn ray_plane(ray: &Ray, plane: &Plane) -> Option<Vec3> {
    const EPSILON: f32 = 1e-7;

    let denom = plane.normal.dot(ray.direction);
    if denom.abs() < EPSILON {
        return None;
    }

    let t = -(ray.origin.dot(plane.normal) + plane.constant) / denom;
    if t < 0.0 {
        return None;
    }

    Some(ray.at(t))
}

/// One ray intersection, reported against the scene object that owns the geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub owner: ObjectId,
    pub distance: f32,
    pub point: Vec3,
}

/// Ray intersection service over a candidate object set
pub trait SpatialIndex {
    /// All intersections with geometry on one of `layers`, nearest first
    fn intersect(&self, ray: &Ray, layers: Layers) -> Vec<Hit>;

    /// Nearest intersection, if any
    fn intersect_first(&self, ray: &Ray, layers: Layers) -> Option<Hit> {
        self.intersect(ray, layers).into_iter().next()
    }
}
