use egui::{Pos2, Rect};
use glam::{Mat4, Vec2, Vec3, Vec4};

use super::layers::{Layer, Layers};
use super::picking::Ray;
use super::pointer::map_position;
use crate::state::settings::CameraSettings;

/// Arc-ball perspective camera for the editor viewport
#[derive(Debug, Clone)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
    /// Viewport width / height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Layers this camera renders
    pub layers: Layers,
}

impl ArcBallCamera {
    pub fn new(settings: &CameraSettings) -> Self {
        let mut camera = Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 1.0,
            target: Vec3::from(settings.target),
            fov: settings.fov_degrees.to_radians(),
            aspect: 1.0,
            near: settings.near,
            far: settings.far,
            layers: Layers::default(),
        };
        camera.look_from(Vec3::from(settings.position));
        camera
    }

    /// Place the camera at `eye`, keeping the current target
    pub fn look_from(&mut self, eye: Vec3) {
        let offset = eye - self.target;
        self.distance = offset.length().max(f32::EPSILON);
        self.pitch = (offset.y / self.distance).clamp(-1.0, 1.0).asin();
        self.yaw = offset.x.atan2(offset.z);
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(0.5, self.far * 0.5);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        let right = self.right_vector();
        let up = self.up_vector();
        let offset = right * dx + up * dy;
        self.target += offset;
    }

    /// Update the aspect ratio after the viewport changed size
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn show_layer(&mut self, layer: Layer) {
        self.layers.enable(layer);
    }

    pub fn hide_layer(&mut self, layer: Layer) {
        self.layers.disable(layer);
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    fn right_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(Vec3::Y).normalize_or_zero()
    }

    fn up_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }

    /// Project a world point to normalized device coordinates
    pub fn project_ndc(&self, point: Vec3) -> Option<Vec2> {
        let p = self.view_projection() * point.extend(1.0);
        if p.w <= 0.0 {
            return None;
        }
        Some(p.truncate().truncate() / p.w)
    }

    /// Project a world point to a screen position inside `rect`
    pub fn project(&self, point: Vec3, rect: Rect) -> Option<Pos2> {
        let ndc = self.project_ndc(point)?;
        let screen_x = rect.left() + (ndc.x + 1.0) * 0.5 * rect.width();
        let screen_y = rect.top() + (1.0 - ndc.y) * 0.5 * rect.height();
        Some(egui::pos2(screen_x, screen_y))
    }

    /// Cast a ray through a normalized device coordinate
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        // Inverse view-projection
        let vp_inv = self.view_projection().inverse();

        // Unproject near and far points
        let near_world = vp_inv * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let far_world = vp_inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray {
            origin: self.eye_position(),
            direction: (far - near).normalize_or_zero(),
        }
    }

    /// Cast a ray from a screen position into the 3D scene
    pub fn screen_ray(&self, screen_pos: Pos2, rect: Rect) -> Ray {
        self.ray_from_ndc(map_position(screen_pos, rect))
    }
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new(&CameraSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_eye_matches_settings() {
        let cam = ArcBallCamera::default();
        assert!(cam.eye_position().abs_diff_eq(Vec3::new(0.0, 4.0, 5.0), 1e-4));
        assert!(!cam.layers.contains(Layer::Connection));
    }

    #[test]
    fn test_center_ray_hits_target() {
        let cam = ArcBallCamera::default();
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        let to_target = (cam.target - ray.origin).normalize();
        assert!(ray.direction.abs_diff_eq(to_target, 1e-4));
    }

    #[test]
    fn test_project_then_ray_passes_through_point() {
        let mut cam = ArcBallCamera::default();
        cam.resize(800.0, 600.0);
        let point = Vec3::new(1.0, 0.25, -0.5);
        let ndc = cam.project_ndc(point).unwrap();
        let ray = cam.ray_from_ndc(ndc);
        let t = (point - ray.origin).length();
        assert!(ray.at(t).abs_diff_eq(point, 1e-3));
    }

    #[test]
    fn test_resize_only_touches_aspect() {
        let mut cam = ArcBallCamera::default();
        let eye = cam.eye_position();
        cam.resize(1000.0, 500.0);
        assert_eq!(cam.aspect, 2.0);
        assert_eq!(cam.eye_position(), eye);
        cam.resize(0.0, 500.0);
        assert_eq!(cam.aspect, 2.0);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut cam = ArcBallCamera::default();
        cam.rotate(0.0, 500.0);
        assert_eq!(cam.pitch, 1.5);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut cam = ArcBallCamera::default();
        cam.zoom(0.99);
        cam.zoom(0.99);
        assert_eq!(cam.distance, 0.5);
    }

    #[test]
    fn test_screen_ray_center_of_rect() {
        let cam = ArcBallCamera::default();
        let rect = Rect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(200.0, 200.0));
        let a = cam.screen_ray(rect.center(), rect);
        let b = cam.ray_from_ndc(Vec2::ZERO);
        assert!(a.direction.abs_diff_eq(b.direction, 1e-6));
    }
}
