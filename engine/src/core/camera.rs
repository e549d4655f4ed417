//! Camera component and utilities
//!
//! Provides projection parameters, view matrix calculation from a node's world
//! transform, and conversion of screen positions into picking rays.

use glam::{Mat4, Vec3};

use super::math::Ray;
use crate::Reflect;

/// Camera component that defines projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(name = "Camera", category = "Scene")]
pub struct Camera {
    /// Vertical field of view in degrees
    #[reflect(rename = "FOV")]
    pub fov_degrees: f32,
    /// Width divided by height
    #[reflect(rename = "Aspect Ratio")]
    pub aspect_ratio: f32,
    #[reflect(rename = "Near Clip")]
    pub near_clip: f32,
    #[reflect(rename = "Far Clip")]
    pub far_clip: f32,
    #[reflect(rename = "Orthographic")]
    pub orthographic: bool,
    /// Height of the view volume in orthographic mode
    #[reflect(rename = "Orthographic Size")]
    pub ortho_size: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(45.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl Camera {
    /// Create a perspective camera
    ///
    /// # Arguments
    /// * `fov_y_degrees` - Vertical field of view in degrees
    /// * `aspect_ratio` - Width divided by height
    /// * `near_clip` - Near clipping plane distance
    /// * `far_clip` - Far clipping plane distance
    pub fn perspective(fov_y_degrees: f32, aspect_ratio: f32, near_clip: f32, far_clip: f32) -> Self {
        Self {
            fov_degrees: fov_y_degrees,
            aspect_ratio,
            near_clip,
            far_clip,
            orthographic: false,
            ortho_size: 20.0,
        }
    }

    /// Calculate the projection matrix for this camera
    pub fn projection_matrix(&self) -> Mat4 {
        if self.orthographic {
            let half_height = self.ortho_size * 0.5;
            let half_width = half_height * self.aspect_ratio;
            Mat4::orthographic_rh(
                -half_width,
                half_width,
                -half_height,
                half_height,
                self.near_clip,
                self.far_clip,
            )
        } else {
            Mat4::perspective_rh(
                self.fov_degrees.to_radians(),
                self.aspect_ratio,
                self.near_clip,
                self.far_clip,
            )
        }
    }

    /// The view matrix is the inverse of the camera node's world transform
    pub fn view_matrix(camera_world: &Mat4) -> Mat4 {
        camera_world.inverse()
    }

    pub fn view_projection_matrix(&self, camera_world: &Mat4) -> Mat4 {
        self.projection_matrix() * Self::view_matrix(camera_world)
    }

    /// Update the aspect ratio (useful when the viewport resizes)
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Ray through a normalized screen position
    ///
    /// `x` and `y` are in `[0, 1]` with the origin at the top-left corner.
    pub fn screen_ray(&self, x: f32, y: f32, camera_world: &Mat4) -> Ray {
        let ndc_x = x * 2.0 - 1.0;
        let ndc_y = 1.0 - y * 2.0;
        let inverse = self.view_projection_matrix(camera_world).inverse();
        let near = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        Ray::new(near, far - near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transform::Transform;

    #[test]
    fn test_camera_perspective_projection() {
        let camera = Camera::perspective(60.0, 16.0 / 9.0, 0.1, 1000.0);
        let proj = camera.projection_matrix();

        // Perspective projection has w=0 in the last row
        assert_eq!(proj.w_axis.w, 0.0);
        assert!(proj.z_axis.z < 0.0);
    }

    #[test]
    fn test_camera_orthographic_projection() {
        let mut camera = Camera::default();
        camera.orthographic = true;
        assert_eq!(camera.projection_matrix().w_axis.w, 1.0);
    }

    #[test]
    fn test_view_matrix() {
        let world = Transform::from_position(Vec3::new(0.0, 0.0, 5.0)).to_matrix();
        let view = Camera::view_matrix(&world);

        // View matrix should translate in opposite direction
        assert_eq!(view.w_axis.z, -5.0);
    }

    #[test]
    fn test_screen_ray_center_points_forward() {
        let camera = Camera::default();
        let world = Transform::from_position(Vec3::new(0.0, 2.0, 10.0)).to_matrix();
        let ray = camera.screen_ray(0.5, 0.5, &world);

        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, 1e-4));
        assert!((ray.origin - Vec3::new(0.0, 2.0, 9.9)).length() < 1e-3);
    }

    #[test]
    fn test_screen_ray_top_left_points_up_left() {
        let camera = Camera::default();
        let ray = camera.screen_ray(0.0, 0.0, &Mat4::IDENTITY);
        assert!(ray.direction.x < 0.0);
        assert!(ray.direction.y > 0.0);
    }

    #[test]
    fn test_set_aspect_ratio() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(4.0 / 3.0);
        assert_eq!(camera.aspect_ratio, 4.0 / 3.0);
    }
}
