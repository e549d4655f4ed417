//! Angle conventions, rays and bounding boxes
//!
//! The engine is right-handed with `-Z` as forward and `+Y` as up. Yaw is
//! measured in degrees clockwise when seen from above (positive yaw turns
//! right), pitch in degrees with positive values looking down.

use glam::{Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Local forward direction of every node
pub const FORWARD: Vec3 = Vec3::NEG_Z;
/// World up direction
pub const UP: Vec3 = Vec3::Y;
/// Local right direction of every node
pub const RIGHT: Vec3 = Vec3::X;

/// Build a rotation from pitch and yaw in degrees, with zero roll
pub fn look_rotation(pitch_degrees: f32, yaw_degrees: f32) -> Quat {
    Quat::from_rotation_y(-yaw_degrees.to_radians()) * Quat::from_rotation_x(-pitch_degrees.to_radians())
}

/// Rotation about world up only
pub fn yaw_rotation(yaw_degrees: f32) -> Quat {
    look_rotation(0.0, yaw_degrees)
}

/// Yaw in degrees of the forward direction of `rotation`
pub fn yaw_of(rotation: Quat) -> f32 {
    let forward = rotation * FORWARD;
    forward.x.atan2(-forward.z).to_degrees()
}

/// Pitch in degrees of the forward direction of `rotation`
pub fn pitch_of(rotation: Quat) -> f32 {
    let forward = (rotation * FORWARD).normalize_or_zero();
    (-forward.y).clamp(-1.0, 1.0).asin().to_degrees()
}

/// Angle in degrees from `from` to `to`, negative when the turn is clockwise
/// about `up`
pub fn signed_angle(from: Vec3, to: Vec3, up: Vec3) -> f32 {
    let angle = from.angle_between(to).to_degrees();
    if up.dot(from.cross(to)) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// World rotation whose forward points along `direction`
///
/// Returns `None` for a zero-length direction.
pub fn rotation_towards(direction: Vec3, up: Vec3) -> Option<Quat> {
    let forward = direction.try_normalize()?;
    let mut right = forward.cross(up);
    if right.length_squared() < 1e-8 {
        right = forward.cross(Vec3::Z);
    }
    let right = right.normalize();
    let up = right.cross(forward);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize())
}

/// Axis aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Vec3::splat(-0.5), Vec3::splat(0.5))
    }
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Radius of the sphere enclosing the box, centered on the box
    pub fn bounding_radius(&self) -> f32 {
        self.half_extents().length()
    }

    /// Eight corners of the box
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Box enclosing this box after transforming it by `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in self.corners() {
            let p = matrix.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }
}

/// Half-line used for picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Slab test against a box, returning the entry distance and face normal
    ///
    /// A ray starting inside the box hits at distance zero with the normal
    /// facing back along the ray.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<(f32, Vec3)> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        let mut normal = Vec3::ZERO;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

            if dir.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t1 = (lo - origin) * inv;
            let mut t2 = (hi - origin) * inv;
            let mut sign = -1.0;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
                sign = 1.0;
            }
            if t1 > t_near {
                t_near = t1;
                normal = Vec3::AXES[axis] * sign;
            }
            t_far = t_far.min(t2);
            if t_near > t_far {
                return None;
            }
        }

        if t_far < 0.0 {
            return None;
        }
        if t_near < 0.0 {
            return Some((0.0, -self.direction));
        }
        Some((t_near, normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_look_rotation_yaw_turns_right() {
        let forward = look_rotation(0.0, 90.0) * FORWARD;
        assert!(forward.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_look_rotation_pitch_looks_down() {
        let forward = look_rotation(45.0, 0.0) * FORWARD;
        assert!(forward.y < 0.0);
        assert!(forward.z < 0.0);
    }

    #[test]
    fn test_yaw_pitch_round_trip() {
        let rotation = look_rotation(-30.0, 135.0);
        assert!(approx(yaw_of(rotation), 135.0));
        assert!(approx(pitch_of(rotation), -30.0));
    }

    #[test]
    fn test_signed_angle_direction() {
        let right_turn = signed_angle(FORWARD, Vec3::X, UP);
        let left_turn = signed_angle(FORWARD, Vec3::NEG_X, UP);
        assert!(approx(right_turn, -90.0));
        assert!(approx(left_turn, 90.0));
    }

    #[test]
    fn test_rotation_towards() {
        let rotation = rotation_towards(Vec3::new(1.0, 0.0, 0.0), UP).unwrap();
        assert!((rotation * FORWARD).abs_diff_eq(Vec3::X, 1e-5));
        assert!(rotation_towards(Vec3::ZERO, UP).is_none());

        let straight_down = rotation_towards(Vec3::NEG_Y, UP).unwrap();
        assert!((straight_down * FORWARD).abs_diff_eq(Vec3::NEG_Y, 1e-5));
    }

    #[test]
    fn test_ray_hits_box_front_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), FORWARD);
        let (distance, normal) = ray.intersect_aabb(&Aabb::default()).unwrap();
        assert!(approx(distance, 9.5));
        assert_eq!(normal, Vec3::Z);
    }

    #[test]
    fn test_ray_misses_box() {
        let ray = Ray::new(Vec3::new(2.0, 0.0, 10.0), FORWARD);
        assert!(ray.intersect_aabb(&Aabb::default()).is_none());

        let behind = Ray::new(Vec3::new(0.0, 0.0, -10.0), FORWARD);
        assert!(behind.intersect_aabb(&Aabb::default()).is_none());
    }

    #[test]
    fn test_transformed_box() {
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 1.0, 1.0),
            Quat::IDENTITY,
            Vec3::new(0.0, 5.0, 0.0),
        );
        let aabb = Aabb::default().transformed(&matrix);
        assert!(aabb.min.abs_diff_eq(Vec3::new(-1.0, 4.5, -0.5), 1e-5));
        assert!(aabb.max.abs_diff_eq(Vec3::new(1.0, 5.5, 0.5), 1e-5));
    }
}
