//! Per-frame debug line buffer
//!
//! Shapes are decomposed into line segments; the host renderer drains the
//! buffer once per frame.

use glam::{Mat4, Vec3};

use crate::core::math::Aabb;
use crate::variant::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Color,
    /// Hidden behind geometry when true
    pub depth_test: bool,
}

/// Line segments queued for the current frame
#[derive(Debug, Clone, Default)]
pub struct DebugDraw {
    lines: Vec<DebugLine>,
}

impl DebugDraw {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_line(&mut self, start: Vec3, end: Vec3, color: Color, depth_test: bool) {
        self.lines.push(DebugLine {
            start,
            end,
            color,
            depth_test,
        });
    }

    /// Twelve edges of a world-space box
    pub fn add_box(&mut self, aabb: &Aabb, color: Color, depth_test: bool) {
        let c = aabb.corners();
        const EDGES: [(usize, usize); 12] = [
            (0, 1), (2, 3), (4, 5), (6, 7),
            (0, 2), (1, 3), (4, 6), (5, 7),
            (0, 4), (1, 5), (2, 6), (3, 7),
        ];
        for (a, b) in EDGES {
            self.add_line(c[a], c[b], color, depth_test);
        }
    }

    /// Circle around `normal` through `center`
    pub fn add_circle(
        &mut self,
        center: Vec3,
        normal: Vec3,
        radius: f32,
        color: Color,
        segments: usize,
        depth_test: bool,
    ) {
        let Some(normal) = normal.try_normalize() else {
            return;
        };
        let segments = segments.max(3);
        let (u, v) = normal.any_orthonormal_pair();
        let point = |i: usize| {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            center + (u * angle.cos() + v * angle.sin()) * radius
        };
        for i in 0..segments {
            self.add_line(point(i), point(i + 1), color, depth_test);
        }
    }

    /// Three short axis-aligned segments crossing at `center`
    pub fn add_cross(&mut self, center: Vec3, size: f32, color: Color, depth_test: bool) {
        let half = size * 0.5;
        for axis in Vec3::AXES {
            self.add_line(center - axis * half, center + axis * half, color, depth_test);
        }
    }

    /// Local axes of a transform: X red, Y green, Z blue
    pub fn add_axes(&mut self, transform: &Mat4, length: f32, depth_test: bool) {
        let origin = transform.transform_point3(Vec3::ZERO);
        let colors = [Color::RED, Color::GREEN, Color::BLUE];
        for (axis, color) in Vec3::AXES.into_iter().zip(colors) {
            let tip = origin + transform.transform_vector3(axis).normalize_or_zero() * length;
            self.add_line(origin, tip, color, depth_test);
        }
    }

    pub fn lines(&self) -> &[DebugLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Hand the queued lines to the renderer and start a new frame
    pub fn drain(&mut self) -> Vec<DebugLine> {
        std::mem::take(&mut self.lines)
    }
}
