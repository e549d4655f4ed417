//! Built-in component types
//!
//! These carry only the state the editor inspects and persists; rendering,
//! physics and audio are provided elsewhere by the host.

use glam::{Quat, Vec3};

use crate::core::math::Aabb;
use crate::variant::{Color, ResourceRef, ResourceRefList};
use crate::Reflect;

/// Local bounds of the stock models, falling back to a unit cube
pub fn model_bounds(model: &str) -> Aabb {
    match model {
        "Models/Plane.mdl" => Aabb::new(Vec3::new(-0.5, -0.01, -0.5), Vec3::new(0.5, 0.01, 0.5)),
        "Models/Jack.mdl" => Aabb::new(Vec3::new(-0.35, 0.0, -0.35), Vec3::new(0.35, 1.8, 0.35)),
        "Models/Cylinder.mdl" => Aabb::new(Vec3::new(-0.5, -0.5, -0.5), Vec3::new(0.5, 0.5, 0.5)),
        _ => Aabb::default(),
    }
}

/// Model renderer; the only drawable built-in
#[derive(Debug, Clone, PartialEq, Reflect)]
#[reflect(name = "StaticModel", category = "Geometry", drawable = "bounds")]
pub struct StaticModel {
    #[reflect(rename = "Is Enabled")]
    pub enabled: bool,
    #[reflect(rename = "Model")]
    pub model: ResourceRef,
    #[reflect(rename = "Material")]
    pub material: ResourceRefList,
    #[reflect(rename = "Cast Shadows")]
    pub cast_shadows: bool,
    #[reflect(rename = "Occluder")]
    pub occluder: bool,
    #[reflect(rename = "LOD Bias")]
    pub lod_bias: f32,
}

impl Default for StaticModel {
    fn default() -> Self {
        Self {
            enabled: true,
            model: ResourceRef::new("Model", ""),
            material: ResourceRefList::new("Material", Vec::new()),
            cast_shadows: false,
            occluder: false,
            lod_bias: 1.0,
        }
    }
}

impl StaticModel {
    pub fn with_model(model: &str, material: &str) -> Self {
        Self {
            model: ResourceRef::new("Model", model),
            material: ResourceRefList::new("Material", vec![material.to_string()]),
            ..Default::default()
        }
    }

    /// Local bounds, absent while disabled or without a model
    pub fn bounds(&self) -> Option<Aabb> {
        if !self.enabled || self.model.name.is_empty() {
            return None;
        }
        Some(model_bounds(&self.model.name))
    }
}

/// Ambient lighting and fog volume
#[derive(Debug, Clone, PartialEq, Reflect)]
#[reflect(name = "Zone", category = "Scene")]
pub struct Zone {
    #[reflect(rename = "Bounding Box Min")]
    pub bounding_min: Vec3,
    #[reflect(rename = "Bounding Box Max")]
    pub bounding_max: Vec3,
    #[reflect(rename = "Ambient Color")]
    pub ambient_color: Color,
    #[reflect(rename = "Fog Color")]
    pub fog_color: Color,
    #[reflect(rename = "Fog Start")]
    pub fog_start: f32,
    #[reflect(rename = "Fog End")]
    pub fog_end: f32,
}

impl Default for Zone {
    fn default() -> Self {
        Self {
            bounding_min: Vec3::splat(-1000.0),
            bounding_max: Vec3::splat(1000.0),
            ambient_color: Color::rgb(0.15, 0.15, 0.15),
            fog_color: Color::rgb(0.5, 0.5, 0.7),
            fog_start: 100.0,
            fog_end: 300.0,
        }
    }
}

/// Light source
#[derive(Debug, Clone, PartialEq, Reflect)]
#[reflect(name = "Light", category = "Scene")]
pub struct Light {
    /// 0 directional, 1 spot, 2 point
    #[reflect(rename = "Light Type")]
    pub light_type: i32,
    #[reflect(rename = "Color")]
    pub color: Color,
    #[reflect(rename = "Brightness Multiplier")]
    pub brightness: f32,
    #[reflect(rename = "Range")]
    pub range: f32,
    #[reflect(rename = "Spot FOV")]
    pub spot_fov: f32,
    #[reflect(rename = "Cast Shadows")]
    pub cast_shadows: bool,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            light_type: 2,
            color: Color::WHITE,
            brightness: 1.0,
            range: 10.0,
            spot_fov: 30.0,
            cast_shadows: false,
        }
    }
}

/// Debug geometry sink
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(name = "DebugRenderer", category = "Subsystem")]
pub struct DebugRenderer {
    #[reflect(rename = "Line Antialias")]
    pub line_antialias: bool,
}

/// Spatial partitioning of drawables
#[derive(Debug, Clone, PartialEq, Reflect)]
#[reflect(name = "Octree", category = "Subsystem")]
pub struct Octree {
    #[reflect(rename = "Bounding Box Min")]
    pub bounding_min: Vec3,
    #[reflect(rename = "Bounding Box Max")]
    pub bounding_max: Vec3,
    #[reflect(rename = "Number of Levels")]
    pub levels: i32,
}

impl Default for Octree {
    fn default() -> Self {
        Self {
            bounding_min: Vec3::splat(-1000.0),
            bounding_max: Vec3::splat(1000.0),
            levels: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Reflect)]
#[reflect(name = "RigidBody", category = "Physics")]
pub struct RigidBody {
    #[reflect(rename = "Mass")]
    pub mass: f32,
    #[reflect(rename = "Friction")]
    pub friction: f32,
    #[reflect(rename = "Linear Velocity")]
    pub linear_velocity: Vec3,
    #[reflect(rename = "Use Gravity")]
    pub use_gravity: bool,
    #[reflect(rename = "Is Kinematic")]
    pub kinematic: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            mass: 0.0,
            friction: 0.5,
            linear_velocity: Vec3::ZERO,
            use_gravity: true,
            kinematic: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Reflect)]
#[reflect(name = "CollisionShape", category = "Physics")]
pub struct CollisionShape {
    /// 0 box, 1 sphere, 2 capsule
    #[reflect(rename = "Shape Type")]
    pub shape_type: i32,
    #[reflect(rename = "Size")]
    pub size: Vec3,
    #[reflect(rename = "Offset Position")]
    pub offset_position: Vec3,
    #[reflect(rename = "Offset Rotation")]
    pub offset_rotation: Quat,
}

impl Default for CollisionShape {
    fn default() -> Self {
        Self {
            shape_type: 0,
            size: Vec3::ONE,
            offset_position: Vec3::ZERO,
            offset_rotation: Quat::IDENTITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Reflect)]
#[reflect(name = "SoundSource", category = "Audio")]
pub struct SoundSource {
    #[reflect(rename = "Sound")]
    pub sound: ResourceRef,
    #[reflect(rename = "Gain")]
    pub gain: f32,
    #[reflect(rename = "Is Playing", readonly)]
    pub playing: bool,
}

impl Default for SoundSource {
    fn default() -> Self {
        Self {
            sound: ResourceRef::new("Sound", ""),
            gain: 1.0,
            playing: false,
        }
    }
}
