//! Scene engine surface for the in-game editor
//!
//! This crate provides the scene graph with reflected components, scene and
//! prefab persistence, ray picking, a retained UI tree with typed event
//! handlers, input state, and a debug line buffer.

extern crate self as engine;

pub mod config;
pub mod core;
pub mod dev;
pub mod input;
pub mod io;
pub mod reflect;
pub mod scene;
pub mod ui;
pub mod variant;

pub use engine_derive::Reflect;
pub use reflect::Reflect;

// Re-export commonly used types
pub mod prelude {
    // Scene types
    pub use crate::scene::components::{
        CollisionShape, DebugRenderer, Light, Octree, RigidBody, SoundSource, StaticModel, Zone,
    };
    pub use crate::scene::{
        ComponentId, ComponentSlot, CreateMode, Node, NodeId, RayHit, Scene, TransformSpace,
        ROOT_ID,
    };

    // Camera and math types
    pub use crate::core::camera::Camera;
    pub use crate::core::math::{Aabb, Ray};
    pub use crate::core::transform::{GlobalTransform, Transform};
    pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

    // Reflection types
    pub use crate::reflect::{AttributeInfo, Reflect, ReflectError, TypeInfo};
    pub use crate::variant::{Color, ValueKind, VarMap, Variant};

    // IO types
    pub use crate::io::{ComponentRegistry, SceneError};

    // Config types
    pub use crate::config::AssetConfig;

    // Input types
    pub use crate::input::InputState;

    // UI types
    pub use crate::ui::{ElementKind, ItemTag, ListItem, UiElementId, UiEvent, UiEventKind, UiTree};

    pub use winit;
}

/// Initialize logging for the engine
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
