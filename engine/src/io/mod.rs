//! Input/Output module for scene and prefab serialization

pub mod component_registry;
mod scene;

pub use component_registry::ComponentRegistry;
pub use scene::{
    PrefabFile, SceneError, SceneFile, SerializedAttribute, SerializedComponent, SerializedNode,
    SCENE_FORMAT_VERSION,
};
