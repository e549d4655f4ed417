//! Scene and prefab serialization
//!
//! Nodes and components are written as lists of reflected attributes, so
//! any registered component type round-trips without dedicated serde code.
//! Node and component ids are stored as-is: loading a scene file restores the
//! exact ids it was saved with, which keeps ids stored in variables valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::component_registry::ComponentRegistry;
use crate::reflect::{Reflect, ReflectError};
use crate::scene::{ComponentId, ComponentSlot, CreateMode, Node, NodeId, Scene};
use crate::variant::Variant;

/// Current on-disk format version
pub const SCENE_FORMAT_VERSION: u32 = 1;

/// Errors that can occur during scene operations
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown component type: {0}")]
    UnknownComponent(String),

    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Component {0} not found")]
    ComponentNotFound(ComponentId),

    #[error("Duplicate node id {0} in scene file")]
    DuplicateNode(NodeId),

    #[error("The scene root cannot be removed")]
    RootRemoval,

    #[error("Attribute error: {0}")]
    Attribute(#[from] ReflectError),
}

/// A named attribute value as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedAttribute {
    pub name: String,
    pub value: Variant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedComponent {
    pub id: u32,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub mode: CreateMode,
    #[serde(default)]
    pub attributes: Vec<SerializedAttribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNode {
    pub id: u32,
    #[serde(default)]
    pub mode: CreateMode,
    #[serde(default)]
    pub attributes: Vec<SerializedAttribute>,
    #[serde(default)]
    pub components: Vec<SerializedComponent>,
    #[serde(default)]
    pub children: Vec<SerializedNode>,
}

/// Whole-scene document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    pub version: u32,
    pub next_node_id: u32,
    pub next_component_id: u32,
    pub root: SerializedNode,
}

/// Node subtree document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefabFile {
    pub version: u32,
    pub root: SerializedNode,
}

fn serialize_attributes(object: &dyn Reflect) -> Vec<SerializedAttribute> {
    object
        .attributes()
        .iter()
        .filter(|info| !info.is_read_only())
        .filter_map(|info| {
            object.attribute(info.name).map(|value| SerializedAttribute {
                name: info.name.to_string(),
                value,
            })
        })
        .collect()
}

fn apply_attributes(object: &mut dyn Reflect, attributes: &[SerializedAttribute]) {
    for attribute in attributes {
        if let Err(e) = object.set_attribute(&attribute.name, attribute.value.clone()) {
            warn!(
                type_name = object.type_name(),
                attribute = %attribute.name,
                error = %e,
                "Skipping attribute"
            );
        }
    }
}

fn build_node(data: &SerializedNode, id: NodeId) -> Node {
    let mut node = Node::new(id, "", data.mode);
    apply_attributes(&mut node, &data.attributes);
    node
}

fn build_component(
    data: &SerializedComponent,
    registry: &ComponentRegistry,
) -> Option<Box<dyn Reflect>> {
    let Some(mut component) = registry.create(&data.type_name) else {
        warn!(type_name = %data.type_name, "Skipping unknown component type");
        return None;
    };
    apply_attributes(component.as_mut(), &data.attributes);
    Some(component)
}

impl Scene {
    fn serialize_node(&self, id: NodeId) -> Option<SerializedNode> {
        let node = self.node(id)?;
        let components = node
            .components()
            .iter()
            .filter_map(|c| self.component(*c))
            .map(|slot| SerializedComponent {
                id: slot.id().0,
                type_name: slot.type_name().to_string(),
                mode: slot.mode(),
                attributes: serialize_attributes(slot.data()),
            })
            .collect();
        let children = node
            .children()
            .iter()
            .filter_map(|c| self.serialize_node(*c))
            .collect();

        Some(SerializedNode {
            id: id.0,
            mode: node.mode(),
            attributes: serialize_attributes(node),
            components,
            children,
        })
    }

    /// Capture the whole scene as a serializable document
    pub fn to_file(&self) -> SceneFile {
        let (next_node_id, next_component_id) = self.next_ids();
        let root = self.serialize_node(self.root()).unwrap_or(SerializedNode {
            id: self.root().0,
            mode: CreateMode::Replicated,
            attributes: Vec::new(),
            components: Vec::new(),
            children: Vec::new(),
        });
        SceneFile {
            version: SCENE_FORMAT_VERSION,
            next_node_id,
            next_component_id,
            root,
        }
    }

    /// Rebuild a scene from a document, preserving ids
    ///
    /// Unknown component types and attributes are skipped with a warning.
    pub fn from_file(file: &SceneFile, registry: &ComponentRegistry) -> Result<Self, SceneError> {
        let mut scene = Scene::new("");
        let root_id = NodeId(file.root.id);
        scene.replace_root(build_node(&file.root, root_id));
        scene.restore_contents(&file.root, root_id, registry)?;
        scene.reserve_ids(file.next_node_id, file.next_component_id);
        debug!(
            nodes = scene.node_count(),
            components = scene.component_count(),
            "Rebuilt scene from file"
        );
        Ok(scene)
    }

    fn restore_contents(
        &mut self,
        data: &SerializedNode,
        id: NodeId,
        registry: &ComponentRegistry,
    ) -> Result<(), SceneError> {
        for component in &data.components {
            if let Some(boxed) = build_component(component, registry) {
                self.attach_component(ComponentSlot {
                    id: ComponentId(component.id),
                    node: id,
                    mode: component.mode,
                    data: boxed,
                });
            }
        }
        for child in &data.children {
            let child_id = NodeId(child.id);
            if self.contains_node(child_id) {
                return Err(SceneError::DuplicateNode(child_id));
            }
            self.attach_node(build_node(child, child_id), id);
            self.restore_contents(child, child_id, registry)?;
        }
        Ok(())
    }

    /// Save the scene to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneError> {
        let json = serde_json::to_string_pretty(&self.to_file())?;
        fs::write(&path, json)?;
        info!(
            path = ?path.as_ref(),
            nodes = self.node_count(),
            components = self.component_count(),
            "Saved scene"
        );
        Ok(())
    }

    /// Load a scene from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(
        path: P,
        registry: &ComponentRegistry,
    ) -> Result<Self, SceneError> {
        let content = fs::read_to_string(&path)?;
        let file: SceneFile = serde_json::from_str(&content)?;
        if file.version != SCENE_FORMAT_VERSION {
            warn!(version = file.version, "Scene file version differs from current");
        }
        let scene = Self::from_file(&file, registry)?;
        info!(path = ?path.as_ref(), nodes = scene.node_count(), "Loaded scene");
        Ok(scene)
    }

    /// Save one node and its subtree as a prefab
    pub fn save_node<P: AsRef<Path>>(&self, node: NodeId, path: P) -> Result<(), SceneError> {
        let root = self
            .serialize_node(node)
            .ok_or(SceneError::NodeNotFound(node))?;
        let prefab = PrefabFile {
            version: SCENE_FORMAT_VERSION,
            root,
        };
        fs::write(&path, serde_json::to_string_pretty(&prefab)?)?;
        info!(path = ?path.as_ref(), node = %node, "Saved prefab");
        Ok(())
    }

    /// Load a prefab under `parent`, giving every node and component a new id
    pub fn instantiate_node<P: AsRef<Path>>(
        &mut self,
        path: P,
        parent: NodeId,
        registry: &ComponentRegistry,
    ) -> Result<NodeId, SceneError> {
        if !self.contains_node(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let content = fs::read_to_string(&path)?;
        let prefab: PrefabFile = serde_json::from_str(&content)?;

        let mut created = 0;
        let root = self.instantiate_subtree(&prefab.root, parent, registry, &mut created);
        info!(path = ?path.as_ref(), node = %root, nodes = created, "Instantiated prefab");
        Ok(root)
    }

    fn instantiate_subtree(
        &mut self,
        data: &SerializedNode,
        parent: NodeId,
        registry: &ComponentRegistry,
        created: &mut usize,
    ) -> NodeId {
        let id = self.allocate_node_id();
        *created += 1;
        debug!(saved_id = data.id, node = %id, "Instantiating prefab node");
        self.attach_node(build_node(data, id), parent);

        for component in &data.components {
            if let Some(boxed) = build_component(component, registry) {
                let component_id = self.allocate_component_id();
                self.attach_component(ComponentSlot {
                    id: component_id,
                    node: id,
                    mode: component.mode,
                    data: boxed,
                });
            }
        }
        for child in &data.children {
            self.instantiate_subtree(child, id, registry, created);
        }
        id
    }
}
