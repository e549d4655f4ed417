//! Scene nodes and their reflected attributes

use glam::{Quat, Vec3};
use std::any::Any;

use super::ids::{ComponentId, CreateMode, NodeId};
use crate::core::transform::Transform;
use crate::reflect::{assign, AttributeInfo, Reflect, ReflectError};
use crate::variant::{ValueKind, VarMap, Variant};

/// Attribute names shared with the inspector and persistence
pub mod attr {
    pub const IS_ENABLED: &str = "Is Enabled";
    pub const NAME: &str = "Name";
    pub const TAGS: &str = "Tags";
    pub const POSITION: &str = "Position";
    pub const ROTATION: &str = "Rotation";
    pub const SCALE: &str = "Scale";
    pub const VARIABLES: &str = "Variables";
    pub const NETWORK_POSITION: &str = "Network Position";
    pub const NETWORK_ROTATION: &str = "Network Rotation";
}

const NODE_ATTRIBUTES: &[AttributeInfo] = &[
    AttributeInfo::new(attr::IS_ENABLED, ValueKind::Bool),
    AttributeInfo::new(attr::NAME, ValueKind::String),
    AttributeInfo::new(attr::TAGS, ValueKind::StringVector),
    AttributeInfo::new(attr::POSITION, ValueKind::Vector3),
    AttributeInfo::new(attr::ROTATION, ValueKind::Quaternion),
    AttributeInfo::new(attr::SCALE, ValueKind::Vector3),
    AttributeInfo::new(attr::VARIABLES, ValueKind::VariantMap),
    AttributeInfo::read_only(attr::NETWORK_POSITION, ValueKind::Vector3),
    AttributeInfo::read_only(attr::NETWORK_ROTATION, ValueKind::Quaternion),
];

/// A named element of the scene tree
///
/// Structural links (parent, children, components) are maintained by
/// [`Scene`](super::Scene) and only readable from outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) components: Vec<ComponentId>,
    pub(crate) mode: CreateMode,
    pub name: String,
    pub enabled: bool,
    pub tags: Vec<String>,
    /// Transform relative to the parent node
    pub transform: Transform,
    pub vars: VarMap,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: impl Into<String>, mode: CreateMode) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            components: Vec::new(),
            mode,
            name: name.into(),
            enabled: true,
            tags: Vec::new(),
            transform: Transform::default(),
            vars: VarMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }

    pub fn mode(&self) -> CreateMode {
        self.mode
    }

    pub fn var(&self, name: &str) -> Option<&Variant> {
        self.vars.get(name)
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: Variant) {
        self.vars.insert(name.into(), value);
    }

    pub fn remove_var(&mut self, name: &str) -> Option<Variant> {
        self.vars.remove(name)
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Local rotation as a unit quaternion
    pub fn rotation(&self) -> Quat {
        self.transform.orientation()
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    /// Set the local rotation, renormalizing non-unit input
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = if rotation.length_squared() > f32::EPSILON {
            rotation.normalize()
        } else {
            Quat::IDENTITY
        };
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform.scale = scale;
    }
}

impl Reflect for Node {
    fn type_name(&self) -> &'static str {
        "Node"
    }

    fn attributes(&self) -> &'static [AttributeInfo] {
        NODE_ATTRIBUTES
    }

    fn attribute(&self, name: &str) -> Option<Variant> {
        let value = match name {
            attr::IS_ENABLED => Variant::Bool(self.enabled),
            attr::NAME => Variant::String(self.name.clone()),
            attr::TAGS => Variant::StringVector(self.tags.clone()),
            attr::POSITION | attr::NETWORK_POSITION => Variant::Vector3(self.transform.position),
            attr::ROTATION | attr::NETWORK_ROTATION => Variant::Quaternion(self.transform.rotation),
            attr::SCALE => Variant::Vector3(self.transform.scale),
            attr::VARIABLES => Variant::VariantMap(self.vars.clone()),
            _ => return None,
        };
        Some(value)
    }

    fn set_attribute(&mut self, name: &str, value: Variant) -> Result<(), ReflectError> {
        match name {
            attr::IS_ENABLED => assign(&mut self.enabled, name, value),
            attr::NAME => assign(&mut self.name, name, value),
            attr::TAGS => assign(&mut self.tags, name, value),
            attr::POSITION => assign(&mut self.transform.position, name, value),
            attr::ROTATION => assign(&mut self.transform.rotation, name, value),
            attr::SCALE => assign(&mut self.transform.scale, name, value),
            attr::VARIABLES => match value {
                Variant::VariantMap(vars) => {
                    self.vars = vars;
                    Ok(())
                }
                other => Err(ReflectError::KindMismatch {
                    attribute: name.to_string(),
                    expected: ValueKind::VariantMap,
                    found: other.kind(),
                }),
            },
            attr::NETWORK_POSITION | attr::NETWORK_ROTATION => {
                Err(ReflectError::ReadOnly(name.to_string()))
            }
            _ => Err(ReflectError::UnknownAttribute {
                type_name: "Node".to_string(),
                attribute: name.to_string(),
            }),
        }
    }

    fn clone_boxed(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_name_attribute() {
        let mut node = Node::new(NodeId(2), "Box1", CreateMode::Replicated);
        assert_eq!(node.attribute(attr::NAME), Some(Variant::String("Box1".into())));

        node.set_attribute(attr::NAME, Variant::String("Crate".into())).unwrap();
        assert_eq!(node.name, "Crate");
    }

    #[test]
    fn test_rotation_attribute_keeps_written_value() {
        let mut node = Node::new(NodeId(2), "", CreateMode::Local);
        let written = Quat::from_xyzw(0.0, 0.0, 0.0, 2.0);
        node.set_attribute(attr::ROTATION, Variant::Quaternion(written)).unwrap();
        assert_eq!(node.attribute(attr::ROTATION), Some(Variant::Quaternion(written)));
        assert_eq!(node.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn test_network_attributes_are_read_only() {
        let mut node = Node::new(NodeId(2), "", CreateMode::Local);
        let err = node
            .set_attribute(attr::NETWORK_POSITION, Variant::Vector3(Vec3::ONE))
            .unwrap_err();
        assert_eq!(err, ReflectError::ReadOnly(attr::NETWORK_POSITION.to_string()));
        assert!(node.attribute_info(attr::NETWORK_ROTATION).unwrap().is_read_only());
    }

    #[test]
    fn test_unknown_attribute() {
        let mut node = Node::new(NodeId(2), "", CreateMode::Local);
        assert!(node.attribute("Mass").is_none());
        assert!(node.set_attribute("Mass", Variant::Float(1.0)).is_err());
    }
}
