//! Scene graph of nodes and components
//!
//! A [`Scene`] owns every node and component in flat id-keyed maps. The tree
//! is expressed through parent/child id links, so any id held by a caller is
//! a weak reference: it resolves to `None` once the target has been removed.

pub mod components;
mod ids;
mod node;
mod raycast;

pub use ids::{ComponentId, CreateMode, NodeId};
pub use node::{attr, Node};
pub use raycast::RayHit;

use glam::{Mat4, Quat, Vec3};
use std::collections::HashMap;
use tracing::debug;

use crate::core::math::{self, Aabb, UP};
use crate::core::transform::GlobalTransform;
use crate::io::{ComponentRegistry, SceneError};
use crate::reflect::Reflect;
use crate::variant::Variant;

/// Id of the root node of every scene
pub const ROOT_ID: NodeId = NodeId(1);

/// Reference frame for relative transform changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformSpace {
    Local,
    Parent,
    World,
}

/// A component instance and the node that owns it
#[derive(Debug, Clone)]
pub struct ComponentSlot {
    pub(crate) id: ComponentId,
    pub(crate) node: NodeId,
    pub(crate) mode: CreateMode,
    pub(crate) data: Box<dyn Reflect>,
}

impl ComponentSlot {
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn mode(&self) -> CreateMode {
        self.mode
    }

    pub fn type_name(&self) -> &'static str {
        self.data.type_name()
    }

    pub fn data(&self) -> &dyn Reflect {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> &mut dyn Reflect {
        self.data.as_mut()
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    root: NodeId,
    nodes: HashMap<NodeId, Node>,
    components: HashMap<ComponentId, ComponentSlot>,
    /// Whether scene logic advances each frame
    pub update_enabled: bool,
    next_node_id: u32,
    next_component_id: u32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("Scene")
    }
}

impl Scene {
    /// Create a scene holding only its root node
    pub fn new(name: impl Into<String>) -> Self {
        let root = Node::new(ROOT_ID, name, CreateMode::Replicated);
        let mut nodes = HashMap::new();
        nodes.insert(ROOT_ID, root);
        Self {
            root: ROOT_ID,
            nodes,
            components: HashMap::new(),
            update_enabled: true,
            next_node_id: ROOT_ID.0 + 1,
            next_component_id: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn name(&self) -> &str {
        self.nodes.get(&self.root).map(|n| n.name.as_str()).unwrap_or_default()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn component(&self, id: ComponentId) -> Option<&ComponentSlot> {
        self.components.get(&id)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut ComponentSlot> {
        self.components.get_mut(&id)
    }

    pub fn contains_component(&self, id: ComponentId) -> bool {
        self.components.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Children of a node in order; empty for unknown ids
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(|n| n.children()).unwrap_or_default()
    }

    /// Components of a node in order; empty for unknown ids
    pub fn components_of(&self, id: NodeId) -> &[ComponentId] {
        self.nodes.get(&id).map(|n| n.components()).unwrap_or_default()
    }

    /// Typed access to a component's data
    pub fn get<T: Reflect>(&self, id: ComponentId) -> Option<&T> {
        self.components.get(&id)?.data.downcast_ref::<T>()
    }

    pub fn get_mut<T: Reflect>(&mut self, id: ComponentId) -> Option<&mut T> {
        self.components.get_mut(&id)?.data.downcast_mut::<T>()
    }

    /// First component of type `T` on a node
    pub fn component_of<T: Reflect>(&self, node: NodeId) -> Option<ComponentId> {
        self.components_of(node)
            .iter()
            .copied()
            .find(|c| self.get::<T>(*c).is_some())
    }

    /// First component on a node that takes part in picking
    pub fn first_drawable(&self, node: NodeId) -> Option<ComponentId> {
        self.components_of(node).iter().copied().find(|c| {
            self.components
                .get(c)
                .is_some_and(|slot| slot.data.drawable_bounds().is_some())
        })
    }

    /// Find a child by name, optionally searching the whole subtree depth-first
    pub fn child_by_name(&self, parent: NodeId, name: &str, recursive: bool) -> Option<NodeId> {
        for &child in self.children(parent) {
            if self.nodes.get(&child).is_some_and(|n| n.name == name) {
                return Some(child);
            }
            if recursive {
                if let Some(found) = self.child_by_name(child, name, true) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Node ids of a subtree in pre-order, children in child order
    pub fn preorder(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Create a child node under `parent`
    pub fn create_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        mode: CreateMode,
    ) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        let node = Node::new(id, name, mode);
        debug!(node = %id, parent = %parent, name = %node.name, "Created node");
        self.attach_node(node, parent);
        Ok(id)
    }

    /// Insert a node with a preassigned id under `parent`
    pub(crate) fn attach_node(&mut self, mut node: Node, parent: NodeId) {
        node.parent = Some(parent);
        let id = node.id;
        self.next_node_id = self.next_node_id.max(id.0 + 1);
        self.nodes.insert(id, node);
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.push(id);
        }
    }

    /// Insert a component with a preassigned id at the end of its node's list
    pub(crate) fn attach_component(&mut self, slot: ComponentSlot) {
        let id = slot.id;
        let node = slot.node;
        self.next_component_id = self.next_component_id.max(id.0 + 1);
        self.components.insert(id, slot);
        if let Some(node) = self.nodes.get_mut(&node) {
            node.components.push(id);
        }
    }

    pub(crate) fn replace_root(&mut self, root: Node) {
        self.next_node_id = self.next_node_id.max(root.id.0 + 1);
        self.nodes.remove(&self.root);
        self.root = root.id;
        self.nodes.insert(root.id, root);
    }

    pub(crate) fn reserve_ids(&mut self, next_node_id: u32, next_component_id: u32) {
        self.next_node_id = self.next_node_id.max(next_node_id);
        self.next_component_id = self.next_component_id.max(next_component_id);
    }

    pub(crate) fn next_ids(&self) -> (u32, u32) {
        (self.next_node_id, self.next_component_id)
    }

    pub(crate) fn allocate_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    pub(crate) fn allocate_component_id(&mut self) -> ComponentId {
        let id = ComponentId(self.next_component_id);
        self.next_component_id += 1;
        id
    }

    /// Remove a node, its subtree, and every component in it
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), SceneError> {
        if id == self.root {
            return Err(SceneError::RootRemoval);
        }
        let parent = self
            .nodes
            .get(&id)
            .ok_or(SceneError::NodeNotFound(id))?
            .parent;

        let subtree = self.preorder(id);
        for node_id in &subtree {
            if let Some(node) = self.nodes.remove(node_id) {
                for component in node.components {
                    self.components.remove(&component);
                }
            }
        }
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }

        debug!(node = %id, removed = subtree.len(), "Removed node subtree");
        Ok(())
    }

    /// Attach already constructed component data to a node
    pub fn add_component<T: Reflect>(
        &mut self,
        node: NodeId,
        data: T,
        mode: CreateMode,
    ) -> Result<ComponentId, SceneError> {
        self.add_boxed_component(node, Box::new(data), mode)
    }

    pub fn add_boxed_component(
        &mut self,
        node: NodeId,
        data: Box<dyn Reflect>,
        mode: CreateMode,
    ) -> Result<ComponentId, SceneError> {
        if !self.nodes.contains_key(&node) {
            return Err(SceneError::NodeNotFound(node));
        }
        let id = self.allocate_component_id();
        debug!(component = %id, node = %node, type_name = data.type_name(), "Created component");
        self.attach_component(ComponentSlot {
            id,
            node,
            mode,
            data,
        });
        Ok(id)
    }

    /// Create a component by registered type name
    pub fn create_component(
        &mut self,
        node: NodeId,
        type_name: &str,
        mode: CreateMode,
        registry: &ComponentRegistry,
    ) -> Result<ComponentId, SceneError> {
        let data = registry
            .create(type_name)
            .ok_or_else(|| SceneError::UnknownComponent(type_name.to_string()))?;
        self.add_boxed_component(node, data, mode)
    }

    pub fn remove_component(&mut self, id: ComponentId) -> Result<(), SceneError> {
        let slot = self
            .components
            .remove(&id)
            .ok_or(SceneError::ComponentNotFound(id))?;
        if let Some(node) = self.nodes.get_mut(&slot.node) {
            node.components.retain(|c| *c != id);
        }
        debug!(component = %id, node = %slot.node, "Removed component");
        Ok(())
    }

    /// Read a variable stored on the scene root
    pub fn var(&self, name: &str) -> Option<&Variant> {
        self.nodes.get(&self.root)?.var(name)
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: Variant) {
        if let Some(root) = self.nodes.get_mut(&self.root) {
            root.set_var(name, value);
        }
    }

    pub fn remove_var(&mut self, name: &str) -> Option<Variant> {
        self.nodes.get_mut(&self.root)?.remove_var(name)
    }

    /// World matrix of a node, composed from the root down
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        self.world_transform(id).matrix
    }

    pub fn world_transform(&self, id: NodeId) -> GlobalTransform {
        let mut chain = Vec::new();
        let mut current = self.nodes.get(&id);
        while let Some(node) = current {
            chain.push(&node.transform);
            current = node.parent.and_then(|p| self.nodes.get(&p));
        }
        chain
            .into_iter()
            .rev()
            .fold(GlobalTransform::default(), |global, local| global.mul_transform(local))
    }

    fn parent_matrix(&self, id: NodeId) -> Mat4 {
        self.nodes
            .get(&id)
            .and_then(|n| n.parent)
            .map(|p| self.world_matrix(p))
            .unwrap_or(Mat4::IDENTITY)
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).w_axis.truncate()
    }

    pub fn world_rotation(&self, id: NodeId) -> Quat {
        let mut rotation = Quat::IDENTITY;
        let mut current = self.nodes.get(&id);
        while let Some(node) = current {
            rotation = node.transform.orientation() * rotation;
            current = node.parent.and_then(|p| self.nodes.get(&p));
        }
        rotation
    }

    pub fn set_world_position(&mut self, id: NodeId, position: Vec3) {
        let local = self.parent_matrix(id).inverse().transform_point3(position);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.set_position(local);
        }
    }

    pub fn set_world_rotation(&mut self, id: NodeId, rotation: Quat) {
        let parent_rotation = self
            .nodes
            .get(&id)
            .and_then(|n| n.parent)
            .map(|p| self.world_rotation(p))
            .unwrap_or(Quat::IDENTITY);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.set_rotation(parent_rotation.inverse() * rotation);
        }
    }

    /// Move a node by `delta` expressed in the given space
    pub fn translate(&mut self, id: NodeId, delta: Vec3, space: TransformSpace) {
        let offset = match space {
            TransformSpace::Local => match self.nodes.get(&id) {
                Some(node) => node.transform.orientation() * delta,
                None => return,
            },
            TransformSpace::Parent => delta,
            TransformSpace::World => self.parent_matrix(id).inverse().transform_vector3(delta),
        };
        if let Some(node) = self.nodes.get_mut(&id) {
            node.transform.position += offset;
        }
    }

    /// Rotate a node by `delta` expressed in the given space
    pub fn rotate(&mut self, id: NodeId, delta: Quat, space: TransformSpace) {
        match space {
            TransformSpace::World => {
                let world = self.world_rotation(id);
                self.set_world_rotation(id, delta * world);
            }
            TransformSpace::Local | TransformSpace::Parent => {
                if let Some(node) = self.nodes.get_mut(&id) {
                    let rotation = if space == TransformSpace::Local {
                        node.transform.orientation() * delta
                    } else {
                        delta * node.transform.orientation()
                    };
                    node.set_rotation(rotation);
                }
            }
        }
    }

    /// Turn a node so its forward points at a world position
    ///
    /// Returns false when the target coincides with the node's position.
    pub fn look_at(&mut self, id: NodeId, target: Vec3) -> bool {
        let position = self.world_position(id);
        match math::rotation_towards(target - position, UP) {
            Some(rotation) => {
                self.set_world_rotation(id, rotation);
                true
            }
            None => false,
        }
    }

    /// World-space bounds of a drawable component
    pub fn world_bounds(&self, id: ComponentId) -> Option<Aabb> {
        let slot = self.components.get(&id)?;
        let local = slot.data.drawable_bounds()?;
        Some(local.transformed(&self.world_matrix(slot.node)))
    }
}

#[cfg(test)]
mod tests {
    use super::components::{StaticModel, Zone};
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, 1e-4)
    }

    #[test]
    fn test_new_scene_has_root() {
        let scene = Scene::new("Test");
        assert_eq!(scene.root(), ROOT_ID);
        assert_eq!(scene.name(), "Test");
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn test_create_child_order() {
        let mut scene = Scene::default();
        let a = scene.create_child(ROOT_ID, "A", CreateMode::Replicated).unwrap();
        let b = scene.create_child(ROOT_ID, "B", CreateMode::Local).unwrap();
        let c = scene.create_child(a, "C", CreateMode::Replicated).unwrap();

        assert_eq!(scene.children(ROOT_ID), &[a, b]);
        assert_eq!(scene.preorder(ROOT_ID), vec![ROOT_ID, a, c, b]);
        assert_eq!(scene.node(b).unwrap().mode(), CreateMode::Local);
        assert!(scene.create_child(NodeId(99), "X", CreateMode::Local).is_err());
    }

    #[test]
    fn test_remove_node_removes_subtree() {
        let mut scene = Scene::default();
        let a = scene.create_child(ROOT_ID, "A", CreateMode::Replicated).unwrap();
        let c = scene.create_child(a, "C", CreateMode::Replicated).unwrap();
        let model = scene
            .add_component(c, StaticModel::default(), CreateMode::Replicated)
            .unwrap();

        scene.remove_node(a).unwrap();

        assert!(!scene.contains_node(a));
        assert!(!scene.contains_node(c));
        assert!(!scene.contains_component(model));
        assert!(scene.children(ROOT_ID).is_empty());
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut scene = Scene::default();
        assert!(matches!(scene.remove_node(ROOT_ID), Err(SceneError::RootRemoval)));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut scene = Scene::default();
        let a = scene.create_child(ROOT_ID, "A", CreateMode::Replicated).unwrap();
        scene.remove_node(a).unwrap();
        let b = scene.create_child(ROOT_ID, "B", CreateMode::Replicated).unwrap();
        assert_ne!(a, b);
        assert!(scene.node(a).is_none());
    }

    #[test]
    fn test_component_lookup() {
        let mut scene = Scene::default();
        let node = scene.create_child(ROOT_ID, "Box", CreateMode::Replicated).unwrap();
        let zone = scene.add_component(node, Zone::default(), CreateMode::Local).unwrap();
        let model = scene
            .add_component(node, StaticModel::with_model("Models/Box.mdl", ""), CreateMode::Replicated)
            .unwrap();

        assert_eq!(scene.components_of(node), &[zone, model]);
        assert_eq!(scene.component_of::<StaticModel>(node), Some(model));
        assert_eq!(scene.first_drawable(node), Some(model));
        assert!(scene.get::<Zone>(model).is_none());

        scene.remove_component(zone).unwrap();
        assert_eq!(scene.components_of(node), &[model]);
        assert!(scene.remove_component(zone).is_err());
    }

    #[test]
    fn test_child_by_name_recursive() {
        let mut scene = Scene::default();
        let a = scene.create_child(ROOT_ID, "A", CreateMode::Replicated).unwrap();
        let deep = scene.create_child(a, "Deep", CreateMode::Replicated).unwrap();

        assert_eq!(scene.child_by_name(ROOT_ID, "Deep", false), None);
        assert_eq!(scene.child_by_name(ROOT_ID, "Deep", true), Some(deep));
    }

    #[test]
    fn test_world_position_through_parent() {
        let mut scene = Scene::default();
        let parent = scene.create_child(ROOT_ID, "P", CreateMode::Replicated).unwrap();
        let child = scene.create_child(parent, "C", CreateMode::Replicated).unwrap();
        scene.node_mut(parent).unwrap().set_position(Vec3::new(10.0, 0.0, 0.0));
        scene
            .node_mut(parent)
            .unwrap()
            .set_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        scene.node_mut(child).unwrap().set_position(Vec3::new(0.0, 0.0, -1.0));

        assert!(approx(scene.world_position(child), Vec3::new(9.0, 0.0, 0.0)));

        scene.set_world_position(child, Vec3::new(10.0, 5.0, 0.0));
        assert!(approx(scene.world_position(child), Vec3::new(10.0, 5.0, 0.0)));
    }

    #[test]
    fn test_translate_local_follows_rotation() {
        let mut scene = Scene::default();
        let node = scene.create_child(ROOT_ID, "N", CreateMode::Replicated).unwrap();
        scene.node_mut(node).unwrap().set_rotation(math::yaw_rotation(90.0));

        scene.translate(node, math::FORWARD * 2.0, TransformSpace::Local);
        assert!(approx(scene.world_position(node), Vec3::new(2.0, 0.0, 0.0)));

        scene.translate(node, Vec3::Y, TransformSpace::World);
        assert!(approx(scene.world_position(node), Vec3::new(2.0, 1.0, 0.0)));
    }

    #[test]
    fn test_look_at() {
        let mut scene = Scene::default();
        let node = scene.create_child(ROOT_ID, "Cam", CreateMode::Replicated).unwrap();
        scene.node_mut(node).unwrap().set_position(Vec3::new(0.0, 0.0, 10.0));

        assert!(scene.look_at(node, Vec3::new(10.0, 0.0, 10.0)));
        let forward = scene.world_rotation(node) * math::FORWARD;
        assert!(approx(forward, Vec3::X));
        assert!(!scene.look_at(node, Vec3::new(0.0, 0.0, 10.0)));
    }

    #[test]
    fn test_world_rotation_round_trip() {
        let mut scene = Scene::default();
        let parent = scene.create_child(ROOT_ID, "P", CreateMode::Replicated).unwrap();
        let child = scene.create_child(parent, "C", CreateMode::Replicated).unwrap();
        scene.node_mut(parent).unwrap().set_rotation(math::yaw_rotation(30.0));

        let target = math::look_rotation(10.0, 100.0);
        scene.set_world_rotation(child, target);
        assert!(scene.world_rotation(child).abs_diff_eq(target, 1e-5));
    }

    #[test]
    fn test_scene_vars_live_on_root() {
        let mut scene = Scene::default();
        scene.set_var("Camera Behaviour", Variant::Int(1));
        assert_eq!(scene.var("Camera Behaviour"), Some(&Variant::Int(1)));
        assert!(scene.node(ROOT_ID).unwrap().var("Camera Behaviour").is_some());
    }
}
