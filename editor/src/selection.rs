//! Selected and hovered scene objects
//!
//! Both hold plain ids. A selection survives across frames and must be
//! validated against the scene after anything that may destroy its targets;
//! a hover candidate only lives for the frame that produced it.

use engine::scene::{ComponentId, NodeId, RayHit, Scene};
use glam::Vec3;
use tracing::debug;

/// What the inspector and the debug overlay operate on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub node: Option<NodeId>,
    pub component: Option<ComponentId>,
    /// Drawable used for the selection gizmo
    pub drawable: Option<ComponentId>,
}

impl Selection {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Select a node with no component, picking its first drawable for gizmos
    pub fn select_node(&mut self, scene: &Scene, node: NodeId) {
        self.node = Some(node);
        self.component = None;
        self.drawable = scene.first_drawable(node);
        debug!(node = %node, "Selected node");
    }

    /// Select a component and its owning node
    pub fn select_component(&mut self, scene: &Scene, component: ComponentId) -> bool {
        let Some(slot) = scene.component(component) else {
            return false;
        };
        let node = slot.node();
        self.node = Some(node);
        self.component = Some(component);
        self.drawable = if slot.data().drawable_bounds().is_some() {
            Some(component)
        } else {
            scene.first_drawable(node)
        };
        debug!(component = %component, node = %node, "Selected component");
        true
    }

    /// Select whatever a picking ray hit
    pub fn select_hit(&mut self, hit: &HoverCandidate) {
        self.node = Some(hit.node);
        self.component = Some(hit.component);
        self.drawable = Some(hit.component);
    }

    /// Drop ids whose targets no longer exist; returns true if anything changed
    pub fn validate(&mut self, scene: &Scene) -> bool {
        let before = *self;
        if self.node.is_some_and(|n| !scene.contains_node(n)) {
            self.clear();
        }
        let node = self.node;
        let owned_by_node = |c: ComponentId| {
            scene
                .component(c)
                .is_some_and(|slot| Some(slot.node()) == node)
        };
        if self.component.is_some_and(|c| !owned_by_node(c)) {
            self.component = None;
        }
        if self.drawable.is_some_and(|c| !owned_by_node(c)) {
            self.drawable = None;
        }
        let changed = before != *self;
        if changed {
            debug!(?before, after = ?self, "Pruned stale selection");
        }
        changed
    }

    /// Node shown by the inspector: the selected node, or the scene root
    pub fn inspected_node(&self, scene: &Scene) -> NodeId {
        self.node
            .filter(|n| scene.contains_node(*n))
            .unwrap_or_else(|| scene.root())
    }
}

/// Object under the cursor this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverCandidate {
    pub component: ComponentId,
    pub node: NodeId,
    /// World-space normal of the face that was hit
    pub normal: Vec3,
    pub position: Vec3,
}

impl From<RayHit> for HoverCandidate {
    fn from(hit: RayHit) -> Self {
        Self {
            component: hit.component,
            node: hit.node,
            normal: hit.normal,
            position: hit.position,
        }
    }
}
