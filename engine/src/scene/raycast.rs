//! Ray queries against drawable components

use glam::Vec3;
use tracing::trace;

use super::{ComponentId, NodeId, Scene};
use crate::core::math::Ray;

/// Nearest intersection of a ray with a drawable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub component: ComponentId,
    pub node: NodeId,
    /// World-space hit position
    pub position: Vec3,
    /// World-space face normal at the hit
    pub normal: Vec3,
    pub distance: f32,
}

impl Scene {
    /// Closest drawable hit within `max_distance`, tested against world bounds
    pub fn raycast_single(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;

        for slot in self.components.values() {
            if !self.nodes.get(&slot.node).is_some_and(|n| n.enabled) {
                continue;
            }
            let Some(bounds) = self.world_bounds(slot.id) else {
                continue;
            };
            let Some((distance, normal)) = ray.intersect_aabb(&bounds) else {
                continue;
            };
            if distance > max_distance {
                continue;
            }
            // Equal distances resolve to the lower id so results are stable.
            let closer = match &best {
                Some(hit) => {
                    distance < hit.distance || (distance == hit.distance && slot.id < hit.component)
                }
                None => true,
            };
            if closer {
                best = Some(RayHit {
                    component: slot.id,
                    node: slot.node,
                    position: ray.point_at(distance),
                    normal,
                    distance,
                });
            }
        }

        trace!(hit = ?best.map(|h| h.component), "Raycast");
        best
    }
}
