//! Mouse picking through the editor camera

use engine::core::camera::Camera;
use engine::core::math::Ray;
use engine::scene::{NodeId, Scene};
use engine::ui::UiTree;
use glam::Vec2;
use tracing::trace;

use crate::selection::HoverCandidate;

/// Maximum distance of a picking ray
pub const PICK_DISTANCE: f32 = 50.0;

/// Where the cursor is and which camera looks through it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickingInput {
    pub camera_node: Option<NodeId>,
    /// Cursor position in pixels, origin top-left
    pub cursor: Vec2,
    pub viewport: Vec2,
    /// Left mouse button held
    pub select: bool,
}

/// Ray from the camera through the cursor
///
/// Absent when the camera node or its `Camera` component is missing.
pub fn cursor_ray(scene: &Scene, camera_node: NodeId, cursor: Vec2, viewport: Vec2) -> Option<Ray> {
    let camera_id = scene.component_of::<Camera>(camera_node)?;
    let camera = scene.get::<Camera>(camera_id)?;
    let normalized = cursor / viewport.max(Vec2::ONE);
    Some(camera.screen_ray(normalized.x, normalized.y, &scene.world_matrix(camera_node)))
}

/// Drawable under the cursor, unless a UI element covers it
pub fn pick<A>(scene: &Scene, ui: &UiTree<A>, input: &PickingInput) -> Option<HoverCandidate> {
    let camera_node = input.camera_node?;
    let ray = cursor_ray(scene, camera_node, input.cursor, input.viewport)?;
    if let Some(element) = ui.element_at(input.cursor) {
        trace!(element = %element, "Cursor over UI, skipping pick");
        return None;
    }
    scene
        .raycast_single(&ray, PICK_DISTANCE)
        .map(HoverCandidate::from)
}
