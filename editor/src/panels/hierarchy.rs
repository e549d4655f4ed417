//! Scene hierarchy panel
//!
//! Displays every node of the scene followed by its components, nested under
//! their parent rows, in a single list view.

use engine::scene::{ComponentId, NodeId, Scene};
use engine::ui::{ElementKind, ItemTag, ListItem, UiElementId, UiEvent, UiEventKind};
use engine::variant::Color;
use glam::Vec2;
use tracing::debug;

use crate::actions::EditorAction;
use crate::settings::WindowSettings;
use crate::windows::{self, EditorUi};

pub const HIERARCHY_WINDOW: &str = "HierarchyWindow";
pub const HIERARCHY_LIST: &str = "HierarchyList";

const WINDOW_SIZE: Vec2 = Vec2::new(300.0, 500.0);

/// Create the hierarchy window, returning it and its list view
pub fn create_hierarchy_window(
    ui: &mut EditorUi,
    settings: &WindowSettings,
) -> (UiElementId, UiElementId) {
    let window = windows::create_window(
        ui,
        HIERARCHY_WINDOW,
        "Scene Hierarchy",
        settings.position,
        WINDOW_SIZE,
    );
    let list = ui.create(window, ElementKind::ListView, HIERARCHY_LIST);
    let (position, size) = windows::content_rect(WINDOW_SIZE);
    ui.set_rect(list, position, size);
    ui.set_visible(window, settings.visible);
    (window, list)
}

/// Attach the window and row click handlers
pub fn wire_hierarchy(ui: &mut EditorUi, window: UiElementId) {
    windows::wire_window(ui, window);
    if let Some(list) = ui.child_by_name(window, HIERARCHY_LIST, false) {
        ui.subscribe(list, UiEventKind::ItemClicked, |event| match event {
            UiEvent::ItemClicked { index, button, .. } => Some(EditorAction::HierarchyClicked {
                index: *index,
                button: *button,
            }),
            _ => None,
        });
    }
}

/// Repopulate the list from the scene
///
/// The row of `selected_component`, if present, becomes the list selection.
/// The scroll position is kept.
pub fn rebuild_hierarchy(
    ui: &mut EditorUi,
    list: UiElementId,
    scene: &Scene,
    selected_component: Option<ComponentId>,
) {
    let scroll = ui.get(list).map(|e| e.scroll_position).unwrap_or_default();
    ui.clear_items(list);

    let mut selected_row = None;
    add_node_rows(ui, list, scene, scene.root(), None, selected_component, &mut selected_row);

    ui.set_selection(list, selected_row);
    if let Some(element) = ui.get_mut(list) {
        element.scroll_position = scroll;
    }
    debug!(rows = ui.items(list).len(), "Rebuilt hierarchy");
}

fn add_node_rows(
    ui: &mut EditorUi,
    list: UiElementId,
    scene: &Scene,
    id: NodeId,
    parent_row: Option<usize>,
    selected_component: Option<ComponentId>,
    selected_row: &mut Option<usize>,
) {
    let Some(node) = scene.node(id) else {
        return;
    };
    let Some(row) = ui.add_item(
        list,
        ListItem::new(format!("{} - {}", node.name, id))
            .with_color(Color::CYAN)
            .with_parent(parent_row)
            .with_tag(ItemTag::Node(id)),
    ) else {
        return;
    };

    for &component in node.components() {
        let Some(slot) = scene.component(component) else {
            continue;
        };
        let index = ui.add_item(
            list,
            ListItem::new(format!("{} - {}", slot.type_name(), component))
                .with_color(Color::GREEN)
                .with_parent(Some(row))
                .with_tag(ItemTag::Component(component)),
        );
        if selected_component == Some(component) {
            *selected_row = index;
        }
    }

    for &child in node.children() {
        add_node_rows(ui, list, scene, child, Some(row), selected_component, selected_row);
    }
}

/// Tag of a row, if the row exists
pub fn row_tag(ui: &EditorUi, list: UiElementId, index: usize) -> Option<ItemTag> {
    ui.items(list).get(index).map(|item| item.tag.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::prelude::*;

    fn sample_scene() -> (Scene, NodeId, NodeId, ComponentId) {
        let mut scene = Scene::new("Scene");
        scene.add_component(ROOT_ID, Octree::default(), CreateMode::Replicated).unwrap();
        let a = scene.create_child(ROOT_ID, "A", CreateMode::Replicated).unwrap();
        let b = scene.create_child(a, "B", CreateMode::Replicated).unwrap();
        let model = scene
            .add_component(b, StaticModel::with_model("Models/Box.mdl", ""), CreateMode::Replicated)
            .unwrap();
        scene.create_child(ROOT_ID, "C", CreateMode::Local).unwrap();
        (scene, a, b, model)
    }

    fn build(scene: &Scene, selected: Option<ComponentId>) -> (EditorUi, UiElementId) {
        let mut ui = EditorUi::default();
        let (_, list) = create_hierarchy_window(&mut ui, &WindowSettings { visible: true, position: Vec2::ZERO });
        rebuild_hierarchy(&mut ui, list, scene, selected);
        (ui, list)
    }

    #[test]
    fn test_rows_in_preorder() {
        let (scene, _, _, _) = sample_scene();
        let (ui, list) = build(&scene, None);

        let texts: Vec<&str> = ui.items(list).iter().map(|i| i.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Scene - 1", "Octree - 1", "A - 2", "B - 3", "StaticModel - 2", "C - 4"]
        );
        assert_eq!(ui.items(list).len(), scene.node_count() + scene.component_count());
        assert_eq!(ui.selection(list), None);
    }

    #[test]
    fn test_row_tags_and_parents() {
        let (scene, a, b, model) = sample_scene();
        let (ui, list) = build(&scene, None);
        let items = ui.items(list);

        assert_eq!(items[2].tag, ItemTag::Node(a));
        assert_eq!(items[2].color, Color::CYAN);
        assert_eq!(items[2].parent, Some(0));
        assert_eq!(items[3].tag, ItemTag::Node(b));
        assert_eq!(items[3].parent, Some(2));
        assert_eq!(items[4].tag, ItemTag::Component(model));
        assert_eq!(items[4].color, Color::GREEN);
        assert_eq!(items[4].parent, Some(3));
    }

    #[test]
    fn test_selected_component_row() {
        let (scene, _, _, model) = sample_scene();
        let (ui, list) = build(&scene, Some(model));
        assert_eq!(ui.selection(list), Some(4));
        assert_eq!(row_tag(&ui, list, 4), Some(ItemTag::Component(model)));
    }

    #[test]
    fn test_rebuild_keeps_scroll_position() {
        let (scene, _, _, _) = sample_scene();
        let (mut ui, list) = build(&scene, None);
        ui.get_mut(list).unwrap().scroll_position = 42.0;
        rebuild_hierarchy(&mut ui, list, &scene, None);
        assert_eq!(ui.get(list).unwrap().scroll_position, 42.0);
        assert_eq!(ui.items(list).len(), 6);
    }

    #[test]
    fn test_row_click_action() {
        let (scene, _, _, _) = sample_scene();
        let mut ui = EditorUi::default();
        let (window, list) = create_hierarchy_window(&mut ui, &WindowSettings { visible: true, position: Vec2::ZERO });
        wire_hierarchy(&mut ui, window);
        rebuild_hierarchy(&mut ui, list, &scene, None);

        let actions = ui.dispatch(&UiEvent::ItemClicked {
            element: list,
            index: 2,
            button: winit::event::MouseButton::Right,
        });
        assert_eq!(
            actions,
            vec![EditorAction::HierarchyClicked {
                index: 2,
                button: winit::event::MouseButton::Right
            }]
        );
    }
}
