//! Attribute inspector panel
//!
//! Shows the selected node (or the scene root) in three collapsible
//! sections: its variables, its own attributes, and the attributes of the
//! selected component.

use engine::reflect::Reflect;
use engine::scene::{attr, NodeId, Scene};
use engine::ui::{ElementKind, UiElementId, UiEventKind};
use engine::variant::{Color, Variant};
use glam::Vec2;
use tracing::debug;

use super::attribute_widgets::add_value_row;
use crate::actions::{BindingTarget, EditorAction};
use crate::selection::Selection;
use crate::settings::{Section, SectionSettings, WindowSettings};
use crate::windows::{self, EditorUi};

pub const INSPECTOR_WINDOW: &str = "InspectorWindow";
pub const INSPECTOR_PANEL: &str = "InspectorPanel";

const WINDOW_SIZE: Vec2 = Vec2::new(320.0, 600.0);
const ROW_HEIGHT: f32 = 22.0;

/// Frame in which node transforms are displayed and edited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplaySpace {
    #[default]
    Local,
    World,
}

impl DisplaySpace {
    pub fn label(self) -> &'static str {
        match self {
            DisplaySpace::Local => "Local (Relative)",
            DisplaySpace::World => "World (Absolute)",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DisplaySpace::Local => DisplaySpace::World,
            DisplaySpace::World => DisplaySpace::Local,
        }
    }

    pub fn is_world(self) -> bool {
        self == DisplaySpace::World
    }
}

/// Create the inspector window, returning it and its scroll panel
pub fn create_inspector_window(
    ui: &mut EditorUi,
    settings: &WindowSettings,
) -> (UiElementId, UiElementId) {
    let window = windows::create_window(
        ui,
        INSPECTOR_WINDOW,
        "Inspector",
        settings.position,
        WINDOW_SIZE,
    );
    let panel = ui.create(window, ElementKind::ScrollView, INSPECTOR_PANEL);
    let (position, size) = windows::content_rect(WINDOW_SIZE);
    ui.set_rect(panel, position, size);
    ui.set_visible(window, settings.visible);
    (window, panel)
}

fn is_node_attribute_shown(name: &str) -> bool {
    name != attr::VARIABLES && !name.starts_with("Network ")
}

/// Clear the panel and rebuild it for the current selection
pub fn rebuild_inspector(
    ui: &mut EditorUi,
    panel: UiElementId,
    scene: &Scene,
    selection: &Selection,
    sections: &SectionSettings,
    space: DisplaySpace,
) {
    ui.remove_children(panel);
    let id = selection.inspected_node(scene);
    let Some(node) = scene.node(id) else {
        return;
    };

    let header = ui.create(panel, ElementKind::Row, "Header");
    windows::add_text(ui, header, "NodeId", &format!("Node ID: {id}"));
    windows::add_text(ui, header, "NodeName", &node.name);

    let display = ui.create(panel, ElementKind::Row, "DisplaySpace");
    windows::add_text(ui, display, "Label", "Display as:");
    windows::add_button(ui, display, "Toggle", space.label(), EditorAction::ToggleDisplaySpace);

    add_divider(ui, panel, Section::Variables);
    if !sections.is_collapsed(Section::Variables) {
        for (name, value) in &node.vars {
            add_value_row(ui, panel, BindingTarget::NodeVar(id), name, value, true);
        }
    }

    add_divider(ui, panel, Section::NodeAttributes);
    if !sections.is_collapsed(Section::NodeAttributes) {
        add_node_attributes(ui, panel, scene, id, space);
    }

    add_divider(ui, panel, Section::ComponentAttributes);
    add_component_section(ui, panel, scene, id, selection, sections);
    ui.stack_rows(panel, 0, 0.0, ROW_HEIGHT);

    debug!(node = %id, rows = ui.children(panel).len(), "Rebuilt inspector");
}

fn add_divider(ui: &mut EditorUi, panel: UiElementId, section: Section) {
    let divider = ui.create(panel, ElementKind::Divider, section.title());
    ui.set_text(divider, section.title());
    ui.subscribe(divider, UiEventKind::Click, move |_| {
        Some(EditorAction::ToggleSection(section))
    });
}

fn add_node_attributes(
    ui: &mut EditorUi,
    panel: UiElementId,
    scene: &Scene,
    id: NodeId,
    space: DisplaySpace,
) {
    let Some(node) = scene.node(id) else {
        return;
    };
    for info in node.attributes() {
        if !is_node_attribute_shown(info.name) {
            continue;
        }
        let value = match info.name {
            attr::POSITION if space.is_world() => Some(Variant::Vector3(scene.world_position(id))),
            attr::ROTATION if space.is_world() => {
                Some(Variant::Quaternion(scene.world_rotation(id)))
            }
            name => node.attribute(name),
        };
        if let Some(value) = value {
            add_value_row(ui, panel, BindingTarget::Node(id), info.name, &value, !info.is_read_only());
        }
    }
}

fn add_component_section(
    ui: &mut EditorUi,
    panel: UiElementId,
    scene: &Scene,
    node: NodeId,
    selection: &Selection,
    sections: &SectionSettings,
) {
    let selected = selection
        .component
        .and_then(|c| scene.component(c))
        .filter(|slot| slot.node() == node);

    let Some(slot) = selected else {
        for &component in scene.components_of(node) {
            if let Some(slot) = scene.component(component) {
                let label = windows::add_text(ui, panel, "ComponentType", slot.type_name());
                if let Some(element) = ui.get_mut(label) {
                    element.color = Color::MAGENTA;
                }
            }
        }
        return;
    };

    windows::add_text(ui, panel, "ComponentType", slot.type_name());
    if sections.is_collapsed(Section::ComponentAttributes) {
        return;
    }
    let data = slot.data();
    for info in data.attributes() {
        if let Some(value) = data.attribute(info.name) {
            add_value_row(
                ui,
                panel,
                BindingTarget::Component(slot.id()),
                info.name,
                &value,
                !info.is_read_only(),
            );
        }
    }
}
