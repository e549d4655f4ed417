//! Context menus, the component factory and confirmation prompts

use engine::scene::{ComponentId, CreateMode, NodeId, Scene};
use engine::ui::{ElementKind, ItemTag, ListItem, UiElementId, UiEvent, UiEventKind};
use glam::Vec2;
use std::collections::BTreeMap;

use crate::actions::{Confirmation, DeleteTarget, EditorAction};
use crate::windows::{self, EditorUi};

pub const CONTEXT_WINDOW: &str = "ContextMenu";
pub const COMPONENT_FACTORY: &str = "ComponentFactory";
pub const CONFIRM_PROMPT: &str = "ConfirmPrompt";

const MENU_SIZE: Vec2 = Vec2::new(260.0, 170.0);
const ROW_HEIGHT: f32 = 26.0;

/// Category name to component type names
pub type ComponentCatalog = BTreeMap<String, Vec<String>>;

/// Caption of the delete button of a node menu
pub fn delete_node_label(scene: &Scene, node: NodeId) -> String {
    match scene.node(node) {
        Some(n) if !n.name.is_empty() => format!("Delete Node ({})", n.name),
        _ => format!("Delete Node (Nameless, ID={node})"),
    }
}

fn create_component_buttons(ui: &mut EditorUi, window: UiElementId, node: NodeId) {
    windows::add_button(
        ui,
        window,
        "CreateComponentLocal",
        "Create Component (local)",
        EditorAction::OpenComponentFactory {
            node,
            mode: CreateMode::Local,
        },
    );
    windows::add_button(
        ui,
        window,
        "CreateComponentReplicated",
        "Create Component (replicated)",
        EditorAction::OpenComponentFactory {
            node,
            mode: CreateMode::Replicated,
        },
    );
}

fn menu_window(ui: &mut EditorUi, title: &str, position: Vec2) -> UiElementId {
    let window = windows::create_window(ui, CONTEXT_WINDOW, title, position, MENU_SIZE);
    windows::wire_window(ui, window);
    window
}

/// Lay out everything below the title bar, one row per child
fn stack_children(ui: &mut EditorUi, window: UiElementId) {
    ui.stack_rows(window, 1, windows::TITLE_BAR_HEIGHT, ROW_HEIGHT);
}

/// Open the "Node Options:" menu for a node
pub fn open_node_menu(ui: &mut EditorUi, scene: &Scene, node: NodeId, position: Vec2) -> Option<UiElementId> {
    scene.node(node)?;
    let window = menu_window(ui, "Node Options:", position);
    windows::add_button(
        ui,
        window,
        "DeleteButton",
        &delete_node_label(scene, node),
        EditorAction::RequestDelete(DeleteTarget::Node(node)),
    );
    windows::add_button(
        ui,
        window,
        "CreateNodeLocal",
        "Create Node (local)",
        EditorAction::CreateNode {
            parent: node,
            mode: CreateMode::Local,
        },
    );
    windows::add_button(
        ui,
        window,
        "CreateNodeReplicated",
        "Create Node (networked)",
        EditorAction::CreateNode {
            parent: node,
            mode: CreateMode::Replicated,
        },
    );
    create_component_buttons(ui, window, node);
    stack_children(ui, window);
    Some(window)
}

/// Open the "Component Options:" menu for a component
pub fn open_component_menu(
    ui: &mut EditorUi,
    scene: &Scene,
    component: ComponentId,
    position: Vec2,
) -> Option<UiElementId> {
    let slot = scene.component(component)?;
    let window = menu_window(ui, "Component Options:", position);
    windows::add_button(
        ui,
        window,
        "DeleteButton",
        &format!("Delete Component ({})", slot.type_name()),
        EditorAction::RequestDelete(DeleteTarget::Component(component)),
    );
    create_component_buttons(ui, window, slot.node());
    stack_children(ui, window);
    Some(window)
}

/// Open the component selector: one drop-down per category
pub fn open_component_factory(
    ui: &mut EditorUi,
    catalog: &ComponentCatalog,
    node: NodeId,
    mode: CreateMode,
    position: Vec2,
) -> UiElementId {
    let title = match mode {
        CreateMode::Local => "Create Component (local)",
        CreateMode::Replicated => "Create Component (replicated)",
    };
    let height = windows::TITLE_BAR_HEIGHT + (catalog.len() + 1) as f32 * ROW_HEIGHT;
    let window = windows::create_window(ui, COMPONENT_FACTORY, title, position, Vec2::new(320.0, height));
    windows::wire_window(ui, window);

    for (category, types) in catalog {
        let row = ui.create(window, ElementKind::Row, category);
        windows::add_text(ui, row, "Category", category);
        let list = ui.create(row, ElementKind::DropDownList, "TypeList");
        for type_name in types {
            ui.add_item(
                list,
                ListItem::new(type_name.clone()).with_tag(ItemTag::ComponentType(type_name.clone())),
            );
        }
        let types = types.clone();
        ui.subscribe(list, UiEventKind::ItemSelected, move |event| match event {
            UiEvent::ItemSelected { index, .. } => types
                .get(*index)
                .map(|name| EditorAction::PickComponentType(name.clone())),
            _ => None,
        });
    }

    let buttons = ui.create(window, ElementKind::Row, "Buttons");
    windows::add_button(
        ui,
        buttons,
        "CreateButton",
        "CREATE",
        EditorAction::CreateComponent { node, mode },
    );
    windows::add_button(ui, buttons, "CancelButton", "CANCEL", EditorAction::CancelComponentFactory);
    stack_children(ui, window);
    window
}

/// Open a yes/no prompt for an operation
pub fn open_confirm_prompt(ui: &mut EditorUi, confirmation: Confirmation, position: Vec2) -> UiElementId {
    let window = windows::create_window(ui, CONFIRM_PROMPT, "Confirm", position, Vec2::new(280.0, 90.0));
    windows::wire_window(ui, window);
    windows::add_text(ui, window, "Message", &confirmation.message());
    let buttons = ui.create(window, ElementKind::Row, "Buttons");
    windows::add_button(ui, buttons, "YesButton", "Yes", EditorAction::Confirm(confirmation));
    windows::add_button(ui, buttons, "NoButton", "No", EditorAction::DismissPrompt);
    stack_children(ui, window);
    window
}
