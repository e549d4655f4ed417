//! Main menu bar and file prompts

use engine::ui::{ElementKind, ListItem, UiElementId, UiEvent, UiEventKind};
use glam::Vec2;
use std::path::Path;

use crate::actions::{EditorAction, FilePurpose, MenuCommand};
use crate::windows::{self, EditorUi};

pub const MAIN_MENU: &str = "MainMenu";
pub const MENU_LIST: &str = "DropDownList";
pub const FILE_PROMPT: &str = "FilePrompt";
pub const PATH_EDIT: &str = "PathEdit";

const MENU_HEIGHT: f32 = 24.0;
const MENU_WIDTH: f32 = 120.0;

/// Drop-downs of the main menu and their entries
pub const MENUS: &[(&str, &[(&str, MenuCommand)])] = &[
    (
        "Project",
        &[
            ("New", MenuCommand::NewProject),
            ("Load", MenuCommand::LoadProject),
            ("Save", MenuCommand::SaveProject),
        ],
    ),
    (
        "Scene",
        &[
            ("New Scene", MenuCommand::NewScene),
            ("Load Scene", MenuCommand::LoadScene),
            ("Save Scene", MenuCommand::SaveScene),
        ],
    ),
    (
        "Tools",
        &[
            ("Hierarchy", MenuCommand::ToggleHierarchy),
            ("Inspector", MenuCommand::ToggleInspector),
            ("Transform", MenuCommand::Transform),
            ("NavMesh", MenuCommand::NavMesh),
        ],
    ),
    (
        "Prefab",
        &[
            ("Load Prefab", MenuCommand::LoadPrefab),
            ("Save Prefab", MenuCommand::SavePrefab),
        ],
    ),
];

/// Create the menu bar across the top of the viewport
pub fn create_main_menu(ui: &mut EditorUi, width: f32) -> UiElementId {
    let root = ui.root();
    let menu = ui.create(root, ElementKind::Panel, MAIN_MENU);
    ui.set_rect(menu, Vec2::ZERO, Vec2::new(width, MENU_HEIGHT));

    for (i, &(title, entries)) in MENUS.iter().enumerate() {
        let group = ui.create(menu, ElementKind::Row, title);
        ui.set_rect(
            group,
            Vec2::new(i as f32 * MENU_WIDTH, 0.0),
            Vec2::new(MENU_WIDTH, MENU_HEIGHT),
        );
        let list = ui.create(group, ElementKind::DropDownList, MENU_LIST);
        ui.set_text(list, title);
        ui.set_rect(list, Vec2::ZERO, Vec2::new(MENU_WIDTH, MENU_HEIGHT));
        for &(text, _) in entries {
            ui.add_item(list, ListItem::new(text));
        }
    }
    menu
}

/// Attach the item handlers of every drop-down
pub fn wire_main_menu(ui: &mut EditorUi, menu: UiElementId) {
    for &(title, entries) in MENUS {
        let Some(group) = ui.child_by_name(menu, title, false) else {
            continue;
        };
        let Some(list) = ui.child_by_name(group, MENU_LIST, false) else {
            continue;
        };
        let commands: Vec<MenuCommand> = entries.iter().map(|(_, command)| *command).collect();
        ui.subscribe(list, UiEventKind::ItemSelected, move |event| match event {
            UiEvent::ItemSelected { index, .. } => {
                commands.get(*index).map(|command| EditorAction::Menu(*command))
            }
            _ => None,
        });
    }
}

/// Open a path prompt pre-filled with `default_path`
pub fn open_file_prompt(
    ui: &mut EditorUi,
    purpose: FilePurpose,
    default_path: &Path,
    position: Vec2,
) -> UiElementId {
    let size = Vec2::new(360.0, 80.0);
    let window = windows::create_window(ui, FILE_PROMPT, purpose.title(), position, size);
    windows::wire_window(ui, window);

    let edit = ui.create(window, ElementKind::LineEdit, PATH_EDIT);
    ui.set_text(edit, default_path.to_string_lossy());
    ui.set_rect(
        edit,
        Vec2::new(0.0, windows::TITLE_BAR_HEIGHT),
        Vec2::new(size.x, 26.0),
    );

    let buttons = ui.create(window, ElementKind::Row, "Buttons");
    ui.set_rect(buttons, Vec2::new(0.0, 50.0), Vec2::new(size.x, 26.0));
    windows::add_button(ui, buttons, "OkButton", "OK", EditorAction::SubmitFilePrompt(purpose));
    windows::add_button(ui, buttons, "CancelButton", "CANCEL", EditorAction::CancelFilePrompt);
    ui.spread_row(buttons);
    window
}

/// Path currently entered in a file prompt
pub fn prompt_path(ui: &EditorUi, prompt: UiElementId) -> Option<String> {
    let edit = ui.child_by_name(prompt, PATH_EDIT, false)?;
    let text = ui.get(edit)?.text.trim().to_string();
    (!text.is_empty()).then_some(text)
}
