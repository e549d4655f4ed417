use engine::config::AssetConfig;
use engine::prelude::*;
use engine::ui::ITEM_HEIGHT;
use game::app::{AppConfig, GameApp, HostServices, VAR_CAMERA_BEHAVIOUR, VAR_CHARACTER_NODE};
use game::controllers::CameraBehaviour;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

#[derive(Default)]
struct MockHost {
    screenshots: Vec<PathBuf>,
    cursor_visible: Option<bool>,
    exit_requested: bool,
}

impl HostServices for MockHost {
    fn take_screenshot(&mut self, path: &Path) -> std::io::Result<()> {
        self.screenshots.push(path.to_path_buf());
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = Some(visible);
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }
}

fn new_app() -> (TempDir, GameApp, MockHost) {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        assets: AssetConfig::with_root(dir.path().join("assets")),
        ..AppConfig::default()
    };
    let app = GameApp::new(config).unwrap();
    (dir, app, MockHost::default())
}

fn press(app: &mut GameApp, host: &mut MockHost, key: KeyCode) {
    app.handle_key(key, ElementState::Pressed, host);
    app.handle_key(key, ElementState::Released, host);
}

fn click_at(app: &mut GameApp, point: Vec2, button: MouseButton) {
    app.handle_cursor_moved(point);
    app.handle_mouse_button(button, ElementState::Pressed);
    app.handle_mouse_button(button, ElementState::Released);
}

fn center_of(app: &GameApp, element: UiElementId) -> Vec2 {
    let ui = app.editor().ui();
    ui.screen_position(element) + ui.get(element).unwrap().size * 0.5
}

/// Click the hierarchy row of a node, as a user would
fn click_node_row(app: &mut GameApp, node: NodeId) {
    let list = app.editor().hierarchy_list();
    let ui = app.editor().ui();
    let index = ui
        .items(list)
        .iter()
        .position(|item| item.tag == ItemTag::Node(node))
        .unwrap();
    let size = ui.get(list).unwrap().size;
    assert!((index as f32 + 1.0) * ITEM_HEIGHT < size.y);
    let point = ui.screen_position(list) + Vec2::new(20.0, (index as f32 + 0.5) * ITEM_HEIGHT);
    click_at(app, point, MouseButton::Left);
}

#[test]
fn test_first_run_writes_scene_and_layout() {
    let (dir, app, _) = new_app();
    let assets = AssetConfig::with_root(dir.path().join("assets"));
    assert!(assets.quick_scene_path().exists());
    assert!(assets.layout_path().exists());
    assert!(app.character().is_some());
    assert_eq!(app.scene().node(app.camera()).unwrap().name, "Camera Node");
    assert_eq!(app.rig().behaviour(), CameraBehaviour::FreeLook);
}

#[test]
fn test_space_then_chase_transition_lands_on_target() {
    let (_dir, mut app, mut host) = new_app();
    press(&mut app, &mut host, KeyCode::Space);
    assert_eq!(app.rig().behaviour(), CameraBehaviour::Chase);
    assert!(app.rig().is_lerping());

    for _ in 0..10 {
        app.frame(0.1);
    }

    assert!(!app.rig().is_lerping());
    let character = app.character().unwrap();
    let target = app.rig().chase_target(app.scene(), character);
    assert_eq!(app.scene().world_position(app.camera()), target);
}

#[test]
fn test_save_then_load_keeps_camera_mode_and_character() {
    let (_dir, mut app, mut host) = new_app();
    let jack = app
        .scene_mut()
        .create_child(ROOT_ID, "Jack", CreateMode::Local)
        .unwrap();
    app.scene_mut().node_mut(jack).unwrap().set_position(Vec3::new(-3.0, 0.0, 2.0));
    app.scene_mut()
        .add_component(jack, StaticModel::with_model("Models/Jack.mdl", ""), CreateMode::Local)
        .unwrap();
    app.select_node(jack);
    press(&mut app, &mut host, KeyCode::F1);
    assert_eq!(app.character(), Some(jack));

    press(&mut app, &mut host, KeyCode::Space);
    press(&mut app, &mut host, KeyCode::F12);
    assert_eq!(app.scene().var(VAR_CAMERA_BEHAVIOUR), Some(&Variant::Int(1)));
    assert_eq!(app.scene().var(VAR_CHARACTER_NODE), Some(&Variant::Int(jack.0 as i32)));

    press(&mut app, &mut host, KeyCode::Space);
    assert_eq!(app.rig().behaviour(), CameraBehaviour::FreeLook);
    app.scene_mut().remove_node(jack).unwrap();

    press(&mut app, &mut host, KeyCode::F11);
    assert_eq!(app.rig().behaviour(), CameraBehaviour::Chase);
    assert_eq!(app.character(), Some(jack));
    assert_eq!(app.scene().node(jack).unwrap().name, "Jack");
}

#[test]
fn test_reload_without_save_file_keeps_scene() {
    let (dir, mut app, mut host) = new_app();
    let assets = AssetConfig::with_root(dir.path().join("assets"));
    std::fs::remove_file(assets.quick_scene_path()).unwrap();
    let nodes = app.scene().node_count();

    press(&mut app, &mut host, KeyCode::F11);
    assert_eq!(app.scene().node_count(), nodes);
    assert!(app.character().is_some());
}

#[test]
fn test_host_bindings() {
    let (_dir, mut app, mut host) = new_app();

    press(&mut app, &mut host, KeyCode::Tab);
    assert!(app.editor().is_visible());
    assert_eq!(host.cursor_visible, Some(true));
    press(&mut app, &mut host, KeyCode::Tab);
    assert_eq!(host.cursor_visible, Some(false));

    press(&mut app, &mut host, KeyCode::F10);
    press(&mut app, &mut host, KeyCode::Backspace);
    assert_eq!(
        host.screenshots,
        vec![PathBuf::from("ScreenShot.png"), PathBuf::from("ScreenShot.png")]
    );

    assert!(!host.exit_requested);
    press(&mut app, &mut host, KeyCode::Escape);
    assert!(host.exit_requested);
}

#[test]
fn test_pause_stops_box_spin() {
    let (_dir, mut app, mut host) = new_app();
    let box1 = app.scene().child_by_name(ROOT_ID, "Box1", false).unwrap();

    let before = app.scene().world_rotation(box1);
    app.frame(0.5);
    let spun = app.scene().world_rotation(box1);
    assert!(before.angle_between(spun) > 0.1);

    press(&mut app, &mut host, KeyCode::F2);
    assert!(!app.scene().update_enabled);
    app.frame(0.5);
    assert_eq!(app.scene().world_rotation(box1), spun);
}

#[test]
fn test_post_render_queues_overlay() {
    let (_dir, mut app, _) = new_app();
    app.frame(0.016);
    assert!(!app.debug_lines().is_empty());

    let character = app.character().unwrap();
    app.scene_mut().remove_node(character).unwrap();
    app.frame(0.016);
    assert!(app.debug_lines().is_empty());
}

#[test]
fn test_new_scene_from_menu_restores_camera_and_character() {
    let (_dir, mut app, mut host) = new_app();
    press(&mut app, &mut host, KeyCode::Tab);

    let menu = app.editor().main_menu();
    let ui = app.editor().ui();
    let scene_group = ui.child_by_name(menu, "Scene", false).unwrap();
    let list = ui.child_by_name(scene_group, "DropDownList", false).unwrap();
    app.handle_ui_event(&UiEvent::ItemSelected { element: list, index: 0 });

    let prompt = app.editor().prompt().unwrap();
    let yes = app.editor().ui().child_by_name(prompt, "YesButton", true).unwrap();
    app.handle_ui_event(&UiEvent::Click {
        element: yes,
        button: MouseButton::Left,
    });

    let scene = app.scene();
    assert!(scene.child_by_name(ROOT_ID, "Box1", false).is_none());
    assert!(scene.component_of::<Camera>(app.camera()).is_some());
    let character = app.character().unwrap();
    assert_eq!(scene.node(character).unwrap().name, "Character");
}

#[test]
fn test_middle_button_remaps_only_in_chase() {
    let (_dir, mut app, mut host) = new_app();
    app.handle_mouse_button(MouseButton::Middle, ElementState::Pressed);
    app.handle_mouse_button(MouseButton::Middle, ElementState::Released);
    assert_eq!(app.rig().behaviour(), CameraBehaviour::FreeLook);

    press(&mut app, &mut host, KeyCode::Space);
    for _ in 0..10 {
        app.frame(0.1);
    }
    let (pitch, yaw) = (app.rig().pitch(), app.rig().yaw());
    app.handle_mouse_button(MouseButton::Middle, ElementState::Pressed);
    app.handle_mouse_button(MouseButton::Middle, ElementState::Released);
    assert_eq!((app.rig().pitch(), app.rig().yaw()), (pitch, yaw));
}

#[test]
fn test_save_without_character_drops_stale_id() {
    let (_dir, mut app, mut host) = new_app();
    let old = app.character().unwrap();
    press(&mut app, &mut host, KeyCode::F12);
    assert_eq!(app.scene().var(VAR_CHARACTER_NODE), Some(&Variant::Int(old.0 as i32)));

    app.scene_mut().remove_node(old).unwrap();
    press(&mut app, &mut host, KeyCode::F12);
    assert_eq!(app.scene().var(VAR_CHARACTER_NODE), None);

    press(&mut app, &mut host, KeyCode::F11);
    let character = app.character().unwrap();
    assert_ne!(character, old);
    assert_eq!(app.scene().node(character).unwrap().name, "Character");
}

#[test]
fn test_camera_aspect_follows_viewport() {
    let (_dir, mut app, _) = new_app();
    let aspect = |app: &GameApp| {
        let id = app.scene().component_of::<Camera>(app.camera()).unwrap();
        app.scene().get::<Camera>(id).unwrap().aspect_ratio
    };
    assert_eq!(aspect(&app), 1024.0 / 768.0);

    app.resize(Vec2::new(800.0, 400.0));
    assert_eq!(aspect(&app), 2.0);
    assert_eq!(app.config().viewport, Vec2::new(800.0, 400.0));

    app.resize(Vec2::ZERO);
    assert_eq!(aspect(&app), 2.0);
}

#[test]
fn test_clicking_hierarchy_row_selects_node() {
    let (_dir, mut app, mut host) = new_app();
    press(&mut app, &mut host, KeyCode::Tab);
    let box1 = app.scene().child_by_name(ROOT_ID, "Box1", false).unwrap();

    click_node_row(&mut app, box1);
    assert_eq!(app.editor().selection().node, Some(box1));
}

#[test]
fn test_typing_into_inspector_moves_node() {
    let (_dir, mut app, mut host) = new_app();
    press(&mut app, &mut host, KeyCode::Tab);
    let box1 = app.scene().child_by_name(ROOT_ID, "Box1", false).unwrap();
    click_node_row(&mut app, box1);

    let panel = app.editor().inspector_panel();
    let divider = app.editor().ui().child_by_name(panel, "Node Attributes", false).unwrap();
    let divider_center = center_of(&app, divider);
    click_at(&mut app, divider_center, MouseButton::Left);

    let ui = app.editor().ui();
    let row = ui.child_by_name(panel, "Position", false).unwrap();
    let x = ui.child_by_name(row, "X", false).unwrap();
    let current = ui.get(x).unwrap().text.len();
    let point = center_of(&app, x);
    assert_eq!(app.editor().ui().element_at(point), Some(x));

    click_at(&mut app, point, MouseButton::Left);
    assert!(app.editor().has_text_focus());
    for _ in 0..current {
        press(&mut app, &mut host, KeyCode::Backspace);
    }
    app.handle_text("7.5");
    press(&mut app, &mut host, KeyCode::Enter);

    assert!(!app.editor().has_text_focus());
    assert_eq!(app.scene().node(box1).unwrap().position().x, 7.5);
    assert!(host.screenshots.is_empty());
}

#[test]
fn test_menu_dropdown_and_prompt_by_pointer() {
    let (_dir, mut app, mut host) = new_app();
    press(&mut app, &mut host, KeyCode::Tab);

    let menu = app.editor().main_menu();
    let ui = app.editor().ui();
    let group = ui.child_by_name(menu, "Scene", false).unwrap();
    let list = ui.child_by_name(group, "DropDownList", false).unwrap();
    let header = center_of(&app, list);
    click_at(&mut app, header, MouseButton::Left);

    let size = app.editor().ui().get(list).unwrap().size;
    click_at(&mut app, header + Vec2::new(0.0, size.y * 0.5 + ITEM_HEIGHT * 0.5), MouseButton::Left);
    let prompt = app.editor().prompt().unwrap();

    let yes = app.editor().ui().child_by_name(prompt, "YesButton", true).unwrap();
    let yes_center = center_of(&app, yes);
    click_at(&mut app, yes_center, MouseButton::Left);

    assert!(app.editor().prompt().is_none());
    assert!(app.scene().child_by_name(ROOT_ID, "Box1", false).is_none());
    assert!(app.character().is_some());
}

#[test]
fn test_dragging_title_bar_moves_window() {
    let (_dir, mut app, mut host) = new_app();
    press(&mut app, &mut host, KeyCode::Tab);
    let window = app.editor().hierarchy_window();
    let start = app.editor().ui().get(window).unwrap().position;

    app.handle_cursor_moved(start + Vec2::new(20.0, 10.0));
    app.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
    app.handle_cursor_moved(start + Vec2::new(60.0, 30.0));
    app.handle_mouse_button(MouseButton::Left, ElementState::Released);
    app.handle_cursor_moved(start + Vec2::new(90.0, 30.0));

    let moved = start + Vec2::new(40.0, 20.0);
    assert_eq!(app.editor().ui().get(window).unwrap().position, moved);
    assert_eq!(app.editor().settings().hierarchy.position, moved);
}
