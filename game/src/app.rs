//! Game application: scene setup, key bindings and persistence
//!
//! [`GameApp`] owns the scene, the editor and the camera rig. The host feeds
//! it input and UI events and calls [`GameApp::frame`] once per frame;
//! everything the host must do on the game's behalf goes through
//! [`HostServices`].

use editor::picking::PickingInput;
use editor::{EditorContext, EditorError, EditorNotice, EditorSettings, EditorState};
use engine::config::AssetConfig;
use engine::core::camera::Camera;
use engine::core::math::{self, UP};
use engine::dev::debug_draw::{DebugDraw, DebugLine};
use engine::input::InputState;
use engine::io::{ComponentRegistry, SceneError};
use engine::scene::components::{DebugRenderer, Octree, StaticModel, Zone};
use engine::scene::{CreateMode, NodeId, Scene, TransformSpace};
use engine::ui::UiEvent;
use engine::variant::{Color, Variant};
use glam::{Quat, Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use crate::controllers::{CameraBehaviour, CameraRig, RigFrame};

pub const CAMERA_NODE: &str = "Camera Node";
pub const CHARACTER_NODE: &str = "Character";
/// Scene variable holding the camera mode as an Int
pub const VAR_CAMERA_BEHAVIOUR: &str = "Camera Behaviour";
/// Scene variable holding the character's node id as an Int
pub const VAR_CHARACTER_NODE: &str = "Character Node";
/// Spin rate of "Box1" in degrees per second
pub const BOX_SPIN_RATE: f32 = 30.0;

const BOX_MODEL: &str = "Models/Box.mdl";
const STONE_MATERIAL: &str = "Materials/Stone.xml";

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What the game needs from the window and renderer
pub trait HostServices {
    /// Write the last presented frame to `path`
    fn take_screenshot(&mut self, path: &Path) -> std::io::Result<()>;
    fn set_cursor_visible(&mut self, visible: bool);
    fn request_exit(&mut self);
}

/// Startup configuration of the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Window size in pixels, used for mouse sensitivity and screen rays
    pub viewport: Vec2,
    pub assets: AssetConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(1024.0, 768.0),
            assets: AssetConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read the config file, falling back to defaults when missing or invalid
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                info!(path = ?path, "No game config found, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = ?path, error = %e, "Invalid game config, using defaults");
                Self::default()
            }
        }
    }
}

pub struct GameApp {
    config: AppConfig,
    registry: ComponentRegistry,
    scene: Scene,
    editor: EditorState,
    input: InputState,
    rig: CameraRig,
    camera: NodeId,
    character: Option<NodeId>,
    debug: DebugDraw,
}

impl GameApp {
    /// Load the quick-save scene and editor layout, creating both on first run
    pub fn new(config: AppConfig) -> Result<Self, GameError> {
        let registry = ComponentRegistry::with_default_components();
        config.assets.ensure_dirs()?;

        let scene_path = config.assets.quick_scene_path();
        let scene = match Scene::load_from_file(&scene_path, &registry) {
            Ok(scene) => scene,
            Err(e) => {
                info!(path = ?scene_path, error = %e, "No usable scene file, populating a new scene");
                let scene = populate_scene()?;
                if let Err(e) = scene.save_to_file(&scene_path) {
                    warn!(path = ?scene_path, error = %e, "Failed to save the new scene");
                }
                scene
            }
        };

        let layout_path = config.assets.layout_path();
        let settings = EditorSettings::load_or_default(EditorSettings::path_beside(&layout_path));
        let editor = EditorState::new(&registry, settings, config.viewport);

        let mut app = Self {
            config,
            registry,
            scene,
            editor,
            input: InputState::new(),
            rig: CameraRig::default(),
            camera: NodeId(0),
            character: None,
            debug: DebugDraw::new(),
        };
        app.on_scene_reloaded();

        if layout_path.exists() {
            if let Err(e) = app.editor.load_layout(&layout_path, &app.scene) {
                warn!(path = ?layout_path, error = %e, "Failed to load editor layout");
            }
        } else if let Err(e) = app.editor.save_layout(&layout_path) {
            warn!(path = ?layout_path, error = %e, "Failed to save editor layout");
        }
        info!(nodes = app.scene.node_count(), "Game ready");
        Ok(app)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn camera(&self) -> NodeId {
        self.camera
    }

    pub fn character(&self) -> Option<NodeId> {
        self.character.filter(|c| self.scene.contains_node(*c))
    }

    /// Select a node in the editor as a hierarchy click would
    pub fn select_node(&mut self, node: NodeId) {
        self.editor.select_node(&self.scene, node);
    }

    /// Lines queued by the last frame's post-render pass
    pub fn debug_lines(&self) -> &[DebugLine] {
        self.debug.lines()
    }

    /// Re-resolve the camera and character after the scene was replaced
    pub fn on_scene_reloaded(&mut self) {
        self.camera = ensure_camera(&mut self.scene);
        self.sync_camera_aspect();
        self.character = resolve_character(&mut self.scene);
        let behaviour = self
            .scene
            .var(VAR_CAMERA_BEHAVIOUR)
            .and_then(Variant::as_int)
            .and_then(CameraBehaviour::from_int)
            .unwrap_or_default();
        self.rig.restore(behaviour, &self.scene, self.camera);
        self.editor.scene_replaced(&self.scene);
        info!(
            camera = %self.camera,
            character = ?self.character,
            behaviour = ?behaviour,
            "Scene references restored"
        );
    }

    /// Store the custom variables, then write the scene and the editor layout
    pub fn save(&mut self) -> Result<(), GameError> {
        self.scene
            .set_var(VAR_CAMERA_BEHAVIOUR, Variant::Int(self.rig.behaviour().as_int()));
        match self.character() {
            Some(character) => {
                self.scene.set_var(VAR_CHARACTER_NODE, Variant::Int(character.0 as i32));
            }
            None => {
                self.scene.remove_var(VAR_CHARACTER_NODE);
            }
        }
        self.config.assets.ensure_dirs()?;
        self.scene.save_to_file(self.config.assets.quick_scene_path())?;
        self.editor.save_layout(&self.config.assets.layout_path())?;
        info!("Saved scene and editor layout");
        Ok(())
    }

    /// Replace the scene and the editor layout with the saved ones
    ///
    /// A scene that fails to load leaves the current one in place.
    pub fn reload(&mut self) -> Result<(), GameError> {
        let scene = Scene::load_from_file(self.config.assets.quick_scene_path(), &self.registry)?;
        self.scene = scene;
        self.on_scene_reloaded();
        self.editor.load_layout(&self.config.assets.layout_path(), &self.scene)?;
        info!("Reloaded scene and editor layout");
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode, state: ElementState, host: &mut dyn HostServices) {
        if self.editor.has_text_focus() {
            if state == ElementState::Pressed {
                let mut ctx = EditorContext {
                    scene: &mut self.scene,
                    registry: &self.registry,
                    assets: &self.config.assets,
                };
                let notices = self.editor.key_pressed(key, &mut ctx);
                self.apply_notices(&notices);
            }
            return;
        }
        self.input.handle_key(key, state);
        if state != ElementState::Pressed {
            return;
        }
        match key {
            KeyCode::Tab => {
                let visible = self.editor.toggle_visible(&self.scene);
                self.input.cursor_visible = visible;
                host.set_cursor_visible(visible);
            }
            KeyCode::F1 => self.assign_character(),
            KeyCode::F2 => {
                self.scene.update_enabled = !self.scene.update_enabled;
                info!(enabled = self.scene.update_enabled, "Scene update toggled");
            }
            KeyCode::F10 | KeyCode::Backspace => {
                let path = self.config.assets.screenshot_path();
                match host.take_screenshot(&path) {
                    Ok(()) => info!(path = ?path, "Screenshot saved"),
                    Err(e) => error!(path = ?path, error = %e, "Screenshot failed"),
                }
            }
            KeyCode::F11 => {
                if let Err(e) = self.reload() {
                    error!(error = %e, "Reload failed");
                }
            }
            KeyCode::F12 => {
                if let Err(e) = self.save() {
                    error!(error = %e, "Save failed");
                }
            }
            KeyCode::Space => {
                let character = self.character();
                self.rig.toggle(&self.scene, self.camera, character);
            }
            KeyCode::Escape => host.request_exit(),
            _ => {}
        }
    }

    /// Mouse buttons go to the editor's widgets first, then to the rig
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.input.handle_mouse_button(button, state);
        match state {
            ElementState::Pressed => {
                let mut ctx = EditorContext {
                    scene: &mut self.scene,
                    registry: &self.registry,
                    assets: &self.config.assets,
                };
                let notices = self
                    .editor
                    .pointer_pressed(self.input.mouse_position, button, &mut ctx);
                self.apply_notices(&notices);
            }
            ElementState::Released => self.editor.pointer_released(button),
        }
        if button != MouseButton::Middle {
            return;
        }
        match state {
            ElementState::Pressed => {
                let character = self.character();
                self.rig.middle_pressed(&self.scene, character);
            }
            ElementState::Released => self.rig.middle_released(),
        }
    }

    pub fn handle_cursor_moved(&mut self, position: Vec2) {
        self.input.set_mouse_position(position.x, position.y);
        let mut ctx = EditorContext {
            scene: &mut self.scene,
            registry: &self.registry,
            assets: &self.config.assets,
        };
        let notices = self.editor.pointer_moved(position, &mut ctx);
        self.apply_notices(&notices);
    }

    /// Text typed on the keyboard, for the focused line edit
    pub fn handle_text(&mut self, text: &str) {
        if self.editor.has_text_focus() {
            self.editor.text_input(text);
        }
    }

    /// Wheel movement in pixels, positive scrolling content up
    pub fn handle_scroll(&mut self, amount: f32) {
        if self.editor.is_visible() {
            self.editor.scroll(self.input.mouse_position, amount);
        }
    }

    /// Track a new window size for screen rays, mouse look and the editor
    ///
    /// Zero sizes, as reported for minimized windows, are ignored.
    pub fn resize(&mut self, viewport: Vec2) {
        if viewport.x < 1.0 || viewport.y < 1.0 {
            return;
        }
        self.config.viewport = viewport;
        self.editor.resize(viewport);
        self.sync_camera_aspect();
        debug!(width = viewport.x, height = viewport.y, "Viewport resized");
    }

    fn sync_camera_aspect(&mut self) {
        let aspect = self.config.viewport.x / self.config.viewport.y.max(1.0);
        let Some(id) = self.scene.component_of::<Camera>(self.camera) else {
            return;
        };
        if let Some(camera) = self.scene.get_mut::<Camera>(id) {
            camera.set_aspect_ratio(aspect);
        }
    }

    /// Raw mouse travel, accumulated until the end of the frame
    pub fn handle_mouse_delta(&mut self, delta: Vec2) {
        self.input.add_mouse_delta(delta.x, delta.y);
    }

    /// Forward a widget event to the editor
    pub fn handle_ui_event(&mut self, event: &UiEvent) {
        let mut ctx = EditorContext {
            scene: &mut self.scene,
            registry: &self.registry,
            assets: &self.config.assets,
        };
        let notices = self.editor.handle_event(event, &mut ctx);
        self.apply_notices(&notices);
    }

    fn apply_notices(&mut self, notices: &[EditorNotice]) {
        if notices.contains(&EditorNotice::SceneReplaced) {
            self.on_scene_reloaded();
        }
    }

    /// Run one frame: controllers, picking, scene logic, then the overlay
    pub fn frame(&mut self, dt: f32) {
        self.debug = DebugDraw::new();

        let rig_frame = RigFrame {
            input: &self.input,
            menu_visible: self.editor.is_visible(),
            viewport_height: self.config.viewport.y,
            dt,
        };
        self.rig.update(&mut self.scene, self.camera, self.character, rig_frame);

        let picking = PickingInput {
            camera_node: Some(self.camera),
            cursor: self.input.mouse_position,
            viewport: self.config.viewport,
            select: self.input.is_mouse_button_pressed(MouseButton::Left),
        };
        self.editor.update(&self.scene, &picking);

        if self.scene.update_enabled {
            if let Some(box1) = self.scene.child_by_name(self.scene.root(), "Box1", true) {
                let spin = Quat::from_axis_angle(UP, (BOX_SPIN_RATE * dt).to_radians());
                self.scene.rotate(box1, spin, TransformSpace::World);
            }
        }

        let character = self.character();
        self.editor
            .post_render(&self.scene, character, Some(self.camera), &mut self.debug);
        self.input.clear_frame_data();
    }

    fn assign_character(&mut self) {
        let hovered = self.editor.hover().map(|h| h.node);
        let selected = self
            .editor
            .selection()
            .drawable
            .and_then(|d| self.scene.component(d))
            .map(|slot| slot.node());
        match hovered.or(selected) {
            Some(node) => {
                self.character = Some(node);
                info!(node = %node, "Character assigned");
            }
            None => debug!("Nothing under the cursor or selected to assign as character"),
        }
    }
}

/// Find the camera node, creating it with a `Camera` when missing
fn ensure_camera(scene: &mut Scene) -> NodeId {
    let root = scene.root();
    let node = match scene.child_by_name(root, CAMERA_NODE, false) {
        Some(node) => node,
        None => match scene.create_child(root, CAMERA_NODE, CreateMode::Local) {
            Ok(node) => {
                warn!("Scene has no camera node, created one");
                node
            }
            Err(e) => {
                error!(error = %e, "Failed to create camera node");
                return root;
            }
        },
    };
    if scene.component_of::<Camera>(node).is_none() {
        if let Err(e) = scene.add_component(node, far_camera(), CreateMode::Local) {
            error!(node = %node, error = %e, "Failed to add camera component");
        }
    }
    node
}

/// Character from the saved node id, else the child named "Character"
fn resolve_character(scene: &mut Scene) -> Option<NodeId> {
    let saved = scene
        .var(VAR_CHARACTER_NODE)
        .and_then(Variant::as_int)
        .and_then(|id| u32::try_from(id).ok())
        .map(NodeId)
        .filter(|id| scene.contains_node(*id));
    if saved.is_some() {
        return saved;
    }

    let root = scene.root();
    if let Some(node) = scene.child_by_name(root, CHARACTER_NODE, false) {
        return Some(node);
    }
    match create_box(scene, CHARACTER_NODE, Vec3::new(5.0, 1.0, 5.0), 45.0, Vec3::ONE) {
        Ok(node) => {
            warn!(node = %node, "Scene has no character, created one");
            Some(node)
        }
        Err(e) => {
            error!(error = %e, "Failed to create character");
            None
        }
    }
}

fn far_camera() -> Camera {
    Camera {
        far_clip: 100.0,
        ..Camera::default()
    }
}

fn create_box(scene: &mut Scene, name: &str, position: Vec3, yaw: f32, scale: Vec3) -> Result<NodeId, SceneError> {
    let node = scene.create_child(scene.root(), name, CreateMode::Replicated)?;
    if let Some(n) = scene.node_mut(node) {
        n.set_position(position);
        n.set_rotation(math::yaw_rotation(yaw));
        n.set_scale(scale);
    }
    scene.add_component(
        node,
        StaticModel::with_model(BOX_MODEL, STONE_MATERIAL),
        CreateMode::Replicated,
    )?;
    Ok(node)
}

/// Build the starting scene: camera, zone, floor, a field of boxes and the character
pub fn populate_scene() -> Result<Scene, SceneError> {
    let mut scene = Scene::new("Scene");
    let root = scene.root();
    scene.add_component(root, Octree::default(), CreateMode::Replicated)?;
    scene.add_component(root, DebugRenderer::default(), CreateMode::Replicated)?;

    let camera = scene.create_child(root, CAMERA_NODE, CreateMode::Replicated)?;
    scene.set_world_position(camera, Vec3::new(20.0, 20.0, -20.0));
    scene.add_component(camera, far_camera(), CreateMode::Replicated)?;

    let zone = scene.create_child(root, "My Zone", CreateMode::Replicated)?;
    scene.add_component(
        zone,
        Zone {
            bounding_min: Vec3::splat(-50.0),
            bounding_max: Vec3::splat(50.0),
            ambient_color: Color::rgb(0.25, 0.25, 0.25),
            fog_color: Color::rgb(0.5, 0.5, 0.7),
            fog_start: 80.0,
            fog_end: 100.0,
        },
        CreateMode::Replicated,
    )?;

    let floor = scene.create_child(root, "Floor", CreateMode::Replicated)?;
    if let Some(node) = scene.node_mut(floor) {
        node.set_scale(Vec3::new(100.0, 1.0, 100.0));
    }
    scene.add_component(
        floor,
        StaticModel::with_model(BOX_MODEL, STONE_MATERIAL),
        CreateMode::Replicated,
    )?;

    create_box(&mut scene, "Box1", Vec3::new(0.0, 1.0, 0.0), 45.0, Vec3::ONE)?;
    let mut rng = rand::thread_rng();
    for i in 2..64 {
        let half_size: f32 = rng.gen_range(0.25..3.0);
        let position = Vec3::new(
            rng.gen_range(-50.0..50.0),
            half_size + 0.5,
            rng.gen_range(-50.0..50.0),
        );
        let yaw = rng.gen_range(0.0..360.0);
        create_box(&mut scene, &format!("Box{i}"), position, yaw, Vec3::splat(half_size * 2.0))?;
    }

    create_box(&mut scene, CHARACTER_NODE, Vec3::new(5.0, 1.0, 5.0), 45.0, Vec3::ONE)?;
    debug!(nodes = scene.node_count(), "Populated scene");
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::prelude::ROOT_ID;

    #[test]
    fn test_populated_scene_layout() {
        let scene = populate_scene().unwrap();
        let root = scene.root();
        for name in [CAMERA_NODE, "My Zone", "Floor", "Box1", "Box63", CHARACTER_NODE] {
            assert!(scene.child_by_name(root, name, false).is_some(), "missing {name}");
        }
        assert!(scene.child_by_name(root, "Box64", false).is_none());
        let camera = scene.child_by_name(root, CAMERA_NODE, false).unwrap();
        assert_eq!(scene.world_position(camera), Vec3::new(20.0, 20.0, -20.0));
        let id = scene.component_of::<Camera>(camera).unwrap();
        assert_eq!(scene.get::<Camera>(id).unwrap().far_clip, 100.0);
    }

    #[test]
    fn test_missing_camera_and_character_are_created() {
        let mut scene = Scene::new("Scene");
        let camera = ensure_camera(&mut scene);
        assert!(scene.component_of::<Camera>(camera).is_some());
        assert_eq!(ensure_camera(&mut scene), camera);

        let character = resolve_character(&mut scene).unwrap();
        assert_eq!(scene.node(character).unwrap().name, CHARACTER_NODE);
        assert!(scene.first_drawable(character).is_some());
    }

    #[test]
    fn test_character_variable_wins_over_name() {
        let mut scene = Scene::new("Scene");
        scene.create_child(ROOT_ID, CHARACTER_NODE, CreateMode::Local).unwrap();
        let other = scene.create_child(ROOT_ID, "Jack", CreateMode::Local).unwrap();
        scene.set_var(VAR_CHARACTER_NODE, Variant::Int(other.0 as i32));
        assert_eq!(resolve_character(&mut scene), Some(other));

        scene.set_var(VAR_CHARACTER_NODE, Variant::Int(999));
        let fallback = resolve_character(&mut scene).unwrap();
        assert_eq!(scene.node(fallback).unwrap().name, CHARACTER_NODE);
    }

    #[test]
    fn test_app_config_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(dir.path().join("game.json"));
        assert_eq!(config, AppConfig::default());

        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{ "viewport": [1920.0, 1080.0] }"#).unwrap();
        let config = AppConfig::load_or_default(&path);
        assert_eq!(config.viewport, Vec2::new(1920.0, 1080.0));
        assert_eq!(config.assets, AssetConfig::default());
    }
}
