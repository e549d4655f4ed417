//! Main editor state management
//!
//! [`EditorState`] owns the editor's widget tree, its settings and the
//! current selection. The game forwards UI events to
//! [`EditorState::handle_event`], which turns them into [`EditorAction`]s
//! and applies each one to the scene borrowed through an [`EditorContext`].

use engine::config::AssetConfig;
use engine::dev::debug_draw::DebugDraw;
use engine::io::ComponentRegistry;
use engine::scene::components::Octree;
use engine::scene::{CreateMode, NodeId, Scene};
use engine::ui::{ItemTag, LayoutError, UiElementId, UiEvent, UiInput};
use engine::variant::Color;
use glam::{Vec2, Vec3};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::actions::{Confirmation, DeleteTarget, EditorAction, FilePurpose, MenuCommand};
use crate::main_menu::{self, MAIN_MENU};
use crate::panels::context_menu::{self, ComponentCatalog};
use crate::panels::hierarchy::{self, HIERARCHY_LIST, HIERARCHY_WINDOW};
use crate::panels::inspector::{self, DisplaySpace, INSPECTOR_PANEL, INSPECTOR_WINDOW};
use crate::panels::{apply_edit, rebuild_hierarchy, rebuild_inspector};
use crate::picking::{cursor_ray, pick, PickingInput};
use crate::selection::{HoverCandidate, Selection};
use crate::settings::{EditorSettings, SettingsError};
use crate::windows::{self, EditorUi};

/// Distance along the camera ray of the cursor marker when nothing is hovered
const CURSOR_MARKER_DISTANCE: f32 = 10.0;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// What an action reported back to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorNotice {
    /// The scene was replaced; ids held outside the editor are stale
    SceneReplaced,
}

/// Scene and services borrowed by the editor while applying actions
pub struct EditorContext<'a> {
    pub scene: &'a mut Scene,
    pub registry: &'a ComponentRegistry,
    pub assets: &'a AssetConfig,
}

/// Main editor state
pub struct EditorState {
    ui: EditorUi,
    settings: EditorSettings,
    selection: Selection,
    hover: Option<HoverCandidate>,
    catalog: ComponentCatalog,
    display_space: DisplaySpace,

    main_menu: UiElementId,
    hierarchy_window: UiElementId,
    hierarchy_list: UiElementId,
    inspector_window: UiElementId,
    inspector_panel: UiElementId,

    context_window: Option<UiElementId>,
    component_factory: Option<UiElementId>,
    prompt: Option<UiElementId>,
    file_prompt: Option<UiElementId>,
    /// Type picked in the component factory, waiting for CREATE
    pending_component: Option<String>,

    /// Focus, open drop-down and drag between input events
    pointer: UiInput,
    cursor: Vec2,
    viewport: Vec2,
}

impl EditorState {
    /// Create the editor windows for a viewport of the given size
    pub fn new(registry: &ComponentRegistry, settings: EditorSettings, viewport: Vec2) -> Self {
        info!(components = registry.len(), "Initializing editor state");
        let mut ui = EditorUi::new(viewport);
        let main_menu = main_menu::create_main_menu(&mut ui, viewport.x);
        let (hierarchy_window, hierarchy_list) =
            hierarchy::create_hierarchy_window(&mut ui, &settings.hierarchy);
        let (inspector_window, inspector_panel) =
            inspector::create_inspector_window(&mut ui, &settings.inspector);

        let mut state = Self {
            ui,
            settings,
            selection: Selection::default(),
            hover: None,
            catalog: registry.categories(),
            display_space: DisplaySpace::default(),
            main_menu,
            hierarchy_window,
            hierarchy_list,
            inspector_window,
            inspector_panel,
            context_window: None,
            component_factory: None,
            prompt: None,
            file_prompt: None,
            pending_component: None,
            pointer: UiInput::new(),
            cursor: viewport * 0.5,
            viewport,
        };
        state.wire();
        state.apply_visibility();
        state
    }

    pub fn ui(&self) -> &EditorUi {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut EditorUi {
        &mut self.ui
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn hover(&self) -> Option<HoverCandidate> {
        self.hover
    }

    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    pub fn display_space(&self) -> DisplaySpace {
        self.display_space
    }

    pub fn pending_component(&self) -> Option<&str> {
        self.pending_component.as_deref()
    }

    pub fn main_menu(&self) -> UiElementId {
        self.main_menu
    }

    pub fn hierarchy_window(&self) -> UiElementId {
        self.hierarchy_window
    }

    pub fn hierarchy_list(&self) -> UiElementId {
        self.hierarchy_list
    }

    pub fn inspector_window(&self) -> UiElementId {
        self.inspector_window
    }

    pub fn inspector_panel(&self) -> UiElementId {
        self.inspector_panel
    }

    pub fn context_window(&self) -> Option<UiElementId> {
        self.context_window
    }

    pub fn component_factory(&self) -> Option<UiElementId> {
        self.component_factory
    }

    pub fn prompt(&self) -> Option<UiElementId> {
        self.prompt
    }

    pub fn file_prompt(&self) -> Option<UiElementId> {
        self.file_prompt
    }

    pub fn is_visible(&self) -> bool {
        self.settings.editor_visible
    }

    /// Show or hide the main menu and every window flagged visible
    pub fn set_visible(&mut self, visible: bool, scene: &Scene) {
        self.settings.editor_visible = visible;
        self.apply_visibility();
        if visible {
            self.rebuild_panels(scene);
        } else {
            self.pointer.reset(&mut self.ui);
            self.close_transients();
        }
        debug!(visible, "Editor visibility changed");
    }

    pub fn toggle_visible(&mut self, scene: &Scene) -> bool {
        let visible = !self.is_visible();
        self.set_visible(visible, scene);
        visible
    }

    fn apply_visibility(&mut self) {
        let visible = self.settings.editor_visible;
        self.ui.set_visible(self.main_menu, visible);
        self.ui
            .set_visible(self.hierarchy_window, visible && self.settings.hierarchy.visible);
        self.ui
            .set_visible(self.inspector_window, visible && self.settings.inspector.visible);
    }

    fn wire(&mut self) {
        main_menu::wire_main_menu(&mut self.ui, self.main_menu);
        hierarchy::wire_hierarchy(&mut self.ui, self.hierarchy_window);
        windows::wire_window(&mut self.ui, self.inspector_window);
    }

    fn close_transients(&mut self) {
        windows::close_transient(&mut self.ui, &mut self.context_window);
        windows::close_transient(&mut self.ui, &mut self.component_factory);
        windows::close_transient(&mut self.ui, &mut self.prompt);
        windows::close_transient(&mut self.ui, &mut self.file_prompt);
        self.pending_component = None;
    }

    /// Per-frame picking: recompute the hover candidate and select on click
    pub fn update(&mut self, scene: &Scene, input: &PickingInput) {
        self.cursor = input.cursor;
        self.viewport = input.viewport;
        self.hover = pick(scene, &self.ui, input);

        let Some(hit) = self.hover else {
            return;
        };
        if input.select && self.selection.component != Some(hit.component) {
            self.selection.select_hit(&hit);
            self.rebuild_panels(scene);
        }
    }

    /// Track a new viewport size
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        let root = self.ui.root();
        self.ui.set_rect(root, Vec2::ZERO, viewport);
        if let Some(menu) = self.ui.get_mut(self.main_menu) {
            menu.size.x = viewport.x;
        }
    }

    /// Whether typed keys belong to a line edit
    pub fn has_text_focus(&self) -> bool {
        self.pointer.has_text_focus()
    }

    /// Route a mouse press through the widgets under `point`
    ///
    /// Hidden editors ignore the press.
    pub fn pointer_pressed(
        &mut self,
        point: Vec2,
        button: MouseButton,
        ctx: &mut EditorContext,
    ) -> Vec<EditorNotice> {
        if !self.is_visible() {
            return Vec::new();
        }
        self.cursor = point;
        match self.pointer.press(&mut self.ui, point, button) {
            Some(event) => self.handle_event(&event, ctx),
            None => Vec::new(),
        }
    }

    pub fn pointer_released(&mut self, button: MouseButton) {
        self.pointer.release(button);
    }

    /// Cursor movement; drags the window held by the left button
    pub fn pointer_moved(&mut self, point: Vec2, ctx: &mut EditorContext) -> Vec<EditorNotice> {
        match self.pointer.cursor_moved(point) {
            Some(event) => self.handle_event(&event, ctx),
            None => Vec::new(),
        }
    }

    /// Scroll the list or panel under `point`
    pub fn scroll(&mut self, point: Vec2, amount: f32) {
        if let Some(element) = self.ui.element_at(point) {
            self.ui.scroll_by(element, amount);
        }
    }

    /// Characters typed while a line edit has focus
    pub fn text_input(&mut self, text: &str) {
        self.pointer.text(&mut self.ui, text);
    }

    /// Editing keys while a line edit has focus
    pub fn key_pressed(&mut self, key: KeyCode, ctx: &mut EditorContext) -> Vec<EditorNotice> {
        match self.pointer.key(&mut self.ui, key) {
            Some(event) => self.handle_event(&event, ctx),
            None => Vec::new(),
        }
    }

    /// Dispatch a UI event and apply the actions it produced
    pub fn handle_event(&mut self, event: &UiEvent, ctx: &mut EditorContext) -> Vec<EditorNotice> {
        let mut notices = Vec::new();
        for action in self.ui.dispatch(event) {
            notices.extend(self.apply(action, ctx));
        }
        notices
    }

    /// Apply a single action
    pub fn apply(&mut self, action: EditorAction, ctx: &mut EditorContext) -> Option<EditorNotice> {
        debug!(?action, "Applying editor action");
        match action {
            EditorAction::HierarchyClicked { index, button } => {
                self.hierarchy_clicked(index, button, ctx.scene);
            }
            EditorAction::ToggleSection(section) => {
                let collapsed = self.settings.sections.toggle(section);
                debug!(section = section.title(), collapsed, "Toggled inspector section");
                self.rebuild_inspector(ctx.scene);
            }
            EditorAction::ToggleDisplaySpace => {
                self.display_space = self.display_space.toggled();
                self.rebuild_inspector(ctx.scene);
            }
            EditorAction::EditValue { binding, text } => {
                match apply_edit(ctx.scene, &binding, &text, self.display_space.is_world()) {
                    Ok(value) => {
                        debug!(attribute = %binding.name, value = %value.to_text(), "Edited attribute");
                        if binding.field.is_none() {
                            self.rebuild_hierarchy(ctx.scene);
                        }
                    }
                    Err(err) => warn!(attribute = %binding.name, text = %text, "Ignoring edit: {err}"),
                }
                self.rebuild_inspector(ctx.scene);
            }
            EditorAction::CreateNode { parent, mode } => {
                match ctx.scene.create_child(parent, "", mode) {
                    Ok(node) => info!(node = %node, parent = %parent, ?mode, "Created node"),
                    Err(err) => warn!(parent = %parent, "Failed to create node: {err}"),
                }
                windows::close_transient(&mut self.ui, &mut self.context_window);
                self.rebuild_hierarchy(ctx.scene);
            }
            EditorAction::OpenComponentFactory { node, mode } => {
                windows::close_transient(&mut self.ui, &mut self.component_factory);
                self.pending_component = None;
                self.component_factory = Some(context_menu::open_component_factory(
                    &mut self.ui,
                    &self.catalog,
                    node,
                    mode,
                    self.cursor,
                ));
            }
            EditorAction::PickComponentType(type_name) => {
                debug!(type_name = %type_name, "Picked component type");
                self.pending_component = Some(type_name);
            }
            EditorAction::CreateComponent { node, mode } => {
                self.create_component(node, mode, ctx);
            }
            EditorAction::CancelComponentFactory => {
                windows::close_transient(&mut self.ui, &mut self.component_factory);
                self.pending_component = None;
            }
            EditorAction::RequestDelete(target) => {
                self.open_prompt(Confirmation::Delete(target));
            }
            EditorAction::Confirm(confirmation) => {
                windows::close_transient(&mut self.ui, &mut self.prompt);
                return self.confirmed(confirmation, ctx);
            }
            EditorAction::DismissPrompt => {
                windows::close_transient(&mut self.ui, &mut self.prompt);
            }
            EditorAction::Menu(command) => self.menu(command, ctx),
            EditorAction::SubmitFilePrompt(purpose) => return self.submit_file_prompt(purpose, ctx),
            EditorAction::CancelFilePrompt => {
                windows::close_transient(&mut self.ui, &mut self.file_prompt);
            }
            EditorAction::CloseWindow(window) => self.close_window(window),
            EditorAction::DragWindow { window, delta } => self.drag_window(window, delta),
        }
        None
    }

    fn hierarchy_clicked(&mut self, index: usize, button: MouseButton, scene: &Scene) {
        let Some(tag) = hierarchy::row_tag(&self.ui, self.hierarchy_list, index) else {
            debug!(index, "Click on missing hierarchy row");
            return;
        };
        match (button, tag) {
            (MouseButton::Left, ItemTag::Node(node)) => {
                self.selection.select_node(scene, node);
                self.show_inspector();
                self.rebuild_panels(scene);
            }
            (MouseButton::Left, ItemTag::Component(component)) => {
                if self.selection.select_component(scene, component) {
                    self.show_inspector();
                    self.rebuild_panels(scene);
                }
            }
            (MouseButton::Right, ItemTag::Node(node)) => {
                windows::close_transient(&mut self.ui, &mut self.context_window);
                self.context_window =
                    context_menu::open_node_menu(&mut self.ui, scene, node, self.cursor);
            }
            (MouseButton::Right, ItemTag::Component(component)) => {
                windows::close_transient(&mut self.ui, &mut self.context_window);
                self.context_window =
                    context_menu::open_component_menu(&mut self.ui, scene, component, self.cursor);
            }
            _ => {}
        }
    }

    fn show_inspector(&mut self) {
        self.settings.inspector.visible = true;
        self.apply_visibility();
    }

    fn create_component(&mut self, node: NodeId, mode: CreateMode, ctx: &mut EditorContext) {
        let Some(type_name) = self.pending_component.take() else {
            debug!(node = %node, "No component type picked");
            return;
        };
        match ctx.scene.create_component(node, &type_name, mode, ctx.registry) {
            Ok(component) => {
                info!(component = %component, node = %node, type_name = %type_name, "Created component")
            }
            Err(err) => warn!(node = %node, type_name = %type_name, "Failed to create component: {err}"),
        }
        windows::close_transient(&mut self.ui, &mut self.component_factory);
        windows::close_transient(&mut self.ui, &mut self.context_window);
        self.rebuild_panels(ctx.scene);
    }

    fn open_prompt(&mut self, confirmation: Confirmation) {
        windows::close_transient(&mut self.ui, &mut self.prompt);
        self.prompt = Some(context_menu::open_confirm_prompt(
            &mut self.ui,
            confirmation,
            self.cursor,
        ));
    }

    fn confirmed(&mut self, confirmation: Confirmation, ctx: &mut EditorContext) -> Option<EditorNotice> {
        match confirmation {
            Confirmation::Delete(target) => {
                let result = match target {
                    DeleteTarget::Node(node) => ctx.scene.remove_node(node),
                    DeleteTarget::Component(component) => ctx.scene.remove_component(component),
                };
                match result {
                    Ok(()) => info!(?target, "Deleted"),
                    Err(err) => warn!(?target, "Failed to delete: {err}"),
                }
                self.selection.validate(ctx.scene);
                windows::close_transient(&mut self.ui, &mut self.context_window);
                self.rebuild_panels(ctx.scene);
                None
            }
            Confirmation::Overwrite { purpose, path } => {
                self.write_file(purpose, &path, ctx.scene);
                None
            }
            Confirmation::NewScene => {
                *ctx.scene = empty_scene(ctx.scene.name());
                info!("Created new scene");
                self.scene_replaced(ctx.scene);
                Some(EditorNotice::SceneReplaced)
            }
        }
    }

    fn menu(&mut self, command: MenuCommand, ctx: &mut EditorContext) {
        match command {
            MenuCommand::ToggleHierarchy => {
                self.settings.hierarchy.visible = !self.settings.hierarchy.visible;
                self.apply_visibility();
                self.rebuild_hierarchy(ctx.scene);
            }
            MenuCommand::ToggleInspector => {
                self.settings.inspector.visible = !self.settings.inspector.visible;
                self.apply_visibility();
                self.rebuild_inspector(ctx.scene);
            }
            MenuCommand::NewScene => self.open_prompt(Confirmation::NewScene),
            MenuCommand::LoadScene => {
                self.open_file_prompt(FilePurpose::LoadScene, &ctx.assets.quick_scene_path())
            }
            MenuCommand::SaveScene => {
                self.open_file_prompt(FilePurpose::SaveScene, &ctx.assets.quick_scene_path())
            }
            MenuCommand::LoadPrefab => {
                let path = default_prefab_path(ctx.assets, "Prefab");
                self.open_file_prompt(FilePurpose::LoadPrefab, &path);
            }
            MenuCommand::SavePrefab => {
                let name = self
                    .selection
                    .node
                    .and_then(|n| ctx.scene.node(n))
                    .map(|n| n.name.clone())
                    .unwrap_or_default();
                let path = default_prefab_path(ctx.assets, &name);
                self.open_file_prompt(FilePurpose::SavePrefab, &path);
            }
            MenuCommand::NewProject
            | MenuCommand::LoadProject
            | MenuCommand::SaveProject
            | MenuCommand::Transform
            | MenuCommand::NavMesh => warn!(?command, "Menu item not handled"),
        }
    }

    fn open_file_prompt(&mut self, purpose: FilePurpose, default_path: &Path) {
        windows::close_transient(&mut self.ui, &mut self.file_prompt);
        self.file_prompt = Some(main_menu::open_file_prompt(
            &mut self.ui,
            purpose,
            default_path,
            self.cursor,
        ));
    }

    fn submit_file_prompt(&mut self, purpose: FilePurpose, ctx: &mut EditorContext) -> Option<EditorNotice> {
        let prompt = self.file_prompt?;
        let Some(text) = main_menu::prompt_path(&self.ui, prompt) else {
            warn!(purpose = purpose.title(), "No path entered");
            return None;
        };
        windows::close_transient(&mut self.ui, &mut self.file_prompt);
        let path = PathBuf::from(text);

        if purpose.is_save() {
            if path.exists() {
                self.open_prompt(Confirmation::Overwrite { purpose, path });
            } else {
                self.write_file(purpose, &path, ctx.scene);
            }
            return None;
        }
        self.read_file(purpose, &path, ctx)
    }

    fn write_file(&mut self, purpose: FilePurpose, path: &Path, scene: &Scene) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(err) = std::fs::create_dir_all(parent) {
                error!(path = ?parent, "Failed to create directory: {err}");
                return;
            }
        }
        let result = match purpose {
            FilePurpose::SaveScene => scene.save_to_file(path),
            FilePurpose::SavePrefab => {
                let Some(node) = self.selection.node.filter(|n| scene.contains_node(*n)) else {
                    warn!("Save Prefab needs a selected node");
                    return;
                };
                scene.save_node(node, path)
            }
            FilePurpose::LoadScene | FilePurpose::LoadPrefab => return,
        };
        if let Err(err) = result {
            error!(path = ?path, purpose = purpose.title(), "Save failed: {err}");
        }
    }

    fn read_file(&mut self, purpose: FilePurpose, path: &Path, ctx: &mut EditorContext) -> Option<EditorNotice> {
        match purpose {
            FilePurpose::LoadScene => match Scene::load_from_file(path, ctx.registry) {
                Ok(scene) => {
                    *ctx.scene = scene;
                    self.scene_replaced(ctx.scene);
                    Some(EditorNotice::SceneReplaced)
                }
                Err(err) => {
                    error!(path = ?path, "Failed to load scene: {err}");
                    None
                }
            },
            FilePurpose::LoadPrefab => {
                let parent = self.selection.inspected_node(ctx.scene);
                match ctx.scene.instantiate_node(path, parent, ctx.registry) {
                    Ok(node) => {
                        self.selection.select_node(ctx.scene, node);
                        self.rebuild_panels(ctx.scene);
                    }
                    Err(err) => error!(path = ?path, "Failed to load prefab: {err}"),
                }
                None
            }
            FilePurpose::SaveScene | FilePurpose::SavePrefab => None,
        }
    }

    fn close_window(&mut self, window: UiElementId) {
        if window == self.hierarchy_window {
            self.settings.hierarchy.visible = false;
            self.apply_visibility();
        } else if window == self.inspector_window {
            self.settings.inspector.visible = false;
            self.apply_visibility();
        } else if self.component_factory == Some(window) {
            windows::close_transient(&mut self.ui, &mut self.component_factory);
            self.pending_component = None;
        } else {
            for slot in [
                &mut self.context_window,
                &mut self.prompt,
                &mut self.file_prompt,
            ] {
                if *slot == Some(window) {
                    windows::close_transient(&mut self.ui, slot);
                }
            }
        }
    }

    fn drag_window(&mut self, window: UiElementId, delta: Vec2) {
        let Some(element) = self.ui.get_mut(window) else {
            return;
        };
        element.position += delta;
        let position = element.position;
        if window == self.hierarchy_window {
            self.settings.hierarchy.position = position;
        } else if window == self.inspector_window {
            self.settings.inspector.position = position;
        }
        self.ui.bring_to_front(window);
    }

    pub fn rebuild_hierarchy(&mut self, scene: &Scene) {
        rebuild_hierarchy(&mut self.ui, self.hierarchy_list, scene, self.selection.component);
    }

    pub fn rebuild_inspector(&mut self, scene: &Scene) {
        rebuild_inspector(
            &mut self.ui,
            self.inspector_panel,
            scene,
            &self.selection,
            &self.settings.sections,
            self.display_space,
        );
    }

    pub fn rebuild_panels(&mut self, scene: &Scene) {
        self.rebuild_hierarchy(scene);
        self.rebuild_inspector(scene);
    }

    /// Forget everything tied to the previous scene and rebuild
    pub fn scene_replaced(&mut self, scene: &Scene) {
        self.pointer.reset(&mut self.ui);
        self.selection.clear();
        self.hover = None;
        self.close_transients();
        self.rebuild_panels(scene);
    }

    /// Select a node directly, as a hierarchy click would
    pub fn select_node(&mut self, scene: &Scene, node: NodeId) {
        self.selection.select_node(scene, node);
        self.rebuild_panels(scene);
    }

    /// Queue the editor overlay for this frame
    pub fn post_render(
        &self,
        scene: &Scene,
        character: Option<NodeId>,
        camera_node: Option<NodeId>,
        debug: &mut DebugDraw,
    ) {
        let Some(character) = character.filter(|c| scene.contains_node(*c)) else {
            return;
        };

        if let Some(box1) = scene.child_by_name(scene.root(), "Box1", true) {
            debug.add_axes(&scene.world_matrix(box1), 1.0, false);
        }
        debug.add_axes(&scene.world_matrix(character), 1.0, false);

        if let Some(hover) = self.hover.filter(|h| h.node != character) {
            if let Some(bounds) = scene.world_bounds(hover.component) {
                debug.add_box(&bounds, Color::YELLOW, false);
            }
        }

        if let Some(drawable) = self.selection.drawable {
            if let (Some(slot), Some(bounds)) = (scene.component(drawable), scene.world_bounds(drawable)) {
                let world = scene.world_matrix(slot.node());
                let radius = bounds.bounding_radius();
                debug.add_axes(&world, radius, false);
                let rings = [(Vec3::X, Color::RED), (Vec3::Y, Color::GREEN), (Vec3::Z, Color::BLUE)];
                for (axis, color) in rings {
                    debug.add_circle(bounds.center(), world.transform_vector3(axis), radius, color, 32, false);
                }
            }
        }

        match self.hover {
            Some(hover) => debug.add_circle(hover.position, hover.normal, 0.1, Color::MAGENTA, 16, false),
            None => {
                let ray = camera_node.and_then(|c| cursor_ray(scene, c, self.cursor, self.viewport));
                if let Some(ray) = ray {
                    debug.add_cross(ray.point_at(CURSOR_MARKER_DISTANCE), 0.1, Color::CYAN, false);
                }
            }
        }
    }

    /// Save the menu and both windows, with the settings beside them
    pub fn save_layout(&self, path: &Path) -> Result<(), EditorError> {
        let windows = [self.main_menu, self.hierarchy_window, self.inspector_window];
        self.ui.save_layout(&windows, path)?;
        self.settings.save_to(EditorSettings::path_beside(path))?;
        Ok(())
    }

    /// Replace the editor windows with the ones stored at `path`
    ///
    /// Elements are re-resolved by name and every handler is registered again.
    /// Missing windows are recreated from the settings.
    pub fn load_layout(&mut self, path: &Path, scene: &Scene) -> Result<(), EditorError> {
        let root = self.ui.root();
        let loaded = self.ui.load_layout(path, root)?;

        let visible = self.settings.editor_visible;
        self.settings = EditorSettings::load_or_default(EditorSettings::path_beside(path));
        self.settings.editor_visible = visible;

        self.close_transients();
        for window in [self.main_menu, self.hierarchy_window, self.inspector_window] {
            self.ui.remove(window);
        }

        let mut resolved = Vec::new();
        self.main_menu = match self.ui.find(MAIN_MENU) {
            Some(menu) => menu,
            None => main_menu::create_main_menu(&mut self.ui, self.viewport.x),
        };
        resolved.push(self.main_menu);

        let hierarchy = self
            .ui
            .find(HIERARCHY_WINDOW)
            .and_then(|w| Some((w, self.ui.child_by_name(w, HIERARCHY_LIST, false)?)));
        (self.hierarchy_window, self.hierarchy_list) = match hierarchy {
            Some(found) => found,
            None => hierarchy::create_hierarchy_window(&mut self.ui, &self.settings.hierarchy),
        };
        resolved.push(self.hierarchy_window);

        let inspector = self
            .ui
            .find(INSPECTOR_WINDOW)
            .and_then(|w| Some((w, self.ui.child_by_name(w, INSPECTOR_PANEL, false)?)));
        (self.inspector_window, self.inspector_panel) = match inspector {
            Some(found) => found,
            None => inspector::create_inspector_window(&mut self.ui, &self.settings.inspector),
        };
        resolved.push(self.inspector_window);

        for id in loaded.into_iter().filter(|id| !resolved.contains(id)) {
            warn!(element = %id, "Dropping unknown element from layout");
            self.ui.remove(id);
        }

        for (window, settings) in [
            (self.hierarchy_window, &mut self.settings.hierarchy),
            (self.inspector_window, &mut self.settings.inspector),
        ] {
            if let Some(element) = self.ui.get(window) {
                settings.position = element.position;
            }
        }

        self.wire();
        self.apply_visibility();
        self.selection.validate(scene);
        self.rebuild_panels(scene);
        info!(path = ?path, "Editor layout restored");
        Ok(())
    }
}

/// Empty scene whose root carries an octree
pub fn empty_scene(name: &str) -> Scene {
    let mut scene = Scene::new(name);
    let root = scene.root();
    if let Err(err) = scene.add_component(root, Octree::default(), CreateMode::Local) {
        warn!("Failed to add octree: {err}");
    }
    scene
}

fn default_prefab_path(assets: &AssetConfig, name: &str) -> PathBuf {
    assets
        .prefab_path(name)
        .or_else(|_| assets.prefab_path("Prefab"))
        .unwrap_or_else(|_| assets.asset_root.join(&assets.prefabs_dir).join("Prefab.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::prelude::*;
    use tempfile::tempdir;

    struct Fixture {
        scene: Scene,
        registry: ComponentRegistry,
        assets: AssetConfig,
        state: EditorState,
        box1: NodeId,
        model: ComponentId,
    }

    impl Fixture {
        fn apply(&mut self, action: EditorAction) -> Option<EditorNotice> {
            let mut ctx = EditorContext {
                scene: &mut self.scene,
                registry: &self.registry,
                assets: &self.assets,
            };
            self.state.apply(action, &mut ctx)
        }
    }

    fn fixture() -> Fixture {
        let registry = ComponentRegistry::with_default_components();
        let mut scene = empty_scene("Scene");
        let box1 = scene.create_child(ROOT_ID, "Box1", CreateMode::Replicated).unwrap();
        let model = scene
            .add_component(box1, StaticModel::with_model("Models/Box.mdl", ""), CreateMode::Replicated)
            .unwrap();
        let mut state = EditorState::new(&registry, EditorSettings::default(), Vec2::new(1024.0, 768.0));
        state.set_visible(true, &scene);
        Fixture {
            scene,
            registry,
            assets: AssetConfig::default(),
            state,
            box1,
            model,
        }
    }

    #[test]
    fn test_starts_hidden() {
        let registry = ComponentRegistry::with_default_components();
        let state = EditorState::new(&registry, EditorSettings::default(), Vec2::new(800.0, 600.0));
        assert!(!state.is_visible());
        assert!(!state.ui().is_visible(state.main_menu()));
        assert!(!state.ui().is_visible(state.hierarchy_window()));
    }

    #[test]
    fn test_visibility_respects_window_flags() {
        let mut f = fixture();
        assert!(f.state.ui().is_visible(f.state.main_menu()));
        assert!(f.state.ui().is_visible(f.state.hierarchy_window()));

        f.apply(EditorAction::CloseWindow(f.state.hierarchy_window()));
        assert!(!f.state.settings().hierarchy.visible);
        assert!(!f.state.ui().is_visible(f.state.hierarchy_window()));

        f.state.toggle_visible(&f.scene);
        f.state.toggle_visible(&f.scene);
        assert!(!f.state.ui().is_visible(f.state.hierarchy_window()));
        assert!(f.state.ui().is_visible(f.state.inspector_window()));
    }

    #[test]
    fn test_left_click_on_component_row_selects_it() {
        let mut f = fixture();
        let index = f
            .state
            .ui()
            .items(f.state.hierarchy_list())
            .iter()
            .position(|item| item.tag == ItemTag::Component(f.model))
            .unwrap();
        f.apply(EditorAction::HierarchyClicked {
            index,
            button: MouseButton::Left,
        });
        assert_eq!(f.state.selection().node, Some(f.box1));
        assert_eq!(f.state.selection().component, Some(f.model));
        assert_eq!(f.state.ui().selection(f.state.hierarchy_list()), Some(index));
    }

    #[test]
    fn test_right_click_replaces_context_window() {
        let mut f = fixture();
        f.apply(EditorAction::HierarchyClicked {
            index: 0,
            button: MouseButton::Right,
        });
        let first = f.state.context_window().unwrap();
        f.apply(EditorAction::HierarchyClicked {
            index: 2,
            button: MouseButton::Right,
        });
        let second = f.state.context_window().unwrap();
        assert_ne!(first, second);
        assert!(!f.state.ui().contains(first));
    }

    #[test]
    fn test_create_component_without_pending_type_does_nothing() {
        let mut f = fixture();
        let before = f.scene.component_count();
        f.apply(EditorAction::OpenComponentFactory {
            node: f.box1,
            mode: CreateMode::Local,
        });
        f.apply(EditorAction::CreateComponent {
            node: f.box1,
            mode: CreateMode::Local,
        });
        assert_eq!(f.scene.component_count(), before);
        assert!(f.state.component_factory().is_some());
    }

    #[test]
    fn test_new_scene_after_confirmation() {
        let mut f = fixture();
        f.state.select_node(&f.scene, f.box1);
        f.apply(EditorAction::Menu(MenuCommand::NewScene));
        assert!(f.state.prompt().is_some());

        let notice = f.apply(EditorAction::Confirm(Confirmation::NewScene));
        assert_eq!(notice, Some(EditorNotice::SceneReplaced));
        assert_eq!(f.scene.node_count(), 1);
        assert!(f.scene.component_of::<Octree>(ROOT_ID).is_some());
        assert_eq!(*f.state.selection(), Selection::default());
        assert!(f.state.prompt().is_none());
    }

    #[test]
    fn test_save_scene_over_existing_file_asks_first() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Scene.json");
        std::fs::write(&path, "{}").unwrap();

        let mut f = fixture();
        f.apply(EditorAction::Menu(MenuCommand::SaveScene));
        let prompt = f.state.file_prompt().unwrap();
        let edit = f.state.ui().child_by_name(prompt, main_menu::PATH_EDIT, false).unwrap();
        f.state.ui_mut().set_text(edit, path.to_string_lossy());

        f.apply(EditorAction::SubmitFilePrompt(FilePurpose::SaveScene));
        assert!(f.state.file_prompt().is_none());
        assert!(f.state.prompt().is_some());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");

        f.apply(EditorAction::Confirm(Confirmation::Overwrite {
            purpose: FilePurpose::SaveScene,
            path: path.clone(),
        }));
        let loaded = Scene::load_from_file(&path, &f.registry).unwrap();
        assert_eq!(loaded.node_count(), f.scene.node_count());
    }

    #[test]
    fn test_drag_updates_remembered_position() {
        let mut f = fixture();
        let window = f.state.inspector_window();
        let start = f.state.settings().inspector.position;
        f.apply(EditorAction::DragWindow {
            window,
            delta: Vec2::new(5.0, -3.0),
        });
        assert_eq!(f.state.settings().inspector.position, start + Vec2::new(5.0, -3.0));
        assert_eq!(f.state.ui().get(window).unwrap().position, start + Vec2::new(5.0, -3.0));
    }

    #[test]
    fn test_post_render_needs_character() {
        let f = fixture();
        let mut debug = DebugDraw::new();
        f.state.post_render(&f.scene, None, None, &mut debug);
        assert!(debug.is_empty());

        f.state.post_render(&f.scene, Some(f.box1), None, &mut debug);
        assert!(!debug.is_empty());
    }

    #[test]
    fn test_unhandled_menu_item_is_ignored() {
        let mut f = fixture();
        let nodes = f.scene.node_count();
        assert_eq!(f.apply(EditorAction::Menu(MenuCommand::NavMesh)), None);
        assert_eq!(f.scene.node_count(), nodes);
    }
}
