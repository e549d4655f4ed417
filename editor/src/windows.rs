//! Editor windows with a title bar and close button

use engine::ui::{ElementKind, UiElementId, UiEvent, UiEventKind, UiTree};
use glam::Vec2;

use crate::actions::EditorAction;

pub const TITLE_BAR: &str = "TitleBar";
pub const TITLE_TEXT: &str = "TitleText";
pub const CLOSE_BUTTON: &str = "CloseButton";

/// Height of the title bar in pixels
pub const TITLE_BAR_HEIGHT: f32 = 24.0;

pub type EditorUi = UiTree<EditorAction>;

/// Create a top-level window with a title bar
///
/// Handlers are not attached; call [`wire_window`] afterwards.
pub fn create_window(
    ui: &mut EditorUi,
    name: &str,
    title: &str,
    position: Vec2,
    size: Vec2,
) -> UiElementId {
    let root = ui.root();
    let window = ui.create(root, ElementKind::Window, name);
    ui.set_rect(window, position, size);

    let bar = ui.create(window, ElementKind::Row, TITLE_BAR);
    ui.set_rect(bar, Vec2::ZERO, Vec2::new(size.x, TITLE_BAR_HEIGHT));
    let text = ui.create(bar, ElementKind::Text, TITLE_TEXT);
    ui.set_text(text, title);
    ui.set_rect(text, Vec2::ZERO, Vec2::new(size.x - TITLE_BAR_HEIGHT, TITLE_BAR_HEIGHT));
    let close = ui.create(bar, ElementKind::Button, CLOSE_BUTTON);
    ui.set_text(close, "X");
    ui.set_rect(
        close,
        Vec2::new(size.x - TITLE_BAR_HEIGHT, 0.0),
        Vec2::splat(TITLE_BAR_HEIGHT),
    );
    window
}

/// Area below the title bar for a window of the given size
pub fn content_rect(size: Vec2) -> (Vec2, Vec2) {
    (
        Vec2::new(0.0, TITLE_BAR_HEIGHT),
        Vec2::new(size.x, (size.y - TITLE_BAR_HEIGHT).max(0.0)),
    )
}

/// Attach the close and drag handlers of a window
pub fn wire_window(ui: &mut EditorUi, window: UiElementId) {
    if let Some(close) = ui.child_by_name(window, CLOSE_BUTTON, true) {
        ui.subscribe(close, UiEventKind::Click, move |_| {
            Some(EditorAction::CloseWindow(window))
        });
    }
    ui.subscribe(window, UiEventKind::DragMove, move |event| match event {
        UiEvent::DragMove { delta, .. } => Some(EditorAction::DragWindow {
            window,
            delta: *delta,
        }),
        _ => None,
    });
}

/// Add a button whose click produces a fixed action
pub fn add_button(
    ui: &mut EditorUi,
    parent: UiElementId,
    name: &str,
    text: &str,
    action: EditorAction,
) -> UiElementId {
    let button = ui.create(parent, ElementKind::Button, name);
    ui.set_text(button, text);
    ui.subscribe(button, UiEventKind::Click, move |_| Some(action.clone()));
    button
}

pub fn add_text(ui: &mut EditorUi, parent: UiElementId, name: &str, text: &str) -> UiElementId {
    let element = ui.create(parent, ElementKind::Text, name);
    ui.set_text(element, text);
    element
}

/// Remove a transient window if it is still open
pub fn close_transient(ui: &mut EditorUi, slot: &mut Option<UiElementId>) {
    if let Some(window) = slot.take() {
        ui.remove(window);
    }
}
