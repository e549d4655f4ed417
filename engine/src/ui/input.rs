//! Pointer and keyboard input turned into UI events
//!
//! [`UiInput`] remembers the focused line edit, the open drop-down and the
//! element being dragged between calls. Each call returns the event the
//! input produced, ready for [`UiTree::dispatch`].

use glam::Vec2;
use tracing::trace;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use super::element::{ElementKind, UiElementId};
use super::event::{UiEvent, UiEventKind};
use super::tree::UiTree;

#[derive(Debug, Clone, PartialEq)]
struct TextFocus {
    element: UiElementId,
    /// Text before editing started, restored when editing is abandoned
    original: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    element: UiElementId,
    last: Vec2,
}

#[derive(Debug, Default)]
pub struct UiInput {
    focus: Option<TextFocus>,
    open_list: Option<UiElementId>,
    drag: Option<Drag>,
}

impl UiInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<UiElementId> {
        self.focus.as_ref().map(|f| f.element)
    }

    pub fn has_text_focus(&self) -> bool {
        self.focus.is_some()
    }

    pub fn open_list(&self) -> Option<UiElementId> {
        self.open_list
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Forget all transient state, restoring the text of an unfinished edit
    pub fn reset<A>(&mut self, tree: &mut UiTree<A>) {
        self.blur(tree);
        self.open_list = None;
        self.drag = None;
    }

    fn blur<A>(&mut self, tree: &mut UiTree<A>) {
        if let Some(focus) = self.focus.take() {
            tree.set_text(focus.element, focus.original);
        }
    }

    /// A mouse button went down at `point`
    ///
    /// An open drop-down takes the press first. Presses on list views pick a
    /// row, presses on drop-downs open them and presses on editable line
    /// edits focus them. Anything else is a click, and a left press also
    /// starts dragging the nearest element listening for drags.
    pub fn press<A>(&mut self, tree: &mut UiTree<A>, point: Vec2, button: MouseButton) -> Option<UiEvent> {
        if let Some(list) = self.open_list.take() {
            if let Some(index) = tree.dropdown_item_at(list, point) {
                return Some(UiEvent::ItemSelected { element: list, index });
            }
        }

        let Some(element) = tree.element_at(point) else {
            self.blur(tree);
            return None;
        };
        if self.focused() != Some(element) {
            self.blur(tree);
        }

        let (kind, editable) = tree.get(element).map(|e| (e.kind, e.editable))?;
        trace!(element = %element, kind = ?kind, "UI press");
        match kind {
            ElementKind::ListView => tree
                .list_item_at(element, point)
                .map(|index| UiEvent::ItemClicked { element, index, button }),
            ElementKind::DropDownList => {
                if button == MouseButton::Left && !tree.items(element).is_empty() {
                    self.open_list = Some(element);
                }
                None
            }
            ElementKind::LineEdit if editable => {
                if self.focus.is_none() {
                    let original = tree.get(element).map(|e| e.text.clone()).unwrap_or_default();
                    self.focus = Some(TextFocus { element, original });
                }
                None
            }
            _ => {
                if button == MouseButton::Left {
                    self.drag = tree
                        .subscribed_ancestor(element, UiEventKind::DragMove)
                        .map(|element| Drag { element, last: point });
                }
                Some(UiEvent::Click { element, button })
            }
        }
    }

    pub fn release(&mut self, button: MouseButton) {
        if button == MouseButton::Left {
            self.drag = None;
        }
    }

    /// The cursor moved; produces a drag step while dragging
    pub fn cursor_moved(&mut self, point: Vec2) -> Option<UiEvent> {
        let drag = self.drag.as_mut()?;
        let delta = point - drag.last;
        drag.last = point;
        (delta != Vec2::ZERO).then_some(UiEvent::DragMove {
            element: drag.element,
            delta,
        })
    }

    /// Typed characters for the focused line edit
    pub fn text<A>(&mut self, tree: &mut UiTree<A>, text: &str) {
        let Some(focus) = &self.focus else {
            return;
        };
        if let Some(element) = tree.get_mut(focus.element) {
            element.text.extend(text.chars().filter(|c| !c.is_control()));
        }
    }

    /// Editing keys for the focused line edit
    ///
    /// Enter finishes the edit, Escape abandons it, Backspace removes the
    /// last character.
    pub fn key<A>(&mut self, tree: &mut UiTree<A>, key: KeyCode) -> Option<UiEvent> {
        let focus = self.focus.as_ref()?;
        let element = focus.element;
        match key {
            KeyCode::Enter | KeyCode::NumpadEnter => {
                self.focus = None;
                let text = tree.get(element)?.text.clone();
                Some(UiEvent::TextFinished { element, text })
            }
            KeyCode::Escape => {
                self.blur(tree);
                None
            }
            KeyCode::Backspace => {
                if let Some(e) = tree.get_mut(element) {
                    e.text.pop();
                }
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::ListItem;

    #[derive(Debug, PartialEq)]
    enum Action {
        Dragged(Vec2),
    }

    fn tree_with_window() -> (UiTree<Action>, UiElementId) {
        let mut tree = UiTree::<Action>::default();
        let root = tree.root();
        let window = tree.create(root, ElementKind::Window, "Window");
        tree.set_rect(window, Vec2::new(100.0, 100.0), Vec2::new(200.0, 200.0));
        tree.subscribe(window, UiEventKind::DragMove, |event| match event {
            UiEvent::DragMove { delta, .. } => Some(Action::Dragged(*delta)),
            _ => None,
        });
        (tree, window)
    }

    #[test]
    fn test_press_on_list_row_clicks_item() {
        let (mut tree, window) = tree_with_window();
        let list = tree.create(window, ElementKind::ListView, "List");
        tree.set_rect(list, Vec2::new(0.0, 20.0), Vec2::new(200.0, 180.0));
        tree.add_item(list, ListItem::new("a"));
        tree.add_item(list, ListItem::new("b"));
        let mut input = UiInput::new();

        let event = input.press(&mut tree, Vec2::new(150.0, 145.0), MouseButton::Right);
        assert_eq!(
            event,
            Some(UiEvent::ItemClicked {
                element: list,
                index: 1,
                button: MouseButton::Right
            })
        );
        assert_eq!(input.press(&mut tree, Vec2::new(150.0, 190.0), MouseButton::Left), None);
    }

    #[test]
    fn test_dropdown_opens_then_selects() {
        let (mut tree, window) = tree_with_window();
        let list = tree.create(window, ElementKind::DropDownList, "Menu");
        tree.set_rect(list, Vec2::new(0.0, 0.0), Vec2::new(120.0, 24.0));
        tree.add_item(list, ListItem::new("New"));
        tree.add_item(list, ListItem::new("Load"));
        let mut input = UiInput::new();

        assert_eq!(input.press(&mut tree, Vec2::new(110.0, 110.0), MouseButton::Left), None);
        assert_eq!(input.open_list(), Some(list));

        let event = input.press(&mut tree, Vec2::new(110.0, 150.0), MouseButton::Left);
        assert_eq!(event, Some(UiEvent::ItemSelected { element: list, index: 1 }));
        assert_eq!(input.open_list(), None);
    }

    #[test]
    fn test_typing_then_enter_finishes_edit() {
        let (mut tree, window) = tree_with_window();
        let edit = tree.create(window, ElementKind::LineEdit, "Value");
        tree.set_rect(edit, Vec2::new(0.0, 30.0), Vec2::new(200.0, 20.0));
        tree.set_text(edit, "1.5");
        let mut input = UiInput::new();

        assert_eq!(input.press(&mut tree, Vec2::new(150.0, 135.0), MouseButton::Left), None);
        assert_eq!(input.focused(), Some(edit));
        input.key(&mut tree, KeyCode::Backspace);
        input.text(&mut tree, "75\r");
        assert_eq!(tree.get(edit).unwrap().text, "1.75");

        let event = input.key(&mut tree, KeyCode::Enter);
        assert_eq!(
            event,
            Some(UiEvent::TextFinished {
                element: edit,
                text: "1.75".to_string()
            })
        );
        assert!(!input.has_text_focus());
    }

    #[test]
    fn test_abandoned_edit_restores_text() {
        let (mut tree, window) = tree_with_window();
        let edit = tree.create(window, ElementKind::LineEdit, "Value");
        tree.set_rect(edit, Vec2::new(0.0, 30.0), Vec2::new(200.0, 20.0));
        tree.set_text(edit, "3");
        let read_only = tree.create(window, ElementKind::LineEdit, "Fixed");
        tree.set_rect(read_only, Vec2::new(0.0, 60.0), Vec2::new(200.0, 20.0));
        tree.get_mut(read_only).unwrap().editable = false;
        let mut input = UiInput::new();

        input.press(&mut tree, Vec2::new(150.0, 135.0), MouseButton::Left);
        input.text(&mut tree, "9");
        input.key(&mut tree, KeyCode::Escape);
        assert_eq!(tree.get(edit).unwrap().text, "3");

        input.press(&mut tree, Vec2::new(150.0, 135.0), MouseButton::Left);
        input.text(&mut tree, "9");
        input.press(&mut tree, Vec2::new(150.0, 500.0), MouseButton::Left);
        assert_eq!(tree.get(edit).unwrap().text, "3");

        let event = input.press(&mut tree, Vec2::new(150.0, 165.0), MouseButton::Left);
        assert!(matches!(event, Some(UiEvent::Click { element, .. }) if element == read_only));
        assert!(!input.has_text_focus());
    }

    #[test]
    fn test_left_press_drags_listening_ancestor() {
        let (mut tree, window) = tree_with_window();
        let title = tree.create(window, ElementKind::Text, "Title");
        tree.set_rect(title, Vec2::ZERO, Vec2::new(200.0, 20.0));
        let mut input = UiInput::new();

        let event = input.press(&mut tree, Vec2::new(120.0, 105.0), MouseButton::Left);
        assert!(matches!(event, Some(UiEvent::Click { element, .. }) if element == title));
        assert!(input.is_dragging());

        let step = input.cursor_moved(Vec2::new(130.0, 100.0)).unwrap();
        assert_eq!(tree.dispatch(&step), vec![Action::Dragged(Vec2::new(10.0, -5.0))]);

        input.release(MouseButton::Left);
        assert_eq!(input.cursor_moved(Vec2::new(140.0, 100.0)), None);
    }
}
