//! Element arena, hit testing and event dispatch

use glam::Vec2;
use std::collections::HashMap;
use tracing::{debug, trace};

use super::element::{ElementKind, ListItem, UiElement, UiElementId};
use super::event::{Subscription, UiEvent, UiEventKind, UiHandler};

/// Height of one row of a list view or an open drop-down
pub const ITEM_HEIGHT: f32 = 20.0;

/// Retained widget tree whose handlers produce actions of type `A`
pub struct UiTree<A> {
    root: UiElementId,
    elements: HashMap<UiElementId, UiElement>,
    subscriptions: HashMap<UiElementId, Vec<Subscription<A>>>,
    next_id: u32,
}

impl<A> Default for UiTree<A> {
    fn default() -> Self {
        Self::new(Vec2::new(1024.0, 768.0))
    }
}

impl<A> std::fmt::Debug for UiTree<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiTree")
            .field("elements", &self.elements.len())
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}

impl<A> UiTree<A> {
    /// Create a tree with a root covering the viewport
    pub fn new(viewport: Vec2) -> Self {
        let root_id = UiElementId(0);
        let mut root = UiElement::new(root_id, ElementKind::Root, "Root");
        root.size = viewport;
        let mut elements = HashMap::new();
        elements.insert(root_id, root);
        Self {
            root: root_id,
            elements,
            subscriptions: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn root(&self) -> UiElementId {
        self.root
    }

    pub fn get(&self, id: UiElementId) -> Option<&UiElement> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: UiElementId) -> Option<&mut UiElement> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: UiElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.len() <= 1
    }

    pub fn children(&self, id: UiElementId) -> &[UiElementId] {
        self.elements
            .get(&id)
            .map(|e| e.children.as_slice())
            .unwrap_or_default()
    }

    /// Create an element as the last child of `parent`
    pub fn create(&mut self, parent: UiElementId, kind: ElementKind, name: impl Into<String>) -> UiElementId {
        let id = UiElementId(self.next_id);
        self.next_id += 1;
        let mut element = UiElement::new(id, kind, name);
        element.parent = Some(parent);
        self.elements.insert(id, element);
        if let Some(parent) = self.elements.get_mut(&parent) {
            parent.children.push(id);
        }
        id
    }

    /// Insert a deserialized element subtree with fresh ids
    pub(crate) fn adopt(&mut self, mut element: UiElement, parent: UiElementId) -> UiElementId {
        let id = UiElementId(self.next_id);
        self.next_id += 1;
        element.id = id;
        element.parent = Some(parent);
        element.children.clear();
        self.elements.insert(id, element);
        if let Some(parent) = self.elements.get_mut(&parent) {
            parent.children.push(id);
        }
        id
    }

    /// Remove an element, its subtree, and their subscriptions
    pub fn remove(&mut self, id: UiElementId) {
        if id == self.root {
            return;
        }
        let parent = self.elements.get(&id).and_then(|e| e.parent);
        self.remove_subtree(id);
        if let Some(parent) = parent.and_then(|p| self.elements.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }
    }

    /// Remove every child of an element, keeping the element itself
    pub fn remove_children(&mut self, id: UiElementId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.remove_subtree(child);
        }
        if let Some(element) = self.elements.get_mut(&id) {
            element.children.clear();
        }
    }

    fn remove_subtree(&mut self, id: UiElementId) {
        if let Some(element) = self.elements.remove(&id) {
            self.subscriptions.remove(&id);
            for child in element.children {
                self.remove_subtree(child);
            }
        }
    }

    /// Find a descendant by name, depth-first
    pub fn child_by_name(&self, parent: UiElementId, name: &str, recursive: bool) -> Option<UiElementId> {
        for &child in self.children(parent) {
            if self.elements.get(&child).is_some_and(|e| e.name == name) {
                return Some(child);
            }
            if recursive {
                if let Some(found) = self.child_by_name(child, name, true) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Find an element anywhere in the tree by name
    pub fn find(&self, name: &str) -> Option<UiElementId> {
        self.child_by_name(self.root, name, true)
    }

    pub fn set_text(&mut self, id: UiElementId, text: impl Into<String>) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.text = text.into();
        }
    }

    pub fn set_visible(&mut self, id: UiElementId, visible: bool) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.visible = visible;
        }
    }

    pub fn is_visible(&self, id: UiElementId) -> bool {
        self.elements.get(&id).is_some_and(|e| e.visible)
    }

    /// Visible along the whole ancestor chain
    pub fn is_effectively_visible(&self, id: UiElementId) -> bool {
        let mut current = self.elements.get(&id);
        while let Some(element) = current {
            if !element.visible {
                return false;
            }
            current = element.parent.and_then(|p| self.elements.get(&p));
        }
        true
    }

    /// Place an element at an offset within its parent
    pub fn set_rect(&mut self, id: UiElementId, position: Vec2, size: Vec2) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.position = position;
            element.size = size;
        }
    }

    /// Top-left corner in screen coordinates
    pub fn screen_position(&self, id: UiElementId) -> Vec2 {
        let mut position = Vec2::ZERO;
        let mut current = self.elements.get(&id);
        while let Some(element) = current {
            position += element.position;
            current = element.parent.and_then(|p| self.elements.get(&p));
        }
        position
    }

    /// Move an element to the end of its parent's children, drawing it on top
    pub fn bring_to_front(&mut self, id: UiElementId) {
        let Some(parent) = self.elements.get(&id).and_then(|e| e.parent) else {
            return;
        };
        if let Some(parent) = self.elements.get_mut(&parent) {
            parent.children.retain(|c| *c != id);
            parent.children.push(id);
        }
    }

    /// Topmost visible element under a screen point, excluding the root
    pub fn element_at(&self, point: Vec2) -> Option<UiElementId> {
        self.hit_test(self.root, Vec2::ZERO, point)
    }

    fn hit_test(&self, id: UiElementId, origin: Vec2, point: Vec2) -> Option<UiElementId> {
        let element = self.elements.get(&id)?;
        for &child_id in element.children.iter().rev() {
            let Some(child) = self.elements.get(&child_id) else {
                continue;
            };
            if !child.visible {
                continue;
            }
            let min = origin + child.position;
            let max = min + child.size;
            let inside = point.x >= min.x && point.y >= min.y && point.x < max.x && point.y < max.y;
            if inside {
                let content_origin = min - Vec2::new(0.0, child.scroll_position);
                return Some(self.hit_test(child_id, content_origin, point).unwrap_or(child_id));
            }
        }
        None
    }

    /// Row of a list view under a screen point
    pub fn list_item_at(&self, id: UiElementId, point: Vec2) -> Option<usize> {
        let element = self.elements.get(&id)?;
        let local = point - self.screen_position(id);
        if local.x < 0.0 || local.x >= element.size.x || local.y < 0.0 || local.y >= element.size.y {
            return None;
        }
        let index = ((local.y + element.scroll_position) / ITEM_HEIGHT).floor() as usize;
        (index < element.items.len()).then_some(index)
    }

    /// Entry of an open drop-down under a screen point
    ///
    /// Entries are stacked below the drop-down's own rect.
    pub fn dropdown_item_at(&self, id: UiElementId, point: Vec2) -> Option<usize> {
        let element = self.elements.get(&id)?;
        let local = point - self.screen_position(id) - Vec2::new(0.0, element.size.y);
        if local.x < 0.0 || local.x >= element.size.x || local.y < 0.0 {
            return None;
        }
        let index = (local.y / ITEM_HEIGHT).floor() as usize;
        (index < element.items.len()).then_some(index)
    }

    /// Nearest element, starting at `id` and walking up, with a handler for `kind`
    pub fn subscribed_ancestor(&self, id: UiElementId, kind: UiEventKind) -> Option<UiElementId> {
        let mut current = Some(id);
        while let Some(candidate) = current {
            if self.has_subscription(candidate, kind) {
                return Some(candidate);
            }
            current = self.elements.get(&candidate).and_then(|e| e.parent);
        }
        None
    }

    /// Scroll the nearest scrollable element at or above `id`
    pub fn scroll_by(&mut self, id: UiElementId, amount: f32) {
        let mut current = Some(id);
        while let Some(candidate) = current {
            let Some(element) = self.elements.get_mut(&candidate) else {
                return;
            };
            if matches!(element.kind, ElementKind::ScrollView | ElementKind::ListView) {
                element.scroll_position = (element.scroll_position + amount).max(0.0);
                return;
            }
            current = element.parent;
        }
    }

    /// Stack the children of `id` from index `first` on, one row each
    ///
    /// Rows span the parent's width; the widgets of `Row` children are
    /// spread across it.
    pub fn stack_rows(&mut self, id: UiElementId, first: usize, top: f32, row_height: f32) {
        let width = self.elements.get(&id).map(|e| e.size.x).unwrap_or_default();
        let children: Vec<UiElementId> = self.children(id).iter().skip(first).copied().collect();
        for (i, child) in children.into_iter().enumerate() {
            let y = top + i as f32 * row_height;
            self.set_rect(child, Vec2::new(0.0, y), Vec2::new(width, row_height));
            if self.elements.get(&child).is_some_and(|e| e.kind == ElementKind::Row) {
                self.spread_row(child);
            }
        }
    }

    /// Split a row's width evenly between its children
    pub fn spread_row(&mut self, id: UiElementId) {
        let Some(size) = self.elements.get(&id).map(|e| e.size) else {
            return;
        };
        let children = self.children(id).to_vec();
        if children.is_empty() {
            return;
        }
        let width = size.x / children.len() as f32;
        for (i, child) in children.into_iter().enumerate() {
            self.set_rect(child, Vec2::new(i as f32 * width, 0.0), Vec2::new(width, size.y));
        }
    }

    pub fn add_item(&mut self, id: UiElementId, item: ListItem) -> Option<usize> {
        let element = self.elements.get_mut(&id)?;
        element.items.push(item);
        Some(element.items.len() - 1)
    }

    pub fn clear_items(&mut self, id: UiElementId) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.items.clear();
            element.selection = None;
        }
    }

    pub fn items(&self, id: UiElementId) -> &[ListItem] {
        self.elements
            .get(&id)
            .map(|e| e.items.as_slice())
            .unwrap_or_default()
    }

    pub fn set_selection(&mut self, id: UiElementId, selection: Option<usize>) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.selection = selection.filter(|i| *i < element.items.len());
        }
    }

    pub fn selection(&self, id: UiElementId) -> Option<usize> {
        self.elements.get(&id)?.selection
    }

    /// Register a handler for one kind of event on an element
    pub fn subscribe<F>(&mut self, id: UiElementId, kind: UiEventKind, handler: F)
    where
        F: Fn(&UiEvent) -> Option<A> + 'static,
    {
        if !self.elements.contains_key(&id) {
            debug!(element = %id, "Ignoring subscription to missing element");
            return;
        }
        let handler: UiHandler<A> = Box::new(handler);
        self.subscriptions
            .entry(id)
            .or_default()
            .push(Subscription { kind, handler });
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.values().map(Vec::len).sum()
    }

    pub fn has_subscription(&self, id: UiElementId, kind: UiEventKind) -> bool {
        self.subscriptions
            .get(&id)
            .is_some_and(|subs| subs.iter().any(|s| s.kind == kind))
    }

    /// Run the handlers subscribed to an event and collect their actions
    ///
    /// List and drop-down clicks update the element's selection first.
    pub fn dispatch(&mut self, event: &UiEvent) -> Vec<A> {
        let id = event.element();
        match event {
            UiEvent::ItemClicked { index, .. } | UiEvent::ItemSelected { index, .. } => {
                self.set_selection(id, Some(*index));
            }
            UiEvent::TextFinished { text, .. } => self.set_text(id, text.clone()),
            _ => {}
        }

        let kind = event.kind();
        let actions: Vec<A> = self
            .subscriptions
            .get(&id)
            .map(|subs| {
                subs.iter()
                    .filter(|s| s.kind == kind)
                    .filter_map(|s| (s.handler)(event))
                    .collect()
            })
            .unwrap_or_default();
        trace!(element = %id, kind = ?kind, actions = actions.len(), "Dispatched UI event");
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{ItemTag, UiEvent};
    use winit::event::MouseButton;

    #[derive(Debug, PartialEq)]
    enum Action {
        Pressed(&'static str),
        Edited(String),
    }

    fn window(tree: &mut UiTree<Action>, name: &str, position: Vec2) -> UiElementId {
        let root = tree.root();
        let id = tree.create(root, ElementKind::Window, name);
        tree.set_rect(id, position, Vec2::new(200.0, 300.0));
        id
    }

    #[test]
    fn test_element_at_prefers_topmost_window() {
        let mut tree = UiTree::<Action>::default();
        let a = window(&mut tree, "A", Vec2::new(0.0, 0.0));
        let b = window(&mut tree, "B", Vec2::new(100.0, 0.0));

        assert_eq!(tree.element_at(Vec2::new(150.0, 10.0)), Some(b));
        tree.bring_to_front(a);
        assert_eq!(tree.element_at(Vec2::new(150.0, 10.0)), Some(a));
        assert_eq!(tree.element_at(Vec2::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_element_at_ignores_hidden_windows() {
        let mut tree = UiTree::<Action>::default();
        let a = window(&mut tree, "A", Vec2::ZERO);
        tree.set_visible(a, false);
        assert_eq!(tree.element_at(Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_element_at_descends_into_children() {
        let mut tree = UiTree::<Action>::default();
        let a = window(&mut tree, "A", Vec2::new(50.0, 50.0));
        let button = tree.create(a, ElementKind::Button, "Close");
        tree.set_rect(button, Vec2::new(180.0, 0.0), Vec2::new(20.0, 20.0));

        assert_eq!(tree.element_at(Vec2::new(235.0, 55.0)), Some(button));
        assert_eq!(tree.element_at(Vec2::new(60.0, 60.0)), Some(a));
        assert_eq!(tree.screen_position(button), Vec2::new(230.0, 50.0));
    }

    #[test]
    fn test_dispatch_runs_matching_handlers() {
        let mut tree = UiTree::<Action>::default();
        let root = tree.root();
        let button = tree.create(root, ElementKind::Button, "Ok");
        let edit = tree.create(root, ElementKind::LineEdit, "Edit");
        tree.subscribe(button, UiEventKind::Click, |_| Some(Action::Pressed("ok")));
        tree.subscribe(
            edit,
            UiEventKind::TextFinished,
            |event| match event {
                UiEvent::TextFinished { text, .. } => Some(Action::Edited(text.clone())),
                _ => None,
            },
        );

        let click = UiEvent::Click {
            element: button,
            button: MouseButton::Left,
        };
        assert_eq!(tree.dispatch(&click), vec![Action::Pressed("ok")]);

        let finished = UiEvent::TextFinished {
            element: edit,
            text: "1.5".to_string(),
        };
        assert_eq!(tree.dispatch(&finished), vec![Action::Edited("1.5".to_string())]);
        assert_eq!(tree.get(edit).unwrap().text, "1.5");

        let wrong_kind = UiEvent::DragMove {
            element: button,
            delta: Vec2::ONE,
        };
        assert!(tree.dispatch(&wrong_kind).is_empty());
    }

    #[test]
    fn test_remove_drops_subscriptions() {
        let mut tree = UiTree::<Action>::default();
        let win = window(&mut tree, "A", Vec2::ZERO);
        let button = tree.create(win, ElementKind::Button, "Ok");
        tree.subscribe(button, UiEventKind::Click, |_| Some(Action::Pressed("ok")));
        assert_eq!(tree.subscription_count(), 1);

        tree.remove_children(win);
        assert_eq!(tree.subscription_count(), 0);
        assert!(!tree.contains(button));
        assert!(tree.children(win).is_empty());

        tree.remove(win);
        assert!(tree.find("A").is_none());
    }

    #[test]
    fn test_list_selection() {
        let mut tree = UiTree::<Action>::default();
        let root = tree.root();
        let list = tree.create(root, ElementKind::ListView, "List");
        tree.add_item(list, ListItem::new("a").with_tag(ItemTag::Text("a".into())));
        tree.add_item(list, ListItem::new("b"));

        tree.dispatch(&UiEvent::ItemClicked {
            element: list,
            index: 1,
            button: MouseButton::Left,
        });
        assert_eq!(tree.selection(list), Some(1));

        tree.set_selection(list, Some(7));
        assert_eq!(tree.selection(list), None);

        tree.clear_items(list);
        assert!(tree.items(list).is_empty());
    }

    #[test]
    fn test_list_item_under_point() {
        let mut tree = UiTree::<Action>::default();
        let win = window(&mut tree, "A", Vec2::new(10.0, 10.0));
        let list = tree.create(win, ElementKind::ListView, "List");
        tree.set_rect(list, Vec2::new(0.0, 20.0), Vec2::new(200.0, 100.0));
        for text in ["a", "b", "c"] {
            tree.add_item(list, ListItem::new(text));
        }

        assert_eq!(tree.list_item_at(list, Vec2::new(50.0, 35.0)), Some(0));
        assert_eq!(tree.list_item_at(list, Vec2::new(50.0, 75.0)), Some(2));
        assert_eq!(tree.list_item_at(list, Vec2::new(50.0, 95.0)), None);

        tree.get_mut(list).unwrap().scroll_position = ITEM_HEIGHT;
        assert_eq!(tree.list_item_at(list, Vec2::new(50.0, 35.0)), Some(1));
    }

    #[test]
    fn test_dropdown_entries_sit_below_the_list() {
        let mut tree = UiTree::<Action>::default();
        let root = tree.root();
        let list = tree.create(root, ElementKind::DropDownList, "Menu");
        tree.set_rect(list, Vec2::new(100.0, 0.0), Vec2::new(120.0, 24.0));
        tree.add_item(list, ListItem::new("New"));
        tree.add_item(list, ListItem::new("Load"));

        assert_eq!(tree.dropdown_item_at(list, Vec2::new(110.0, 10.0)), None);
        assert_eq!(tree.dropdown_item_at(list, Vec2::new(110.0, 30.0)), Some(0));
        assert_eq!(tree.dropdown_item_at(list, Vec2::new(110.0, 50.0)), Some(1));
        assert_eq!(tree.dropdown_item_at(list, Vec2::new(110.0, 70.0)), None);
    }

    #[test]
    fn test_stack_rows_spreads_row_widgets() {
        let mut tree = UiTree::<Action>::default();
        let win = window(&mut tree, "A", Vec2::ZERO);
        let title = tree.create(win, ElementKind::Row, "Title");
        let row = tree.create(win, ElementKind::Row, "Row");
        let label = tree.create(row, ElementKind::Text, "Label");
        let edit = tree.create(row, ElementKind::LineEdit, "Value");
        tree.stack_rows(win, 1, 24.0, 20.0);

        assert_eq!(tree.get(title).unwrap().size, Vec2::ZERO);
        assert_eq!(tree.get(row).unwrap().position, Vec2::new(0.0, 24.0));
        assert_eq!(tree.get(label).unwrap().size, Vec2::new(100.0, 20.0));
        assert_eq!(tree.element_at(Vec2::new(150.0, 30.0)), Some(edit));
    }

    #[test]
    fn test_scrolled_content_is_hit_at_its_offset() {
        let mut tree = UiTree::<Action>::default();
        let win = window(&mut tree, "A", Vec2::ZERO);
        let panel = tree.create(win, ElementKind::ScrollView, "Panel");
        tree.set_rect(panel, Vec2::ZERO, Vec2::new(200.0, 100.0));
        let low = tree.create(panel, ElementKind::Button, "Low");
        tree.set_rect(low, Vec2::new(0.0, 120.0), Vec2::new(200.0, 20.0));
        assert_eq!(tree.element_at(Vec2::new(10.0, 90.0)), Some(panel));

        tree.scroll_by(low, 40.0);
        assert_eq!(tree.get(panel).unwrap().scroll_position, 40.0);
        assert_eq!(tree.element_at(Vec2::new(10.0, 90.0)), Some(low));
        tree.scroll_by(panel, -100.0);
        assert_eq!(tree.get(panel).unwrap().scroll_position, 0.0);
    }

    #[test]
    fn test_effective_visibility() {
        let mut tree = UiTree::<Action>::default();
        let win = window(&mut tree, "A", Vec2::ZERO);
        let text = tree.create(win, ElementKind::Text, "Label");
        assert!(tree.is_effectively_visible(text));
        tree.set_visible(win, false);
        assert!(tree.is_visible(text));
        assert!(!tree.is_effectively_visible(text));
    }
}
