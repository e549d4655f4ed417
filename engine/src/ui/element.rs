//! Retained UI elements

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scene::{ComponentId, NodeId};
use crate::variant::Color;

/// Identifier of an element within one [`UiTree`](super::UiTree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UiElementId(pub u32);

impl fmt::Display for UiElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Root,
    Window,
    Panel,
    /// Horizontal group of widgets
    Row,
    Text,
    Button,
    LineEdit,
    DropDownList,
    ListView,
    ScrollView,
    Divider,
}

/// Typed payload of a list row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum ItemTag {
    #[default]
    None,
    Node(NodeId),
    Component(ComponentId),
    ComponentType(String),
    Text(String),
}

/// One row of a list view or drop-down list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub text: String,
    pub color: Color,
    /// Index of the row this one is nested under
    pub parent: Option<usize>,
    pub tag: ItemTag,
}

impl ListItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: Color::WHITE,
            parent: None,
            tag: ItemTag::None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_parent(mut self, parent: Option<usize>) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_tag(mut self, tag: ItemTag) -> Self {
        self.tag = tag;
        self
    }
}

/// Data shared by all UI elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiElement {
    pub id: UiElementId,
    pub name: String,
    pub kind: ElementKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub color: Color,
    pub visible: bool,
    /// Offset from the parent's top-left corner
    #[serde(default)]
    pub position: Vec2,
    #[serde(default)]
    pub size: Vec2,
    /// Line edits only accept input when editable
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub items: Vec<ListItem>,
    #[serde(default)]
    pub selection: Option<usize>,
    #[serde(default)]
    pub scroll_position: f32,
    pub parent: Option<UiElementId>,
    #[serde(default)]
    pub children: Vec<UiElementId>,
}

impl UiElement {
    pub fn new(id: UiElementId, kind: ElementKind, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            text: String::new(),
            color: Color::WHITE,
            visible: true,
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            editable: matches!(kind, ElementKind::LineEdit),
            items: Vec::new(),
            selection: None,
            scroll_position: 0.0,
            parent: None,
            children: Vec::new(),
        }
    }
}
