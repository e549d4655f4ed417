//! Actions produced by editor widgets
//!
//! Every subscribed handler captures the typed data it needs when the widget
//! is built and turns a raw [`engine::ui::UiEvent`] into one of these.

use engine::scene::{ComponentId, CreateMode, NodeId};
use engine::ui::UiElementId;
use engine::variant::{Axis, ValueKind};
use glam::Vec2;
use std::path::PathBuf;
use winit::event::MouseButton;

use crate::settings::Section;

/// Object whose value an inspector row edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingTarget {
    /// A reflected node attribute
    Node(NodeId),
    /// A reflected component attribute
    Component(ComponentId),
    /// A variable stored on a node
    NodeVar(NodeId),
}

/// Typed record captured by an editable row
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeBinding {
    pub target: BindingTarget,
    pub name: String,
    pub kind: ValueKind,
    /// Component of a vector or quaternion edited by this field
    pub field: Option<Axis>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Node(NodeId),
    Component(ComponentId),
}

/// What a file prompt does with its path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilePurpose {
    LoadScene,
    SaveScene,
    LoadPrefab,
    SavePrefab,
}

impl FilePurpose {
    pub fn title(self) -> &'static str {
        match self {
            FilePurpose::LoadScene => "Load Scene",
            FilePurpose::SaveScene => "Save Scene",
            FilePurpose::LoadPrefab => "Load Prefab",
            FilePurpose::SavePrefab => "Save Prefab",
        }
    }

    pub fn is_save(self) -> bool {
        matches!(self, FilePurpose::SaveScene | FilePurpose::SavePrefab)
    }
}

/// Operation waiting for a yes/no answer
#[derive(Debug, Clone, PartialEq)]
pub enum Confirmation {
    Delete(DeleteTarget),
    Overwrite { purpose: FilePurpose, path: PathBuf },
    NewScene,
}

impl Confirmation {
    pub fn message(&self) -> String {
        match self {
            Confirmation::Delete(_) => "Are you sure?".to_string(),
            Confirmation::Overwrite { path, .. } => {
                format!("File {} exists. Overwrite?", path.display())
            }
            Confirmation::NewScene => "Discard the current scene?".to_string(),
        }
    }
}

/// Entries of the main menu drop-downs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    NewProject,
    LoadProject,
    SaveProject,
    NewScene,
    LoadScene,
    SaveScene,
    ToggleHierarchy,
    ToggleInspector,
    Transform,
    NavMesh,
    LoadPrefab,
    SavePrefab,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// A hierarchy row was clicked
    HierarchyClicked { index: usize, button: MouseButton },
    ToggleSection(Section),
    ToggleDisplaySpace,
    EditValue { binding: AttributeBinding, text: String },
    CreateNode { parent: NodeId, mode: CreateMode },
    OpenComponentFactory { node: NodeId, mode: CreateMode },
    PickComponentType(String),
    CreateComponent { node: NodeId, mode: CreateMode },
    CancelComponentFactory,
    RequestDelete(DeleteTarget),
    Confirm(Confirmation),
    DismissPrompt,
    Menu(MenuCommand),
    SubmitFilePrompt(FilePurpose),
    CancelFilePrompt,
    CloseWindow(UiElementId),
    DragWindow { window: UiElementId, delta: Vec2 },
}
