//! UI events and typed subscriptions

use glam::Vec2;
use winit::event::MouseButton;

use super::element::UiElementId;

/// Something the user did to an element
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A button or text element was clicked
    Click {
        element: UiElementId,
        button: MouseButton,
    },
    /// A row of a list view was clicked
    ItemClicked {
        element: UiElementId,
        index: usize,
        button: MouseButton,
    },
    /// A drop-down list changed its selection
    ItemSelected { element: UiElementId, index: usize },
    /// Editing of a line edit finished
    TextFinished { element: UiElementId, text: String },
    /// A window was dragged by `delta` pixels
    DragMove { element: UiElementId, delta: Vec2 },
}

impl UiEvent {
    pub fn element(&self) -> UiElementId {
        match self {
            UiEvent::Click { element, .. }
            | UiEvent::ItemClicked { element, .. }
            | UiEvent::ItemSelected { element, .. }
            | UiEvent::TextFinished { element, .. }
            | UiEvent::DragMove { element, .. } => *element,
        }
    }

    pub fn kind(&self) -> UiEventKind {
        match self {
            UiEvent::Click { .. } => UiEventKind::Click,
            UiEvent::ItemClicked { .. } => UiEventKind::ItemClicked,
            UiEvent::ItemSelected { .. } => UiEventKind::ItemSelected,
            UiEvent::TextFinished { .. } => UiEventKind::TextFinished,
            UiEvent::DragMove { .. } => UiEventKind::DragMove,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiEventKind {
    Click,
    ItemClicked,
    ItemSelected,
    TextFinished,
    DragMove,
}

/// Event handler producing an application action
///
/// Handlers capture whatever typed data they need (target ids, attribute
/// bindings) at subscription time.
pub type UiHandler<A> = Box<dyn Fn(&UiEvent) -> Option<A>>;

pub(crate) struct Subscription<A> {
    pub(crate) kind: UiEventKind,
    pub(crate) handler: UiHandler<A>,
}
