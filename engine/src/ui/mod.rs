//! Retained-mode UI tree
//!
//! Elements live in an id-keyed arena owned by [`UiTree`]. Handlers are typed
//! closures attached per element and event kind; dispatching an event returns
//! the actions they produce instead of mutating application state directly.
//! [`UiInput`] turns raw pointer and keyboard input into those events.

mod element;
mod event;
mod input;
mod layout;
mod tree;

pub use element::{ElementKind, ItemTag, ListItem, UiElement, UiElementId};
pub use event::{UiEvent, UiEventKind, UiHandler};
pub use input::UiInput;
pub use layout::{LayoutError, LayoutFile, SerializedElement, LAYOUT_FORMAT_VERSION};
pub use tree::{UiTree, ITEM_HEIGHT};
