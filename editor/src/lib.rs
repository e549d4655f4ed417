//! In-game scene editor
//!
//! This crate provides the editor that runs inside the game: picking and
//! selection, the hierarchy and inspector panels, context menus with the
//! component factory, the main menu with file prompts, and the debug overlay
//! drawn after each frame. All widgets live in an [`engine::ui::UiTree`] whose
//! handlers produce [`EditorAction`]s.

pub mod actions;
pub mod editor_state;
pub mod main_menu;
pub mod panels;
pub mod picking;
pub mod selection;
pub mod settings;
pub mod windows;

pub use actions::{AttributeBinding, BindingTarget, EditorAction};
pub use editor_state::{EditorContext, EditorError, EditorNotice, EditorState};
pub use selection::{HoverCandidate, Selection};
pub use settings::EditorSettings;
