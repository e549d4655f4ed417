//! Editor UI panels
//!
//! This module contains the panels that make up the editor: the scene
//! hierarchy, the attribute inspector and its value rows, and the context
//! menus with the component factory.

pub mod attribute_widgets;
pub mod context_menu;
pub mod hierarchy;
pub mod inspector;

pub use attribute_widgets::{add_value_row, apply_edit, EditError};
pub use context_menu::ComponentCatalog;
pub use hierarchy::rebuild_hierarchy;
pub use inspector::{rebuild_inspector, DisplaySpace};
