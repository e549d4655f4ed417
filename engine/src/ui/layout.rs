//! UI layout persistence
//!
//! Only elements are written. Subscriptions are closures and do not survive a
//! reload, so callers must subscribe again after [`UiTree::load_layout`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use super::element::{UiElement, UiElementId};
use super::tree::UiTree;

pub const LAYOUT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UI element {0} not found")]
    MissingElement(UiElementId),
}

/// An element with its nested children
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedElement {
    pub element: UiElement,
    #[serde(default)]
    pub children: Vec<SerializedElement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutFile {
    pub version: u32,
    pub elements: Vec<SerializedElement>,
}

impl<A> UiTree<A> {
    fn serialize_element(&self, id: UiElementId) -> Result<SerializedElement, LayoutError> {
        let element = self.get(id).ok_or(LayoutError::MissingElement(id))?;
        let children = element
            .children
            .iter()
            .map(|c| self.serialize_element(*c))
            .collect::<Result<_, _>>()?;
        Ok(SerializedElement {
            element: element.clone(),
            children,
        })
    }

    /// Capture the given element subtrees
    pub fn to_layout(&self, roots: &[UiElementId]) -> Result<LayoutFile, LayoutError> {
        let elements = roots
            .iter()
            .map(|id| self.serialize_element(*id))
            .collect::<Result<_, _>>()?;
        Ok(LayoutFile {
            version: LAYOUT_FORMAT_VERSION,
            elements,
        })
    }

    /// Recreate layout subtrees under `parent` with fresh ids
    pub fn instantiate_layout(&mut self, layout: &LayoutFile, parent: UiElementId) -> Vec<UiElementId> {
        layout
            .elements
            .iter()
            .map(|e| self.instantiate_element(e, parent))
            .collect()
    }

    fn instantiate_element(&mut self, data: &SerializedElement, parent: UiElementId) -> UiElementId {
        let id = self.adopt(data.element.clone(), parent);
        for child in &data.children {
            self.instantiate_element(child, id);
        }
        id
    }

    pub fn save_layout<P: AsRef<Path>>(&self, roots: &[UiElementId], path: P) -> Result<(), LayoutError> {
        let layout = self.to_layout(roots)?;
        fs::write(&path, serde_json::to_string_pretty(&layout)?)?;
        info!(path = ?path.as_ref(), windows = roots.len(), "Saved UI layout");
        Ok(())
    }

    /// Load a layout file, returning the ids of its top-level elements
    pub fn load_layout<P: AsRef<Path>>(
        &mut self,
        path: P,
        parent: UiElementId,
    ) -> Result<Vec<UiElementId>, LayoutError> {
        let content = fs::read_to_string(&path)?;
        let layout: LayoutFile = serde_json::from_str(&content)?;
        let ids = self.instantiate_layout(&layout, parent);
        info!(path = ?path.as_ref(), windows = ids.len(), "Loaded UI layout");
        Ok(ids)
    }
}
