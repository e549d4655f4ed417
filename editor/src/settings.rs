//! Editor settings management
//!
//! This module provides persistent settings storage for the editor: which
//! windows are shown, where they were last dragged to, and which inspector
//! sections are collapsed. Settings are saved next to the UI layout.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// File name used beside the layout document
pub const SETTINGS_FILE_NAME: &str = "EditorSettings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main editor settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Whether the editor starts shown
    #[serde(default)]
    pub editor_visible: bool,

    #[serde(default = "WindowSettings::hierarchy")]
    pub hierarchy: WindowSettings,

    #[serde(default = "WindowSettings::inspector")]
    pub inspector: WindowSettings,

    #[serde(default)]
    pub sections: SectionSettings,

    /// Settings version for future migration support
    #[serde(default)]
    pub version: u32,
}

/// Visibility and placement of one tool window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    pub visible: bool,
    pub position: Vec2,
}

impl WindowSettings {
    fn hierarchy() -> Self {
        Self {
            visible: true,
            position: Vec2::new(0.0, 40.0),
        }
    }

    fn inspector() -> Self {
        Self {
            visible: true,
            position: Vec2::new(700.0, 40.0),
        }
    }
}

/// Inspector section that can be collapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Variables,
    NodeAttributes,
    ComponentAttributes,
}

impl Section {
    pub const ALL: [Section; 3] = [
        Section::Variables,
        Section::NodeAttributes,
        Section::ComponentAttributes,
    ];

    /// Divider caption
    pub fn title(self) -> &'static str {
        match self {
            Section::Variables => "Variables",
            Section::NodeAttributes => "Node Attributes",
            Section::ComponentAttributes => "Component Attributes",
        }
    }
}

/// Collapsed flags of the inspector sections; all collapsed by default
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionSettings {
    pub variables_collapsed: bool,
    pub node_attributes_collapsed: bool,
    pub component_attributes_collapsed: bool,
}

impl Default for SectionSettings {
    fn default() -> Self {
        Self {
            variables_collapsed: true,
            node_attributes_collapsed: true,
            component_attributes_collapsed: true,
        }
    }
}

impl SectionSettings {
    pub fn is_collapsed(&self, section: Section) -> bool {
        match section {
            Section::Variables => self.variables_collapsed,
            Section::NodeAttributes => self.node_attributes_collapsed,
            Section::ComponentAttributes => self.component_attributes_collapsed,
        }
    }

    /// Flip one flag, returning the new state
    pub fn toggle(&mut self, section: Section) -> bool {
        let flag = match section {
            Section::Variables => &mut self.variables_collapsed,
            Section::NodeAttributes => &mut self.node_attributes_collapsed,
            Section::ComponentAttributes => &mut self.component_attributes_collapsed,
        };
        *flag = !*flag;
        *flag
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            editor_visible: false,
            hierarchy: WindowSettings::hierarchy(),
            inspector: WindowSettings::inspector(),
            sections: SectionSettings::default(),
            version: 1,
        }
    }
}

impl EditorSettings {
    /// Settings path stored beside a layout file
    pub fn path_beside(layout_path: &Path) -> PathBuf {
        layout_path
            .parent()
            .map(|dir| dir.join(SETTINGS_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE_NAME))
    }

    /// Save settings to a specific path
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        info!(path = ?path.as_ref(), "Saved editor settings");
        Ok(())
    }

    /// Load settings from a specific path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let settings = serde_json::from_str(&content)?;
        info!(path = ?path.as_ref(), "Loaded editor settings");
        Ok(settings)
    }

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = ?path, "No settings file found, using defaults");
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = ?path, error = %e, "Failed to read settings file, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings() {
        let settings = EditorSettings::default();
        assert_eq!(settings.version, 1);
        assert!(!settings.editor_visible);
        assert!(settings.hierarchy.visible);
        for section in Section::ALL {
            assert!(settings.sections.is_collapsed(section));
        }
    }

    #[test]
    fn test_save_load_settings() {
        let mut settings = EditorSettings::default();
        settings.inspector.position = Vec2::new(12.0, 34.0);
        settings.sections.toggle(Section::NodeAttributes);

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        settings
            .save_to(temp_file.path())
            .expect("Failed to save settings");

        let loaded = EditorSettings::load_from(temp_file.path()).expect("Failed to load settings");
        assert_eq!(loaded, settings);
        assert!(!loaded.sections.node_attributes_collapsed);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: EditorSettings = serde_json::from_str(r#"{"editor_visible": true}"#).unwrap();
        assert!(settings.editor_visible);
        assert_eq!(settings.inspector, WindowSettings::inspector());
        assert!(settings.sections.variables_collapsed);
    }

    #[test]
    fn test_invalid_json_fallback() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        std::fs::write(temp_file.path(), "{ invalid json }").expect("Failed to write file");

        assert!(EditorSettings::load_from(temp_file.path()).is_err());
        assert_eq!(
            EditorSettings::load_or_default(temp_file.path()),
            EditorSettings::default()
        );
    }

    #[test]
    fn test_path_beside_layout() {
        let path = EditorSettings::path_beside(Path::new("assets/ui/EditorLayout.json"));
        assert_eq!(path, PathBuf::from("assets/ui/EditorSettings.json"));
    }
}
