//! Configuration types for the engine

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid asset name: {0}")]
    InvalidName(String),
}

/// Configuration for asset paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Root directory for all assets
    pub asset_root: PathBuf,
    /// Directory name for scenes (relative to asset_root)
    pub scenes_dir: String,
    /// Directory name for UI layouts (relative to asset_root)
    pub layouts_dir: String,
    /// Directory name for prefabs (relative to asset_root)
    pub prefabs_dir: String,
    /// File saved and loaded by the quick save keys
    pub scene_file: String,
    /// Editor layout saved alongside the scene
    pub layout_file: String,
    /// Screenshot target, relative to the working directory
    pub screenshot_file: String,
}

fn validate_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(ConfigError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl AssetConfig {
    /// Create a config rooted at `asset_root` with default directory names
    pub fn with_root(asset_root: impl Into<PathBuf>) -> Self {
        let config = Self {
            asset_root: asset_root.into(),
            ..Default::default()
        };
        debug!(asset_root = ?config.asset_root, "Creating new AssetConfig");
        config
    }

    /// Full path to a named scene file
    pub fn scene_path(&self, name: &str) -> Result<PathBuf, ConfigError> {
        validate_name(name)?;
        let path = self
            .asset_root
            .join(&self.scenes_dir)
            .join(format!("{name}.json"));
        debug!(name = name, path = ?path, "Generated scene path");
        Ok(path)
    }

    /// Full path to a named prefab file
    pub fn prefab_path(&self, name: &str) -> Result<PathBuf, ConfigError> {
        validate_name(name)?;
        Ok(self
            .asset_root
            .join(&self.prefabs_dir)
            .join(format!("{name}.json")))
    }

    /// Path used by quick save and load
    pub fn quick_scene_path(&self) -> PathBuf {
        self.asset_root.join(&self.scenes_dir).join(&self.scene_file)
    }

    /// Path of the persisted editor layout
    pub fn layout_path(&self) -> PathBuf {
        self.asset_root.join(&self.layouts_dir).join(&self.layout_file)
    }

    pub fn screenshot_path(&self) -> PathBuf {
        PathBuf::from(&self.screenshot_file)
    }

    /// Create the scene, layout and prefab directories if missing
    pub fn ensure_dirs(&self) -> Result<(), std::io::Error> {
        for dir in [&self.scenes_dir, &self.layouts_dir, &self.prefabs_dir] {
            std::fs::create_dir_all(self.asset_root.join(dir))?;
        }
        Ok(())
    }

    /// Check if the asset directories exist
    pub fn validate(&self) -> Result<(), std::io::Error> {
        if !self.asset_root.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Asset root directory not found: {:?}", self.asset_root),
            ));
        }

        let scenes_path = self.asset_root.join(&self.scenes_dir);
        if !scenes_path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Scenes directory not found: {scenes_path:?}"),
            ));
        }

        Ok(())
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            scenes_dir: "scenes".to_string(),
            layouts_dir: "ui".to_string(),
            prefabs_dir: "prefabs".to_string(),
            scene_file: "Scene.json".to_string(),
            layout_file: "EditorLayout.json".to_string(),
            screenshot_file: "ScreenShot.png".to_string(),
        }
    }
}
