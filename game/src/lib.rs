//! Game with the in-game scene editor
//!
//! The camera rig lives in [`controllers`]; scene setup, key bindings and
//! persistence in [`app`].

pub mod app;
pub mod controllers;

pub use app::{AppConfig, GameApp, GameError, HostServices};
pub use controllers::{CameraBehaviour, CameraRig};
