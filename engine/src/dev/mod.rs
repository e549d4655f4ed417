//! Development utilities and debugging tools

pub mod debug_draw;

pub use debug_draw::{DebugDraw, DebugLine};
