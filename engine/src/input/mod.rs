//! Keyboard and mouse state

mod state;

pub use state::InputState;
