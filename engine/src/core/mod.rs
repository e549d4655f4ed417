//! Math, transforms and the camera

pub mod camera;
pub mod math;
pub mod transform;
