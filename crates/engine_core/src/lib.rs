//! Core types shared by the scene, renderer and binary crates.
//!
//! - Transform (position / rotation / scale) with parenting
//! - Frame clock for wall-clock driven cosmetics

pub mod time;
pub mod transform;

pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, Vec4};
