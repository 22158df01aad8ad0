//! Rendering system using wgpu for the orrery backdrop.

pub mod camera;
pub mod error;
pub mod mesh;
pub mod pipeline;
pub mod renderer;
pub mod texture;
pub mod vertex;

pub use camera::*;
pub use error::*;
pub use mesh::*;
pub use pipeline::*;
pub use renderer::*;
pub use texture::*;
pub use vertex::*;
