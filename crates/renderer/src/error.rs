//! Renderer error type.

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("texture {width}x{height} exceeds the device limit of {max}")]
    TextureTooLarge { width: u32, height: u32, max: u32 },
    #[error("expected {expected} bytes of pixel data, got {actual}")]
    TextureSize { expected: usize, actual: usize },
    #[error("surface unavailable: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("renderer has been torn down")]
    Destroyed,
}
