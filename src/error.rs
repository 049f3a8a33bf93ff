//! Error types for the Glade scene
//!
//! Startup failures are fatal: the window, surface, adapter, device or shader
//! may be unavailable. After startup the scene update is infallible and only
//! an out-of-memory surface ends the loop. The sky texture is optional; its
//! loader reports [`GladeError::TextureLoad`] but the caller only logs it.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while bringing the scene up.
#[derive(Debug, Error)]
pub enum GladeError {
    #[error("failed to create or run the event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create the window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create a rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable graphics adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open the graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("shader '{name}' failed to compile: {message}")]
    Shader { name: String, message: String },

    #[error("render pipeline '{name}' could not be created: {message}")]
    Pipeline { name: String, message: String },

    #[error("the surface can no longer be presented to: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("failed to load texture {path:?}: {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, GladeError>;
