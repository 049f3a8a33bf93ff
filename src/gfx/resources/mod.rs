// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, uniform buffers, and bind groups for rendering.

pub mod global_bindings;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{FrameBindings, FrameUniform, ObjectSlots, ObjectUniform, SceneLayouts};
pub use texture_resource::{load_rgba_image, DepthTexture, SkyImage, TextureResource};
