//! # Graphics Module
//!
//! Camera, geometry, lighting, scene animation and the wgpu renderer.
//!
//! ## Architecture Overview
//!
//! - **Camera** ([`camera`]) - fly camera with drag look, wheel zoom and key movement
//! - **Geometry** ([`geometry`]) - cube, sphere, sky box and ground generators
//! - **Lighting** ([`lighting`]) - point and spot lights and the CPU fragment model
//! - **Scene** ([`scene`]) - animator, single-owner state and the frame composer
//! - **Rendering** ([`rendering`]) - `Renderer` seam, wgpu engine and pipelines
//! - **Resources** ([`resources`]) - uniforms, bind groups and textures
//!
//! ```no_run
//! use glade::gfx::{rendering::MeshAssets, RenderEngine};
//!
//! # async fn setup(window: std::sync::Arc<winit::window::Window>) -> Result<(), glade::GladeError> {
//! let mut engine = RenderEngine::new(window, 1200, 800).await?;
//! let meshes = MeshAssets::upload(&mut engine);
//! # let _ = meshes;
//! # Ok(())
//! # }
//! ```

pub mod camera;
pub mod geometry;
pub mod lighting;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::FlyCamera;
pub use rendering::render_engine::RenderEngine;
