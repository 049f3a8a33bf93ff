// src/lib.rs
//! Glade
//!
//! A small real-time garden scene built on wgpu and winit: a fly camera, a
//! caterpillar that follows the pointer, a butterfly on a figure-8 and a
//! switchable point/spot lighting model.
//!
//! Everything under [`gfx::camera`], [`gfx::geometry`], [`gfx::lighting`] and
//! [`gfx::scene`] is plain CPU code; [`gfx::rendering`] and [`ui`] adapt it to
//! the GPU and the window.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod input;
pub mod prelude;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::{GladeApp, StopSignal};
pub use error::GladeError;
