//! # User Interface Module
//!
//! Dear ImGui overlay for the scene.
//!
//! - [`UiManager`] - ImGui context, winit input capture and wgpu rendering
//! - [`lighting_panel`] - light angle, light color and the three lighting toggles
//!
//! The panel only produces [`InputEvent`](crate::input::InputEvent)s; the
//! scene runs unchanged without it.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{lighting_panel, LightingControls, PanelEdits};
