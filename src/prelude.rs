//! # Glade Prelude
//!
//! Commonly used types in one import:
//!
//! ```no_run
//! use glade::prelude::*;
//!
//! let mut state = SceneState::new(&AppConfig::default());
//! state.apply_input(InputEvent::SetSpotlight(true));
//! state.step(1);
//! let frame = SceneComposer::default().compose(&state);
//! # let _ = frame;
//! ```

// Application
pub use crate::app::{GladeApp, StopSignal};
pub use crate::config::{AnimationConfig, AppConfig, CameraSettings, ProjectionConfig};
pub use crate::error::GladeError;
pub use crate::input::{InputEvent, InputQueue, MoveBinding};

// Scene core
pub use crate::gfx::camera::{CameraManager, FlyCamera, Projection};
pub use crate::gfx::geometry::{DrawMode, GeometryData, MeshId};
pub use crate::gfx::lighting::{shade_fragment, LightUniform, LightingState};
pub use crate::gfx::scene::{
    DrawInstruction, FrameClock, FrameDrawList, SceneAnimator, SceneComposer, SceneState, Surface,
};

// Rendering
pub use crate::gfx::rendering::{submit, MeshAssets, MeshHandle, RenderEngine, Renderer};

// Common external dependencies
pub use cgmath::{InnerSpace, Matrix4, Vector3};
