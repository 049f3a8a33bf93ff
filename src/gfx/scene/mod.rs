//! # Scene Module
//!
//! Animated scene state and per-frame composition.
//!
//! ## Key Components
//!
//! - [`SceneState`] - single owner of camera, animator, lights and viewport
//! - [`SceneAnimator`] - caterpillar, butterfly and light orbit, advanced per tick
//! - [`SceneComposer`] - turns a [`SceneState`] into an ordered [`FrameDrawList`]
//! - [`FrameClock`] - converts frame time into fixed simulation steps
//! - [`Vertex3D`] - GPU vertex format
//!
//! ## Usage
//!
//! ```no_run
//! use glade::config::AppConfig;
//! use glade::gfx::scene::{SceneComposer, SceneState};
//! use glade::input::{InputEvent, InputQueue};
//!
//! let mut state = SceneState::new(&AppConfig::default());
//! let mut queue = InputQueue::new();
//! queue.push(InputEvent::SetSpotlight(true));
//!
//! state.drain_input(&mut queue);
//! state.step(1);
//! let frame = SceneComposer::default().compose(&state);
//! assert_eq!(frame.draws.len(), 16);
//! ```

pub mod animator;
pub mod composer;
pub mod state;
pub mod vertex;

// Re-export main types
pub use animator::{Butterfly, Caterpillar, LightOrbit, SceneAnimator, SegmentPose};
pub use composer::{DrawInstruction, FrameDrawList, Palette, SceneComposer, Surface};
pub use state::{FrameClock, SceneState};
pub use vertex::Vertex3D;
