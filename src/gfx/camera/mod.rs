//! Fly camera: pose, input steering and projection

pub mod camera_controller;
pub mod camera_utils;
pub mod fly_camera;

// Re-export main types
pub use camera_controller::{CameraController, DragState};
pub use camera_utils::{CameraManager, Projection};
pub use fly_camera::{FlyCamera, ZoomBounds};
