//! Input events
//!
//! Host events (winit window events and UI widget changes) are translated into
//! [`InputEvent`]s and pushed onto an [`InputQueue`]. The queue is drained once
//! per frame, before the animator and composer run, so every frame sees the
//! events in arrival order.

use std::collections::VecDeque;

use winit::keyboard::KeyCode;

/// The eight discrete camera movement bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveBinding {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Up,
    Down,
    YawLeft,
    YawRight,
}

impl MoveBinding {
    /// W/S move, A/D strafe, X/Z rise and sink, Q/E turn.
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::KeyW => Some(Self::Forward),
            KeyCode::KeyS => Some(Self::Back),
            KeyCode::KeyA => Some(Self::StrafeLeft),
            KeyCode::KeyD => Some(Self::StrafeRight),
            KeyCode::KeyX => Some(Self::Up),
            KeyCode::KeyZ => Some(Self::Down),
            KeyCode::KeyQ => Some(Self::YawLeft),
            KeyCode::KeyE => Some(Self::YawRight),
            _ => None,
        }
    }
}

/// A discrete input delivered between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed over the viewport, in physical pixels.
    PointerDown { x: f32, y: f32 },
    /// Primary button released anywhere.
    PointerUp,
    /// Pointer moved, in physical pixels relative to the viewport.
    PointerMove { x: f32, y: f32 },
    /// Wheel delta with the browser sign convention: positive scrolls the
    /// content down, i.e. away from the scene.
    Wheel { delta_y: f32 },
    Key(MoveBinding),
    /// Light angle slider, degrees in `0..=360`. Switches to manual control.
    LightAngle(f32),
    /// Point light color, three channels in `0..=1`.
    LightColor([f32; 3]),
    SetLighting(bool),
    SetNormalVisualization(bool),
    SetSpotlight(bool),
    Resize { width: u32, height: u32 },
}

/// FIFO of events waiting for the next frame
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Removes and yields all pending events in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
