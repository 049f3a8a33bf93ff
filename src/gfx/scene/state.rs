use std::time::Duration;

use log::{debug, info, warn};

use crate::config::{AnimationConfig, AppConfig};
use crate::gfx::camera::{CameraManager, Projection};
use crate::gfx::lighting::LightingState;
use crate::input::{InputEvent, InputQueue};

use super::animator::SceneAnimator;

/// Ground-plane distance covered by half the viewport when steering the
/// caterpillar with the pointer.
pub const POINTER_GROUND_SCALE: f32 = 10.0;

/// Converts real frame time into a whole number of fixed simulation steps
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    step: Duration,
    max_steps: u32,
    accumulator: Duration,
}

impl FrameClock {
    /// An unusable `tick_rate_hz` falls back to the default rate.
    pub fn new(tick_rate_hz: f32, max_steps: u32) -> Self {
        let step = AnimationConfig::tick_step(tick_rate_hz).unwrap_or_else(|| {
            warn!(
                "unusable tick rate {} Hz; running at {} Hz",
                tick_rate_hz,
                AnimationConfig::DEFAULT_TICK_RATE_HZ
            );
            Duration::from_secs_f32(1.0 / AnimationConfig::DEFAULT_TICK_RATE_HZ)
        });
        Self {
            step,
            max_steps: max_steps.max(1),
            accumulator: Duration::ZERO,
        }
    }

    pub fn from_config(config: &AnimationConfig) -> Self {
        Self::new(config.tick_rate_hz, config.max_steps_per_frame)
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Adds `frame_time` and returns how many steps are due.
    ///
    /// At most `max_steps` are released per call. Time beyond that is
    /// dropped so a long stall does not replay as a burst of steps.
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps && self.accumulator >= self.step {
            debug!(
                "frame clock dropping {:?} after {} steps",
                self.accumulator, steps
            );
            self.accumulator = Duration::ZERO;
        }
        steps
    }
}

/// Everything the composer reads, owned in one place
pub struct SceneState {
    pub camera: CameraManager,
    pub projection: Projection,
    pub animator: SceneAnimator,
    pub lighting: LightingState,
    /// Viewport size in physical pixels.
    pub viewport: (u32, u32),
    /// Set once the sky image has reached the renderer.
    pub sky_textured: bool,
}

impl SceneState {
    pub fn new(config: &AppConfig) -> Self {
        let (width, height) = (config.window.width, config.window.height);
        let animator = SceneAnimator::new(&config.animation);
        let mut lighting = LightingState::default();
        animator.light.apply(&mut lighting);

        Self {
            camera: CameraManager::from_settings(&config.camera),
            projection: Projection::new(&config.projection, width, height),
            animator,
            lighting,
            viewport: (width, height),
            sky_textured: false,
        }
    }

    /// Applies all pending events in arrival order. Returns how many there were.
    pub fn drain_input(&mut self, queue: &mut InputQueue) -> usize {
        let mut count = 0;
        for event in queue.drain() {
            self.apply_input(event);
            count += 1;
        }
        count
    }

    pub fn apply_input(&mut self, event: InputEvent) {
        if self.camera.process_event(&event) {
            return;
        }

        match event {
            InputEvent::PointerMove { x, y } => {
                let (target_x, target_z) = self.pointer_to_ground(x, y);
                self.animator.set_caterpillar_target(target_x, target_z);
            }
            InputEvent::LightAngle(degrees) => {
                self.animator.light.set_manual_degrees(degrees);
                self.animator.light.apply(&mut self.lighting);
            }
            InputEvent::LightColor(color) => {
                self.lighting.point.color = color;
                info!("Light color updated: {:?}", color);
            }
            InputEvent::SetLighting(on) => {
                self.lighting.lighting_on = on;
                info!("Lighting is now {}", on_off(on));
            }
            InputEvent::SetNormalVisualization(on) => {
                self.lighting.normal_visualization = on;
                info!("Normal visualization is now {}", on_off(on));
            }
            InputEvent::SetSpotlight(on) => {
                self.lighting.spotlight_on = on;
                info!("Spotlight is now {}", on_off(on));
            }
            InputEvent::Resize { width, height } => {
                self.viewport = (width, height);
                self.projection.resize(width, height);
            }
            InputEvent::PointerDown { .. }
            | InputEvent::PointerUp
            | InputEvent::Wheel { .. }
            | InputEvent::Key(_) => {}
        }
    }

    /// Runs `steps` animation ticks.
    pub fn step(&mut self, steps: u32) {
        for _ in 0..steps {
            self.animator.tick(&mut self.lighting);
        }
    }

    /// Approximates the ground point under the pointer: normalised device
    /// coordinates scaled by [`POINTER_GROUND_SCALE`], screen up mapping to -Z.
    pub fn pointer_to_ground(&self, x: f32, y: f32) -> (f32, f32) {
        let (width, height) = self.viewport;
        let nx = x / width.max(1) as f32 * 2.0 - 1.0;
        let ny = -(y / height.max(1) as f32) * 2.0 + 1.0;
        (nx * POINTER_GROUND_SCALE, -ny * POINTER_GROUND_SCALE)
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "ON"
    } else {
        "OFF"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MoveBinding;

    fn state() -> SceneState {
        SceneState::new(&AppConfig::default().with_window_size(800, 600))
    }

    #[test]
    fn clock_releases_whole_steps_and_keeps_the_remainder() {
        let mut clock = FrameClock::new(100.0, 5);
        assert_eq!(clock.advance(Duration::from_millis(25)), 2);
        assert_eq!(clock.advance(Duration::from_millis(5)), 1);
        assert_eq!(clock.advance(Duration::from_millis(4)), 0);
    }

    #[test]
    fn clock_falls_back_to_the_default_rate() {
        let default_step = FrameClock::new(AnimationConfig::DEFAULT_TICK_RATE_HZ, 5).step();
        for rate in [1e-39, 0.0, -1.0, f32::NAN] {
            assert_eq!(FrameClock::new(rate, 5).step(), default_step);
        }
    }

    #[test]
    fn clock_caps_steps_after_a_stall() {
        let mut clock = FrameClock::new(60.0, 5);
        assert_eq!(clock.advance(Duration::from_secs(2)), 5);
        // The backlog was dropped rather than carried over.
        assert_eq!(clock.advance(Duration::ZERO), 0);
    }

    #[test]
    fn pointer_maps_viewport_corners_onto_the_ground() {
        let state = state();
        assert_eq!(state.pointer_to_ground(400.0, 300.0), (0.0, 0.0));
        assert_eq!(state.pointer_to_ground(0.0, 0.0), (-10.0, -10.0));
        assert_eq!(state.pointer_to_ground(800.0, 600.0), (10.0, 10.0));
    }

    #[test]
    fn pointer_moves_retarget_the_caterpillar_even_while_dragging() {
        let mut state = state();
        state.apply_input(InputEvent::PointerDown { x: 400.0, y: 300.0 });
        state.apply_input(InputEvent::PointerMove { x: 600.0, y: 150.0 });

        let target = state.animator.caterpillar.target;
        assert!((target.x - 5.0).abs() < 1e-5);
        assert!((target.y + 5.0).abs() < 1e-5);
        assert!(state.camera.controller.is_dragging());
        assert_ne!(state.camera.camera.yaw, -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn light_slider_switches_to_manual_control() {
        let mut state = state();
        state.apply_input(InputEvent::LightAngle(180.0));
        assert!(state.animator.light.manual);
        assert!((state.lighting.point.position.x + 5.0).abs() < 1e-5);

        state.step(10);
        assert!((state.animator.light.angle - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn toggles_and_color_update_the_lighting() {
        let mut state = state();
        state.apply_input(InputEvent::SetSpotlight(true));
        state.apply_input(InputEvent::SetNormalVisualization(true));
        state.apply_input(InputEvent::SetLighting(false));
        state.apply_input(InputEvent::LightColor([0.1, 0.2, 0.3]));

        assert!(state.lighting.spotlight_on);
        assert!(state.lighting.normal_visualization);
        assert!(!state.lighting.lighting_on);
        assert_eq!(state.lighting.point.color, [0.1, 0.2, 0.3]);
    }

    #[test]
    fn queued_events_apply_in_order() {
        let mut state = state();
        let mut queue = InputQueue::new();
        queue.push(InputEvent::SetSpotlight(true));
        queue.push(InputEvent::Key(MoveBinding::Forward));
        queue.push(InputEvent::SetSpotlight(false));

        assert_eq!(state.drain_input(&mut queue), 3);
        assert!(queue.is_empty());
        assert!(!state.lighting.spotlight_on);
        assert!((state.camera.eye().z - 9.5).abs() < 1e-5);
    }

    #[test]
    fn resize_updates_viewport_and_aspect() {
        let mut state = state();
        state.apply_input(InputEvent::Resize {
            width: 1000,
            height: 500,
        });
        assert_eq!(state.viewport, (1000, 500));
        assert_eq!(state.projection.aspect, 2.0);
    }
}
