use crate::config::CameraSettings;
use crate::input::{InputEvent, MoveBinding};

use super::fly_camera::FlyCamera;

/// Pointer drag state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { last_x: f32, last_y: f32 },
}

/// Turns pointer, wheel and key events into camera motion
pub struct CameraController {
    pub mouse_sensitivity: f32,
    pub move_step: f32,
    pub turn_step: f32,
    drag: DragState,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(0.005, 0.5, 0.1)
    }
}

impl CameraController {
    pub fn new(mouse_sensitivity: f32, move_step: f32, turn_step: f32) -> Self {
        Self {
            mouse_sensitivity,
            move_step,
            turn_step,
            drag: DragState::Idle,
        }
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self::new(
            settings.mouse_sensitivity,
            settings.move_step,
            settings.turn_step,
        )
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Returns `true` if the event was a camera event.
    ///
    /// Pointer moves are reported as unconsumed so the scene can also use
    /// them to steer the caterpillar.
    pub fn process_event(&mut self, event: &InputEvent, camera: &mut FlyCamera) -> bool {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.drag = DragState::Dragging {
                    last_x: x,
                    last_y: y,
                };
                true
            }
            InputEvent::PointerUp => {
                self.drag = DragState::Idle;
                true
            }
            InputEvent::PointerMove { x, y } => {
                if let DragState::Dragging { last_x, last_y } = self.drag {
                    self.on_pointer_drag_delta(x - last_x, y - last_y, camera);
                    self.drag = DragState::Dragging {
                        last_x: x,
                        last_y: y,
                    };
                }
                false
            }
            InputEvent::Wheel { delta_y } => {
                let sign = if delta_y > 0.0 { 1.0 } else { -1.0 };
                camera.zoom(sign);
                true
            }
            InputEvent::Key(binding) => {
                self.apply_binding(binding, camera);
                true
            }
            _ => false,
        }
    }

    /// Screen-down drag (positive `dy`) tilts the view down.
    pub fn on_pointer_drag_delta(&self, dx: f32, dy: f32, camera: &mut FlyCamera) {
        if !self.is_dragging() {
            return;
        }
        camera.turn_left(dx * self.mouse_sensitivity);
        camera.look_up(-dy * self.mouse_sensitivity);
    }

    fn apply_binding(&self, binding: MoveBinding, camera: &mut FlyCamera) {
        match binding {
            MoveBinding::Forward => camera.move_forward(self.move_step),
            MoveBinding::Back => camera.move_forward(-self.move_step),
            MoveBinding::StrafeLeft => camera.move_right(-self.move_step),
            MoveBinding::StrafeRight => camera.move_right(self.move_step),
            MoveBinding::Up => camera.move_up(self.move_step),
            MoveBinding::Down => camera.move_up(-self.move_step),
            MoveBinding::YawLeft => camera.turn_left(-self.turn_step),
            MoveBinding::YawRight => camera.turn_left(self.turn_step),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;
    use std::f32::consts::FRAC_PI_2;

    fn camera() -> FlyCamera {
        FlyCamera::new(Point3::new(0.0, 3.0, 10.0), -FRAC_PI_2, 0.0)
    }

    #[test]
    fn moves_are_ignored_until_the_pointer_goes_down() {
        let mut controller = CameraController::default();
        let mut cam = camera();

        controller.process_event(&InputEvent::PointerMove { x: 50.0, y: 50.0 }, &mut cam);
        assert_eq!(cam.yaw, -FRAC_PI_2);
        assert_eq!(controller.drag_state(), DragState::Idle);
    }

    #[test]
    fn drag_turns_by_delta_times_sensitivity() {
        let mut controller = CameraController::default();
        let mut cam = camera();

        controller.process_event(&InputEvent::PointerDown { x: 100.0, y: 100.0 }, &mut cam);
        controller.process_event(&InputEvent::PointerMove { x: 120.0, y: 90.0 }, &mut cam);

        assert!((cam.yaw - (-FRAC_PI_2 + 20.0 * 0.005)).abs() < 1e-6);
        // Pointer moved up the screen (dy = -10), so the view tilts up.
        assert!((cam.pitch - 0.05).abs() < 1e-6);
        assert_eq!(
            controller.drag_state(),
            DragState::Dragging {
                last_x: 120.0,
                last_y: 90.0
            }
        );

        controller.process_event(&InputEvent::PointerUp, &mut cam);
        assert!(!controller.is_dragging());

        let yaw = cam.yaw;
        controller.process_event(&InputEvent::PointerMove { x: 300.0, y: 90.0 }, &mut cam);
        assert_eq!(cam.yaw, yaw);
    }

    #[test]
    fn wheel_sign_selects_zoom_direction() {
        let mut controller = CameraController::default();
        let mut cam = camera();

        controller.process_event(&InputEvent::Wheel { delta_y: 3.0 }, &mut cam);
        assert!((cam.position.z - 10.1).abs() < 1e-5);

        // Zero counts as zooming in, which is already at the minimum distance.
        controller.process_event(&InputEvent::Wheel { delta_y: 0.0 }, &mut cam);
        assert!((cam.position.z - 10.1).abs() < 1e-5);
    }

    #[test]
    fn key_bindings_drive_the_camera() {
        let mut controller = CameraController::default();
        let mut cam = camera();

        controller.process_event(&InputEvent::Key(MoveBinding::Forward), &mut cam);
        assert!((cam.position.z - 9.5).abs() < 1e-5);
        controller.process_event(&InputEvent::Key(MoveBinding::Back), &mut cam);
        assert!((cam.position.z - 10.0).abs() < 1e-5);

        controller.process_event(&InputEvent::Key(MoveBinding::StrafeRight), &mut cam);
        assert!((cam.position.x - 0.5).abs() < 1e-5);
        controller.process_event(&InputEvent::Key(MoveBinding::StrafeLeft), &mut cam);
        assert!(cam.position.x.abs() < 1e-5);

        controller.process_event(&InputEvent::Key(MoveBinding::Up), &mut cam);
        assert!((cam.position.y - 3.5).abs() < 1e-5);
        controller.process_event(&InputEvent::Key(MoveBinding::Down), &mut cam);
        assert!((cam.position.y - 3.0).abs() < 1e-5);

        controller.process_event(&InputEvent::Key(MoveBinding::YawRight), &mut cam);
        assert!((cam.yaw - (-FRAC_PI_2 + 0.1)).abs() < 1e-6);
        controller.process_event(&InputEvent::Key(MoveBinding::YawLeft), &mut cam);
        assert!((cam.yaw + FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn non_camera_events_are_not_consumed() {
        let mut controller = CameraController::default();
        let mut cam = camera();
        assert!(!controller.process_event(&InputEvent::SetSpotlight(true), &mut cam));
        assert!(!controller.process_event(&InputEvent::PointerMove { x: 1.0, y: 1.0 }, &mut cam));
    }
}
