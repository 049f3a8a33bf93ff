use cgmath::{perspective, Deg, Matrix4, Point3};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;

use crate::config::{CameraSettings, ProjectionConfig};
use crate::input::{InputEvent, MoveBinding};

use super::{camera_controller::CameraController, fly_camera::FlyCamera};

/// Remaps OpenGL clip depth `[-1, 1]` to wgpu's `[0, 1]`. Arguments are
/// column-major: the translation sits in the last column.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Bundles the camera pose with the controller that steers it
pub struct CameraManager {
    pub camera: FlyCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: FlyCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self::new(
            FlyCamera::from_settings(settings),
            CameraController::from_settings(settings),
        )
    }

    /// Applies a camera-related input event. Returns `false` for events the
    /// camera does not consume.
    pub fn process_event(&mut self, event: &InputEvent) -> bool {
        self.controller.process_event(event, &mut self.camera)
    }

    pub fn view_transform(&self) -> Matrix4<f32> {
        self.camera.view_transform()
    }

    pub fn eye(&self) -> Point3<f32> {
        self.camera.position
    }
}

/// Perspective projection fixed at startup except for the aspect ratio
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new(config: &ProjectionConfig, width: u32, height: u32) -> Self {
        let mut projection = Self {
            aspect: 1.0,
            fovy: Deg(config.fovy_degrees),
            znear: config.znear,
            zfar: config.zfar,
        };
        projection.resize(width, height);
        projection
    }

    /// A zero-sized viewport (minimised window) keeps the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

/// Translates a winit key press into a movement binding event.
pub fn key_event(code: KeyCode, state: ElementState) -> Option<InputEvent> {
    if state != ElementState::Pressed {
        return None;
    }
    MoveBinding::from_key_code(code).map(InputEvent::Key)
}

/// Translates a winit primary-button change into a pointer event.
pub fn pointer_button_event(
    button: MouseButton,
    state: ElementState,
    cursor: (f32, f32),
) -> Option<InputEvent> {
    match (button, state) {
        (MouseButton::Left, ElementState::Pressed) => Some(InputEvent::PointerDown {
            x: cursor.0,
            y: cursor.1,
        }),
        (MouseButton::Left, ElementState::Released) => Some(InputEvent::PointerUp),
        _ => None,
    }
}

/// Translates a winit wheel delta into the browser sign convention, where a
/// positive value scrolls away from the scene.
pub fn wheel_event(delta: MouseScrollDelta) -> InputEvent {
    let delta_y = -match delta {
        MouseScrollDelta::LineDelta(_, scroll) => scroll,
        MouseScrollDelta::PixelDelta(position) => position.y as f32,
    };
    InputEvent::Wheel { delta_y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector4, Zero};
    use winit::dpi::PhysicalPosition;

    #[test]
    fn projection_maps_near_and_far_to_wgpu_depth_range() {
        let projection = Projection::new(&ProjectionConfig::default(), 800, 600);
        let matrix = projection.matrix();

        let near = matrix * Vector4::new(0.0, 0.0, -1.0, 1.0);
        let far = matrix * Vector4::new(0.0, 0.0, -100.0, 1.0);
        assert!((near.z / near.w).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn projection_keeps_the_gl_perspective_in_x_and_y() {
        let projection = Projection::new(&ProjectionConfig::default(), 800, 600);
        let gl = perspective(Deg(45.0), 800.0 / 600.0, 1.0, 100.0);

        for point in [
            Vector4::new(1.0, 0.0, -10.0, 1.0),
            Vector4::new(-2.0, 3.0, -25.0, 1.0),
            Vector4::new(0.5, -0.5, -1.5, 1.0),
        ] {
            let ours = projection.matrix() * point;
            let reference = gl * point;
            assert!((ours.w - reference.w).abs() < 1e-5);
            assert!((ours.x / ours.w - reference.x / reference.w).abs() < 1e-5);
            assert!((ours.y / ours.w - reference.y / reference.w).abs() < 1e-5);
        }
    }

    #[test]
    fn depth_correction_leaves_w_alone() {
        let clip = OPENGL_TO_WGPU_MATRIX * Vector4::new(0.3, -0.2, -1.0, 1.0);
        assert_eq!(clip, Vector4::new(0.3, -0.2, 0.0, 1.0));
    }

    #[test]
    fn resize_updates_aspect_but_ignores_zero_sizes() {
        let mut projection = Projection::new(&ProjectionConfig::default(), 800, 400);
        assert_eq!(projection.aspect, 2.0);
        projection.resize(0, 600);
        assert_eq!(projection.aspect, 2.0);
        projection.resize(600, 600);
        assert_eq!(projection.aspect, 1.0);
    }

    #[test]
    fn wheel_sign_follows_the_browser_convention() {
        // Rolling the wheel toward the user reports a negative line delta in
        // winit and a positive deltaY in a browser.
        match wheel_event(MouseScrollDelta::LineDelta(0.0, -1.0)) {
            InputEvent::Wheel { delta_y } => assert!(delta_y > 0.0),
            other => panic!("unexpected event {other:?}"),
        }
        match wheel_event(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 12.0))) {
            InputEvent::Wheel { delta_y } => assert!(delta_y < 0.0),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn only_presses_produce_key_events() {
        assert_eq!(
            key_event(KeyCode::KeyW, ElementState::Pressed),
            Some(InputEvent::Key(MoveBinding::Forward))
        );
        assert_eq!(key_event(KeyCode::KeyW, ElementState::Released), None);
        assert_eq!(key_event(KeyCode::KeyP, ElementState::Pressed), None);
    }

    #[test]
    fn left_button_maps_to_pointer_events() {
        assert_eq!(
            pointer_button_event(MouseButton::Left, ElementState::Pressed, (4.0, 5.0)),
            Some(InputEvent::PointerDown { x: 4.0, y: 5.0 })
        );
        assert_eq!(
            pointer_button_event(MouseButton::Left, ElementState::Released, (0.0, 0.0)),
            Some(InputEvent::PointerUp)
        );
        assert_eq!(
            pointer_button_event(MouseButton::Right, ElementState::Pressed, (0.0, 0.0)),
            None
        );
    }

    #[test]
    fn matrix_conversion_is_column_major() {
        let mut matrix = Matrix4::zero();
        matrix.w.x = 7.0;
        let array = convert_matrix4_to_array(matrix);
        assert_eq!(array[3][0], 7.0);
    }
}
