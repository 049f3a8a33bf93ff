use cgmath::*;

use crate::config::CameraSettings;

/// Pitch is kept this far away from straight up/down so the look-at basis
/// never degenerates.
pub const PITCH_MARGIN: f32 = 0.1;

pub const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - PITCH_MARGIN;
pub const MIN_PITCH: f32 = -std::f32::consts::FRAC_PI_2 + PITCH_MARGIN;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self {
            min_distance: 1.0,
            max_distance: 100.0,
        }
    }
}

/// First-person camera steered by yaw and pitch.
///
/// The look-at point always sits one unit ahead of the position along the
/// view direction `(cos yaw cos pitch, sin pitch, sin yaw cos pitch)`. Every
/// mutation recomputes it.
#[derive(Debug, Clone, Copy)]
pub struct FlyCamera {
    pub position: Point3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    look_at: Point3<f32>,
    pub up: Vector3<f32>,
    pub bounds: ZoomBounds,
    pub zoom_sensitivity: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Point3::origin(), -std::f32::consts::FRAC_PI_2, 0.0)
    }
}

impl FlyCamera {
    pub fn new(position: Point3<f32>, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            yaw,
            pitch: pitch.clamp(MIN_PITCH, MAX_PITCH),
            look_at: position, // Recomputed below.
            up: Vector3::unit_y(),
            bounds: ZoomBounds::default(),
            zoom_sensitivity: 0.1,
        };
        camera.update_look_at();
        camera
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        let mut camera = Self::new(
            settings.start_position,
            settings.start_yaw,
            settings.start_pitch,
        );
        camera.bounds = ZoomBounds {
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
        };
        camera.zoom_sensitivity = settings.zoom_sensitivity;
        camera
    }

    pub fn look_at(&self) -> Point3<f32> {
        self.look_at
    }

    /// Unit view direction for the current yaw and pitch.
    pub fn forward(&self) -> Vector3<f32> {
        direction(self.yaw, self.pitch)
    }

    /// Horizontal strafe direction, a quarter turn from the yaw heading.
    pub fn right(&self) -> Vector3<f32> {
        let heading = self.yaw + std::f32::consts::FRAC_PI_2;
        Vector3::new(heading.cos(), 0.0, heading.sin())
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Point3::new(x, y, z);
        self.update_look_at();
    }

    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.forward() * distance;
        self.update_look_at();
    }

    pub fn move_right(&mut self, distance: f32) {
        self.position += self.right() * distance;
        self.update_look_at();
    }

    pub fn move_up(&mut self, distance: f32) {
        self.position.y += distance;
        self.update_look_at();
    }

    /// Adds to yaw. Yaw is unbounded; the trigonometry wraps it.
    pub fn turn_left(&mut self, angle: f32) {
        self.yaw += angle;
        self.update_look_at();
    }

    pub fn look_up(&mut self, angle: f32) {
        self.pitch = (self.pitch + angle).clamp(MIN_PITCH, MAX_PITCH);
        self.update_look_at();
    }

    /// Re-bases the camera toward (`sign < 0`) or away from (`sign > 0`) the
    /// look-at point and returns the clamped distance that was applied.
    ///
    /// Requires the position and look-at point to differ, which holds after
    /// every other operation since the look-at point is one unit ahead.
    pub fn zoom(&mut self, sign: f32) -> f32 {
        let offset = self.position - self.look_at;
        let distance = offset.magnitude();
        let target = (distance * (1.0 + sign * self.zoom_sensitivity))
            .clamp(self.bounds.min_distance, self.bounds.max_distance);
        let factor = target / distance;

        self.position = self.look_at + offset * factor;
        self.update_look_at();
        target
    }

    /// Right-handed view matrix from position, look-at and up.
    pub fn view_transform(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.look_at, self.up)
    }

    fn update_look_at(&mut self) {
        self.look_at = self.position + self.forward();
    }
}

fn direction(yaw: f32, pitch: f32) -> Vector3<f32> {
    Vector3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-5;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    fn close_point(a: Point3<f32>, b: Point3<f32>) -> bool {
        close(a.x, b.x) && close(a.y, b.y) && close(a.z, b.z)
    }

    #[test]
    fn default_pose_looks_down_negative_z() {
        let camera = FlyCamera::new(Point3::new(0.0, 3.0, 10.0), -FRAC_PI_2, 0.0);
        assert!(close_point(camera.look_at(), Point3::new(0.0, 3.0, 9.0)));
    }

    #[test]
    fn look_direction_matches_yaw_and_pitch() {
        for &yaw in &[-3.0f32, -FRAC_PI_2, 0.0, 0.7, 2.5, 10.0] {
            for &pitch in &[MIN_PITCH, -0.5, 0.0, 0.3, MAX_PITCH] {
                let camera = FlyCamera::new(Point3::new(1.0, 2.0, 3.0), yaw, pitch);
                let dir = camera.look_at() - camera.position;
                assert!(close(dir.x, yaw.cos() * pitch.cos()));
                assert!(close(dir.y, pitch.sin()));
                assert!(close(dir.z, yaw.sin() * pitch.cos()));
                assert!(close(dir.magnitude(), 1.0));

                // The view matrix maps the look direction onto -Z in eye space.
                let eye_dir = camera.view_transform() * dir.extend(0.0);
                assert!(close(eye_dir.x, 0.0));
                assert!(close(eye_dir.y, 0.0));
                assert!(close(eye_dir.z, -1.0));
            }
        }
    }

    #[test]
    fn pitch_is_clamped_both_ways() {
        let mut camera = FlyCamera::default();
        for _ in 0..10 {
            camera.look_up(5.0);
            assert!(camera.pitch <= MAX_PITCH);
        }
        assert!(close(camera.pitch, FRAC_PI_2 - 0.1));

        for _ in 0..10 {
            camera.look_up(-5.0);
            assert!(camera.pitch >= MIN_PITCH);
        }
        assert!(close(camera.pitch, -FRAC_PI_2 + 0.1));
    }

    #[test]
    fn half_turn_flips_the_heading() {
        let mut camera = FlyCamera::new(Point3::new(0.0, 3.0, 10.0), -FRAC_PI_2, 0.0);
        let before = camera.forward();
        camera.turn_left(PI);
        assert!(close(camera.yaw, FRAC_PI_2));

        let after = camera.forward();
        assert!(close(after.x, -before.x));
        assert!(close(after.z, -before.z));
        assert!(close(after.z, 1.0));
    }

    #[test]
    fn movement_follows_the_basis_vectors() {
        let mut camera = FlyCamera::new(Point3::new(0.0, 3.0, 10.0), -FRAC_PI_2, 0.0);

        camera.move_forward(0.5);
        assert!(close_point(camera.position, Point3::new(0.0, 3.0, 9.5)));

        // Facing -Z, right is +X.
        camera.move_right(2.0);
        assert!(close_point(camera.position, Point3::new(2.0, 3.0, 9.5)));

        camera.move_up(-1.0);
        assert!(close_point(camera.position, Point3::new(2.0, 2.0, 9.5)));
        assert!(close_point(camera.look_at(), Point3::new(2.0, 2.0, 8.5)));
    }

    #[test]
    fn set_position_recomputes_look_at() {
        let mut camera = FlyCamera::new(Point3::origin(), 0.0, 0.0);
        camera.set_position(4.0, 5.0, 6.0);
        assert!(close_point(camera.look_at(), Point3::new(5.0, 5.0, 6.0)));
    }

    #[test]
    fn zoom_distance_stays_within_bounds() {
        let mut camera = FlyCamera::new(Point3::new(0.0, 3.0, 10.0), -FRAC_PI_2, 0.0);
        let signs = [1.0, 1.0, -1.0, -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0];
        for _ in 0..20 {
            for &sign in &signs {
                let applied = camera.zoom(sign);
                assert!(applied >= camera.bounds.min_distance);
                assert!(applied <= camera.bounds.max_distance);
                let d = (camera.position - camera.look_at()).magnitude();
                assert!(d >= camera.bounds.min_distance - EPS);
                assert!(d <= camera.bounds.max_distance + EPS);
            }
        }
    }

    #[test]
    fn zoom_out_backs_away_and_zoom_in_stops_at_min_distance() {
        let mut camera = FlyCamera::new(Point3::new(0.0, 3.0, 10.0), -FRAC_PI_2, 0.0);
        let applied = camera.zoom(1.0);
        assert!(close(applied, 1.1));
        assert!(close_point(camera.position, Point3::new(0.0, 3.0, 10.1)));

        // The look-at point is one unit ahead, already at the minimum.
        let before = camera.position;
        let applied = camera.zoom(-1.0);
        assert!(close(applied, 1.0));
        assert!(close_point(camera.position, before));
    }

    #[test]
    fn zoom_round_trip_restores_the_pose() {
        let mut camera = FlyCamera::new(Point3::new(0.5, 3.0, 10.0), -1.2, 0.3);
        camera.bounds = ZoomBounds {
            min_distance: 0.5,
            max_distance: 100.0,
        };
        let start = camera.position;

        camera.zoom(1.0);
        camera.zoom(-1.0);

        assert!(close_point(camera.position, start));
        assert!(close((camera.look_at() - camera.position).magnitude(), 1.0));
    }
}
