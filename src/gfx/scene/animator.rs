//! Per-tick animation of the caterpillar, the butterfly and the light orbit
//!
//! Every curve is a closed-form function of a scalar that advances by a
//! fixed amount per tick, so the animation speed is tied to the tick rate and
//! not to the display refresh rate.

use cgmath::{Vector2, Vector3};

use crate::config::AnimationConfig;
use crate::gfx::lighting::{orbit_position, LightingState};

pub const CATERPILLAR_SEGMENTS: usize = 5;
/// Distance between consecutive body segments.
pub const SEGMENT_SPACING: f32 = 1.2;
pub const SEGMENT_WAVE_HEIGHT: f32 = 0.1;
pub const SEGMENT_WIGGLE_DEGREES: f32 = 10.0;

pub const BUTTERFLY_PATH_RADIUS: f32 = 3.0;
pub const BUTTERFLY_MAX_WING_DEGREES: f32 = 45.0;

/// Pose of one trailing body segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPose {
    pub position: Vector3<f32>,
    /// Extra yaw on top of the facing angle.
    pub wiggle_degrees: f32,
}

/// A head that eases toward a target on the ground plane, trailed by body
/// segments. Coordinates are `(x, z)`.
#[derive(Debug, Clone, Copy)]
pub struct Caterpillar {
    pub position: Vector2<f32>,
    pub target: Vector2<f32>,
    /// Fraction of the remaining distance covered per tick.
    pub move_speed: f32,
    /// Radians, `atan2` of the vector toward the target.
    pub facing: f32,
    pub hover_height: f32,
}

impl Caterpillar {
    pub fn new(start: Vector2<f32>, move_speed: f32) -> Self {
        Self {
            position: start,
            target: start,
            move_speed,
            facing: 0.0,
            hover_height: hover_height(0.0),
        }
    }

    /// Sets the destination. The head only moves on later ticks.
    pub fn set_target(&mut self, x: f32, z: f32) {
        self.target = Vector2::new(x, z);
    }

    pub fn tick(&mut self, elapsed: f32) {
        self.position += (self.target - self.position) * self.move_speed;

        let to_target = self.target - self.position;
        self.facing = to_target.y.atan2(to_target.x);
        self.hover_height = hover_height(elapsed);
    }

    pub fn distance_to_target(&self) -> f32 {
        let d = self.target - self.position;
        (d.x * d.x + d.y * d.y).sqrt()
    }

    pub fn head_position(&self) -> Vector3<f32> {
        Vector3::new(self.position.x, self.hover_height, self.position.y)
    }

    /// Trailing segments, nearest first. Segment 0 sits at the head.
    pub fn segments(&self, elapsed: f32) -> [SegmentPose; CATERPILLAR_SEGMENTS] {
        let (sin_a, cos_a) = self.facing.sin_cos();
        std::array::from_fn(|i| {
            let offset = i as f32 * SEGMENT_SPACING;
            let wave = (i as f32 + elapsed).sin();
            SegmentPose {
                position: Vector3::new(
                    self.position.x - cos_a * offset,
                    self.hover_height + wave * SEGMENT_WAVE_HEIGHT,
                    self.position.y - sin_a * offset,
                ),
                wiggle_degrees: wave * SEGMENT_WIGGLE_DEGREES,
            }
        })
    }
}

fn hover_height(elapsed: f32) -> f32 {
    (elapsed * 2.0).sin() * 0.2 + 0.3
}

/// A butterfly on a figure-8, flapping in time with its path phase
#[derive(Debug, Clone, Copy)]
pub struct Butterfly {
    pub phase: f32,
    pub step: f32,
    pub position: Vector3<f32>,
    pub wing_degrees: f32,
    /// Body yaw in radians.
    pub heading: f32,
}

impl Butterfly {
    pub fn new(step: f32) -> Self {
        let mut butterfly = Self {
            phase: 0.0,
            step,
            position: Vector3::new(0.0, 0.0, 0.0),
            wing_degrees: 0.0,
            heading: 0.0,
        };
        butterfly.update_pose();
        butterfly
    }

    pub fn tick(&mut self) {
        self.phase += self.step;
        self.update_pose();
    }

    /// Left wing angle; the right wing mirrors it.
    pub fn left_wing_degrees(&self) -> f32 {
        self.wing_degrees
    }

    pub fn right_wing_degrees(&self) -> f32 {
        -self.wing_degrees
    }

    fn update_pose(&mut self) {
        self.position = figure_eight(self.phase);
        self.wing_degrees = (self.phase * 8.0).sin() * BUTTERFLY_MAX_WING_DEGREES;
        let p = self.phase;
        self.heading = ((p * 0.5).cos() * p.cos()).atan2(p.cos());
    }
}

/// Figure-8 path with period 4π.
pub fn figure_eight(phase: f32) -> Vector3<f32> {
    Vector3::new(
        BUTTERFLY_PATH_RADIUS * phase.sin(),
        2.0 + 0.5 * (phase * 2.0).sin(),
        BUTTERFLY_PATH_RADIUS * (phase * 0.5).sin() * phase.cos(),
    )
}

/// Angle of the point light on its orbit
#[derive(Debug, Clone, Copy)]
pub struct LightOrbit {
    /// Radians.
    pub angle: f32,
    pub step: f32,
    /// Set by the light slider; suspends the automatic orbit for good.
    pub manual: bool,
}

impl LightOrbit {
    pub fn new(step: f32) -> Self {
        Self {
            angle: 0.0,
            step,
            manual: false,
        }
    }

    /// Switches to manual control at `degrees`.
    pub fn set_manual_degrees(&mut self, degrees: f32) {
        self.manual = true;
        self.angle = degrees.to_radians();
    }

    /// Angle shown on the slider, in `[0, 360)` for non-negative angles.
    pub fn slider_degrees(&self) -> f32 {
        self.angle.to_degrees() % 360.0
    }

    /// Advances the orbit unless lighting is off or the angle is manual, then
    /// places the point light.
    pub fn tick(&mut self, lighting: &mut LightingState) {
        if lighting.lighting_on && !self.manual {
            self.angle += self.step;
        }
        self.apply(lighting);
    }

    pub fn apply(&self, lighting: &mut LightingState) {
        lighting.point.position = orbit_position(self.angle);
    }
}

/// Owns all animated state and the scene clock
#[derive(Debug, Clone)]
pub struct SceneAnimator {
    /// Scene time, advanced by `clock_step` per tick.
    pub elapsed: f32,
    pub clock_step: f32,
    pub caterpillar: Caterpillar,
    pub butterfly: Butterfly,
    pub light: LightOrbit,
    ticks: u64,
}

impl Default for SceneAnimator {
    fn default() -> Self {
        Self::new(&AnimationConfig::default())
    }
}

impl SceneAnimator {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            elapsed: 0.0,
            clock_step: config.clock_step,
            caterpillar: Caterpillar::new(Vector2::new(-3.0, 5.0), config.caterpillar_speed),
            butterfly: Butterfly::new(config.butterfly_step),
            light: LightOrbit::new(config.light_step),
            ticks: 0,
        }
    }

    pub fn advance_clock(&mut self) {
        self.elapsed += self.clock_step;
        self.ticks += 1;
    }

    /// One simulated step: clock, light, caterpillar, butterfly.
    pub fn tick(&mut self, lighting: &mut LightingState) {
        self.advance_clock();
        self.light.tick(lighting);
        self.caterpillar.tick(self.elapsed);
        self.butterfly.tick();
    }

    pub fn set_caterpillar_target(&mut self, x: f32, z: f32) {
        self.caterpillar.set_target(x, z);
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn caterpillar_converges_without_overshoot() {
        let mut caterpillar = Caterpillar::new(Vector2::new(-3.0, 5.0), 0.05);
        caterpillar.set_target(4.0, -2.0);
        assert_eq!(caterpillar.position, Vector2::new(-3.0, 5.0));

        let mut last = caterpillar.distance_to_target();
        for tick in 0..200 {
            caterpillar.tick(tick as f32 * 0.01);
            let distance = caterpillar.distance_to_target();
            assert!(distance < last, "distance grew at tick {tick}");
            // Never past the target on either axis.
            assert!(caterpillar.position.x <= 4.0);
            assert!(caterpillar.position.y >= -2.0);
            last = distance;
        }
        assert!(last < 1e-3);
    }

    #[test]
    fn one_tick_covers_move_speed_of_the_gap() {
        let mut caterpillar = Caterpillar::new(Vector2::new(0.0, 0.0), 0.05);
        caterpillar.set_target(10.0, 0.0);
        caterpillar.tick(0.0);
        assert!((caterpillar.position.x - 0.5).abs() < 1e-6);
        assert_eq!(caterpillar.facing, 0.0);
    }

    #[test]
    fn facing_points_at_the_target() {
        let mut caterpillar = Caterpillar::new(Vector2::new(0.0, 0.0), 0.05);
        caterpillar.set_target(0.0, 3.0);
        caterpillar.tick(0.0);
        assert!((caterpillar.facing - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn hover_oscillates_around_its_base() {
        let mut caterpillar = Caterpillar::new(Vector2::new(0.0, 0.0), 0.05);
        for i in 0..1000 {
            caterpillar.tick(i as f32 * 0.01);
            assert!(caterpillar.hover_height >= 0.1 - 1e-6);
            assert!(caterpillar.hover_height <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn segments_trail_behind_the_head() {
        let mut caterpillar = Caterpillar::new(Vector2::new(0.0, 0.0), 0.05);
        caterpillar.set_target(10.0, 0.0);
        caterpillar.tick(0.0);

        let segments = caterpillar.segments(0.0);
        assert!((segments[0].position.x - caterpillar.position.x).abs() < 1e-6);
        for (i, segment) in segments.iter().enumerate() {
            let expected_x = caterpillar.position.x - i as f32 * SEGMENT_SPACING;
            assert!((segment.position.x - expected_x).abs() < 1e-5);
            assert!(segment.position.z.abs() < 1e-5);
            let wave = (i as f32).sin();
            assert!((segment.wiggle_degrees - wave * 10.0).abs() < 1e-5);
            assert!((segment.position.y - (caterpillar.hover_height + wave * 0.1)).abs() < 1e-5);
        }
    }

    #[test]
    fn butterfly_path_repeats_every_four_pi() {
        for i in 0..50 {
            let phase = i as f32 * 0.37;
            let a = figure_eight(phase);
            let b = figure_eight(phase + 4.0 * PI);
            assert!((a.x - b.x).abs() < 1e-4);
            assert!((a.y - b.y).abs() < 1e-4);
            assert!((a.z - b.z).abs() < 1e-4);
        }
    }

    #[test]
    fn butterfly_wings_mirror_each_other() {
        let mut butterfly = Butterfly::new(0.01);
        for _ in 0..200 {
            butterfly.tick();
            assert_eq!(butterfly.left_wing_degrees(), -butterfly.right_wing_degrees());
            assert!(butterfly.wing_degrees.abs() <= BUTTERFLY_MAX_WING_DEGREES);
        }
        assert!((butterfly.phase - 2.0).abs() < 1e-4);
    }

    #[test]
    fn light_orbits_only_when_lit_and_automatic() {
        let mut lighting = LightingState::default();
        let mut orbit = LightOrbit::new(0.01);

        orbit.tick(&mut lighting);
        assert!((orbit.angle - 0.01).abs() < 1e-7);
        assert!((lighting.point.position.x - 5.0 * 0.01f32.cos()).abs() < 1e-6);
        assert_eq!(lighting.point.position.y, 5.0);

        lighting.lighting_on = false;
        orbit.tick(&mut lighting);
        assert!((orbit.angle - 0.01).abs() < 1e-7);

        lighting.lighting_on = true;
        orbit.set_manual_degrees(90.0);
        orbit.tick(&mut lighting);
        assert!((orbit.angle - PI / 2.0).abs() < 1e-6);
        assert!((lighting.point.position.z - 5.0).abs() < 1e-5);
        assert!(lighting.point.position.x.abs() < 1e-5);
    }

    #[test]
    fn slider_degrees_wrap_past_a_full_turn() {
        let mut orbit = LightOrbit::new(0.01);
        orbit.angle = 2.0 * PI + PI / 4.0;
        assert!((orbit.slider_degrees() - 45.0).abs() < 1e-3);
    }

    #[test]
    fn animator_tick_advances_everything_once() {
        let mut animator = SceneAnimator::default();
        let mut lighting = LightingState::default();
        animator.set_caterpillar_target(0.0, 0.0);

        animator.tick(&mut lighting);
        assert_eq!(animator.ticks(), 1);
        assert!((animator.elapsed - 0.01).abs() < 1e-7);
        assert!((animator.butterfly.phase - 0.01).abs() < 1e-7);
        assert!((animator.light.angle - 0.01).abs() < 1e-7);
        assert!((animator.caterpillar.position.x - (-3.0 * 0.95)).abs() < 1e-6);
    }
}
