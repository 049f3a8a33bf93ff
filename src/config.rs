//! Application configuration
//!
//! Plain settings structs with sensible defaults. The defaults reproduce the
//! scene exactly as designed; tweak them through the `with_*` builders or the
//! `GLADE_*` environment variables read by [`AppConfig::from_env`].

use std::path::PathBuf;
use std::time::Duration;

use cgmath::Point3;

/// Window creation settings
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Glade".to_string(),
            width: 1200,
            height: 800,
        }
    }
}

/// Camera start pose and input sensitivities
#[derive(Debug, Clone, Copy)]
pub struct CameraSettings {
    pub start_position: Point3<f32>,
    pub start_yaw: f32,
    pub start_pitch: f32,
    /// Radians of yaw/pitch per pixel of pointer drag.
    pub mouse_sensitivity: f32,
    /// Fractional change of the look-at distance per wheel notch.
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Distance travelled per movement key press.
    pub move_step: f32,
    /// Radians turned per yaw key press.
    pub turn_step: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            start_position: Point3::new(0.0, 3.0, 10.0),
            start_yaw: -std::f32::consts::FRAC_PI_2,
            start_pitch: 0.0,
            mouse_sensitivity: 0.005,
            zoom_sensitivity: 0.1,
            min_distance: 1.0,
            max_distance: 100.0,
            move_step: 0.5,
            turn_step: 0.1,
        }
    }
}

/// Perspective projection parameters
#[derive(Debug, Clone, Copy)]
pub struct ProjectionConfig {
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fovy_degrees: 45.0,
            znear: 1.0,
            zfar: 100.0,
        }
    }
}

/// Simulation step settings
#[derive(Debug, Clone, Copy)]
pub struct AnimationConfig {
    /// Fixed simulation steps per second of wall time.
    pub tick_rate_hz: f32,
    /// Upper bound on steps run in a single frame after a stall.
    pub max_steps_per_frame: u32,
    /// Scene clock advance per step.
    pub clock_step: f32,
    /// Exponential smoothing factor of the caterpillar.
    pub caterpillar_speed: f32,
    /// Butterfly path phase advance per step.
    pub butterfly_step: f32,
    /// Point light orbit advance per step (radians).
    pub light_step: f32,
}

impl AnimationConfig {
    pub const DEFAULT_TICK_RATE_HZ: f32 = 60.0;

    /// Wall time of one step at `hz`, or `None` when the rate is not positive
    /// or the step is not representable as a non-zero [`Duration`].
    pub fn tick_step(hz: f32) -> Option<Duration> {
        if !(hz.is_finite() && hz > 0.0) {
            return None;
        }
        Duration::try_from_secs_f32(1.0 / hz)
            .ok()
            .filter(|step| !step.is_zero())
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: Self::DEFAULT_TICK_RATE_HZ,
            max_steps_per_frame: 5,
            clock_step: 0.01,
            caterpillar_speed: 0.05,
            butterfly_step: 0.01,
            light_step: 0.01,
        }
    }
}

/// Top-level configuration for [`GladeApp`](crate::app::GladeApp)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraSettings,
    pub projection: ProjectionConfig,
    pub animation: AnimationConfig,
    /// Image used for the sky box. `None` leaves the sky untextured.
    pub sky_texture: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraSettings::default(),
            projection: ProjectionConfig::default(),
            animation: AnimationConfig::default(),
            sky_texture: Some(PathBuf::from("assets/sky.png")),
        }
    }
}

impl AppConfig {
    pub const SKY_TEXTURE_VAR: &'static str = "GLADE_SKY_TEXTURE";
    pub const TICK_RATE_VAR: &'static str = "GLADE_TICK_RATE";

    /// Defaults overridden by `GLADE_SKY_TEXTURE` and `GLADE_TICK_RATE`.
    ///
    /// An empty `GLADE_SKY_TEXTURE` disables the sky texture. A tick rate that
    /// does not parse as a positive number is ignored with a warning, as is one whose step length is not representable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var(Self::SKY_TEXTURE_VAR) {
            config.sky_texture = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }

        if let Ok(rate) = std::env::var(Self::TICK_RATE_VAR) {
            match parse_tick_rate(&rate) {
                Some(hz) => config.animation.tick_rate_hz = hz,
                None => log::warn!(
                    "ignoring {}={:?}: expected a positive number",
                    Self::TICK_RATE_VAR,
                    rate
                ),
            }
        }

        config
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.window.title = title.to_owned();
        self
    }

    pub fn with_sky_texture(mut self, path: Option<PathBuf>) -> Self {
        self.sky_texture = path;
        self
    }

    pub fn with_camera(mut self, camera: CameraSettings) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }
}

fn parse_tick_rate(value: &str) -> Option<f32> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|hz| AnimationConfig::tick_step(*hz).is_some())
}
