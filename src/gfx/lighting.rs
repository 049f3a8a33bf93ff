//! Point light, spotlight and the fragment lighting model
//!
//! [`shade_fragment`] is the CPU form of the fragment stage in
//! `rendering/scene.wgsl`. Both must stay in step.
//!
//! The spotlight is exclusive: while it is on, the point light contributes
//! nothing, and a fragment the spotlight leaves (nearly) unlit is written as
//! opaque black instead of falling back to ambient light.

use cgmath::{InnerSpace, Vector3, Vector4};

pub const AMBIENT_STRENGTH: f32 = 0.2;
pub const SPECULAR_STRENGTH: f32 = 0.5;
pub const POINT_SHININESS: f32 = 32.0;

pub const SPOT_CUTOFF_DEGREES: f32 = 20.0;
pub const SPOT_INTENSITY: f32 = 2.0;
pub const SPOT_SHININESS: f32 = 64.0;
/// Width of the soft edge of the cone, in cosine units.
pub const SPOT_EPSILON: f32 = 0.2;
pub const SPOT_MAX_FALLOFF: f32 = 1.5;
/// Spotlight results shorter than this are treated as darkness.
pub const SPOT_BLACK_THRESHOLD: f32 = 0.01;

/// Radius and height of the point light orbit.
pub const LIGHT_ORBIT_RADIUS: f32 = 5.0;
pub const LIGHT_ORBIT_HEIGHT: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub color: [f32; 3],
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: orbit_position(0.0),
            color: [1.0, 1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Vector3<f32>,
    pub direction: Vector3<f32>,
    pub cutoff_degrees: f32,
    pub color: [f32; 3],
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Vector3::new(5.0, 5.0, 0.0),
            direction: Vector3::new(0.0, -1.0, 0.0),
            cutoff_degrees: SPOT_CUTOFF_DEGREES,
            color: [1.0, 1.0, 0.0],
        }
    }
}

impl SpotLight {
    pub fn cos_cutoff(&self) -> f32 {
        self.cutoff_degrees.to_radians().cos()
    }
}

/// Both lights and the shading switches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingState {
    pub point: PointLight,
    pub spot: SpotLight,
    pub lighting_on: bool,
    pub spotlight_on: bool,
    pub normal_visualization: bool,
}

impl Default for LightingState {
    fn default() -> Self {
        Self {
            point: PointLight::default(),
            spot: SpotLight::default(),
            lighting_on: true,
            spotlight_on: false,
            normal_visualization: false,
        }
    }
}

impl LightingState {
    /// Where the single light marker is drawn.
    pub fn active_light_position(&self) -> Vector3<f32> {
        if self.spotlight_on {
            self.spot.position
        } else {
            self.point.position
        }
    }

    pub fn to_uniform(&self) -> LightUniform {
        let flag = |on: bool| u32::from(on);
        LightUniform {
            point_position: self.point.position.extend(1.0).into(),
            point_color: extend_color(self.point.color),
            spot_position: self.spot.position.extend(1.0).into(),
            spot_direction: self.spot.direction.extend(self.spot.cos_cutoff()).into(),
            spot_color: extend_color(self.spot.color),
            flags: [
                flag(self.lighting_on),
                flag(self.spotlight_on),
                flag(self.normal_visualization),
                0,
            ],
        }
    }
}

/// Point on the light orbit for `angle` radians.
pub fn orbit_position(angle: f32) -> Vector3<f32> {
    Vector3::new(
        LIGHT_ORBIT_RADIUS * angle.cos(),
        LIGHT_ORBIT_HEIGHT,
        LIGHT_ORBIT_RADIUS * angle.sin(),
    )
}

fn extend_color(color: [f32; 3]) -> [f32; 4] {
    [color[0], color[1], color[2], 1.0]
}

/// GPU layout of the lighting block. `spot_direction.w` carries the cosine of
/// the cutoff angle; `flags` are lighting, spotlight and normal visualization.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub point_position: [f32; 4],
    pub point_color: [f32; 4],
    pub spot_position: [f32; 4],
    pub spot_direction: [f32; 4],
    pub spot_color: [f32; 4],
    pub flags: [u32; 4],
}

impl LightUniform {
    pub fn lighting_on(&self) -> bool {
        self.flags[0] != 0
    }

    pub fn spotlight_on(&self) -> bool {
        self.flags[1] != 0
    }

    pub fn normal_visualization(&self) -> bool {
        self.flags[2] != 0
    }
}

/// Interpolated values reaching the fragment stage
#[derive(Debug, Clone, Copy)]
pub struct FragmentInput {
    pub world_position: Vector3<f32>,
    pub normal: Vector3<f32>,
    /// Texture sample or material color.
    pub base_color: Vector4<f32>,
}

pub fn shade_fragment(input: &FragmentInput, lights: &LightUniform) -> Vector4<f32> {
    let normal = input.normal.normalize();

    if lights.normal_visualization() {
        let n = (normal + Vector3::new(1.0, 1.0, 1.0)) / 2.0;
        return n.extend(1.0);
    }
    if !lights.lighting_on() {
        return input.base_color;
    }

    let position = input.world_position;
    let view_dir = (-position).normalize();

    let lighting = if lights.spotlight_on() {
        let spot = spot_contribution(position, normal, view_dir, lights);
        if spot.magnitude() < SPOT_BLACK_THRESHOLD {
            return Vector4::new(0.0, 0.0, 0.0, 1.0);
        }
        spot
    } else {
        point_contribution(position, normal, view_dir, lights)
    };

    let base = input.base_color;
    Vector4::new(
        lighting.x * base.x,
        lighting.y * base.y,
        lighting.z * base.z,
        base.w,
    )
}

fn point_contribution(
    position: Vector3<f32>,
    normal: Vector3<f32>,
    view_dir: Vector3<f32>,
    lights: &LightUniform,
) -> Vector3<f32> {
    let color = rgb(lights.point_color);
    let light_dir = (xyz(lights.point_position) - position).normalize();

    let diffuse = normal.dot(light_dir).max(0.0);
    let reflect_dir = reflect(-light_dir, normal);
    let specular = view_dir.dot(reflect_dir).max(0.0).powf(POINT_SHININESS);

    color * (AMBIENT_STRENGTH + diffuse + SPECULAR_STRENGTH * specular)
}

fn spot_contribution(
    position: Vector3<f32>,
    normal: Vector3<f32>,
    view_dir: Vector3<f32>,
    lights: &LightUniform,
) -> Vector3<f32> {
    let to_light = (xyz(lights.spot_position) - position).normalize();
    let direction = xyz(lights.spot_direction).normalize();
    let cos_cutoff = lights.spot_direction[3];

    let theta = to_light.dot(-direction);
    if theta <= cos_cutoff {
        return Vector3::new(0.0, 0.0, 0.0);
    }

    let color = rgb(lights.spot_color);
    let diffuse = normal.dot(to_light).max(0.0);
    let reflect_dir = reflect(-to_light, normal);
    let specular = view_dir.dot(reflect_dir).max(0.0).powf(SPOT_SHININESS);
    let falloff = ((theta - cos_cutoff) / SPOT_EPSILON).clamp(0.0, SPOT_MAX_FALLOFF);

    color
        * (AMBIENT_STRENGTH * 2.0
            + diffuse * SPOT_INTENSITY
            + SPECULAR_STRENGTH * 3.0 * specular)
        * falloff
}

fn reflect(incident: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * normal.dot(incident))
}

fn xyz(v: [f32; 4]) -> Vector3<f32> {
    Vector3::new(v[0], v[1], v[2])
}

fn rgb(v: [f32; 4]) -> Vector3<f32> {
    Vector3::new(v[0], v[1], v[2])
}
