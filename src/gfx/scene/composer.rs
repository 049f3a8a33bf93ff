//! Builds the ordered draw list for one frame

use cgmath::{Deg, Matrix4, Rad, SquareMatrix, Vector3};

use crate::gfx::geometry::MeshId;
use crate::gfx::lighting::LightUniform;

use super::animator::{Butterfly, Caterpillar};
use super::state::SceneState;

pub type Color = [f32; 4];

pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];

/// What a draw is shaded with before lighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    Color(Color),
    /// Sample the sky texture.
    SkyTexture,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawInstruction {
    pub mesh: MeshId,
    pub model: Matrix4<f32>,
    /// Inverse-transpose of `model`.
    pub normal: Matrix4<f32>,
    pub surface: Surface,
}

impl DrawInstruction {
    pub fn new(mesh: MeshId, model: Matrix4<f32>, surface: Surface) -> Self {
        Self {
            mesh,
            model,
            normal: normal_matrix(&model),
            surface,
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct FrameDrawList {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub lights: LightUniform,
    pub draws: Vec<DrawInstruction>,
}

/// Material colors of the scene
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    /// Sky color before the texture has loaded.
    pub sky_fallback: Color,
    pub ground: Color,
    pub caterpillar_body: Color,
    pub caterpillar_head: Color,
    pub eyes: Color,
    pub butterfly_body: Color,
    pub wings: Color,
    pub cube: Color,
    pub sphere: Color,
    pub light_marker: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky_fallback: BLACK,
            ground: [0.4, 0.8, 0.4, 1.0],
            caterpillar_body: [0.5, 0.8, 0.5, 1.0],
            caterpillar_head: [0.6, 0.9, 0.6, 1.0],
            eyes: BLACK,
            butterfly_body: [0.4, 0.0, 0.6, 1.0],
            wings: [0.8, 0.2, 0.8, 0.9],
            cube: [1.0, 0.8, 0.2, 1.0],
            sphere: [0.5, 0.5, 1.0, 1.0],
            light_marker: [1.0, 0.8, 0.2, 1.0],
        }
    }
}

/// Number of draws in every frame.
pub const DRAWS_PER_FRAME: usize = 16;

#[derive(Debug, Clone, Default)]
pub struct SceneComposer {
    pub palette: Palette,
}

impl SceneComposer {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Emits, in order: sky, ground, caterpillar (segments, head, eyes),
    /// butterfly (body, wings), cube, sphere and the active light marker.
    pub fn compose(&self, state: &SceneState) -> FrameDrawList {
        let palette = &self.palette;
        let animator = &state.animator;
        let mut draws = Vec::with_capacity(DRAWS_PER_FRAME);

        let sky = if state.sky_textured {
            Surface::SkyTexture
        } else {
            Surface::Color(palette.sky_fallback)
        };
        draws.push(DrawInstruction::new(MeshId::SkyBox, Matrix4::identity(), sky));
        draws.push(DrawInstruction::new(
            MeshId::Ground,
            Matrix4::identity(),
            Surface::Color(palette.ground),
        ));

        self.compose_caterpillar(&animator.caterpillar, animator.elapsed, &mut draws);
        self.compose_butterfly(&animator.butterfly, &mut draws);

        draws.push(DrawInstruction::new(
            MeshId::Cube,
            Matrix4::from_translation(Vector3::new(-3.0, 0.0, 0.0)),
            Surface::Color(palette.cube),
        ));
        draws.push(DrawInstruction::new(
            MeshId::Sphere,
            Matrix4::from_translation(Vector3::new(3.0, 1.0, 0.0)),
            Surface::Color(palette.sphere),
        ));

        let marker = Matrix4::from_translation(state.lighting.active_light_position())
            * Matrix4::from_scale(0.2);
        draws.push(DrawInstruction::new(
            MeshId::Cube,
            marker,
            Surface::Color(palette.light_marker),
        ));

        FrameDrawList {
            view: state.camera.view_transform(),
            projection: state.projection.matrix(),
            lights: state.lighting.to_uniform(),
            draws,
        }
    }

    fn compose_caterpillar(
        &self,
        caterpillar: &Caterpillar,
        elapsed: f32,
        draws: &mut Vec<DrawInstruction>,
    ) {
        let facing = Matrix4::from_angle_y(Rad(caterpillar.facing));

        for segment in caterpillar.segments(elapsed) {
            let model = Matrix4::from_translation(segment.position)
                * facing
                * Matrix4::from_angle_y(Deg(segment.wiggle_degrees))
                * Matrix4::from_scale(0.6);
            draws.push(DrawInstruction::new(
                MeshId::Cube,
                model,
                Surface::Color(self.palette.caterpillar_body),
            ));
        }

        let head = Matrix4::from_translation(caterpillar.head_position()) * facing;
        draws.push(DrawInstruction::new(
            MeshId::Cube,
            head,
            Surface::Color(self.palette.caterpillar_head),
        ));

        for side in [1.0, -1.0] {
            let eye = head
                * Matrix4::from_translation(Vector3::new(0.3 * side, 0.5, 0.4))
                * Matrix4::from_scale(0.15);
            draws.push(DrawInstruction::new(
                MeshId::Cube,
                eye,
                Surface::Color(self.palette.eyes),
            ));
        }
    }

    fn compose_butterfly(&self, butterfly: &Butterfly, draws: &mut Vec<DrawInstruction>) {
        let base = Matrix4::from_translation(butterfly.position)
            * Matrix4::from_angle_y(Rad(butterfly.heading));

        draws.push(DrawInstruction::new(
            MeshId::Cube,
            base * Matrix4::from_nonuniform_scale(0.1, 0.3, 0.6),
            Surface::Color(self.palette.butterfly_body),
        ));

        let wings = [
            (butterfly.left_wing_degrees(), 0.5),
            (butterfly.right_wing_degrees(), -0.5),
        ];
        for (angle, offset) in wings {
            let model = base
                * Matrix4::from_angle_z(Deg(angle))
                * Matrix4::from_translation(Vector3::new(offset, 0.0, 0.0))
                * Matrix4::from_nonuniform_scale(0.5, 0.02, 0.4);
            draws.push(DrawInstruction::new(
                MeshId::Cube,
                model,
                Surface::Color(self.palette.wings),
            ));
        }
    }
}

/// Inverse-transpose of `model`. Singular models, which the scene never
/// produces, fall back to the identity.
pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix4<f32> {
    use cgmath::Matrix;

    model
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or_else(Matrix4::identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::input::InputEvent;
    use cgmath::{InnerSpace, Matrix, Vector4};

    fn state() -> SceneState {
        SceneState::new(&AppConfig::default())
    }

    fn translation(m: &Matrix4<f32>) -> Vector3<f32> {
        m.w.truncate()
    }

    #[test]
    fn frame_has_sixteen_draws_in_fixed_order() {
        let list = SceneComposer::default().compose(&state());
        let meshes: Vec<MeshId> = list.draws.iter().map(|d| d.mesh).collect();

        let mut expected = vec![MeshId::SkyBox, MeshId::Ground];
        expected.extend(std::iter::repeat(MeshId::Cube).take(11));
        expected.extend([MeshId::Cube, MeshId::Sphere, MeshId::Cube]);
        assert_eq!(meshes, expected);
        assert_eq!(list.draws.len(), DRAWS_PER_FRAME);
    }

    #[test]
    fn sky_is_flat_until_the_texture_arrives() {
        let composer = SceneComposer::default();
        let mut state = state();
        assert_eq!(composer.compose(&state).draws[0].surface, Surface::Color(BLACK));

        state.sky_textured = true;
        assert_eq!(composer.compose(&state).draws[0].surface, Surface::SkyTexture);
    }

    #[test]
    fn exactly_one_marker_follows_the_active_light() {
        let composer = SceneComposer::default();
        let mut state = state();
        state.step(25);

        let marker = *composer.compose(&state).draws.last().unwrap();
        let point = state.lighting.point.position;
        assert!((translation(&marker.model) - point).magnitude() < 1e-5);

        state.apply_input(InputEvent::SetSpotlight(true));
        let list = composer.compose(&state);
        let marker = list.draws.last().unwrap();
        assert!((translation(&marker.model) - Vector3::new(5.0, 5.0, 0.0)).magnitude() < 1e-5);
        assert_eq!(list.draws.len(), DRAWS_PER_FRAME);
    }

    #[test]
    fn normal_matrix_is_the_inverse_transpose() {
        let list = SceneComposer::default().compose(&state());
        for draw in &list.draws {
            let product = draw.normal.transpose() * draw.model;
            let identity = Matrix4::<f32>::identity();
            for c in 0..4 {
                assert!((product[c] - identity[c]).magnitude() < 1e-3);
            }
        }
    }

    #[test]
    fn non_uniform_scale_keeps_normals_perpendicular() {
        let model = Matrix4::from_nonuniform_scale(0.1, 0.3, 0.6)
            * Matrix4::from_angle_z(Deg(30.0));
        let normal = normal_matrix(&model);

        let surface_normal = Vector4::new(0.0, 1.0, 0.0, 0.0);
        let tangent = Vector4::new(1.0, 0.0, 0.0, 0.0);
        let n = (normal * surface_normal).truncate();
        let t = (model * tangent).truncate();
        assert!(n.dot(t).abs() < 1e-5);
    }

    #[test]
    fn eyes_sit_either_side_of_the_head() {
        let list = SceneComposer::default().compose(&state());
        let head = translation(&list.draws[7].model);
        let left = translation(&list.draws[8].model);
        let right = translation(&list.draws[9].model);

        // At rest the facing angle is zero, so the eye offsets are unrotated.
        assert!((left - head - Vector3::new(0.3, 0.5, 0.4)).magnitude() < 1e-5);
        assert!((right - head - Vector3::new(-0.3, 0.5, 0.4)).magnitude() < 1e-5);
        assert_eq!(list.draws[8].surface, Surface::Color(BLACK));
    }

    #[test]
    fn view_and_lights_come_from_the_state() {
        let mut state = state();
        state.apply_input(InputEvent::SetLighting(false));
        let list = SceneComposer::default().compose(&state);
        assert_eq!(list.view, state.camera.view_transform());
        assert!(!list.lights.lighting_on());
    }
}
