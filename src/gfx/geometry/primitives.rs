//! # Primitive Shape Generation
//!
//! All shapes use the Y-up convention of the scene.

use super::GeometryData;
use std::f32::consts::PI;

/// Half the edge length of the sky box.
pub const SKY_BOX_HALF_SIZE: f32 = 50.0;

/// Height of the ground plane.
pub const GROUND_HEIGHT: f32 = -0.5;
pub const GROUND_HALF_EXTENT: f32 = 20.0;
/// Number of texture repeats across the ground.
pub const GROUND_UV_REPEAT: f32 = 5.0;

/// Generate a unit cube centered at the origin
///
/// Returns a cube with vertices from -0.5 to 0.5 on all axes.
/// Each face has its own outward normal and UV coordinates from 0 to 1.
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();

    let positions = [
        // Front face
        [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
        // Back face
        [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
        // Left face
        [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
        // Right face
        [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
        // Top face
        [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
        // Bottom face
        [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    ];

    let tex_coords = [
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        [1.0, 0.0], [0.0, 0.0], [0.0, 1.0], [1.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    ];

    let face_normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    data.tex_coords = tex_coords.to_vec();
    data.normals = face_normals
        .iter()
        .flat_map(|&normal| std::iter::repeat(normal).take(4))
        .collect();
    data.indices = quad_indices(6);

    data
}

/// Generate a UV sphere
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `lat_bands` - Number of latitude bands, pole to pole
/// * `long_bands` - Number of longitude bands around the axis
///
/// UVs run backwards (`u = 1 - long/long_bands`, `v = 1 - lat/lat_bands`) so a
/// texture wraps with its top at the north pole.
pub fn generate_sphere(radius: f32, lat_bands: u32, long_bands: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let lat_bands = lat_bands.max(2);
    let long_bands = long_bands.max(3);

    for lat in 0..=lat_bands {
        let theta = lat as f32 * PI / lat_bands as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_bands {
            let phi = long as f32 * 2.0 * PI / long_bands as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let x = cos_phi * sin_theta;
            let y = cos_theta;
            let z = sin_phi * sin_theta;

            data.vertices.push([radius * x, radius * y, radius * z]);
            data.normals.push([x, y, z]);
            data.tex_coords.push([
                1.0 - long as f32 / long_bands as f32,
                1.0 - lat as f32 / lat_bands as f32,
            ]);
        }
    }

    for lat in 0..lat_bands {
        for long in 0..long_bands {
            let first = lat * (long_bands + 1) + long;
            let second = first + long_bands + 1;

            data.indices.extend_from_slice(&[first, second, first + 1]);
            data.indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    data
}

/// Generate the sky walls: back, left, right and front faces of a cube with
/// half-size `size`, normals pointing into the box.
///
/// There is no floor or ceiling; the ground quad covers the bottom.
pub fn generate_sky_box(size: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let s = size;

    let walls: [([[f32; 3]; 4], [f32; 3]); 4] = [
        // Back
        ([[-s, -s, -s], [s, -s, -s], [s, s, -s], [-s, s, -s]], [0.0, 0.0, 1.0]),
        // Left
        ([[-s, -s, s], [-s, s, s], [-s, s, -s], [-s, -s, -s]], [1.0, 0.0, 0.0]),
        // Right
        ([[s, -s, -s], [s, -s, s], [s, s, s], [s, s, -s]], [-1.0, 0.0, 0.0]),
        // Front
        ([[-s, -s, s], [s, -s, s], [s, s, s], [-s, s, s]], [0.0, 0.0, -1.0]),
    ];

    for (corners, normal) in walls {
        data.vertices.extend_from_slice(&corners);
        data.normals.extend(std::iter::repeat(normal).take(4));
        data.tex_coords
            .extend_from_slice(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    }
    data.indices = quad_indices(4);

    data
}

/// Generate the ground quad at [`GROUND_HEIGHT`], facing up, with the
/// texture repeated [`GROUND_UV_REPEAT`] times in each direction.
pub fn generate_ground_quad() -> GeometryData {
    let mut data = GeometryData::new();
    let e = GROUND_HALF_EXTENT;
    let y = GROUND_HEIGHT;
    let r = GROUND_UV_REPEAT;

    data.vertices = vec![[-e, y, -e], [e, y, -e], [e, y, e], [-e, y, e]];
    data.normals = vec![[0.0, 1.0, 0.0]; 4];
    data.tex_coords = vec![[0.0, 0.0], [r, 0.0], [r, r], [0.0, r]];
    data.indices = vec![0, 1, 2, 0, 2, 3];

    data
}

/// Two triangles `(0,1,2)`, `(0,2,3)` per four-vertex quad.
fn quad_indices(quads: u32) -> Vec<u32> {
    (0..quads)
        .flat_map(|q| {
            let b = q * 4;
            [b, b + 1, b + 2, b, b + 2, b + 3]
        })
        .collect()
}
