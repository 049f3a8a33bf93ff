//! # Procedural Geometry Generation
//!
//! Static meshes for the scene, generated once at startup and uploaded once.
//!
//! ## Supported Primitives
//!
//! - **Cube**: unit cube with per-face normals and UVs
//! - **Sphere**: UV sphere with configurable radius and band counts
//! - **Sky box**: four inward-facing walls around the scene
//! - **Ground**: a single large quad below the origin
//!
//! ## Usage
//!
//! ```rust
//! use glade::gfx::geometry::{generate_cube, generate_sphere, MeshId};
//!
//! let cube = generate_cube();
//! assert_eq!(cube.triangle_count(), 12);
//!
//! let sphere = generate_sphere(1.0, 30, 30);
//! assert_eq!(sphere.vertex_count(), 31 * 31);
//!
//! let ground = MeshId::Ground.generate();
//! assert_eq!(ground.indices.len(), 6);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// How the index list is assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawMode {
    Triangles,
}

impl DrawMode {
    /// Every mode a generator can produce; one pipeline is built per entry.
    pub const ALL: [DrawMode; 1] = [DrawMode::Triangles];
}

/// Keys of the static mesh table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshId {
    Cube,
    Sphere,
    SkyBox,
    Ground,
}

impl MeshId {
    pub const ALL: [MeshId; 4] = [MeshId::Cube, MeshId::Sphere, MeshId::SkyBox, MeshId::Ground];

    /// Builds the geometry this id stands for with the scene's parameters.
    pub fn generate(self) -> GeometryData {
        match self {
            MeshId::Cube => generate_cube(),
            MeshId::Sphere => generate_sphere(1.0, 30, 30),
            MeshId::SkyBox => generate_sky_box(SKY_BOX_HALF_SIZE),
            MeshId::Ground => generate_ground_quad(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MeshId::Cube => "cube",
            MeshId::Sphere => "sphere",
            MeshId::SkyBox => "sky box",
            MeshId::Ground => "ground",
        }
    }
}

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Indices, counter-clockwise for triangles
    pub indices: Vec<u32>,
    pub draw_mode: DrawMode,
}

impl GeometryData {
    /// Create a new empty triangle list
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            tex_coords: Vec::new(),
            indices: Vec::new(),
            draw_mode: DrawMode::Triangles,
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        match self.draw_mode {
            DrawMode::Triangles => self.indices.len() / 3,
        }
    }

    /// Interleaves the attribute arrays into the renderer's vertex format.
    ///
    /// Missing normals default to +Y and missing UVs to the origin, so the
    /// arrays may be shorter than `vertices`.
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex3D {
                position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coord: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }

    /// True if every index refers to an existing vertex.
    pub fn indices_in_range(&self) -> bool {
        let count = self.vertices.len() as u32;
        self.indices.iter().all(|&i| i < count)
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
