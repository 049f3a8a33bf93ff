//! The drawing seam between scene composition and the GPU
//!
//! [`submit`] walks a [`FrameDrawList`] and issues one [`Renderer::draw`]
//! per instruction. [`RenderEngine`](super::RenderEngine) implements the
//! trait on wgpu; tests implement it with a recorder.

use std::collections::HashMap;

use cgmath::Matrix4;
use log::debug;

use crate::gfx::geometry::{GeometryData, MeshId};
use crate::gfx::lighting::LightUniform;
use crate::gfx::scene::composer::{FrameDrawList, Surface};

/// Opaque reference to an uploaded mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub usize);

pub trait Renderer {
    /// Uploads geometry once and returns a handle for later draws.
    fn upload_mesh(&mut self, id: MeshId, geometry: &GeometryData) -> MeshHandle;

    /// Sets the per-frame camera matrices and lights.
    fn set_uniforms(
        &mut self,
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
        lights: &LightUniform,
    );

    fn draw(
        &mut self,
        mesh: MeshHandle,
        model: Matrix4<f32>,
        normal: Matrix4<f32>,
        surface: &Surface,
    );
}

/// Handles of the static mesh table
#[derive(Debug, Default)]
pub struct MeshAssets {
    handles: HashMap<MeshId, MeshHandle>,
}

impl MeshAssets {
    /// Generates and uploads every mesh in [`MeshId::ALL`].
    pub fn upload<R: Renderer + ?Sized>(renderer: &mut R) -> Self {
        let mut assets = Self::default();
        for id in MeshId::ALL {
            let geometry = id.generate();
            debug!(
                "uploading {} mesh: {} vertices, {} indices",
                id.label(),
                geometry.vertex_count(),
                geometry.indices.len()
            );
            assets.handles.insert(id, renderer.upload_mesh(id, &geometry));
        }
        assets
    }

    pub fn get(&self, id: MeshId) -> Option<MeshHandle> {
        self.handles.get(&id).copied()
    }

    /// # Panics
    /// Panics if `id` was never uploaded.
    pub fn handle(&self, id: MeshId) -> MeshHandle {
        self.get(id).unwrap_or_else(|| {
            panic!(
                "{} mesh was not uploaded; call MeshAssets::upload first",
                id.label()
            )
        })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Issues the frame's uniforms, then its draws in list order.
///
/// # Panics
/// Panics if a draw names a mesh missing from `assets`.
pub fn submit<R: Renderer + ?Sized>(frame: &FrameDrawList, assets: &MeshAssets, renderer: &mut R) {
    renderer.set_uniforms(frame.view, frame.projection, &frame.lights);

    for draw in &frame.draws {
        renderer.draw(assets.handle(draw.mesh), draw.model, draw.normal, &draw.surface);
    }
}
