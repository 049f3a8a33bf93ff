//! WGPU-based rendering engine for the Glade scene
//!
//! Owns the surface, device and every GPU resource of the scene: the four
//! static meshes, the frame and per-draw uniforms, the sky texture and the
//! depth buffer. Draws are recorded through the [`Renderer`] trait and
//! encoded into a single pass by [`RenderEngine::render_frame`].

use std::sync::Arc;

use cgmath::Matrix4;
use log::{debug, info, warn};
use wgpu::util::DeviceExt;
use wgpu::TextureFormat;

use crate::error::GladeError;
use crate::gfx::{
    geometry::{DrawMode, GeometryData, MeshId},
    lighting::LightUniform,
    resources::{
        global_bindings::{
            sky_bind_group, FrameBindings, FrameUniform, ObjectSlots, ObjectUniform, SceneLayouts,
        },
        texture_resource::{DepthTexture, SkyImage, TextureResource},
    },
    scene::{composer::DRAWS_PER_FRAME, composer::Surface},
};

use super::pipeline_manager::{pipeline_name, PipelineConfig, PipelineManager, SCENE_SHADER};
use super::renderer::{MeshHandle, Renderer};

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    draw_mode: DrawMode,
}

#[derive(Debug, Clone, Copy)]
struct PendingDraw {
    mesh: MeshHandle,
    slot: usize,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: DepthTexture,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    layouts: SceneLayouts,
    frame_bindings: FrameBindings,
    object_slots: ObjectSlots,
    sky_texture: TextureResource,
    sky_bind_group: wgpu::BindGroup,
    meshes: Vec<GpuMesh>,
    pending: Vec<PendingDraw>,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Fails if no adapter or device is available, or if the scene shader
    /// or its pipelines do not validate.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine, GladeError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = DepthTexture::new(&device, &config, "depth_texture");

        let layouts = SceneLayouts::new(&device);
        let frame_bindings = FrameBindings::new(&device, &layouts);
        let object_slots = ObjectSlots::with_capacity(&device, &layouts, DRAWS_PER_FRAME);

        let sky_texture = TextureResource::create_from_image(
            &device,
            &queue,
            &SkyImage::placeholder(),
            "Sky Placeholder",
        );
        let sky_bind_group = sky_bind_group(&device, &layouts, &sky_texture);

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader(SCENE_SHADER, include_str!("scene.wgsl"))?;

        let layout_list: Vec<wgpu::BindGroupLayout> =
            layouts.all().into_iter().cloned().collect();
        for mode in DrawMode::ALL {
            pipeline_manager.register_pipeline(
                pipeline_name(mode),
                PipelineConfig::scene(
                    mode,
                    format,
                    DepthTexture::FORMAT,
                    layout_list.clone(),
                ),
            );
        }
        pipeline_manager.create_all_pipelines()?;
        debug!("{:?}", pipeline_manager.get_stats());

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            pipeline_manager,
            layouts,
            frame_bindings,
            object_slots,
            sky_texture,
            sky_bind_group,
            meshes: Vec::new(),
            pending: Vec::with_capacity(DRAWS_PER_FRAME),
        })
    }

    /// Replaces the sky texture. Returns `false`, leaving the current
    /// texture bound, if the image exceeds the device's texture limit.
    pub fn set_sky_texture(&mut self, image: &SkyImage) -> bool {
        let max = self.device.limits().max_texture_dimension_2d;
        if image.width == 0 || image.height == 0 || image.width > max || image.height > max {
            warn!(
                "sky image is {}x{}, outside the supported 1..={} range; keeping the current sky",
                image.width, image.height, max
            );
            return false;
        }

        self.sky_texture =
            TextureResource::create_from_image(&self.device, &self.queue, image, "Sky Texture");
        self.sky_bind_group = sky_bind_group(&self.device, &self.layouts, &self.sky_texture);
        info!("sky texture uploaded ({}x{})", image.width, image.height);
        true
    }

    /// Encodes the draws recorded since the last frame, then runs the UI
    /// callback on the same encoder and presents.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    /// Only an out-of-memory surface is reported as an error.
    pub fn render_frame<F>(&mut self, ui_callback: Option<F>) -> Result<(), GladeError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("surface lost or outdated; reconfiguring");
                self.surface.configure(&self.device, &self.config);
                self.pending.clear();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.pending.clear();
                return Err(GladeError::Surface(wgpu::SurfaceError::OutOfMemory));
            }
            Err(err) => {
                warn!("skipping frame: {}", err);
                self.pending.clear();
                return Ok(());
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, self.frame_bindings.bind_group(), &[]);
            render_pass.set_bind_group(2, &self.sky_bind_group, &[]);

            let mut bound_mode = None;
            for draw in &self.pending {
                let Some(mesh) = self.meshes.get(draw.mesh.0) else {
                    warn!("skipping draw of unknown mesh {:?}", draw.mesh);
                    continue;
                };

                if bound_mode != Some(mesh.draw_mode) {
                    let Some(pipeline) = self
                        .pipeline_manager
                        .get_pipeline(pipeline_name(mesh.draw_mode))
                    else {
                        warn!("no pipeline for {:?} meshes", mesh.draw_mode);
                        continue;
                    };
                    render_pass.set_pipeline(pipeline);
                    bound_mode = Some(mesh.draw_mode);
                }

                render_pass.set_bind_group(1, self.object_slots.bind_group(draw.slot), &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
        self.pending.clear();

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the surface and depth buffer. Zero sizes (minimised window)
    /// are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture = DepthTexture::new(&self.device, &self.config, "depth_texture");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }
}

impl Renderer for RenderEngine {
    fn upload_mesh(&mut self, id: MeshId, geometry: &GeometryData) -> MeshHandle {
        let vertices = geometry.to_vertices();
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertex Buffer", id.label())),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Index Buffer", id.label())),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        self.meshes.push(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            draw_mode: geometry.draw_mode,
        });
        MeshHandle(self.meshes.len() - 1)
    }

    fn set_uniforms(
        &mut self,
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
        lights: &LightUniform,
    ) {
        self.frame_bindings
            .update(&self.queue, FrameUniform::new(view, projection, *lights));
        self.pending.clear();
    }

    fn draw(
        &mut self,
        mesh: MeshHandle,
        model: Matrix4<f32>,
        normal: Matrix4<f32>,
        surface: &Surface,
    ) {
        let slot = self.pending.len();
        self.object_slots
            .ensure(&self.device, &self.layouts, slot + 1);

        let content = ObjectUniform::new(model.into(), normal.into(), *surface);
        self.object_slots.write(&self.queue, slot, content);
        self.pending.push(PendingDraw { mesh, slot });
    }
}
