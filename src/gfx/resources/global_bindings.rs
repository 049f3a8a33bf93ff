//! Uniform layouts and bind groups shared by every scene draw
//!
//! Three groups are bound per draw:
//!
//! - group 0: [`FrameUniform`], written once per frame
//! - group 1: [`ObjectUniform`], one pooled slot per draw
//! - group 2: the sky texture and its sampler
//!
//! The structs here MUST match `FrameData` and `ObjectData` in `scene.wgsl`.

use cgmath::Matrix4;

use crate::{
    gfx::camera::camera_utils::convert_matrix4_to_array,
    gfx::lighting::LightUniform,
    gfx::scene::composer::{DrawInstruction, Surface},
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

use super::texture_resource::TextureResource;

/// Per-frame camera matrices and light state
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub lights: LightUniform,
}
// 64 + 64 + 96 = 224 bytes

impl FrameUniform {
    pub fn new(view: Matrix4<f32>, projection: Matrix4<f32>, lights: LightUniform) -> Self {
        Self {
            view: convert_matrix4_to_array(view),
            projection: convert_matrix4_to_array(projection),
            lights,
        }
    }
}

/// Per-draw transforms and surface
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub base_color: [f32; 4],
    /// `[use_texture, 0, 0, 0]`
    pub flags: [u32; 4],
}
// 64 + 64 + 16 + 16 = 160 bytes

impl ObjectUniform {
    pub fn new(model: [[f32; 4]; 4], normal: [[f32; 4]; 4], surface: Surface) -> Self {
        let (base_color, textured) = match surface {
            Surface::Color(color) => (color, 0),
            Surface::SkyTexture => ([1.0; 4], 1),
        };
        Self {
            model,
            normal,
            base_color,
            flags: [textured, 0, 0, 0],
        }
    }

    pub fn from_draw(draw: &DrawInstruction) -> Self {
        Self::new(
            convert_matrix4_to_array(draw.model),
            convert_matrix4_to_array(draw.normal),
            draw.surface,
        )
    }

    pub fn uses_texture(&self) -> bool {
        self.flags[0] != 0
    }
}

/// Layouts of the three scene bind groups, in group order
pub struct SceneLayouts {
    pub frame: wgpu::BindGroupLayout,
    pub object: wgpu::BindGroupLayout,
    pub sky: wgpu::BindGroupLayout,
}

impl SceneLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let frame = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[binding_types::rendering_entry(0, binding_types::uniform())],
        });
        let object = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[binding_types::rendering_entry(0, binding_types::uniform())],
        });
        let sky = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sky Texture Bind Group Layout"),
            entries: &[
                binding_types::fragment_entry(0, binding_types::texture_2d()),
                binding_types::fragment_entry(
                    1,
                    binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        });

        Self { frame, object, sky }
    }

    pub fn all(&self) -> [&wgpu::BindGroupLayout; 3] {
        [&self.frame, &self.object, &self.sky]
    }
}

/// Frame uniform buffer bound at group 0
pub struct FrameBindings {
    ubo: UniformBuffer<FrameUniform>,
    bind_group: wgpu::BindGroup,
}

impl FrameBindings {
    pub fn new(device: &wgpu::Device, layouts: &SceneLayouts) -> Self {
        let ubo = UniformBuffer::new(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &layouts.frame,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });
        Self { ubo, bind_group }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, content: FrameUniform) {
        self.ubo.update_content(queue, content);
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

struct ObjectSlot {
    ubo: UniformBuffer<ObjectUniform>,
    bind_group: wgpu::BindGroup,
}

/// Grow-only pool of per-draw uniform slots bound at group 1.
///
/// Slot `i` belongs to the `i`th draw of the current frame; every slot is a
/// separate buffer so all writes of a frame land before the pass executes.
pub struct ObjectSlots {
    slots: Vec<ObjectSlot>,
}

impl ObjectSlots {
    pub fn with_capacity(device: &wgpu::Device, layouts: &SceneLayouts, capacity: usize) -> Self {
        let mut pool = Self { slots: Vec::new() };
        pool.ensure(device, layouts, capacity);
        pool
    }

    /// Makes sure at least `count` slots exist.
    pub fn ensure(&mut self, device: &wgpu::Device, layouts: &SceneLayouts, count: usize) {
        while self.slots.len() < count {
            let ubo = UniformBuffer::new(device);
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Object Bind Group {}", self.slots.len())),
                layout: &layouts.object,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.binding_resource(),
                }],
            });
            self.slots.push(ObjectSlot { ubo, bind_group });
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, index: usize, content: ObjectUniform) {
        self.slots[index].ubo.update_content(queue, content);
    }

    pub fn bind_group(&self, index: usize) -> &wgpu::BindGroup {
        &self.slots[index].bind_group
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Creates the group 2 bind group for a sky texture.
pub fn sky_bind_group(
    device: &wgpu::Device,
    layouts: &SceneLayouts,
    texture: &TextureResource,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Sky Texture Bind Group"),
        layout: &layouts.sky,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::MeshId;
    use cgmath::{SquareMatrix, Vector3};

    #[test]
    fn uniform_sizes_match_the_shader_layout() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 224);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 160);
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
    }

    #[test]
    fn textured_draws_use_a_white_base() {
        let draw = DrawInstruction::new(MeshId::SkyBox, Matrix4::identity(), Surface::SkyTexture);
        let object = ObjectUniform::from_draw(&draw);
        assert!(object.uses_texture());
        assert_eq!(object.base_color, [1.0; 4]);
    }

    #[test]
    fn colored_draws_carry_their_color_and_matrices() {
        let model = Matrix4::from_translation(Vector3::new(-3.0, 0.0, 0.0));
        let draw = DrawInstruction::new(MeshId::Cube, model, Surface::Color([1.0, 0.8, 0.2, 1.0]));
        let object = ObjectUniform::from_draw(&draw);

        assert!(!object.uses_texture());
        assert_eq!(object.base_color, [1.0, 0.8, 0.2, 1.0]);
        assert_eq!(object.model[3], [-3.0, 0.0, 0.0, 1.0]);
        // Inverse-transpose of a translation moves the offset into the last row.
        assert_eq!(object.normal[0][3], 3.0);
    }
}
