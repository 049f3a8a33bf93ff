//! Texture resource management for wgpu
//!
//! Depth buffers, the sky texture and the decoding of the sky image.

use std::path::Path;

use crate::error::GladeError;

/// GPU texture resource containing texture, view, and sampler
///
/// Bundles the three main components needed for texture operations:
/// - Texture: The actual GPU memory allocation
/// - View: Interface for shader access
/// - Sampler: Filtering and addressing configuration
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Depth attachment sized to the surface. It is never sampled.
pub struct DepthTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration, label: &str) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }
}

/// Decoded RGBA8 pixels, rows ordered bottom to top
#[derive(Debug, Clone, PartialEq)]
pub struct SkyImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl SkyImage {
    /// Single opaque white texel, bound until the real image arrives.
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        }
    }
}

/// Decodes an image file into RGBA8, flipped vertically so that `v = 0`
/// samples the bottom row.
pub fn load_rgba_image(path: &Path) -> Result<SkyImage, GladeError> {
    let image = image::open(path).map_err(|source| GladeError::TextureLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = image.flipv().to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(SkyImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

impl TextureResource {
    /// Standard depth buffer format used throughout the engine
    /// Uploads an RGBA8 image as a linearly filtered, repeating texture.
    ///
    /// The data is stored as plain `Rgba8Unorm` so texel values reach the
    /// shader unchanged, matching the non-sRGB surface.
    pub fn create_from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &SkyImage,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("glade-{}-{}", std::process::id(), name))
    }

    #[test]
    fn loading_flips_rows_and_expands_to_rgba() {
        let path = temp_path("sky.png");
        let mut source = image::RgbImage::new(1, 2);
        source.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        source.put_pixel(0, 1, image::Rgb([0, 0, 255]));
        source.save(&path).unwrap();

        let loaded = load_rgba_image(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!((loaded.width, loaded.height), (1, 2));
        // The bottom (blue) row comes first after the flip.
        assert_eq!(loaded.pixels, vec![0, 0, 255, 255, 255, 0, 0, 255]);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let path = temp_path("does-not-exist.png");
        match load_rgba_image(&path) {
            Err(GladeError::TextureLoad { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected a texture load error, got {:?}", other.map(|i| i.width)),
        }
    }

    #[test]
    fn placeholder_is_one_white_texel() {
        let image = SkyImage::placeholder();
        assert_eq!((image.width, image.height), (1, 1));
        assert_eq!(image.pixels, vec![255, 255, 255, 255]);
    }
}
