//! Textures the viewer binds
//!
//! Provides the depth buffer, image-file textures for textured meshes, and a
//! 1x1 white fallback bound for everything else.

use std::path::Path;

use log::info;

use crate::error::{ViewerError, ViewerResult};

/// A texture together with the view and sampler its bind group needs
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Decoded RGBA8 pixels, bottom row first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaPixels {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Reads an image file into RGBA8, flipped so that v = 0 is the bottom row
///
/// OBJ texture coordinates put the origin at the bottom-left, while image
/// files store the top row first.
pub fn decode_image_file(path: &Path) -> ViewerResult<RgbaPixels> {
    let image = image::open(path).map_err(|source| ViewerError::Texture {
        path: path.to_path_buf(),
        source,
    })?;

    let rgba = image.flipv().to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(RgbaPixels {
        data: rgba.into_raw(),
        width,
        height,
    })
}

impl TextureResource {
    /// Standard depth buffer format used throughout the viewer
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Depth attachment sized to `config`; rebuilt on every resize
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Loads an image file as a repeating, linearly filtered sRGB texture
    pub fn from_image_file(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
    ) -> ViewerResult<Self> {
        let path = path.as_ref();
        let pixels = decode_image_file(path)?;

        info!(
            "Loaded texture '{}': {}x{}",
            path.display(),
            pixels.width,
            pixels.height
        );

        Ok(Self::create_from_rgba_data(
            device,
            queue,
            &pixels,
            &path.display().to_string(),
            wgpu::AddressMode::Repeat,
        ))
    }

    /// 1x1 opaque white texture, bound for draws that sample nothing
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let pixels = RgbaPixels {
            data: vec![255; 4],
            width: 1,
            height: 1,
        };
        Self::create_from_rgba_data(
            device,
            queue,
            &pixels,
            "White Fallback",
            wgpu::AddressMode::ClampToEdge,
        )
    }

    /// Uploads RGBA8 pixels into a new sRGB texture with linear filtering
    pub fn create_from_rgba_data(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &RgbaPixels,
        label: &str,
        address_mode: wgpu::AddressMode,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: pixels.width,
            height: pixels.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
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
            &pixels.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * pixels.width),
                rows_per_image: Some(pixels.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
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
