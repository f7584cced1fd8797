//! Texture loading and upload.
//!
//! Images are flipped vertically before upload so that texture coordinate
//! v = 0 addresses the bottom row of the image file.

use std::path::Path;

use image::{Rgba, RgbaImage};
use wgpu::{BindGroup, BindGroupLayout, Device, Queue, Sampler};

/// Edge length of the generated fallback texture.
const CHECKER_SIZE: u32 = 64;
/// Edge length of one checker cell.
const CHECKER_CELL: u32 = 8;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("image {path} has zero size")]
    Empty { path: String },
}

/// Decode an image file to RGBA8 with the bottom row first.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, TextureError> {
    let image = image::open(path).map_err(|source| TextureError::Image {
        path: path.display().to_string(),
        source,
    })?;
    let rgba = image.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(TextureError::Empty {
            path: path.display().to_string(),
        });
    }
    Ok(image::imageops::flip_vertical(&rgba))
}

/// Two-tone checkerboard shown in place of a missing texture.
pub fn checkerboard(size: u32, cell: u32) -> RgbaImage {
    let cell = cell.max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            Rgba([200, 0, 200, 255])
        } else {
            Rgba([40, 40, 40, 255])
        }
    })
}

/// Load `path`, or fall back to a checkerboard with a warning.
pub fn load_or_fallback(path: &Path) -> RgbaImage {
    match load_rgba(path) {
        Ok(image) => {
            tracing::debug!(
                "Loaded texture {} ({}x{})",
                path.display(),
                image.width(),
                image.height()
            );
            image
        }
        Err(e) => {
            tracing::warn!("{e}; using placeholder texture");
            checkerboard(CHECKER_SIZE, CHECKER_CELL)
        }
    }
}

/// An uploaded texture with its bind group.
pub struct GpuTexture {
    _texture: wgpu::Texture,
    pub bind_group: BindGroup,
}

impl GpuTexture {
    pub fn upload(
        device: &Device,
        queue: &Queue,
        layout: &BindGroupLayout,
        sampler: &Sampler,
        label: &str,
        image: &RgbaImage,
    ) -> Self {
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
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
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}_bind_group")),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            _texture: texture,
            bind_group,
        }
    }
}

/// Repeating, linearly filtered sampler shared by all textures.
pub fn create_sampler(device: &Device) -> Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("texture_sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}
