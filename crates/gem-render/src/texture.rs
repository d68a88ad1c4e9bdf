//! Texture descriptors for pixel images.

use gem_core::PixelImage;

use crate::error::{RenderError, Result};

/// Everything needed to create and fill a texture from a [`PixelImage`].
///
/// Every pixel format is uploaded as 8-bit RGBA.
#[derive(Debug, Clone)]
pub struct TextureUpload {
    pub descriptor: wgpu::TextureDescriptor<'static>,
    pub layout: wgpu::TexelCopyBufferLayout,
    pub data: Vec<u8>,
}

impl TextureUpload {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Prepares an upload for `image`.
    pub fn new(image: &PixelImage) -> Result<Self> {
        if image.is_empty() || image.width() == 0 || image.height() == 0 {
            return Err(RenderError::EmptyImage);
        }
        let size = wgpu::Extent3d {
            width: image.width(),
            height: image.height(),
            depth_or_array_layers: 1,
        };
        Ok(Self {
            descriptor: wgpu::TextureDescriptor {
                label: Some("gem pix texture"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: Self::FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width()),
                rows_per_image: Some(image.height()),
            },
            data: image.to_rgba8(),
        })
    }

    /// Returns the texture extent.
    pub fn size(&self) -> wgpu::Extent3d {
        self.descriptor.size
    }
}
