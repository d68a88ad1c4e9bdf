//! Pixel images passed along the render chain and stored in frame stores.

/// Memory layout of a pixel image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// One byte per pixel, grey.
    Luminance,
    /// Packed YUV 4:2:2 in `UYVY` order, two bytes per pixel.
    Yuv422,
    /// Three bytes per pixel.
    Rgb,
    /// Four bytes per pixel.
    #[default]
    Rgba,
}

impl PixelFormat {
    /// Returns the number of bytes per pixel.
    #[must_use]
    pub fn channels(self) -> u8 {
        match self {
            PixelFormat::Luminance => 1,
            PixelFormat::Yuv422 => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    /// Picks the format for a channel count.
    #[must_use]
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(PixelFormat::Luminance),
            2 => Some(PixelFormat::Yuv422),
            3 => Some(PixelFormat::Rgb),
            4 => Some(PixelFormat::Rgba),
            _ => None,
        }
    }
}

/// A CPU-side image: geometry plus tightly packed rows, top row first.
///
/// An image whose data is empty is an "empty slot"; geometry alone does not
/// make an image present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelImage {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelImage {
    /// Creates an image with no geometry and no data.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Allocates a zero-filled image of the given geometry.
    ///
    /// Returns `None` if the byte size overflows `usize` or the memory cannot
    /// be reserved.
    #[must_use]
    pub fn blank(width: u32, height: u32, format: PixelFormat) -> Option<Self> {
        let len = byte_len(width, height, format)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).ok()?;
        data.resize(len, 0);
        Some(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Wraps existing pixel data.
    ///
    /// Returns `None` if the data length does not match the geometry.
    #[must_use]
    pub fn from_raw(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Option<Self> {
        if byte_len(width, height, format) != Some(data.len()) {
            return None;
        }
        Some(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Returns the image width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel format.
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Returns bytes per pixel.
    #[must_use]
    pub fn channels(&self) -> u8 {
        self.format.channels()
    }

    /// Returns the raw pixel bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the raw pixel bytes for in-place edits.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns true if the image holds no pixel data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the bytes of the pixel at (x, y), or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height || self.is_empty() {
            return None;
        }
        let c = usize::from(self.channels());
        let start = (y as usize * self.width as usize + x as usize) * c;
        self.data.get(start..start + c)
    }

    /// Copies this image into `dst`, replacing its geometry and data.
    ///
    /// `dst` keeps no memory of its previous contents.
    pub fn copy_into(&self, dst: &mut PixelImage) {
        dst.width = self.width;
        dst.height = self.height;
        dst.format = self.format;
        dst.data.clear();
        dst.data.extend_from_slice(&self.data);
    }

    /// Converts to tightly packed RGBA8.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        let pixels = self.width as usize * self.height as usize;
        let mut out = Vec::with_capacity(pixels * 4);
        match self.format {
            PixelFormat::Rgba => out.extend_from_slice(&self.data),
            PixelFormat::Rgb => {
                for px in self.data.chunks_exact(3) {
                    out.extend_from_slice(&[px[0], px[1], px[2], 255]);
                }
            }
            PixelFormat::Luminance => {
                for &l in &self.data {
                    out.extend_from_slice(&[l, l, l, 255]);
                }
            }
            PixelFormat::Yuv422 => {
                for [r, g, b] in self.yuv_to_rgb() {
                    out.extend_from_slice(&[r, g, b, 255]);
                }
            }
        }
        out
    }

    /// Converts to tightly packed RGB8, dropping alpha.
    #[must_use]
    pub fn to_rgb8(&self) -> Vec<u8> {
        match self.format {
            PixelFormat::Rgb => self.data.clone(),
            PixelFormat::Yuv422 => self.yuv_to_rgb().into_iter().flatten().collect(),
            _ => self
                .to_rgba8()
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
        }
    }

    fn yuv_to_rgb(&self) -> Vec<[u8; 3]> {
        let width = self.width as usize;
        let mut out = Vec::with_capacity(width * self.height as usize);
        if width == 0 {
            return out;
        }
        for row in self.data.chunks_exact(width * 2) {
            for (i, pair) in row.chunks(4).enumerate() {
                let u = pair.first().copied().unwrap_or(128);
                let y0 = pair.get(1).copied().unwrap_or(0);
                let v = pair.get(2).copied().unwrap_or(128);
                let y1 = pair.get(3).copied().unwrap_or(0);
                out.push(yuv_pixel(y0, u, v));
                if 2 * i + 1 < width {
                    out.push(yuv_pixel(y1, u, v));
                }
            }
        }
        out
    }
}

fn byte_len(width: u32, height: u32, format: PixelFormat) -> Option<usize> {
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)?
        .checked_mul(usize::from(format.channels()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn yuv_pixel(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = f32::from(y);
    let u = f32::from(u) - 128.0;
    let v = f32::from(v) - 128.0;
    let clamp = |x: f32| x.round().clamp(0.0, 255.0) as u8;
    [
        clamp(y + 1.402 * v),
        clamp(y - 0.344 * u - 0.714 * v),
        clamp(y + 1.772 * u),
    ]
}
