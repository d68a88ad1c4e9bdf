//! Image file decoding and encoding for frame stores.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use gem_core::{PixelFormat, PixelImage};
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage, RgbaImage};

use crate::error::{PixError, PixResult};

/// Decodes an image file.
///
/// Grey sources become [`PixelFormat::Luminance`], everything else
/// [`PixelFormat::Rgba`].
pub fn decode(path: &Path) -> PixResult<PixelImage> {
    let img = image::open(path).map_err(|source| PixError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let (width, height) = (img.width(), img.height());
    let decoded = if img.color().has_color() {
        PixelImage::from_raw(width, height, PixelFormat::Rgba, img.to_rgba8().into_raw())
    } else {
        PixelImage::from_raw(width, height, PixelFormat::Luminance, img.to_luma8().into_raw())
    };
    // The codec always hands back exactly width * height * channels bytes.
    decoded.ok_or_else(|| PixError::InvalidGeometry(format!("{width}x{height}")))
}

/// Picks the output format from a file extension.
///
/// Supports `.png`, `.jpg`/`.jpeg`, `.bmp` and `.tif`/`.tiff`.
pub fn format_for_path(path: &Path) -> PixResult<ImageFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "bmp" => Ok(ImageFormat::Bmp),
        "tif" | "tiff" => Ok(ImageFormat::Tiff),
        _ => Err(PixError::UnsupportedFormat(extension)),
    }
}

/// Encodes an image into an in-memory file of the given format.
pub fn encode(img: &PixelImage, format: ImageFormat) -> PixResult<Vec<u8>> {
    let (w, h) = (img.width(), img.height());
    let invalid = || PixError::InvalidGeometry(format!("{w}x{h}x{}", img.channels()));

    let dynamic = match img.format() {
        PixelFormat::Luminance => {
            DynamicImage::ImageLuma8(GrayImage::from_raw(w, h, img.data().to_vec()).ok_or_else(invalid)?)
        }
        PixelFormat::Rgb | PixelFormat::Yuv422 => {
            DynamicImage::ImageRgb8(RgbImage::from_raw(w, h, img.to_rgb8()).ok_or_else(invalid)?)
        }
        PixelFormat::Rgba => {
            let rgba = RgbaImage::from_raw(w, h, img.data().to_vec()).ok_or_else(invalid)?;
            if format == ImageFormat::Jpeg {
                // JPEG has no alpha channel
                DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8())
            } else {
                DynamicImage::ImageRgba8(rgba)
            }
        }
    };

    let mut buffer = Cursor::new(Vec::new());
    dynamic.write_to(&mut buffer, format)?;
    Ok(buffer.into_inner())
}

/// Writes `bytes` to `path` through a sibling temporary file.
///
/// Either the complete file appears at `path` or nothing does.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> PixResult<()> {
    let io_err = |source| PixError::Io {
        path: path.to_path_buf(),
        source,
    };
    let tmp = temp_path(path);

    if let Err(e) = std::fs::write(&tmp, bytes) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(e));
    }
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(e));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.partial"))
}

/// Encodes an image and writes it to `path`, choosing the format from the
/// extension.
pub fn save(img: &PixelImage, path: &Path) -> PixResult<()> {
    let format = format_for_path(path)?;
    let bytes = encode(img, format)?;
    write_atomic(path, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> PixelImage {
        let data = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 128,
        ];
        PixelImage::from_raw(2, 2, PixelFormat::Rgba, data).unwrap()
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(format_for_path(Path::new("a.PNG")).unwrap(), ImageFormat::Png);
        assert_eq!(format_for_path(Path::new("a.jpeg")).unwrap(), ImageFormat::Jpeg);
        assert!(matches!(
            format_for_path(Path::new("a.xyz")),
            Err(PixError::UnsupportedFormat(ext)) if ext == "xyz"
        ));
        assert!(format_for_path(Path::new("noext")).is_err());
    }

    #[test]
    fn png_round_trip_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        save(&checker(), &path).unwrap();
        let back = decode(&path).unwrap();
        assert_eq!(back, checker());
    }

    #[test]
    fn grey_round_trip_stays_grey() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grey.png");
        let img = PixelImage::from_raw(3, 1, PixelFormat::Luminance, vec![0, 127, 255]).unwrap();
        save(&img, &path).unwrap();
        let back = decode(&path).unwrap();
        assert_eq!(back.format(), PixelFormat::Luminance);
        assert_eq!(back.data(), &[0, 127, 255]);
    }

    #[test]
    fn jpeg_drops_alpha() {
        let bytes = encode(&checker(), ImageFormat::Jpeg).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn decode_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(decode(&path), Err(PixError::Decode { .. })));
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("out.png");
        assert!(matches!(save(&checker(), &path), Err(PixError::Io { .. })));
        assert!(!path.exists());
    }
}
