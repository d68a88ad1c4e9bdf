//! A fixed-capacity sequence of image frames.

use std::path::Path;

use gem_core::{PixelFormat, PixelImage};

use crate::codec;
use crate::error::{PixError, PixResult};

/// Frame count used when a store is created with a negative capacity.
pub const DEFAULT_NUM_FRAMES: usize = 100;

/// An indexed array of image slots.
///
/// Every slot starts empty. Indices are signed so that whatever a host sends
/// can be range-checked here; anything outside `[0, count)` is rejected
/// without touching any slot.
#[derive(Debug, Clone)]
pub struct FrameStore {
    name: String,
    frames: Vec<PixelImage>,
}

impl FrameStore {
    /// Creates a store with `capacity` empty slots.
    ///
    /// Fails with [`PixError::InvalidGeometry`] if the slots cannot be
    /// reserved.
    pub fn new(name: impl Into<String>, capacity: usize) -> PixResult<Self> {
        let mut frames = Vec::new();
        frames
            .try_reserve_exact(capacity)
            .map_err(|_| PixError::InvalidGeometry(format!("{capacity} frames")))?;
        frames.resize(capacity, PixelImage::empty());
        Ok(Self {
            name: name.into(),
            frames,
        })
    }

    /// Returns the name this store is bound under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the capacity. Empty slots count.
    #[must_use]
    pub fn count(&self) -> usize {
        self.frames.len()
    }

    /// Returns the number of slots holding pixel data.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.frames.iter().filter(|f| !f.is_empty()).count()
    }

    fn slot(&self, index: i64) -> Option<usize> {
        usize::try_from(index).ok().filter(|&i| i < self.frames.len())
    }

    fn out_of_range(&self, index: i64) -> PixError {
        PixError::IndexOutOfRange {
            index,
            capacity: self.frames.len(),
        }
    }

    /// Replaces every slot with a blank image of the given geometry.
    ///
    /// All previous contents are discarded. If the images cannot be
    /// allocated the store is left as it was.
    pub fn reallocate(&mut self, width: u32, height: u32, format: PixelFormat) -> PixResult<()> {
        let too_large =
            || PixError::InvalidGeometry(format!("{width}x{height}x{}", format.channels()));
        let mut frames = Vec::new();
        frames
            .try_reserve_exact(self.frames.len())
            .map_err(|_| too_large())?;
        for _ in 0..self.frames.len() {
            frames.push(PixelImage::blank(width, height, format).ok_or_else(too_large)?);
        }
        log::debug!(
            "pix_buffer '{}': allocated {} frames of {width}x{height}x{}",
            self.name,
            frames.len(),
            format.channels()
        );
        self.frames = frames;
        Ok(())
    }

    /// Copies `image` into the slot at `index`.
    pub fn put(&mut self, index: i64, image: Option<&PixelImage>) -> PixResult<()> {
        let slot = self.slot(index).ok_or_else(|| self.out_of_range(index))?;
        let image = image.ok_or(PixError::NoImage)?;
        image.copy_into(&mut self.frames[slot]);
        Ok(())
    }

    /// Returns the image at `index`.
    ///
    /// Returns `None` both when the index is out of range and when the slot
    /// is empty; [`FrameStore::try_get`] tells the two apart.
    #[must_use]
    pub fn get(&self, index: i64) -> Option<&PixelImage> {
        self.slot(index)
            .map(|i| &self.frames[i])
            .filter(|img| !img.is_empty())
    }

    /// Returns the image at `index`, failing with
    /// [`PixError::IndexOutOfRange`] or [`PixError::SlotEmpty`].
    pub fn try_get(&self, index: i64) -> PixResult<&PixelImage> {
        let slot = self.slot(index).ok_or_else(|| self.out_of_range(index))?;
        let image = &self.frames[slot];
        if image.is_empty() {
            return Err(PixError::SlotEmpty {
                index,
                capacity: self.frames.len(),
            });
        }
        Ok(image)
    }

    /// Decodes an image file into the slot at `index`.
    ///
    /// The slot is untouched if the index is out of range or decoding fails.
    pub fn load(&mut self, path: &Path, index: i64) -> PixResult<()> {
        if self.slot(index).is_none() {
            return Err(self.out_of_range(index));
        }
        let image = codec::decode(path)?;
        self.put(index, Some(&image))
    }

    /// Encodes the slot at `index` to `path`.
    ///
    /// No file is created unless the whole image was encoded.
    pub fn save(&self, path: Option<&Path>, index: i64) -> PixResult<()> {
        let path = path
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(PixError::NoFilename)?;
        let image = self.get(index).ok_or(PixError::SlotEmpty {
            index,
            capacity: self.frames.len(),
        })?;
        codec::save(image, path)
    }
}
