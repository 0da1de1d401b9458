use std::path::Path;
use fast_image_resize::images::Image as FirImage;
use fast_image_resize::PixelType;
use image::{DynamicImage, RgbImage, RgbaImage};
use crate::error::FrameError;

/// One captured camera frame, held as packed 8-bit RGB.
#[derive(Debug, Clone, Default)]
pub struct PokeImage {
    pub image: RgbImage,
}

impl std::ops::Deref for PokeImage {
    type Target = RgbImage;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl From<DynamicImage> for PokeImage {
    fn from(image: DynamicImage) -> Self {
        Self { image: image.to_rgb8() }
    }
}

impl From<RgbImage> for PokeImage {
    fn from(image: RgbImage) -> Self {
        Self { image }
    }
}

impl From<RgbaImage> for PokeImage {
    fn from(image: RgbaImage) -> Self {
        Self { image: DynamicImage::from(image).to_rgb8() }
    }
}

impl PokeImage {
    /// Decodes an encoded frame (JPEG, PNG, ...) from memory.
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::from(image))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FrameError> {
        let image = image::open(path)?;
        Ok(Self::from(image))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    /// Moves the pixel buffer into a resizer image, leaving `self` empty.
    pub fn take_as_fir_image(&mut self) -> Result<FirImage<'static>, FrameError> {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return Err(FrameError::Empty { width, height });
        }
        let buffer = std::mem::take(&mut self.image).into_raw();

        FirImage::from_vec_u8(width, height, buffer, PixelType::U8x3)
            .map_err(|err| FrameError::Resize(err.to_string()))
    }
}
