//! Functions to turn a camera frame into the model input tensor.

use fast_image_resize::{
    images::Image as FirImage,
    pixels::PixelType,
    FilterType, ResizeAlg, ResizeOptions, Resizer,
};
use ndarray::Array4;
use rayon::prelude::*;
use crate::common::PokeImage;
use crate::error::FrameError;

pub const IMAGE_RESCALE: f32 = 255.0;

/// Stretches `frame` to `size x size` and returns a `[1, size, size, 3]` RGB
/// tensor with every channel scaled into `[0, 1]`. Aspect ratio is not kept.
pub fn preprocess(mut frame: PokeImage, size: u32) -> Result<Array4<f32>, FrameError> {
    if size == 0 {
        return Err(FrameError::Empty { width: size, height: size });
    }
    let src = frame.take_as_fir_image()?;
    let resized = resize_image(&src, size, size)?;
    nhwc_normalize(&resized)
}

fn resize_image(img: &FirImage, target_w: u32, target_h: u32) -> Result<FirImage<'static>, FrameError> {
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
    let mut resizer = Resizer::new();

    let mut dst = FirImage::new(target_w, target_h, PixelType::U8x3);
    resizer
        .resize(img, &mut dst, &options)
        .map_err(|err| FrameError::Resize(err.to_string()))?;
    Ok(dst)
}

// Packed RGB bytes are already in HWC order, so only the scale changes.
fn nhwc_normalize(img: &FirImage) -> Result<Array4<f32>, FrameError> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let buf = img.buffer();
    if buf.len() != w * h * 3 {
        return Err(FrameError::Resize(format!(
            "Unexpected buffer size: got {}, expected {}",
            buf.len(),
            w * h * 3
        )));
    }

    let data: Vec<f32> = buf.par_iter().map(|&v| v as f32 / IMAGE_RESCALE).collect();

    Array4::from_shape_vec((1, h, w, 3), data).map_err(|err| FrameError::Resize(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_solid_colour_keeps_channel_order() {
        let frame = PokeImage::from(RgbImage::from_pixel(31, 17, Rgb([255, 0, 51])));
        let x = preprocess(frame, 8).unwrap();

        assert_eq!(x.shape(), &[1, 8, 8, 3]);
        let expected: [f32; 3] = [1.0, 0.0, 0.2];
        for ((_, _, _, c), v) in x.indexed_iter() {
            assert!((v - expected[c]).abs() < 0.005, "channel {c} was {v}");
        }
    }

    #[test]
    fn test_empty_frame_is_rejected() {
        let frame = PokeImage::from(RgbImage::new(0, 10));
        assert!(matches!(preprocess(frame, 224), Err(FrameError::Empty { .. })));
    }
}
