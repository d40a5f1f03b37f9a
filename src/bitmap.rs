use std::path::Path;

use image::{ImageReader, Rgb, RgbImage};

use crate::error::ExtractError;

/// Load an image file as RGB.
///
/// Transparent pixels are composited onto a white background, so an empty
/// PNG canvas reads as paper rather than black.
pub fn load_image(path: &Path) -> Result<RgbImage, ExtractError> {
    let img = ImageReader::open(path)
        .map_err(|e| ExtractError::ImageLoad(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| ExtractError::ImageLoad(e.to_string()))?
        .decode()
        .map_err(|e| ExtractError::ImageLoad(e.to_string()))?;

    if !img.color().has_alpha() {
        return Ok(img.into_rgb8());
    }

    let rgba = img.into_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in rgb.pixels_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = Rgb([over_white(r, a), over_white(g, a), over_white(b, a)]);
    }
    Ok(rgb)
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((channel as u32 * a + 255 * (255 - a) + 127) / 255) as u8
}
