//! Deterministic placeholder image rendering.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Cursor;

use image::{ImageOutputFormat, Rgb, RgbImage};

use reel_models::ImageAsset;

use crate::error::{AssetError, AssetResult};

/// Render a deterministic placeholder still for a prompt.
///
/// The tint is derived from a hash of the prompt, so the same prompt
/// always yields the same image at the same dimensions. Output is a PNG
/// at exactly `width`x`height` with a vertical luminance gradient so the
/// frame is visibly synthetic but not a flat color.
pub fn placeholder_image(prompt: &str, width: u32, height: u32) -> AssetResult<ImageAsset> {
    if width == 0 || height == 0 {
        return Err(AssetError::malformed_image("zero placeholder dimensions"));
    }

    let mut hasher = DefaultHasher::new();
    prompt.hash(&mut hasher);
    let seed = hasher.finish();

    let base = [
        40 + (seed & 0x7f) as u8,
        40 + ((seed >> 8) & 0x7f) as u8,
        40 + ((seed >> 16) & 0x7f) as u8,
    ];

    let mut img = RgbImage::new(width, height);
    for (_, y, pixel) in img.enumerate_pixels_mut() {
        // Darken towards the bottom, where captions land.
        let fade = 1.0 - 0.5 * (y as f64 / height as f64);
        *pixel = Rgb([
            (base[0] as f64 * fade) as u8,
            (base[1] as f64 * fade) as u8,
            (base[2] as f64 * fade) as u8,
        ]);
    }

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .map_err(|e| AssetError::malformed_image(format!("placeholder encode failed: {}", e)))?;

    Ok(ImageAsset { bytes })
}
