use std::{io::Cursor, sync::Arc};

use anyhow::Context;

use crate::foundation::{error::ReelResult, math::premultiply_rgba8_in_place};

/// A photo already fitted to the output canvas, as premultiplied RGBA8.
///
/// Cloning is cheap; pixel storage is shared.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap a straight-alpha RGBA image, premultiplying it.
    pub fn from_rgba_image(rgba: image::RgbaImage) -> Self {
        let (width, height) = rgba.dimensions();
        let mut rgba8_premul = rgba.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        }
    }

    /// Solid opaque image, mostly useful in tests and previews.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let px = image::Rgba([rgb[0], rgb[1], rgb[2], 255]);
        Self::from_rgba_image(image::RgbaImage::from_pixel(width, height, px))
    }
}

/// Decode encoded image bytes, applying any EXIF orientation so the result is upright.
pub fn decode_oriented(bytes: &[u8]) -> ReelResult<image::DynamicImage> {
    use image::ImageDecoder as _;

    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("guess image format")?;
    let mut decoder = reader.into_decoder().context("open image decoder")?;
    let orientation = decoder.orientation().context("read image orientation")?;
    let mut img = image::DynamicImage::from_decoder(decoder).context("decode image")?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Decode encoded image bytes as-is into a [`PreparedImage`] (no fitting).
pub fn decode_image(bytes: &[u8]) -> ReelResult<PreparedImage> {
    let img = decode_oriented(bytes)?;
    Ok(PreparedImage::from_rgba_image(img.to_rgba8()))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
