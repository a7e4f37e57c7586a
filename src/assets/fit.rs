use std::path::Path;

use anyhow::Context as _;

use crate::{
    assets::decode::{PreparedImage, decode_oriented},
    config::{CanvasConfig, FitMode},
    foundation::core::Canvas,
    foundation::error::ReelResult,
};

/// Places photos onto a fixed canvas: scale by [`FitMode`], center, pad with a solid fill.
///
/// This is the only image-geometry policy in the crate; orientation is fixed up before fitting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitToCanvas {
    canvas: Canvas,
    mode: FitMode,
    fill_rgb: [u8; 3],
}

impl FitToCanvas {
    /// Build a fitter from canvas configuration.
    pub fn new(cfg: &CanvasConfig) -> ReelResult<Self> {
        let canvas = cfg.canvas();
        canvas.validate()?;
        Ok(Self {
            canvas,
            mode: cfg.fit,
            fill_rgb: cfg.fill_rgb,
        })
    }

    /// Target canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Size the photo is scaled to before it is centered on the canvas.
    ///
    /// In [`FitMode::Height`] the scaled width may exceed the canvas; the overflow is cropped
    /// evenly from both sides when placed.
    pub fn scaled_size(&self, width: u32, height: u32) -> (u32, u32) {
        if width == 0 || height == 0 {
            return (0, 0);
        }
        let cw = f64::from(self.canvas.width);
        let ch = f64::from(self.canvas.height);
        let w = f64::from(width);
        let h = f64::from(height);
        let scale = match self.mode {
            FitMode::Height => ch / h,
            FitMode::LongestEdge => (cw / w).min(ch / h),
        };
        let sw = (w * scale).round().max(1.0) as u32;
        let sh = (h * scale).round().max(1.0) as u32;
        (sw, sh)
    }

    /// Fit an upright photo onto the canvas.
    pub fn fit(&self, img: &image::DynamicImage) -> image::RgbaImage {
        let [r, g, b] = self.fill_rgb;
        let mut out =
            image::RgbaImage::from_pixel(self.canvas.width, self.canvas.height, image::Rgba([
                r, g, b, 255,
            ]));

        let (sw, sh) = self.scaled_size(img.width(), img.height());
        if sw == 0 || sh == 0 {
            return out;
        }
        let scaled = image::imageops::resize(
            &img.to_rgba8(),
            sw,
            sh,
            image::imageops::FilterType::Lanczos3,
        );
        let x = (i64::from(self.canvas.width) - i64::from(sw)) / 2;
        let y = (i64::from(self.canvas.height) - i64::from(sh)) / 2;
        image::imageops::overlay(&mut out, &scaled, x, y);
        out
    }

    /// Decode, orient and fit encoded image bytes.
    pub fn prepare_bytes(&self, bytes: &[u8]) -> ReelResult<PreparedImage> {
        let img = decode_oriented(bytes)?;
        Ok(PreparedImage::from_rgba_image(self.fit(&img)))
    }

    /// Read, decode, orient and fit an image file.
    pub fn prepare_file(&self, path: &Path) -> ReelResult<PreparedImage> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read photo '{}'", path.display()))?;
        self.prepare_bytes(&bytes)
            .map_err(|e| anyhow::anyhow!("prepare photo '{}': {e}", path.display()).into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fit.rs"]
mod tests;
