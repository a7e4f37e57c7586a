//! Slideshow configuration.
//!
//! Every tunable that shapes pacing, canvas preparation, caption styling and encoding lives here
//! and is passed explicitly into the allocator, composer and renderer. All sections have
//! defaults matching the stock "graduation slideshow" look, so an empty JSON object is a valid
//! configuration.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Root configuration object.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlideshowConfig {
    /// Slide timing policy.
    pub pacing: PacingConfig,
    /// Output canvas and photo fitting.
    pub canvas: CanvasConfig,
    /// Caption band and text styling.
    pub caption: CaptionStyle,
    /// Audio bed handling.
    pub audio: AudioConfig,
    /// Pass-through encoder parameters.
    pub encode: EncodeSettings,
    /// Slide-level render parallelism.
    pub render: RenderThreading,
}

impl SlideshowConfig {
    /// Load a configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json_str(text: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| ReelError::serde(format!("config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> ReelResult<()> {
        self.pacing.validate()?;
        self.canvas.canvas().validate()?;
        self.caption.validate()?;
        self.encode.validate()?;
        if self.render.chunk_size == 0 {
            return Err(ReelError::invalid_input("render chunk_size must be >= 1"));
        }
        if let Some(0) = self.render.threads {
            return Err(ReelError::invalid_input(
                "render threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// Fixed opening/closing allowances and the floor used when middle slides run out of time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PacingConfig {
    /// Duration pinned to the first slide.
    pub opening_secs: f64,
    /// Duration pinned to the last slide.
    pub closing_secs: f64,
    /// Total budget used when there is no audio bed.
    pub default_total_secs: f64,
    /// Positive floor applied to middle slides when the residual is zero or negative.
    pub min_slide_secs: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            opening_secs: 10.0,
            closing_secs: 15.0,
            default_total_secs: 180.0,
            min_slide_secs: 1.0,
        }
    }
}

impl PacingConfig {
    /// Reject non-finite values, a non-positive floor and non-positive fixed allowances.
    pub fn validate(&self) -> ReelResult<()> {
        for (name, v) in [
            ("opening_secs", self.opening_secs),
            ("closing_secs", self.closing_secs),
            ("default_total_secs", self.default_total_secs),
            ("min_slide_secs", self.min_slide_secs),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(ReelError::invalid_input(format!(
                    "pacing.{name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}

/// How a photo is scaled before letterboxing onto the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// Scale so the photo height matches the canvas height; wider photos are center-cropped.
    Height,
    /// Scale so the whole photo fits inside the canvas (longest edge touches the border).
    #[default]
    LongestEdge,
}

/// Output canvas size and fit-to-canvas policy.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Canvas width in pixels (even).
    pub width: u32,
    /// Canvas height in pixels (even).
    pub height: u32,
    /// Scaling policy.
    pub fit: FitMode,
    /// Letterbox padding color.
    pub fill_rgb: [u8; 3],
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fit: FitMode::LongestEdge,
            fill_rgb: [0, 0, 0],
        }
    }
}

impl CanvasConfig {
    /// Canvas dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

/// Caption band and text styling.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionStyle {
    /// Height of the dark band anchored to the bottom edge.
    pub band_height_px: u32,
    /// Band color.
    pub band_rgb: [u8; 3],
    /// Band opacity in `[0, 1]`.
    pub band_opacity: f32,
    /// Caption font size.
    pub font_size_px: f32,
    /// Caption text color (straight alpha).
    pub text_rgba: [u8; 4],
    /// Horizontal margin on each side; text wraps at `width - 2 * margin`.
    pub horizontal_margin_px: u32,
    /// Font file used for captions. When unset the loader looks in `<input>/fonts`.
    pub font_path: Option<PathBuf>,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            band_height_px: 100,
            band_rgb: [0, 0, 0],
            band_opacity: 0.7,
            font_size_px: 24.0,
            text_rgba: [255, 255, 255, 255],
            horizontal_margin_px: 100,
            font_path: None,
        }
    }
}

impl CaptionStyle {
    /// Reject non-finite sizes and out-of-range opacity.
    pub fn validate(&self) -> ReelResult<()> {
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ReelError::invalid_input(
                "caption.font_size_px must be finite and > 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.band_opacity) {
            return Err(ReelError::invalid_input(
                "caption.band_opacity must be within [0, 1]",
            ));
        }
        Ok(())
    }

    /// Wrap width for caption text on an image `image_width` pixels wide.
    pub fn wrap_width(&self, image_width: u32) -> f32 {
        let margins = self.horizontal_margin_px.saturating_mul(2);
        image_width.saturating_sub(margins).max(1) as f32
    }
}

/// Audio bed handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    /// Repeat the track when it is shorter than the video. When `false` the track plays once and
    /// the rest of the video is silent.
    pub loop_to_fit: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { loop_to_fit: true }
    }
}

/// Encoder parameters. None of these are computed; they are handed to `ffmpeg` as-is.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeSettings {
    /// Output frame rate.
    pub fps: u32,
    /// `-c:v` value.
    pub video_codec: String,
    /// `-c:a` value.
    pub audio_codec: String,
    /// `-b:v` value.
    pub bitrate: String,
    /// `-preset` value.
    pub preset: String,
    /// `-threads` value.
    pub threads: u32,
    /// `-f` container format.
    pub container: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            fps: 10,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            bitrate: "800k".to_string(),
            preset: "ultrafast".to_string(),
            threads: 4,
            container: "mp4".to_string(),
        }
    }
}

impl EncodeSettings {
    /// Output frame rate as [`Fps`].
    pub fn fps(&self) -> ReelResult<Fps> {
        Fps::new(self.fps)
    }

    /// Reject zero fps and empty codec/container names.
    pub fn validate(&self) -> ReelResult<()> {
        self.fps()?;
        for (name, v) in [
            ("video_codec", &self.video_codec),
            ("audio_codec", &self.audio_codec),
            ("container", &self.container),
        ] {
            if v.trim().is_empty() {
                return Err(ReelError::invalid_input(format!(
                    "encode.{name} must be non-empty"
                )));
            }
        }
        Ok(())
    }
}

/// Slide-level parallelism for the raster step.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderThreading {
    /// Rasterize slides on a rayon pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
    /// Slides rasterized per batch; bounds how many full-canvas frames are held at once.
    pub chunk_size: usize,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
            chunk_size: 8,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
