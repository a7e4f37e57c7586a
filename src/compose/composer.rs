use std::sync::Arc;

use crate::{
    assets::decode::PreparedImage,
    compose::{
        shaper::{CaptionShaper, ShapedCaption},
        slide::Slide,
    },
    config::CaptionStyle,
    foundation::core::{Point, Rect},
    foundation::error::{ReelError, ReelResult},
    report::QualityWarning,
};

/// One drawable element of a clip, painted back to front.
#[derive(Clone, Debug)]
pub enum Layer {
    /// The canvas-fitted photo, drawn at the origin.
    Image(PreparedImage),
    /// Solid translucent rectangle behind the caption.
    Band {
        /// Area covered, in canvas pixels.
        rect: Rect,
        /// Band color.
        rgb: [u8; 3],
        /// Band opacity in `[0, 1]`.
        opacity: f32,
    },
    /// Laid-out caption text.
    Caption {
        /// Shaped glyphs.
        caption: Arc<ShapedCaption>,
        /// Top-left of the caption block in canvas pixels.
        origin: Point,
    },
}

/// A timed visual clip: layers held for the full slide duration.
#[derive(Clone, Debug)]
pub struct SlideClip {
    /// Index of the source slide.
    pub index: usize,
    /// Clip duration in seconds.
    pub duration_secs: f64,
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Layers in paint order; always starts with [`Layer::Image`].
    pub layers: Vec<Layer>,
}

impl SlideClip {
    /// Clip showing only the photo.
    pub fn plain(slide: &Slide) -> Self {
        Self {
            index: slide.index,
            duration_secs: slide.duration_secs,
            width: slide.image.width,
            height: slide.image.height,
            layers: vec![Layer::Image(slide.image.clone())],
        }
    }

    /// `true` when the clip carries a caption overlay.
    pub fn has_caption(&self) -> bool {
        self.layers
            .iter()
            .any(|l| matches!(l, Layer::Caption { .. }))
    }
}

/// Result of composing one slide.
#[derive(Clone, Debug)]
pub struct Composed {
    /// The clip to render.
    pub clip: SlideClip,
    /// Set when the caption had to be dropped.
    pub warning: Option<QualityWarning>,
}

/// Turns slides into clips using one caption style and shaper.
pub struct SlideComposer<'a> {
    style: &'a CaptionStyle,
    shaper: &'a mut dyn CaptionShaper,
}

impl<'a> SlideComposer<'a> {
    /// Build a composer over `style` and `shaper`.
    pub fn new(style: &'a CaptionStyle, shaper: &'a mut dyn CaptionShaper) -> Self {
        Self { style, shaper }
    }

    /// Compose one slide. Caption failures never escape: the slide falls back to the plain photo
    /// and the returned [`Composed::warning`] says why.
    pub fn compose(&mut self, slide: &Slide) -> Composed {
        if slide.captions.is_empty() {
            return Composed {
                clip: SlideClip::plain(slide),
                warning: None,
            };
        }

        match self.captioned_layers(slide) {
            Ok(extra) => {
                let mut clip = SlideClip::plain(slide);
                clip.layers.extend(extra);
                Composed {
                    clip,
                    warning: None,
                }
            }
            Err(e) => {
                let warning = QualityWarning::CaptionDropped {
                    slide_index: slide.index,
                    reason: e.to_string(),
                };
                warning.log();
                Composed {
                    clip: SlideClip::plain(slide),
                    warning: Some(warning),
                }
            }
        }
    }

    /// Compose all slides in order, collecting warnings.
    pub fn compose_all(&mut self, slides: &[Slide]) -> (Vec<SlideClip>, Vec<QualityWarning>) {
        let mut clips = Vec::with_capacity(slides.len());
        let mut warnings = Vec::new();
        for slide in slides {
            let out = self.compose(slide);
            clips.push(out.clip);
            warnings.extend(out.warning);
        }
        (clips, warnings)
    }

    fn captioned_layers(&mut self, slide: &Slide) -> ReelResult<[Layer; 2]> {
        let w = slide.image.width;
        let h = slide.image.height;
        if w == 0 || h == 0 {
            return Err(ReelError::caption_render("slide image is empty"));
        }

        let text = slide.captions.join("\n");
        let wrap = self.style.wrap_width(w);
        let caption = self.shaper.shape(&text, self.style, wrap)?;

        let band_h = f64::from(self.style.band_height_px.min(h));
        let band = Layer::Band {
            rect: Rect::new(0.0, f64::from(h) - band_h, f64::from(w), f64::from(h)),
            rgb: self.style.band_rgb,
            opacity: self.style.band_opacity,
        };

        let x = (f64::from(w) - f64::from(caption.width)) / 2.0;
        let y = (f64::from(h) - f64::from(caption.height)).max(0.0);
        let text = Layer::Caption {
            caption: Arc::new(caption),
            origin: Point::new(x, y),
        };
        Ok([band, text])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/composer.rs"]
mod tests;
