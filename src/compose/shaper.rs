use std::borrow::Cow;

use crate::{
    assets::loader::CaptionFont,
    config::CaptionStyle,
    foundation::error::{ReelError, ReelResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// A glyph placed relative to the top-left of its caption block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedGlyph {
    /// Glyph id in the run's font.
    pub id: u32,
    /// Baseline x.
    pub x: f32,
    /// Baseline y.
    pub y: f32,
}

/// Glyphs sharing one font, size and color.
#[derive(Clone)]
pub struct GlyphRun {
    /// Font the glyph ids refer to.
    pub font: vello_cpu::peniko::FontData,
    /// Font size in pixels.
    pub font_size: f32,
    /// Straight-alpha RGBA fill.
    pub rgba: [u8; 4],
    /// Glyphs in visual order.
    pub glyphs: Vec<PositionedGlyph>,
}

impl std::fmt::Debug for GlyphRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphRun")
            .field("font_size", &self.font_size)
            .field("rgba", &self.rgba)
            .field("glyphs", &self.glyphs.len())
            .finish()
    }
}

/// Caption text that has been word-wrapped and laid out, ready to rasterize.
#[derive(Clone, Debug, Default)]
pub struct ShapedCaption {
    /// Block width (the wrap width); lines are centered within it.
    pub width: f32,
    /// Block height.
    pub height: f32,
    /// Glyph runs, positioned relative to the block origin.
    pub runs: Vec<GlyphRun>,
}

/// Turns caption text into positioned glyphs.
pub trait CaptionShaper {
    /// Lay out `text` (lines separated by `\n`) wrapped to `max_width` pixels, centered.
    fn shape(&mut self, text: &str, style: &CaptionStyle, max_width: f32)
    -> ReelResult<ShapedCaption>;
}

/// Shaper used when no caption font could be loaded; every caption fails with `reason`.
#[derive(Clone, Debug)]
pub struct UnavailableShaper {
    reason: String,
}

impl UnavailableShaper {
    /// Build a shaper that always fails with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl CaptionShaper for UnavailableShaper {
    fn shape(&mut self, _: &str, _: &CaptionStyle, _: f32) -> ReelResult<ShapedCaption> {
        Err(ReelError::caption_render(self.reason.clone()))
    }
}

/// Parley-backed shaper over a single caption font.
pub struct ParleyShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl ParleyShaper {
    /// Register `font` with a fresh Parley context.
    pub fn new(font: &CaptionFont) -> ReelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.to_vec()), None);
        let (family_id, face_index) = families
            .first()
            .map(|(id, faces)| (*id, faces.first().map(|f| f.index()).unwrap_or(0)))
            .ok_or_else(|| {
                ReelError::caption_render(format!(
                    "no font families registered from '{}'",
                    font.source.display()
                ))
            })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::caption_render("registered font family has no name"))?
            .to_string();

        let font_data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes.to_vec()),
            face_index,
        );
        tracing::debug!(
            family = %family_name,
            face_index,
            source = %font.source.display(),
            "caption font ready"
        );
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font: font_data,
        })
    }

    /// Family name resolved from the font data.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }
}

impl CaptionShaper for ParleyShaper {
    fn shape(
        &mut self,
        text: &str,
        style: &CaptionStyle,
        max_width: f32,
    ) -> ReelResult<ShapedCaption> {
        if text.trim().is_empty() {
            return Err(ReelError::caption_render("caption text is empty"));
        }
        if !max_width.is_finite() || max_width <= 0.0 {
            return Err(ReelError::caption_render("caption wrap width must be > 0"));
        }

        let [r, g, b, a] = style.text_rgba;
        let brush = TextBrushRgba8 { r, g, b, a };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.font_size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(Some(max_width));
        layout.align(
            Some(max_width),
            parley::Alignment::Center,
            parley::AlignmentOptions::default(),
        );

        let mut runs = Vec::new();
        let mut total = 0usize;
        let mut missing = 0usize;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                let glyphs: Vec<PositionedGlyph> = run
                    .positioned_glyphs()
                    .map(|g| PositionedGlyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    })
                    .collect();
                total += glyphs.len();
                missing += glyphs.iter().filter(|g| g.id == 0).count();
                runs.push(GlyphRun {
                    font: self.font.clone(),
                    font_size: run.run().font_size(),
                    rgba: [brush.r, brush.g, brush.b, brush.a],
                    glyphs,
                });
            }
        }

        if total == 0 {
            return Err(ReelError::caption_render("caption produced no glyphs"));
        }
        if missing == total {
            return Err(ReelError::caption_render(format!(
                "font '{}' has no glyphs for caption text",
                self.family_name
            )));
        }

        Ok(ShapedCaption {
            width: max_width,
            height: layout.height(),
            runs,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/shaper.rs"]
mod tests;
