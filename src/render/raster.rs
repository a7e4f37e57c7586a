//! CPU rasterization of composed clips.
//!
//! Every clip is a still: its layers are painted once into a premultiplied RGBA8 frame which the
//! pipeline then repeats across the clip's frame span.

use std::sync::Arc;

use crate::{
    assets::decode::PreparedImage,
    compose::composer::{Layer, SlideClip},
    compose::shaper::ShapedCaption,
    foundation::core::{Point, Rect},
    foundation::error::{ReelError, ReelResult},
};

/// A rendered frame.
///
/// Frames are premultiplied RGBA8; the flag makes that explicit at sink boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data
            .get(i..i + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Paints clips with `vello_cpu`, reusing one render context across clips of equal size.
#[derive(Default)]
pub struct ClipRasterizer {
    ctx: Option<vello_cpu::RenderContext>,
}

impl ClipRasterizer {
    /// Create a rasterizer; the render context is allocated on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint every layer of `clip` back to front.
    pub fn rasterize(&mut self, clip: &SlideClip) -> ReelResult<FrameRGBA> {
        let w: u16 = clip
            .width
            .try_into()
            .map_err(|_| ReelError::invalid_input("clip width exceeds u16"))?;
        let h: u16 = clip
            .height
            .try_into()
            .map_err(|_| ReelError::invalid_input("clip height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(ReelError::invalid_input("clip width/height must be non-zero"));
        }

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        for layer in &clip.layers {
            match layer {
                Layer::Image(img) => draw_image(&mut ctx, img)?,
                Layer::Band { rect, rgb, opacity } => draw_band(&mut ctx, *rect, *rgb, *opacity),
                Layer::Caption { caption, origin } => draw_caption(&mut ctx, caption, *origin),
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(FrameRGBA {
            width: clip.width,
            height: clip.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn draw_image(ctx: &mut vello_cpu::RenderContext, img: &PreparedImage) -> ReelResult<()> {
    let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    });
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(img.width),
        f64::from(img.height),
    ));
    Ok(())
}

fn draw_band(ctx: &mut vello_cpu::RenderContext, rect: Rect, rgb: [u8; 3], opacity: f32) {
    if opacity <= 0.0 || rect.is_zero_area() {
        return;
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(rgb[0], rgb[1], rgb[2], 255));
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        rect.x0, rect.y0, rect.x1, rect.y1,
    ));
    if opacity < 1.0 {
        ctx.pop_layer();
    }
}

fn draw_caption(ctx: &mut vello_cpu::RenderContext, caption: &ShapedCaption, origin: Point) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
    for run in &caption.runs {
        let [r, g, b, a] = run.rgba;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
            id: g.id,
            x: g.x,
            y: g.y,
        });
        ctx.glyph_run(&run.font)
            .font_size(run.font_size)
            .fill_glyphs(glyphs);
    }
}

fn pixmap_from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> ReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::invalid_input("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::invalid_input("image height exceeds u16"))?;
    if bytes.len() != (width as usize) * (height as usize) * 4 {
        return Err(ReelError::invalid_input("image byte length mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
