use super::*;
use crate::compose::shaper::ShapedCaption;

fn clip(layers: Vec<Layer>) -> SlideClip {
    SlideClip {
        index: 0,
        duration_secs: 1.0,
        width: 16,
        height: 8,
        layers,
    }
}

#[test]
fn opaque_image_is_copied_through() {
    let img = PreparedImage::solid(16, 8, [200, 100, 50]);
    let frame = ClipRasterizer::new()
        .rasterize(&clip(vec![Layer::Image(img)]))
        .unwrap();
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 16 * 8 * 4);
    assert_eq!(frame.pixel(0, 0), Some([200, 100, 50, 255]));
    assert_eq!(frame.pixel(15, 7), Some([200, 100, 50, 255]));
    assert_eq!(frame.pixel(16, 0), None);
}

#[test]
fn band_darkens_only_its_rect() {
    let img = PreparedImage::solid(16, 8, [200, 200, 200]);
    let band = Layer::Band {
        rect: Rect::new(0.0, 4.0, 16.0, 8.0),
        rgb: [0, 0, 0],
        opacity: 0.5,
    };
    let frame = ClipRasterizer::new()
        .rasterize(&clip(vec![Layer::Image(img), band]))
        .unwrap();

    assert_eq!(frame.pixel(8, 1), Some([200, 200, 200, 255]));
    let [r, g, b, a] = frame.pixel(8, 6).unwrap();
    assert_eq!(a, 255);
    assert!((95..=105).contains(&r), "band pixel red = {r}");
    assert_eq!(r, g);
    assert_eq!(g, b);
}

#[test]
fn empty_caption_paints_nothing() {
    let img = PreparedImage::solid(16, 8, [10, 20, 30]);
    let caption = Layer::Caption {
        caption: Arc::new(ShapedCaption::default()),
        origin: Point::new(2.0, 2.0),
    };
    let frame = ClipRasterizer::new()
        .rasterize(&clip(vec![Layer::Image(img), caption]))
        .unwrap();
    assert!(frame.data.chunks_exact(4).all(|p| p == [10, 20, 30, 255]));
}

#[test]
fn context_is_reused_across_sizes() {
    let mut r = ClipRasterizer::new();
    let a = r
        .rasterize(&clip(vec![Layer::Image(PreparedImage::solid(16, 8, [1, 1, 1]))]))
        .unwrap();
    let mut other = clip(vec![Layer::Image(PreparedImage::solid(4, 4, [2, 2, 2]))]);
    other.width = 4;
    other.height = 4;
    let b = r.rasterize(&other).unwrap();
    assert_eq!(a.data.len(), 16 * 8 * 4);
    assert_eq!(b.data.len(), 4 * 4 * 4);
    assert_eq!(b.pixel(3, 3), Some([2, 2, 2, 255]));
}
