use super::*;

fn fitter(width: u32, height: u32, fit: FitMode) -> FitToCanvas {
    FitToCanvas::new(&CanvasConfig {
        width,
        height,
        fit,
        fill_rgb: [0, 0, 255],
    })
    .unwrap()
}

#[test]
fn longest_edge_contains_photo() {
    let f = fitter(1280, 720, FitMode::LongestEdge);
    assert_eq!(f.scaled_size(4000, 3000), (960, 720));
    assert_eq!(f.scaled_size(3000, 1000), (1280, 427));
    assert_eq!(f.scaled_size(640, 360), (1280, 720));
}

#[test]
fn height_mode_matches_canvas_height() {
    let f = fitter(1280, 720, FitMode::Height);
    assert_eq!(f.scaled_size(4000, 3000), (960, 720));
    assert_eq!(f.scaled_size(3000, 1000), (2160, 720));
}

#[test]
fn portrait_photo_is_pillarboxed_with_fill() {
    let f = fitter(8, 4, FitMode::LongestEdge);
    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        2,
        4,
        image::Rgba([255, 0, 0, 255]),
    ));
    let out = f.fit(&img);
    assert_eq!(out.dimensions(), (8, 4));
    assert_eq!(out.get_pixel(0, 0).0, [0, 0, 255, 255]);
    assert_eq!(out.get_pixel(7, 3).0, [0, 0, 255, 255]);
    assert_eq!(out.get_pixel(3, 2).0[0], 255);
    assert_eq!(out.get_pixel(4, 1).0[0], 255);
}

#[test]
fn height_mode_crops_wide_photo_without_padding() {
    let f = fitter(4, 2, FitMode::Height);
    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        16,
        2,
        image::Rgba([0, 255, 0, 255]),
    ));
    let out = f.fit(&img);
    assert!(out.pixels().all(|p| p.0 == [0, 255, 0, 255]));
}

#[test]
fn odd_canvas_is_rejected() {
    assert!(
        FitToCanvas::new(&CanvasConfig {
            width: 7,
            ..CanvasConfig::default()
        })
        .is_err()
    );
}
