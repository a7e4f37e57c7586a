use std::io::Cursor;

use super::*;

fn encode_png(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let prepared = decode_image(&encode_png(img)).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_oriented_keeps_untagged_dimensions() {
    let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([1, 2, 3, 255]));
    let decoded = decode_oriented(&encode_png(img)).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (4, 2));
}

#[test]
fn garbage_bytes_fail() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn solid_is_opaque() {
    let img = PreparedImage::solid(2, 2, [9, 8, 7]);
    assert_eq!(img.rgba8_premul.len(), 16);
    assert!(img.rgba8_premul.chunks_exact(4).all(|px| px == [9, 8, 7, 255]));
}
