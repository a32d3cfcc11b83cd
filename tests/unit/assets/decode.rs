use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn dimensions_come_from_the_header() {
    let png = png_bytes(5, 3, [1, 2, 3, 255]);
    assert_eq!(image_dimensions(&png).unwrap(), (5, 3));
}

#[test]
fn decode_drops_alpha() {
    let png = png_bytes(2, 1, [100, 50, 200, 128]);
    let img = decode_image_rgb8(&png).unwrap();
    assert_eq!((img.width, img.height), (2, 1));
    assert_eq!(img.rgb8, vec![100, 50, 200, 100, 50, 200]);
}

#[test]
fn garbage_is_an_error() {
    assert!(image_dimensions(b"not an image").is_err());
    assert!(decode_image_rgb8(&[0xFF, 0xD8, 0xFF]).is_err());
}
