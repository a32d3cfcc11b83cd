use std::io::Cursor;

use super::*;

fn encode(format: image::ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_fn(8, 6, |x, y| image::Rgb([x as u8 * 30, y as u8 * 40, 90]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

#[test]
fn encoded_jpeg_is_recognized_and_complete() {
    let jpg = encode(image::ImageFormat::Jpeg);
    let v = sniff_jpeg(&jpg);
    assert!(v.matches);
    let seg_len = u16::from_be_bytes([jpg[4], jpg[5]]) as usize;
    assert_eq!(v.header_size, 4 + seg_len);
    assert!(jpeg_is_complete(&jpg));
    assert!(!jpeg_is_complete(&jpg[..jpg.len() - 1]));
    assert!(!sniff_png(&jpg).matches);
}

#[test]
fn encoded_png_is_recognized_and_complete() {
    let png = encode(image::ImageFormat::Png);
    let v = sniff_png(&png);
    assert!(v.matches);
    assert_eq!(v.header_size, 33);
    assert_eq!(png_dimensions(&png), Some((8, 6)));
    assert!(png_is_complete(&png));
    assert!(!png_is_complete(&png[..png.len() - 12]));
    assert!(!sniff_jpeg(&png).matches);
}

#[test]
fn jpeg_rejects_bad_first_marker() {
    // SOI followed directly by EOI
    assert!(!sniff_jpeg(&[0xFF, 0xD8, 0xFF, 0xD9, 0x00, 0x10, 0, 0]).matches);
    // segment length shorter than its own length field
    assert!(!sniff_jpeg(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x01, 0, 0]).matches);
    // segment runs past the buffer
    assert!(!sniff_jpeg(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x40, 0, 0]).matches);
    assert!(!sniff_jpeg(&[0xFF, 0xD8]).matches);
}

#[test]
fn png_rejects_wrong_first_chunk() {
    let mut png = encode(image::ImageFormat::Png);
    png[12..16].copy_from_slice(b"IDAT");
    assert_eq!(sniff_png(&png), SniffVerdict::default());

    let mut png = encode(image::ImageFormat::Png);
    png[16..20].copy_from_slice(&[0, 0, 0, 0]);
    assert!(!sniff_png(&png).matches);
}

#[test]
fn mpeg_bytes_match_neither_still_format() {
    let b = [0x00, 0x00, 0x01, 0xB3, 0x14, 0x00, 0xF0, 0x33, 0, 0, 0, 0];
    assert!(!sniff_jpeg(&b).matches);
    assert!(!sniff_png(&b).matches);
}
