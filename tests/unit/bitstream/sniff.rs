use super::*;
use crate::bitstream::mpeg::PictureType;

#[test]
fn mpeg_chunk_reports_picture_header_size() {
    let b = [
        0x00, 0x00, 0x01, 0x00, 0x00, 0x10, 0xFF, 0xF8, 0x00, 0x00, 0x01, 0x01, 0x22,
    ];
    let s = FrameSniff::of(&b);
    assert_eq!(s.mpeg.unwrap().picture_type, PictureType::Predicted);
    assert!(!s.jpeg.matches && !s.png.matches);
    assert_eq!(s.header_size(), 8);
}

#[test]
fn jpeg_signature_hides_start_code_lookalikes() {
    let mut b = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00];
    b.extend([0x00, 0x00, 0x01, 0x00, 0x00, 0x08, 0xFF, 0xD9]);
    let s = FrameSniff::of(&b);
    assert!(s.jpeg.matches);
    assert!(s.mpeg.is_none());
    assert_eq!(s.header_size(), 8);
}

#[test]
fn garbage_matches_nothing() {
    let s = FrameSniff::of(&[1, 2, 3, 4, 5, 6, 7, 8]);
    assert!(s.mpeg.is_none() && !s.jpeg.matches && !s.png.matches);
    assert_eq!(s.header_size(), 0);
}
