use super::*;

fn picture(coding_type: u8, temporal_ref: u16) -> Vec<u8> {
    let tr_hi = (temporal_ref >> 2) as u8;
    let tr_lo = ((temporal_ref & 0x3) as u8) << 6;
    vec![
        0x00,
        0x00,
        0x01,
        PICTURE_START,
        tr_hi,
        tr_lo | (coding_type << 3),
        0xFF,
        0xF8,
    ]
}

fn slice() -> Vec<u8> {
    vec![0x00, 0x00, 0x01, 0x01, 0x12, 0x34, 0x56]
}

#[test]
fn classifies_coding_types() {
    for (code, want) in [
        (1, PictureType::Intra),
        (2, PictureType::Predicted),
        (3, PictureType::Bidirectional),
        (4, PictureType::Intra),
        (0, PictureType::Unknown),
        (7, PictureType::Unknown),
    ] {
        let mut b = picture(code, 5);
        b.extend(slice());
        let p = classify_mpeg_picture(&b).unwrap();
        assert_eq!(p.picture_type, want, "coding type {code}");
        assert_eq!(p.temporal_reference, 5);
        assert_eq!(p.header_size, 8);
    }
}

#[test]
fn header_size_includes_leading_sequence_and_gop_headers() {
    let mut b = vec![0x00, 0x00, 0x01, SEQUENCE_HEADER, 0x14, 0x00, 0xF0, 0x13];
    b.extend([0x00, 0x00, 0x01, GOP_START, 0x00, 0x08, 0x00, 0x40]);
    b.extend(picture(1, 0));
    let slice_at = b.len();
    b.extend(slice());
    let p = classify_mpeg_picture(&b).unwrap();
    assert_eq!(p.picture_type, PictureType::Intra);
    assert_eq!(p.header_size, slice_at);
}

#[test]
fn picture_coding_extension_sets_structure() {
    let mut b = picture(1, 0);
    // extension id 8, picture_structure = 1 (top field)
    b.extend([0x00, 0x00, 0x01, EXTENSION_START, 0x8F, 0xFF, 0xF1, 0x80]);
    b.extend(slice());
    let p = classify_mpeg_picture(&b).unwrap();
    assert_eq!(p.structure, PictureStructure::TopField);
    assert!(!p.is_full_frame());

    let mut b = picture(1, 0);
    b.extend([0x00, 0x00, 0x01, EXTENSION_START, 0x8F, 0xFF, 0xF3, 0x80]);
    b.extend(slice());
    assert!(classify_mpeg_picture(&b).unwrap().is_full_frame());
}

#[test]
fn no_picture_and_truncated_header() {
    assert!(classify_mpeg_picture(&[0xFF, 0xD8, 0xFF, 0xE0]).is_none());
    assert!(classify_mpeg_picture(&[]).is_none());

    let p = classify_mpeg_picture(&[0x00, 0x00, 0x01, 0x00, 0x01]).unwrap();
    assert_eq!(p.picture_type, PictureType::Unknown);
    assert_eq!(p.header_size, 5);
}

#[test]
fn sequence_header_dimensions_and_codec() {
    // 320x240, frame rate code 3
    let mut b = vec![0x00, 0x00, 0x01, SEQUENCE_HEADER, 0x14, 0x00, 0xF0, 0x33];
    let s = parse_sequence_header(&b).unwrap();
    assert_eq!((s.width, s.height), (320, 240));
    assert_eq!(s.frame_rate_code, 3);
    assert_eq!(s.codec_name(), "mpeg1video");
    assert_eq!(frame_rate_for_code(s.frame_rate_code), Some(25.0));

    b.extend([0x00, 0x00, 0x01, EXTENSION_START, 0x14, 0x8A, 0x00, 0x01]);
    assert_eq!(parse_sequence_header(&b).unwrap().codec_name(), "mpeg2video");
}

#[test]
fn start_code_iteration() {
    let mut b = picture(2, 1);
    b.extend(slice());
    let codes: Vec<u8> = start_codes(&b, 0).map(|(_, c)| c).collect();
    assert_eq!(codes, vec![PICTURE_START, 0x01]);
    assert_eq!(next_start_code(&b, 1), Some(8));
    assert_eq!(next_start_code(&b, 100), None);
}
