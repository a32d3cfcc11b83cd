use super::*;
use crate::bitstream::mpeg::{PictureType, classify_mpeg_picture};

const SEQ: [u8; 12] = [
    0x00, 0x00, 0x01, 0xB3, 0x01, 0x00, 0x10, 0x13, 0xFF, 0xFF, 0xE0, 0x18,
];
const GOP: [u8; 8] = [0x00, 0x00, 0x01, 0xB8, 0x00, 0x08, 0x00, 0x40];

fn picture(coding_type: u8, temporal_ref: u16, payload: u8) -> Vec<u8> {
    let mut b = vec![
        0x00,
        0x00,
        0x01,
        0x00,
        (temporal_ref >> 2) as u8,
        (((temporal_ref & 3) as u8) << 6) | (coding_type << 3),
        0xFF,
        0xF8,
    ];
    b.extend([0x00, 0x00, 0x01, 0x01, payload, payload, payload]);
    b
}

/// I(0) P(2) B(1) in coded order, then a second GOP with I(0), then an end code.
fn stream() -> Vec<u8> {
    let mut b = Vec::new();
    b.extend(SEQ);
    b.extend(GOP);
    b.extend(picture(1, 0, 0x11));
    b.extend(picture(2, 2, 0x22));
    b.extend(picture(3, 1, 0x33));
    b.extend(GOP);
    b.extend(picture(1, 0, 0x44));
    b.extend([0x00, 0x00, 0x01, 0xB7]);
    b
}

#[test]
fn indexes_pictures_in_display_order() {
    let mut src = ElementaryStreamSource::from_bytes("clip.m2v", stream()).unwrap();
    assert_eq!((src.width(), src.height()), (16, 16));
    assert_eq!(src.codec_name(), Some("mpeg1video"));
    assert_eq!(src.frame_count(), 4);
    assert!(src.supports_chunk_read());

    let types: Vec<PictureType> = (1..=4)
        .map(|n| {
            let chunk = src.read_chunk(n, 1 << 20).unwrap();
            classify_mpeg_picture(&chunk).unwrap().picture_type
        })
        .collect();
    assert_eq!(
        types,
        vec![
            PictureType::Intra,
            PictureType::Bidirectional,
            PictureType::Predicted,
            PictureType::Intra
        ]
    );
}

/// Picture whose slice payload encodes `tag` without zero bytes.
fn tagged(coding_type: u8, temporal_ref: u16, tag: u16) -> Vec<u8> {
    let mut b = picture(coding_type, temporal_ref, 0x5A);
    b.truncate(b.len() - 3);
    b.extend([0x80 | (tag >> 7) as u8, 0x80 | (tag & 0x7F) as u8, 0x5A]);
    b
}

fn tag_of(chunk: &[u8]) -> u16 {
    let n = chunk.len();
    (u16::from(chunk[n - 3] & 0x7F) << 7) | u16::from(chunk[n - 2] & 0x7F)
}

#[test]
fn temporal_reference_wrap_without_gop_headers_keeps_order() {
    let mut b = SEQ.to_vec();
    for n in 0..1030u16 {
        b.extend(tagged(1, n % 1024, n));
    }
    let mut src = ElementaryStreamSource::from_bytes("long.m2v", b).unwrap();
    assert_eq!(src.frame_count(), 1030);
    for n in [1, 2, 1024, 1025, 1030] {
        let chunk = src.read_chunk(n, 1 << 20).unwrap();
        assert_eq!(tag_of(&chunk), (n - 1) as u16, "frame {n}");
    }
}

#[test]
fn b_pictures_after_a_wrapping_anchor_stay_in_the_old_group() {
    // coded: I0 P1..P1021, then P0 of the next cycle, then B1022 B1023
    let mut b = SEQ.to_vec();
    b.extend(tagged(1, 0, 0));
    for t in 1..=1021u16 {
        b.extend(tagged(2, t, t));
    }
    b.extend(tagged(2, 0, 1024));
    b.extend(tagged(3, 1022, 1022));
    b.extend(tagged(3, 1023, 1023));

    let mut src = ElementaryStreamSource::from_bytes("long.m2v", b).unwrap();
    assert_eq!(src.frame_count(), 1025);
    let tags: Vec<u16> = (1021..=1025)
        .map(|n| tag_of(&src.read_chunk(n, 1 << 20).unwrap()))
        .collect();
    assert_eq!(tags, vec![1020, 1021, 1022, 1023, 1024]);
}

#[test]
fn leading_headers_belong_to_the_next_picture() {
    let mut src = ElementaryStreamSource::from_bytes("clip.m2v", stream()).unwrap();
    let first = src.read_chunk(1, 1 << 20).unwrap();
    assert!(first.starts_with(&SEQ));
    assert_eq!(first.len(), SEQ.len() + GOP.len() + 15);

    let last = src.read_chunk(4, 1 << 20).unwrap();
    assert!(last.starts_with(&GOP));
    assert!(!last.ends_with(&[0x00, 0x00, 0x01, 0xB7]));
    assert_eq!(last.len(), GOP.len() + 15);
}

#[test]
fn oversized_and_out_of_range_reads_fail() {
    let mut src = ElementaryStreamSource::from_bytes("clip.m2v", stream()).unwrap();
    match src.read_chunk(2, 4) {
        Err(StorycutError::ChunkOverflow { size, max }) => {
            assert_eq!((size, max), (15, 4));
        }
        other => panic!("expected overflow, got {other:?}"),
    }
    assert!(src.read_chunk(0, 1 << 20).is_err());
    assert!(src.read_chunk(5, 1 << 20).is_err());
}

#[test]
fn rejects_streams_without_sequence_header_or_pictures() {
    assert!(ElementaryStreamSource::from_bytes("x", picture(1, 0, 1)).is_err());
    assert!(ElementaryStreamSource::from_bytes("x", SEQ.to_vec()).is_err());
}

#[test]
fn open_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.m2v");
    std::fs::write(&path, stream()).unwrap();
    let src = ElementaryStreamSource::open(&path).unwrap();
    assert_eq!(src.path(), path.as_path());
    assert_eq!(src.sequence_header().frame_rate_code, 3);
    assert!(ElementaryStreamSource::open(&dir.path().join("missing.m2v")).is_err());
}
