use super::*;

#[test]
fn probed_sources_never_pass_chunks_through() {
    let mut src = ProbedVideoSource::new(ProbedVideo {
        source_path: PathBuf::from("clip.mp4"),
        width: 8,
        height: 4,
        codec_name: Some("h264".to_string()),
        fps_num: 25,
        fps_den: 1,
        frame_count: Some(10),
    });
    assert!(!src.supports_chunk_read());
    assert_eq!(src.codec_name(), Some("h264"));
    assert_eq!(src.frame_count(), 10);
    assert_eq!(src.path(), &PathBuf::from("clip.mp4"));
    assert!(src.read_chunk(1, 1024).is_err());
}

#[test]
fn opener_prefers_elementary_streams() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.m2v");
    let mut b = vec![
        0x00, 0x00, 0x01, 0xB3, 0x01, 0x00, 0x10, 0x13, 0x00, 0x00, 0x01, 0x00, 0x00, 0x08,
        0xFF, 0xF8,
    ];
    b.extend([0x00, 0x00, 0x01, 0x01, 0x42]);
    std::fs::write(&path, b).unwrap();

    let src = FileVideoOpener.open(&path).unwrap();
    assert!(src.supports_chunk_read());
    assert_eq!(src.frame_count(), 1);
}

#[cfg(not(feature = "media-ffmpeg"))]
#[test]
fn opener_fails_for_other_files_without_ffmpeg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.mp4");
    std::fs::write(&path, b"not mpeg").unwrap();
    assert!(FileVideoOpener.open(&path).is_err());
}
