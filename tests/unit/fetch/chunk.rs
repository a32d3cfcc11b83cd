use super::*;
use crate::foundation::error::StorycutResult;

struct Scripted {
    chunk: Vec<u8>,
    fail: bool,
}

impl VideoSource for Scripted {
    fn width(&self) -> u32 {
        1
    }
    fn height(&self) -> u32 {
        1
    }
    fn codec_name(&self) -> Option<&str> {
        Some("mpeg1video")
    }
    fn frame_count(&self) -> u64 {
        1
    }
    fn supports_chunk_read(&self) -> bool {
        true
    }
    fn read_chunk(&mut self, _source_frame: u64, max_bytes: usize) -> StorycutResult<Vec<u8>> {
        if self.fail {
            return Err(StorycutError::decode("corrupt stream"));
        }
        if self.chunk.len() > max_bytes {
            return Err(StorycutError::ChunkOverflow {
                size: self.chunk.len(),
                max: max_bytes,
            });
        }
        Ok(self.chunk.clone())
    }
}

#[test]
fn video_chunk_overflow_and_failure_are_rejections() {
    let mut src = Scripted {
        chunk: vec![7; 10],
        fail: false,
    };
    assert_eq!(read_video_chunk(&mut src, 1, 10).unwrap().len(), 10);
    assert_eq!(
        read_video_chunk(&mut src, 1, 9),
        Err(Rejection::Overflow { size: 10, max: 9 })
    );

    let mut broken = Scripted {
        chunk: Vec::new(),
        fail: true,
    };
    assert!(matches!(
        read_video_chunk(&mut broken, 1, 10),
        Err(Rejection::ReadFailed(_))
    ));
}

#[test]
fn image_chunk_reads_whole_file_within_bound() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f.png");
    std::fs::write(&path, [1u8, 2, 3, 4]).unwrap();

    assert_eq!(
        read_image_chunk(&path, 4, CheckFlags::PNG).unwrap(),
        vec![1, 2, 3, 4]
    );
    assert_eq!(
        read_image_chunk(&path, 3, CheckFlags::NONE),
        Err(Rejection::Overflow { size: 4, max: 3 })
    );
    assert!(matches!(
        read_image_chunk(&dir.path().join("missing.png"), 4, CheckFlags::NONE),
        Err(Rejection::ReadFailed(_))
    ));
}

#[test]
fn image_chunk_never_satisfies_mpeg_integrity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f.jpg");
    std::fs::write(&path, [0xFF, 0xD8]).unwrap();
    assert_eq!(
        read_image_chunk(&path, 1024, CheckFlags::MPEG_INTEGRITY | CheckFlags::JPG),
        Err(Rejection::ImageWithoutReferences)
    );
}
