use std::{
    collections::HashSet,
    ops::Range,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    assets::video::VideoSource,
    bitstream::mpeg::{
        GOP_START, PICTURE_START, PictureType, SEQUENCE_END, SEQUENCE_HEADER, SequenceHeader,
        parse_sequence_header, start_codes,
    },
    foundation::error::{StorycutError, StorycutResult},
};

#[derive(Clone, Debug, PartialEq, Eq)]
struct PictureChunk {
    range: Range<usize>,
    gop: usize,
    temporal_reference: u16,
}

/// MPEG-1/MPEG-2 video elementary stream (`.m1v`, `.m2v`, `.mpv`) held in
/// memory and split into one chunk per picture.
///
/// Sequence and GOP headers preceding a picture belong to that picture's
/// chunk. Frames are numbered in display order: by GOP, then by temporal
/// reference. Streams without GOP headers are split into groups where the
/// temporal reference wraps.
#[derive(Debug)]
pub struct ElementaryStreamSource {
    path: PathBuf,
    bytes: Vec<u8>,
    sequence: SequenceHeader,
    frames: Vec<Range<usize>>,
}

impl ElementaryStreamSource {
    /// Read and index the stream at `path`.
    pub fn open(path: &Path) -> StorycutResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read elementary stream '{}'", path.display()))?;
        Self::from_bytes(path, bytes)
    }

    /// Index an in-memory stream; `path` is kept for decoding and messages.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> StorycutResult<Self> {
        let path = path.into();
        let sequence = parse_sequence_header(&bytes).ok_or_else(|| {
            StorycutError::decode(format!(
                "'{}' has no MPEG sequence header",
                path.display()
            ))
        })?;

        let mut pictures = index_pictures(&bytes);
        if pictures.is_empty() {
            return Err(StorycutError::decode(format!(
                "'{}' contains no pictures",
                path.display()
            )));
        }
        pictures.sort_by_key(|p| (p.gop, p.temporal_reference));

        Ok(Self {
            path,
            bytes,
            sequence,
            frames: pictures.into_iter().map(|p| p.range).collect(),
        })
    }

    /// Indexed stream path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parsed sequence header.
    pub fn sequence_header(&self) -> SequenceHeader {
        self.sequence
    }
}

fn index_pictures(bytes: &[u8]) -> Vec<PictureChunk> {
    let mut out = Vec::new();
    // (chunk start, gop index, temporal reference)
    let mut current: Option<(usize, usize, u16)> = None;
    let mut pending: Option<usize> = None;
    let mut gop = 0usize;
    // temporal references taken in the current group
    let mut used: HashSet<u16> = HashSet::new();
    // previous group's references, while the current group was opened by a wrap
    let mut wrapped_from: Option<HashSet<u16>> = None;

    let close = |out: &mut Vec<PictureChunk>, cur: (usize, usize, u16), end: usize| {
        out.push(PictureChunk {
            range: cur.0..end,
            gop: cur.1,
            temporal_reference: cur.2,
        });
    };

    for (at, code) in start_codes(bytes, 0) {
        match code {
            SEQUENCE_HEADER | GOP_START => {
                if let Some(cur) = current.take() {
                    close(&mut out, cur, at);
                }
                pending.get_or_insert(at);
                if code == GOP_START {
                    if !used.is_empty() {
                        gop += 1;
                    }
                    used.clear();
                    wrapped_from = None;
                }
            }
            PICTURE_START => {
                let start = pending.take().unwrap_or(at);
                if let Some(cur) = current.take() {
                    close(&mut out, cur, start);
                }
                let (temporal_reference, picture_type) = match bytes.get(at + 4..at + 6) {
                    Some(b) => (
                        (u16::from(b[0]) << 2) | u16::from(b[1] >> 6),
                        PictureType::from_coding_type((b[1] >> 3) & 0x07),
                    ),
                    None => (0, PictureType::Unknown),
                };

                // Without GOP headers temporal references count modulo 1024.
                let mut group = gop;
                if used.contains(&temporal_reference) {
                    gop += 1;
                    group = gop;
                    wrapped_from = Some(std::mem::take(&mut used));
                    used.insert(temporal_reference);
                } else if let Some(prev) = wrapped_from.as_mut()
                    && picture_type == PictureType::Bidirectional
                    && !prev.contains(&temporal_reference)
                    && used.iter().all(|&t| t < temporal_reference)
                {
                    // a B picture coded after the wrapping anchor but shown before it
                    group = gop - 1;
                    prev.insert(temporal_reference);
                } else {
                    used.insert(temporal_reference);
                }
                current = Some((start, group, temporal_reference));
            }
            SEQUENCE_END => {
                if let Some(cur) = current.take() {
                    close(&mut out, cur, at);
                }
                pending = None;
            }
            _ => {}
        }
    }
    if let Some(cur) = current {
        close(&mut out, cur, bytes.len());
    }
    out
}

impl VideoSource for ElementaryStreamSource {
    fn width(&self) -> u32 {
        self.sequence.width
    }

    fn height(&self) -> u32 {
        self.sequence.height
    }

    fn codec_name(&self) -> Option<&str> {
        Some(self.sequence.codec_name())
    }

    fn frame_count(&self) -> u64 {
        self.frames.len() as u64
    }

    fn supports_chunk_read(&self) -> bool {
        true
    }

    fn read_chunk(&mut self, source_frame: u64, max_bytes: usize) -> StorycutResult<Vec<u8>> {
        let range = source_frame
            .checked_sub(1)
            .and_then(|i| self.frames.get(i as usize))
            .ok_or_else(|| {
                StorycutError::decode(format!(
                    "frame {source_frame} is outside '{}' ({} frames)",
                    self.path.display(),
                    self.frames.len()
                ))
            })?;
        let size = range.len();
        if size > max_bytes {
            return Err(StorycutError::ChunkOverflow {
                size,
                max: max_bytes,
            });
        }
        Ok(self.bytes[range.clone()].to_vec())
    }

    fn read_rgb(&mut self, source_frame: u64) -> StorycutResult<Option<Vec<u8>>> {
        if cfg!(feature = "media-ffmpeg") {
            crate::assets::media::decode_video_frame_rgb8(
                &self.path,
                self.sequence.width,
                self.sequence.height,
                source_frame,
            )
            .map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/elementary.rs"]
mod tests;
