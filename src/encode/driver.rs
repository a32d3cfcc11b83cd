use crate::{
    encode::sink::{FrameSink, SinkConfig},
    fetch::{context::FetchContext, engine::FetchEngine, opts::FetchOpts, result::FetchResult},
    foundation::{core::MasterFrame, error::StorycutResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Counters for a fetch run.
pub struct FetchStats {
    /// Frames fetched.
    pub frames_total: u64,
    /// Frames passed through as compressed chunks.
    pub chunks: u64,
    /// Frames rendered by the compositor.
    pub composites: u64,
    /// Frames returned as decoded source pixels.
    pub raw_frames: u64,
    /// Frames flagged to start a new GOP.
    pub forced_keyframes: u64,
}

impl FetchStats {
    fn record(&mut self, result: &FetchResult) {
        self.frames_total += 1;
        match result {
            FetchResult::CompressedChunk { .. } => self.chunks += 1,
            FetchResult::CompositeImage { .. } => self.composites += 1,
            FetchResult::RawPixels { .. } => self.raw_frames += 1,
        }
        if result.force_keyframe() {
            self.forced_keyframes += 1;
        }
    }
}

/// Fetch master frames `1..=opts.total_output_frames` in order into `sink`.
///
/// The run owns a fresh [`FetchContext`]; the first error stops it.
#[tracing::instrument(level = "debug", skip_all, fields(total = opts.total_output_frames))]
pub fn run_fetch(
    engine: &mut FetchEngine<'_>,
    opts: &FetchOpts,
    sink: &mut dyn FrameSink,
) -> StorycutResult<FetchStats> {
    opts.validate()?;
    sink.begin(SinkConfig {
        width: opts.target_width,
        height: opts.target_height,
        frame_rate: opts.output_frame_rate,
        total_frames: opts.total_output_frames,
    })?;

    let mut ctx = FetchContext::new();
    let mut stats = FetchStats::default();
    for nr in 1..=opts.total_output_frames {
        let master = MasterFrame(nr);
        let result = engine.fetch(&mut ctx, master, opts)?;
        stats.record(&result);
        sink.push(master, &result)?;
    }
    sink.end()?;

    tracing::info!(
        frames = stats.frames_total,
        chunks = stats.chunks,
        composites = stats.composites,
        raw = stats.raw_frames,
        "fetch run finished"
    );
    Ok(stats)
}
