use std::path::{Path, PathBuf};

use crate::foundation::core::MasterFrame;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Source position of the most recently passed-through video chunk.
pub struct ChainLink {
    /// Video file the chunk came from.
    pub path: PathBuf,
    /// 1-based frame index inside that file.
    pub source_frame: u64,
}

/// Fetch history of one encoding run.
///
/// Create one per run, pass it to every fetch in increasing master frame
/// order, and drop it when the run ends. Never share one between runs.
#[derive(Debug, Default)]
pub struct FetchContext {
    last_link: Option<ChainLink>,
    last_fetch_was_compressed: bool,
    last_master: Option<MasterFrame>,
}

impl FetchContext {
    /// Empty history for a new run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last passed-through video chunk, if the chain is intact.
    pub fn last_link(&self) -> Option<&ChainLink> {
        self.last_link.as_ref()
    }

    /// Whether the previous fetch returned a compressed chunk.
    pub fn last_fetch_was_compressed(&self) -> bool {
        self.last_fetch_was_compressed
    }

    /// Master frame of the previous fetch.
    pub fn last_master(&self) -> Option<MasterFrame> {
        self.last_master
    }

    /// True when `source_frame` of `path` directly follows the last
    /// passed-through chunk.
    pub fn extends_chain(&self, path: &Path, source_frame: u64) -> bool {
        self.last_link
            .as_ref()
            .is_some_and(|l| l.path == path && l.source_frame.checked_add(1) == Some(source_frame))
    }

    /// Start a fetch for `master`. Out-of-order calls drop the history.
    pub(crate) fn begin(&mut self, master: MasterFrame) {
        if let Some(prev) = self.last_master
            && master <= prev
        {
            tracing::warn!(
                master = master.0,
                previous = prev.0,
                "master frames requested out of order; resetting fetch history"
            );
            self.last_link = None;
            self.last_fetch_was_compressed = false;
        }
        self.last_master = Some(master);
    }

    /// Record an accepted chunk. `link` is `None` for still images, which
    /// start no reference chain.
    pub(crate) fn record_chunk(&mut self, link: Option<ChainLink>) {
        self.last_link = link;
        self.last_fetch_was_compressed = true;
    }

    /// Record a frame that was not passed through.
    pub(crate) fn record_fallback(&mut self) {
        self.last_link = None;
        self.last_fetch_was_compressed = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/context.rs"]
mod tests;
