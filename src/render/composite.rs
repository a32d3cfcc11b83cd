use std::path::Path;

use crate::foundation::{core::MasterFrame, error::StorycutResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Handle of a flattened image owned by the composite renderer.
pub struct ImageId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Handle of the layer holding the composited frame inside an [`ImageId`].
pub struct LayerId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Handles returned by a successful composite render.
pub struct CompositeImage {
    /// Flattened image.
    pub image: ImageId,
    /// Layer carrying the frame pixels.
    pub layer: LayerId,
}

/// Full decode → layer composite → flatten path for one master frame.
///
/// This is the fallback whenever a frame cannot be copied from its source
/// unmodified. An `Err` here is fatal for the frame.
pub trait CompositeRenderer {
    /// Render master frame `master` at `width` x `height`, applying
    /// `filter_macro` when present.
    fn render_composite(
        &mut self,
        master: MasterFrame,
        width: u32,
        height: u32,
        filter_macro: Option<&Path>,
    ) -> StorycutResult<CompositeImage>;
}

/// Compositor that only hands out fresh handles without producing pixels.
///
/// Used to dry-run fetch decisions over a storyboard.
#[derive(Debug, Default)]
pub struct PlanningCompositor {
    next_id: u32,
    rendered: Vec<MasterFrame>,
}

impl PlanningCompositor {
    /// Create a compositor with no frames rendered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Master frames rendered so far, in call order.
    pub fn rendered(&self) -> &[MasterFrame] {
        &self.rendered
    }
}

impl CompositeRenderer for PlanningCompositor {
    fn render_composite(
        &mut self,
        master: MasterFrame,
        _width: u32,
        _height: u32,
        _filter_macro: Option<&Path>,
    ) -> StorycutResult<CompositeImage> {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.rendered.push(master);
        Ok(CompositeImage {
            image: ImageId(id),
            layer: LayerId(id),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
