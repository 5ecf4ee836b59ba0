//! Planned barriers, keyed by virtual resource ids.
//!
//! These records are produced by `compile()` and translated into
//! [`ember_rhi`] barriers (with realized handles) during `execute()`.

use ember_rhi::AccessFlags;

use crate::frame_graph::pass::QueueType;
use crate::frame_graph::resource::ResourceId;

/// Before/after slots around a pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct Barrier<T> {
    /// Emitted before the pass executes.
    pub before: T,
    /// Emitted after the pass executes.
    pub after: T,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextureBarrier {
    pub texture: ResourceId,
    pub previous_access: AccessFlags,
    pub next_access: AccessFlags,
    pub source_queue: Option<QueueType>,
    pub destination_queue: Option<QueueType>,
    pub discard_contents: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BufferBarrier {
    pub buffer: ResourceId,
    pub previous_access: AccessFlags,
    pub next_access: AccessFlags,
    pub source_queue: Option<QueueType>,
    pub destination_queue: Option<QueueType>,
}

/// Every barrier planned around one pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct PassBarriers {
    /// At most one global barrier per slot; compatible transitions coalesce
    /// into it by OR-ing their access masks.
    pub global_barrier: Barrier<Option<ember_rhi::GlobalBarrier>>,
    pub texture_barriers: Barrier<Vec<TextureBarrier>>,
    pub buffer_barriers: Barrier<Vec<BufferBarrier>>,
}

impl PassBarriers {
    pub fn clear(&mut self) {
        self.global_barrier.before = None;
        self.global_barrier.after = None;
        self.texture_barriers.before.clear();
        self.texture_barriers.after.clear();
        self.buffer_barriers.before.clear();
        self.buffer_barriers.after.clear();
    }
}
