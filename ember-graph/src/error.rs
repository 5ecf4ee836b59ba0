use crate::frame_graph::ResourceUsage;

/// Everything that can go wrong while declaring or compiling a frame.
///
/// None of these are recoverable: the frame is abandoned and the client is
/// expected to reset and rebuild the graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameGraphError {
    #[error("cycle detected in the frame graph: `{from}` and `{to}` depend on each other")]
    CycleDetected { from: String, to: String },

    #[error("render pass `{pass}` references the same texture in more than one attachment")]
    DuplicateAttachment { pass: String },

    #[error(
        "pass `{pass}`: resource `{resource}` combines `{attachment:?}` with \
         incompatible usage `{usage:?}`"
    )]
    IllegalUsageCombination {
        pass: String,
        resource: String,
        attachment: ResourceUsage,
        usage: ResourceUsage,
    },

    #[error("present pass references texture `{resource}` that no pass produced")]
    UnusedResource { resource: String },

    #[error("texture `{texture}` cannot be presented: {reason}")]
    PresentPreconditionFailed { texture: String, reason: String },

    #[error(
        "pass `{pass}` uses resource `{resource}` with no producer at that point \
         (never created, imported, or written)"
    )]
    MissingResource { pass: String, resource: String },
}
