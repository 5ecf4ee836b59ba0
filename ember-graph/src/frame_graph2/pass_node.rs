//! Pass vertices.

use crate::frame_graph::QueueType;

/// A pass materialized as a graph vertex.
///
/// Pass nodes are declarative: they carry the queue and the resource edges
/// their setup declared. Execution and barrier planning are the
/// first-generation graph's job.
#[derive(Debug)]
pub struct PassNode {
    name: String,
    queue_type: QueueType,
}

impl PassNode {
    pub fn new(name: String, queue_type: QueueType) -> Self {
        Self { name, queue_type }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn queue_type(&self) -> QueueType {
        self.queue_type
    }
}
