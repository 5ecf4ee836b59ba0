//! Resource vertices and their version aliases.

use crate::frame_graph::{BufferCreateInfo, TextureCreateInfo};
use crate::frame_graph2::graph::NodeIndex;

/// What a resource node stands for.
#[derive(Debug)]
pub enum ResourcePayload {
    Texture(TextureCreateInfo),
    Buffer(BufferCreateInfo),
    /// A new version of another resource node, allocated by a write. The
    /// payload stays with the original node.
    Ref { origin: NodeIndex },
}

impl ResourcePayload {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Texture(_) => "Texture",
            Self::Buffer(_) => "Buffer",
            Self::Ref { .. } => "Ref",
        }
    }
}

/// A resource version materialized as a graph vertex.
///
/// Writes alias resources SSA-style: writing version `n` allocates a new
/// node with `generation = n + 1`, and passes reading "the value after the
/// write" point at the new node.
#[derive(Debug)]
pub struct ResourceNode {
    name: String,
    imported: bool,
    creator: Option<NodeIndex>,
    writer: Option<NodeIndex>,
    parent: Option<NodeIndex>,
    generation: u16,
    readers: Vec<NodeIndex>,
    payload: ResourcePayload,
}

impl ResourceNode {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        imported: bool,
        creator: Option<NodeIndex>,
        writer: Option<NodeIndex>,
        parent: Option<NodeIndex>,
        generation: u16,
        payload: ResourcePayload,
    ) -> Self {
        Self {
            name,
            imported,
            creator,
            writer,
            parent,
            generation,
            readers: Vec::new(),
            payload,
        }
    }

    pub fn add_reader(&mut self, reader: NodeIndex) {
        if !self.readers.contains(&reader) {
            self.readers.push(reader);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_imported(&self) -> bool {
        self.imported
    }

    pub fn creator(&self) -> Option<NodeIndex> {
        self.creator
    }

    pub fn writer(&self) -> Option<NodeIndex> {
        self.writer
    }

    /// The node this version was forked from, if any.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn generation(&self) -> u16 {
        self.generation
    }

    pub fn readers(&self) -> &[NodeIndex] {
        &self.readers
    }

    pub fn payload(&self) -> &ResourcePayload {
        &self.payload
    }
}
