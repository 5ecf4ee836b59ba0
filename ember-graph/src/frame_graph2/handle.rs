//! Typed handles over node indices.

use crate::frame_graph2::graph::NodeIndex;
use crate::frame_graph2::usage::{BufferResourceUsage, ResourceUsage, TextureResourceUsage};

/// A handle naming one version of a resource node. The usage type ties
/// `read`/`write` declarations to the resource kind.
pub trait NodeHandle: Copy {
    type Usage: Copy + Into<ResourceUsage>;

    fn node_index(self) -> NodeIndex;
    fn from_node_index(node_index: NodeIndex) -> Self;
}

macro_rules! define_node_handle {
    ($(#[$meta:meta])* $name:ident, $usage:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(NodeIndex);

        impl NodeHandle for $name {
            type Usage = $usage;

            fn node_index(self) -> NodeIndex {
                self.0
            }

            fn from_node_index(node_index: NodeIndex) -> Self {
                Self(node_index)
            }
        }
    };
}

define_node_handle!(
    /// A version of a texture node.
    TextureHandle,
    TextureResourceUsage
);
define_node_handle!(
    /// A version of a buffer node.
    BufferHandle,
    BufferResourceUsage
);
