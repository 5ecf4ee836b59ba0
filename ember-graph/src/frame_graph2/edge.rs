//! Resource usage annotations on graph edges.

use crate::frame_graph2::usage::ResourceUsage;

/// Connects passes and resource versions; carries how the pass uses the
/// resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    resource_usage: ResourceUsage,
    write: bool,
}

impl Edge {
    pub fn read(resource_usage: ResourceUsage) -> Self {
        Self {
            resource_usage,
            write: false,
        }
    }

    pub fn write(resource_usage: ResourceUsage) -> Self {
        Self {
            resource_usage,
            write: true,
        }
    }

    pub fn resource_usage(&self) -> ResourceUsage {
        self.resource_usage
    }

    pub fn is_write(&self) -> bool {
        self.write
    }
}
