//! Virtual resources and their typed handles.

use ember_rhi::{
    AccessFlags, BufferUsageFlags, DeviceContext, MemoryType, TextureFormat, TextureKind,
    TextureTiling, TextureUsageFlags,
};

use crate::frame_graph::pass::PassId;
use crate::frame_graph::registry::Registry;

/// Dense id of a virtual resource within one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(u32);

impl ResourceId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What kind of object a resource realizes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Buffer,
    Texture,
}

/// Handles reference resources by id and only add type discrimination.
pub trait ResourceHandle: Copy {
    fn resource_id(self) -> ResourceId;
}

macro_rules! define_resource_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(ResourceId);

        impl $name {
            pub(crate) const fn new(id: ResourceId) -> Self {
                Self(id)
            }
        }

        impl ResourceHandle for $name {
            fn resource_id(self) -> ResourceId {
                self.0
            }
        }
    };
}

define_resource_handle!(
    /// A virtual texture.
    TextureHandle
);
define_resource_handle!(
    /// A virtual texture view.
    TextureViewHandle
);
define_resource_handle!(
    /// A virtual buffer.
    BufferHandle
);

/// Texture description as declared inside the graph. The debug name is
/// passed separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureCreateInfo {
    pub kind: TextureKind,
    pub memory_type: MemoryType,
    pub format: TextureFormat,
    pub usage: TextureUsageFlags,
    pub tiling: TextureTiling,
}

impl Default for TextureCreateInfo {
    fn default() -> Self {
        Self {
            kind: TextureKind::Texture2D {
                width: 1,
                height: 1,
                num_layers: 1,
                num_mips: 1,
                sample_count: ember_rhi::SampleCount::Count1,
            },
            memory_type: MemoryType::Gpu,
            format: TextureFormat::R8_G8_B8_A8_UNORM,
            usage: TextureUsageFlags::SRV,
            tiling: TextureTiling::Optimal,
        }
    }
}

/// Buffer description as declared inside the graph.
///
/// `size` **must** be greater than `0`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BufferCreateInfo {
    pub usage: BufferUsageFlags,
    pub memory_type: MemoryType,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub(crate) enum TextureOrigin {
    /// Created inside the graph; realized just before the creator pass runs
    /// and destroyed at frame teardown.
    Transient { creator: PassId },
    /// Provided by the client; the graph records usages but never owns it.
    Imported {
        handle: ember_rhi::TextureHandle,
        previous_access: AccessFlags,
    },
}

#[derive(Debug, Clone)]
pub(crate) enum BufferOrigin {
    Transient { creator: PassId },
    Imported { handle: ember_rhi::BufferHandle },
}

#[derive(Debug)]
pub(crate) struct TextureResource {
    pub name: String,
    pub create_info: TextureCreateInfo,
    pub origin: TextureOrigin,
    pub realized: Option<ember_rhi::TextureHandle>,
}

#[derive(Debug)]
pub(crate) struct BufferResource {
    pub name: String,
    pub create_info: BufferCreateInfo,
    pub origin: BufferOrigin,
    pub realized: Option<ember_rhi::BufferHandle>,
}

#[derive(Debug)]
pub(crate) enum Resource {
    Texture(TextureResource),
    Buffer(BufferResource),
}

impl Resource {
    pub fn name(&self) -> &str {
        match self {
            Self::Texture(texture) => &texture.name,
            Self::Buffer(buffer) => &buffer.name,
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::Texture(_) => ResourceType::Texture,
            Self::Buffer(_) => ResourceType::Buffer,
        }
    }

    pub fn is_transient(&self) -> bool {
        match self {
            Self::Texture(texture) => matches!(texture.origin, TextureOrigin::Transient { .. }),
            Self::Buffer(buffer) => matches!(buffer.origin, BufferOrigin::Transient { .. }),
        }
    }

    /// The pass that created this resource; `None` for imported resources.
    pub fn creator(&self) -> Option<PassId> {
        match self {
            Self::Texture(texture) => match texture.origin {
                TextureOrigin::Transient { creator } => Some(creator),
                TextureOrigin::Imported { .. } => None,
            },
            Self::Buffer(buffer) => match buffer.origin {
                BufferOrigin::Transient { creator } => Some(creator),
                BufferOrigin::Imported { .. } => None,
            },
        }
    }

    /// Previous access of an imported texture, if this is one.
    pub fn imported_texture_access(&self) -> Option<AccessFlags> {
        match self {
            Self::Texture(TextureResource {
                origin: TextureOrigin::Imported { previous_access, .. },
                ..
            }) => Some(*previous_access),
            _ => None,
        }
    }

    /// Allocates a transient resource on the device and publishes it in the
    /// registry. Imported resources are published as-is.
    pub fn realize(&mut self, id: ResourceId, device: &mut dyn DeviceContext, registry: &mut Registry) {
        match self {
            Self::Texture(texture) => {
                let handle = match texture.origin {
                    TextureOrigin::Transient { .. } => {
                        device.create_texture(ember_rhi::TextureCreateInfo {
                            kind: texture.create_info.kind,
                            format: texture.create_info.format,
                            usage: texture.create_info.usage,
                            tiling: texture.create_info.tiling,
                            memory_type: texture.create_info.memory_type,
                            name: texture.name.clone(),
                        })
                    }
                    TextureOrigin::Imported { handle, .. } => handle,
                };
                texture.realized = Some(handle);
                registry.add_texture(TextureHandle::new(id), handle);
            }
            Self::Buffer(buffer) => {
                let handle = match buffer.origin {
                    BufferOrigin::Transient { .. } => {
                        device.create_buffer(ember_rhi::BufferCreateInfo {
                            usage: buffer.create_info.usage,
                            memory_type: buffer.create_info.memory_type,
                            size: buffer.create_info.size,
                            name: buffer.name.clone(),
                        })
                    }
                    BufferOrigin::Imported { handle } => handle,
                };
                buffer.realized = Some(handle);
                registry.add_buffer(BufferHandle::new(id), handle);
            }
        }
    }

    /// Destroys the realized object of a transient resource. Imported
    /// resources keep their external ownership.
    pub fn discard(&mut self, device: &mut dyn DeviceContext) {
        match self {
            Self::Texture(texture) => {
                if let Some(handle) = texture.realized.take()
                    && matches!(texture.origin, TextureOrigin::Transient { .. })
                {
                    device.destroy_texture(handle);
                }
            }
            Self::Buffer(buffer) => {
                if let Some(handle) = buffer.realized.take()
                    && matches!(buffer.origin, BufferOrigin::Transient { .. })
                {
                    device.destroy_buffer(handle);
                }
            }
        }
    }
}
