//! Backend object handles.
//!
//! Handles are opaque dense ids minted by the backend. They carry no type
//! information beyond the newtype itself; the backend owns the actual
//! objects.

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            pub const NULL: Self = Self(u64::MAX);

            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> u64 {
                self.0
            }

            pub const fn is_valid(self) -> bool {
                self.0 != u64::MAX
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::NULL
            }
        }
    };
}

define_handle!(
    /// A buffer owned by the backend.
    BufferHandle
);
define_handle!(
    /// A texture owned by the backend.
    TextureHandle
);
define_handle!(
    /// A view over a subresource range of a texture.
    TextureViewHandle
);
define_handle!(
    /// A swapchain created from a window surface.
    SwapchainHandle
);
define_handle!(
    /// A compiled graphics pipeline.
    GraphicsPipelineHandle
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_handles_are_invalid() {
        assert!(!BufferHandle::NULL.is_valid());
        assert!(!TextureHandle::default().is_valid());
        assert!(TextureHandle::from_raw(0).is_valid());
    }

    #[test]
    fn raw_round_trip() {
        let handle = BufferHandle::from_raw(42);
        assert_eq!(handle.raw(), 42);
    }
}
