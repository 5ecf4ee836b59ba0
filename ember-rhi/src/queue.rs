//! Queue types and synchronization stages.

use bitflags::bitflags;

/// Hardware queue a submission targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueType {
    Compute,
    Graphics,
    Transfer,
    Present,
}

/// Physical queue family indices reported by the device.
///
/// Two queues belong to the same family iff their indices are equal; only
/// cross-family accesses need queue ownership transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics: u32,
    pub compute: u32,
    pub transfer: u32,
    pub present: u32,
}

bitflags! {
    /// Pipeline stages a submission synchronizes against.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SynchronizationStage: u8 {
        const NONE = 0;
        const TOP_OF_PIPE = 1 << 0;
        const BOTTOM_OF_PIPE = 1 << 1;
        const EARLY_FRAGMENT_TESTS = 1 << 2;
        const LATE_FRAGMENT_TESTS = 1 << 3;
        const VERTEX_SHADER = 1 << 4;
        const FRAGMENT_SHADER = 1 << 5;
        const COMPUTE_SHADER = 1 << 6;
        const TRANSFER = 1 << 7;
        const ALL_GRAPHICS = Self::TOP_OF_PIPE.bits()
            | Self::BOTTOM_OF_PIPE.bits()
            | Self::EARLY_FRAGMENT_TESTS.bits()
            | Self::LATE_FRAGMENT_TESTS.bits()
            | Self::VERTEX_SHADER.bits()
            | Self::FRAGMENT_SHADER.bits();
    }
}
