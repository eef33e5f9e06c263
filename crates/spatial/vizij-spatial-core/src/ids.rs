//! Identifiers and simple allocators for core entities.

use serde::{Deserialize, Serialize};

/// A remote sound source tracked by a `Scene`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SourceId(pub u32);

/// Handle returned when registering a listener; used to remove it again.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

/// Monotonic allocator for SourceId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_source: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn starting_at(next_source: u32) -> Self {
        Self { next_source }
    }

    /// Next id, wrapping at `u32::MAX`. Callers holding live ids must skip
    /// ones still in use.
    #[inline]
    pub fn alloc_source(&mut self) -> SourceId {
        let id = SourceId(self.next_source);
        self.next_source = self.next_source.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
