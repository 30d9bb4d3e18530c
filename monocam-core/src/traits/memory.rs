//! Memory pressure probe

/// Snapshot of memory pressure indicators (bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemorySnapshot {
    /// Currently free heap
    pub free_heap: usize,
    /// Lowest free heap observed since boot
    pub min_free_heap: usize,
    /// Size of external PSRAM, 0 when not populated
    pub psram_total: usize,
    /// Free external PSRAM
    pub psram_free: usize,
}

/// Source of memory snapshots
///
/// Sampling must not allocate and must not change allocator state.
pub trait MemoryProbe {
    fn sample(&self) -> MemorySnapshot;
}
