//! Heap allocator with a low-water mark
//!
//! Wraps the linked-list allocator and records the smallest free size
//! seen after any allocation, so the health report can show peak usage.

use core::alloc::{GlobalAlloc, Layout};

use embedded_alloc::LlffHeap;
use monocam_core::traits::{MemoryProbe, MemorySnapshot};
use portable_atomic::{AtomicUsize, Ordering};
use static_cell::StaticCell;

use crate::config::HEAP_SIZE;

#[global_allocator]
static HEAP: TrackingHeap = TrackingHeap::empty();

static HEAP_MEM: StaticCell<[u8; HEAP_SIZE]> = StaticCell::new();

pub struct TrackingHeap {
    heap: LlffHeap,
    low_water: AtomicUsize,
}

impl TrackingHeap {
    pub const fn empty() -> Self {
        Self {
            heap: LlffHeap::empty(),
            low_water: AtomicUsize::new(usize::MAX),
        }
    }

    /// Currently free bytes
    pub fn free(&self) -> usize {
        self.heap.free()
    }

    /// Lowest free byte count since init
    pub fn min_free(&self) -> usize {
        self.low_water.load(Ordering::Relaxed).min(self.heap.free())
    }
}

unsafe impl GlobalAlloc for TrackingHeap {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = self.heap.alloc(layout);
        if !ptr.is_null() {
            self.low_water.fetch_min(self.heap.free(), Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.heap.dealloc(ptr, layout)
    }
}

/// Initialize the heap allocator
///
/// Must run once, before anything allocates.
pub fn init_heap() {
    let mem = HEAP_MEM.uninit();
    unsafe { HEAP.heap.init(mem.as_mut_ptr() as usize, HEAP_SIZE) }
    HEAP.low_water.store(HEAP_SIZE, Ordering::Relaxed);
}

/// Memory probe over the global heap
///
/// The board has no external PSRAM, so it is always reported absent.
pub struct HeapProbe;

impl MemoryProbe for HeapProbe {
    fn sample(&self) -> MemorySnapshot {
        MemorySnapshot {
            free_heap: HEAP.free(),
            min_free_heap: HEAP.min_free(),
            psram_total: 0,
            psram_free: 0,
        }
    }
}
