// Allocator configuration and heap accounting
//
// `mimalloc` feature: mimalloc is the global allocator.
// `memory_tracking` feature: the allocator is wrapped with current/peak byte
// counters. Without it the accessors return 0.

#[cfg(feature = "memory_tracking")]
mod tracking {
    use std::alloc::{GlobalAlloc, Layout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
    pub static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);

    pub struct TrackingAllocator;

    #[cfg(feature = "mimalloc")]
    static UNDERLYING: mimalloc::MiMalloc = mimalloc::MiMalloc;

    #[cfg(not(feature = "mimalloc"))]
    static UNDERLYING: std::alloc::System = std::alloc::System;

    unsafe impl GlobalAlloc for TrackingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let ptr = UNDERLYING.alloc(layout);
            if !ptr.is_null() {
                let current = ALLOCATED.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
                PEAK_ALLOCATED.fetch_max(current, Ordering::Relaxed);
            }
            ptr
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
            UNDERLYING.dealloc(ptr, layout)
        }
    }
}

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: tracking::TrackingAllocator = tracking::TrackingAllocator;

#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// True when heap counters are live.
pub const fn is_tracking() -> bool {
    cfg!(feature = "memory_tracking")
}

/// Bytes currently allocated.
#[cfg(feature = "memory_tracking")]
pub fn current() -> usize {
    tracking::ALLOCATED.load(std::sync::atomic::Ordering::SeqCst)
}

/// Highest allocation level since start or the last `reset_peak`.
#[cfg(feature = "memory_tracking")]
pub fn peak() -> usize {
    tracking::PEAK_ALLOCATED.load(std::sync::atomic::Ordering::SeqCst)
}

/// Reset the peak to the current level. Returns (current, previous peak).
#[cfg(feature = "memory_tracking")]
pub fn reset_peak() -> (usize, usize) {
    use std::sync::atomic::Ordering;

    let current = tracking::ALLOCATED.load(Ordering::SeqCst);
    let peak = tracking::PEAK_ALLOCATED.swap(current, Ordering::SeqCst);
    (current, peak)
}

/// Stub: returns 0 when memory_tracking is disabled
#[cfg(not(feature = "memory_tracking"))]
pub fn current() -> usize {
    0
}

/// Stub: returns 0 when memory_tracking is disabled
#[cfg(not(feature = "memory_tracking"))]
pub fn peak() -> usize {
    0
}

/// Stub: returns (0, 0) when memory_tracking is disabled
#[cfg(not(feature = "memory_tracking"))]
pub fn reset_peak() -> (usize, usize) {
    (0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "memory_tracking")]
    #[test]
    fn test_peak_tracks_large_allocation() {
        reset_peak();
        let block = vec![0u8; 1 << 20];
        assert!(peak() >= block.len());
        drop(block);
    }

    #[cfg(not(feature = "memory_tracking"))]
    #[test]
    fn test_stubs_report_zero() {
        assert!(!is_tracking());
        assert_eq!(current(), 0);
        assert_eq!(peak(), 0);
        assert_eq!(reset_peak(), (0, 0));
    }
}
