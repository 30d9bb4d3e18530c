//! Monotonic time source

/// Monotonic millisecond clock used for frame pacing
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;
}
