//! Collaborators shared by the initializer and the pipeline

/// Everything the firmware core talks to
///
/// The initializer and the pipeline run one after the other in a single
/// task, so they borrow the same board mutably in turn.
pub struct Board<D, C, P, Dl, K, S, M> {
    /// Monochrome panel ([`crate::traits::MonoDisplay`])
    pub display: D,
    /// Camera sensor ([`crate::traits::CameraSensor`])
    pub camera: C,
    /// Camera power-down control, high = powered down
    pub camera_power: P,
    /// Async delay ([`embedded_hal_async::delay::DelayNs`])
    pub delay: Dl,
    /// Monotonic clock ([`crate::traits::Clock`])
    pub clock: K,
    /// Diagnostic channel ([`crate::traits::DiagnosticSink`])
    pub sink: S,
    /// Memory probe ([`crate::traits::MemoryProbe`])
    pub memory: M,
}
