//! Memory snapshots and reporting

use crate::traits::{DiagnosticSink, MemoryProbe, MemorySnapshot, Severity};

/// State of the external PSRAM
///
/// An unpopulated module and a populated module with nothing free are
/// different faults: the latter means the module is defective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PsramStatus {
    /// Not populated
    Absent,
    /// Populated and reporting free space
    Available,
    /// Populated but reporting zero free bytes
    Exhausted,
}

impl PsramStatus {
    pub fn classify(snapshot: &MemorySnapshot) -> Self {
        match (snapshot.psram_total, snapshot.psram_free) {
            (0, _) => PsramStatus::Absent,
            (_, 0) => PsramStatus::Exhausted,
            _ => PsramStatus::Available,
        }
    }
}

/// Take a memory snapshot
pub fn sample_memory<M: MemoryProbe + ?Sized>(probe: &M) -> MemorySnapshot {
    probe.sample()
}

/// Emit a memory snapshot on the diagnostic channel
///
/// Returns the PSRAM classification so callers can react to it.
pub fn report_memory<S: DiagnosticSink + ?Sized>(
    snapshot: &MemorySnapshot,
    sink: &mut S,
) -> PsramStatus {
    sink.emit_fmt(
        Severity::Info,
        format_args!(
            "mem: heap free={} min={}",
            snapshot.free_heap, snapshot.min_free_heap
        ),
    );

    let status = PsramStatus::classify(snapshot);
    match status {
        PsramStatus::Absent => sink.emit(Severity::Info, "mem: psram not present"),
        PsramStatus::Available => sink.emit_fmt(
            Severity::Info,
            format_args!(
                "mem: psram free={} total={}",
                snapshot.psram_free, snapshot.psram_total
            ),
        ),
        PsramStatus::Exhausted => sink.emit_fmt(
            Severity::Warn,
            format_args!(
                "mem: psram present ({} bytes) but 0 free, module defective",
                snapshot.psram_total
            ),
        ),
    }
    status
}
