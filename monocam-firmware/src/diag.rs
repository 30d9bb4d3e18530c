//! Diagnostic sink over RTT

use defmt::*;
use monocam_core::traits::{DiagnosticSink, Severity};

/// Forwards diagnostic lines to defmt at the matching level
pub struct DefmtSink;

impl DiagnosticSink for DefmtSink {
    fn emit(&mut self, severity: Severity, line: &str) {
        match severity {
            Severity::Info => info!("{=str}", line),
            Severity::Warn => warn!("{=str}", line),
            Severity::Error => error!("{=str}", line),
        }
    }
}
