//! Diagnostic output channel

use core::fmt::{self, Write};

use heapless::String;

/// Longest diagnostic line; longer lines are truncated
pub const LINE_CAPACITY: usize = 96;

/// Diagnostic line severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Append-only text channel for humans and log collectors
pub trait DiagnosticSink {
    /// Emit one line
    fn emit(&mut self, severity: Severity, line: &str);

    /// Format and emit one line, truncated to [`LINE_CAPACITY`]
    fn emit_fmt(&mut self, severity: Severity, args: fmt::Arguments<'_>) {
        let mut line: String<LINE_CAPACITY> = String::new();
        write_truncated(&mut line, args);
        self.emit(severity, &line);
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &mut T {
    fn emit(&mut self, severity: Severity, line: &str) {
        (**self).emit(severity, line)
    }
}

/// Append formatted text to `buf`, keeping every character that fits
pub fn write_truncated<const N: usize>(buf: &mut String<N>, args: fmt::Arguments<'_>) {
    let _ = Truncating(buf).write_fmt(args);
}

/// Writer that drops characters once the buffer is full
struct Truncating<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}
