//! Text status screens
//!
//! The 128x64 panel holds 6 rows of 21 characters with a 6x10 font.

use core::fmt;

use heapless::String;

use crate::traits::{write_truncated, DisplayError, MonoDisplay, SensorFailure};

/// Number of text rows
pub const STATUS_ROWS: usize = 6;

/// Number of characters per row
pub const STATUS_COLS: usize = 21;

/// Screen buffer for status text
#[derive(Debug, Clone, Default)]
pub struct StatusScreen {
    lines: [String<STATUS_COLS>; STATUS_ROWS],
}

impl StatusScreen {
    /// Create a new empty screen
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
        }
    }

    /// Clear all rows
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }

    /// Set the text of a row, truncating to the row width
    pub fn set_line(&mut self, row: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(row) {
            line.clear();
            for ch in text.chars() {
                if line.push(ch).is_err() {
                    break;
                }
            }
        }
    }

    /// Format the text of a row, truncating to the row width
    pub fn set_line_fmt(&mut self, row: usize, args: fmt::Arguments<'_>) {
        if let Some(line) = self.lines.get_mut(row) {
            line.clear();
            write_truncated(line, args);
        }
    }

    /// Get the text of a row
    pub fn get_line(&self, row: usize) -> &str {
        self.lines.get(row).map(|s| s.as_str()).unwrap_or("")
    }

    /// Iterate over all rows
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }

    /// Draw the screen and push it to the panel
    pub async fn render<D: MonoDisplay + ?Sized>(&self, display: &mut D) -> Result<(), DisplayError> {
        display.clear();
        for (row, line) in self.lines.iter().enumerate() {
            if !line.is_empty() {
                display.draw_text(row as u8, line);
            }
        }
        display.flush().await
    }

    /// Camera bring-up progress
    pub fn camera_starting(attempt: u8, max_attempts: u8, last: Option<SensorFailure>) -> Self {
        let mut screen = Self::new();
        screen.set_line(0, "MONOCAM");
        screen.set_line(2, "Starting camera...");
        screen.set_line_fmt(3, format_args!("Attempt {}/{}", attempt, max_attempts));
        if let Some(failure) = last {
            screen.set_line_fmt(5, format_args!("Last: {}", failure));
        }
        screen
    }

    /// Short fatal message
    pub fn camera_fatal_short() -> Self {
        let mut screen = Self::new();
        screen.set_line(1, "!! CAMERA FAILED !!");
        screen.set_line(3, "No image available");
        screen.set_line(5, "Restart required");
        screen
    }

    /// Fatal message with cause and counters
    pub fn camera_fatal_detail(
        cause: Option<SensorFailure>,
        attempts: u8,
        free_heap: usize,
    ) -> Self {
        let mut screen = Self::new();
        screen.set_line(0, "CAMERA FAILED");
        screen.set_line_fmt(
            1,
            format_args!("Cause: {}", cause.unwrap_or(SensorFailure::Unknown)),
        );
        screen.set_line_fmt(2, format_args!("Attempts: {}", attempts));
        screen.set_line_fmt(3, format_args!("Heap: {} B", free_heap));
        screen.set_line(5, "Restart required");
        screen
    }
}
