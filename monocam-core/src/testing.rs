//! Simulated collaborators for host tests

use core::cell::Cell;
use core::convert::Infallible;
use std::collections::VecDeque;
use std::string::{String, ToString};
use std::vec;
use std::vec::Vec;

use crate::config::{Resolution, SensorSettings, SensorTuning};
use crate::frame::{PixelFormat, RawFrame};
use crate::traits::{
    AcquiredFrame, CameraSensor, Clock, DiagnosticSink, DisplayError, MemoryProbe,
    MemorySnapshot, MonoDisplay, SensorFailure, Severity,
};

/// Records every emitted line
#[derive(Debug, Default)]
pub struct MockSink {
    pub lines: Vec<(Severity, String)>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|(_, line)| line.contains(needle))
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.lines.iter().filter(|(s, _)| *s == severity).count()
    }

    pub fn count_matching(&self, needle: &str) -> usize {
        self.lines.iter().filter(|(_, l)| l.contains(needle)).count()
    }
}

impl DiagnosticSink for MockSink {
    fn emit(&mut self, severity: Severity, line: &str) {
        self.lines.push((severity, line.to_string()));
    }
}

/// Returns a fixed snapshot
pub struct MockMemory {
    pub snapshot: MemorySnapshot,
}

impl MockMemory {
    pub fn new(snapshot: MemorySnapshot) -> Self {
        Self { snapshot }
    }
}

impl MemoryProbe for MockMemory {
    fn sample(&self) -> MemorySnapshot {
        self.snapshot
    }
}

/// Display that records draw calls
#[derive(Debug)]
pub struct MockDisplay {
    pub address: u8,
    pub probe_result: Result<(), DisplayError>,
    pub init_result: Result<(), DisplayError>,
    /// Number of upcoming flushes that fail
    pub flush_failures: usize,
    pub probe_calls: usize,
    pub init_calls: usize,
    pub clears: usize,
    pub flushes: usize,
    pub bitmaps_drawn: usize,
    pub last_bitmap: Vec<u8>,
    pub texts: Vec<String>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            address: 0x3C,
            probe_result: Ok(()),
            init_result: Ok(()),
            flush_failures: 0,
            probe_calls: 0,
            init_calls: 0,
            clears: 0,
            flushes: 0,
            bitmaps_drawn: 0,
            last_bitmap: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts.iter().any(|t| t.contains(needle))
    }
}

impl MonoDisplay for MockDisplay {
    fn bus_address(&self) -> u8 {
        self.address
    }

    async fn probe(&mut self) -> Result<(), DisplayError> {
        self.probe_calls += 1;
        self.probe_result
    }

    async fn init(&mut self) -> Result<(), DisplayError> {
        self.init_calls += 1;
        self.init_result
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn draw_bitmap(&mut self, _x: i32, _y: i32, bitmap: &[u8], _width: u32, _height: u32) {
        self.bitmaps_drawn += 1;
        self.last_bitmap = bitmap.to_vec();
    }

    fn draw_text(&mut self, _row: u8, text: &str) {
        self.texts.push(text.to_string());
    }

    async fn flush(&mut self) -> Result<(), DisplayError> {
        self.flushes += 1;
        if self.flush_failures > 0 {
            self.flush_failures -= 1;
            return Err(DisplayError::Communication);
        }
        Ok(())
    }
}

/// What the next `acquire` produces
#[derive(Debug, Clone)]
pub enum FrameScript {
    /// No frame available
    Missing,
    /// Every byte set to `value`
    Uniform {
        resolution: Resolution,
        format: PixelFormat,
        value: u8,
    },
    /// Explicit grayscale pixels
    Pixels { resolution: Resolution, data: Vec<u8> },
}

impl FrameScript {
    pub fn gray(resolution: Resolution, value: u8) -> Self {
        FrameScript::Uniform {
            resolution,
            format: PixelFormat::Grayscale,
            value,
        }
    }
}

/// Scripted camera sensor
#[derive(Debug)]
pub struct MockCamera {
    /// Results for successive `configure` calls; `Ok` once exhausted
    pub configure_results: VecDeque<Result<(), SensorFailure>>,
    pub tuning_result: Result<(), SensorFailure>,
    /// Frames for successive `acquire` calls; `default_frame` once exhausted
    pub frames: VecDeque<FrameScript>,
    pub default_frame: FrameScript,
    pub configured: bool,
    pub configure_calls: usize,
    pub tuning_calls: usize,
    pub deinit_calls: usize,
    pub acquired: usize,
    pub released: usize,
    pub last_settings: Option<SensorSettings>,
    pub last_tuning: Option<SensorTuning>,
    buffer: Vec<u8>,
    resolution: Resolution,
    format: PixelFormat,
}

impl MockCamera {
    pub fn new() -> Self {
        Self {
            configure_results: VecDeque::new(),
            tuning_result: Ok(()),
            frames: VecDeque::new(),
            default_frame: FrameScript::gray(Resolution::SQUARE_96, 200),
            configured: false,
            configure_calls: 0,
            tuning_calls: 0,
            deinit_calls: 0,
            acquired: 0,
            released: 0,
            last_settings: None,
            last_tuning: None,
            buffer: Vec::new(),
            resolution: Resolution::SQUARE_96,
            format: PixelFormat::Grayscale,
        }
    }

    /// Camera that is already configured and delivers frames
    pub fn streaming() -> Self {
        Self {
            configured: true,
            ..Self::new()
        }
    }

    /// Camera whose first `n` configure calls fail with `failure`
    pub fn failing(n: usize, failure: SensorFailure) -> Self {
        let mut camera = Self::new();
        camera.configure_results = (0..n).map(|_| Err(failure)).collect();
        camera
    }

    pub fn outstanding(&self) -> usize {
        self.acquired - self.released
    }
}

impl CameraSensor for MockCamera {
    type Frame<'a> = MockFrame<'a>;

    async fn configure(&mut self, settings: &SensorSettings) -> Result<(), SensorFailure> {
        self.configure_calls += 1;
        self.last_settings = Some(*settings);
        let result = self.configure_results.pop_front().unwrap_or(Ok(()));
        self.configured = result.is_ok();
        result
    }

    async fn apply_tuning(&mut self, tuning: &SensorTuning) -> Result<(), SensorFailure> {
        self.tuning_calls += 1;
        self.last_tuning = Some(*tuning);
        self.tuning_result
    }

    async fn deinit(&mut self) {
        self.deinit_calls += 1;
        self.configured = false;
    }

    async fn acquire(&mut self) -> Option<MockFrame<'_>> {
        if !self.configured {
            return None;
        }
        let script = self
            .frames
            .pop_front()
            .unwrap_or_else(|| self.default_frame.clone());
        match script {
            FrameScript::Missing => return None,
            FrameScript::Uniform {
                resolution,
                format,
                value,
            } => {
                let len = resolution.pixels() * format.bytes_per_pixel().unwrap_or(1);
                self.buffer = vec![value; len];
                self.resolution = resolution;
                self.format = format;
            }
            FrameScript::Pixels { resolution, data } => {
                self.buffer = data;
                self.resolution = resolution;
                self.format = PixelFormat::Grayscale;
            }
        }
        self.acquired += 1;
        Some(MockFrame { camera: self })
    }
}

/// Frame guard handed out by [`MockCamera`]
pub struct MockFrame<'a> {
    camera: &'a mut MockCamera,
}

impl AcquiredFrame for MockFrame<'_> {
    fn raw(&self) -> RawFrame<'_> {
        RawFrame::new(&self.camera.buffer, self.camera.resolution, self.camera.format)
    }
}

impl Drop for MockFrame<'_> {
    fn drop(&mut self) {
        self.camera.released += 1;
    }
}

/// Output pin that records every level change
#[derive(Debug, Default)]
pub struct MockPin {
    /// true = high
    pub levels: Vec<bool>,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.push(true);
        Ok(())
    }
}

/// Delay that returns immediately and records what was asked for
#[derive(Debug, Default)]
pub struct MockDelay {
    pub delays_ms: Vec<u32>,
    pub delays_ns: Vec<u32>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl embedded_hal_async::delay::DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.delays_ns.push(ns);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
    }
}

/// Clock that advances by a fixed step on every read
#[derive(Debug)]
pub struct MockClock {
    now: Cell<u64>,
    step: u64,
}

impl MockClock {
    pub fn new(step: u64) -> Self {
        Self {
            now: Cell::new(0),
            step,
        }
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

/// Board assembled from the mocks above
pub type MockBoard =
    crate::Board<MockDisplay, MockCamera, MockPin, MockDelay, MockClock, MockSink, MockMemory>;

pub fn mock_board(camera: MockCamera) -> MockBoard {
    crate::Board {
        display: MockDisplay::new(),
        camera,
        camera_power: MockPin::new(),
        delay: MockDelay::new(),
        clock: MockClock::new(5),
        sink: MockSink::new(),
        memory: MockMemory::new(MemorySnapshot {
            free_heap: 40_000,
            min_free_heap: 20_000,
            psram_total: 0,
            psram_free: 0,
        }),
    }
}
