//! PIO parallel-bus frame capture
//!
//! The HM01B0 drives 8 data lines, a pixel clock and line/frame valid
//! strobes. One PIO state machine samples a byte on every pixel clock
//! rising edge while HSYNC is high and DMA moves the bytes into the frame
//! buffer.
//!
//! # Pins
//!
//! | Signal | GPIO  |
//! |--------|-------|
//! | D0-D7  | 6-13  |
//! | PCLK   | 14    |
//! | HSYNC  | 15    |
//! | VSYNC  | 16    |

use embassy_rp::dma::Channel;
use embassy_rp::pio::{
    Common, Config, Direction as PioDirection, Instance, Pin, ShiftConfig, ShiftDirection,
    StateMachine,
};
use embassy_rp::Peri;
use embassy_time::{with_timeout, Duration};
use fixed::types::U24F8;
use monocam_drivers::camera::{CaptureError, PixelCapture};

/// Longest wait for one complete frame (ms)
pub const CAPTURE_TIMEOUT_MS: u64 = 500;

/// Parallel capture pins, D0-D7 then PCLK, HSYNC, VSYNC
pub type DvpPins<'d, PIO> = [Pin<'d, PIO>; 11];

/// Frame capture over PIO and DMA
pub struct DvpCapture<'d, PIO: Instance, const SM: usize, C: Channel> {
    sm: StateMachine<'d, PIO, SM>,
    cfg: Config<'d, PIO>,
    dma: Peri<'d, C>,
    _pins: DvpPins<'d, PIO>,
}

impl<'d, PIO: Instance, const SM: usize, C: Channel> DvpCapture<'d, PIO, SM, C> {
    /// Load the capture program and configure the state machine
    ///
    /// The state machine stays disabled until a capture is requested.
    pub fn new(
        common: &mut Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        dma: Peri<'d, C>,
        pins: DvpPins<'d, PIO>,
    ) -> Self {
        // Wait for a VSYNC rising edge, then sample one byte per PCLK
        // rising edge while HSYNC is high. GPIO numbers are absolute.
        let prg = pio::pio_asm!(
            "wait 0 gpio 16", // VSYNC low
            "wait 1 gpio 16", // frame start
            ".wrap_target",
            "wait 1 gpio 15", // line valid
            "wait 1 gpio 14", // PCLK rising
            "in pins, 8",
            "wait 0 gpio 14",
            ".wrap"
        );

        let installed = common.load_program(&prg.program);

        let [d0, d1, d2, d3, d4, d5, d6, d7, pclk, hsync, vsync] = &pins;
        let data = [d0, d1, d2, d3, d4, d5, d6, d7];

        let mut cfg = Config::default();
        cfg.use_program(&installed, &[]);
        cfg.set_in_pins(&data);
        // Autopush every byte, LSB-aligned so DMA can read it as u8
        cfg.shift_in = ShiftConfig {
            auto_fill: true,
            threshold: 8,
            direction: ShiftDirection::Left,
        };
        cfg.clock_divider = U24F8::from_num(1);

        sm.set_config(&cfg);
        sm.set_pin_dirs(PioDirection::In, &data);
        sm.set_pin_dirs(PioDirection::In, &[pclk, hsync, vsync]);

        Self {
            sm,
            cfg,
            dma,
            _pins: pins,
        }
    }
}

impl<'d, PIO: Instance, const SM: usize, C: Channel> PixelCapture for DvpCapture<'d, PIO, SM, C> {
    async fn capture(&mut self, buf: &mut [u8]) -> Result<(), CaptureError> {
        // Restart from the frame-start wait with empty FIFOs
        self.sm.set_enable(false);
        self.sm.clear_fifos();
        self.sm.set_config(&self.cfg);
        self.sm.set_enable(true);

        let transfer = self.sm.rx().dma_pull(self.dma.reborrow(), buf, false);
        let result = with_timeout(Duration::from_millis(CAPTURE_TIMEOUT_MS), transfer).await;

        self.sm.set_enable(false);
        result.map_err(|_| CaptureError::Timeout)
    }
}
