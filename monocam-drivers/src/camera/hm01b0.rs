//! HM01B0 monochrome camera sensor (I2C control)
//!
//! The HM01B0 is an ultra-low-power 320x320 monochrome image sensor. It is
//! run here in 2x2 binned QVGA mode, which yields a native 160x120 frame
//! of 8-bit luminance on the parallel bus. Smaller source resolutions are
//! taken as a centered window of the native frame.
//!
//! # Control interface
//!
//! - 7-bit I2C address 0x24
//! - 16-bit big-endian register addresses, 8-bit values
//! - Register writes take effect on the next frame after a group
//!   parameter hold update (`GRP_PARAM_HOLD`)

use alloc::collections::TryReserveError;
use alloc::vec::Vec;

use embedded_hal_async::i2c::I2c;
use monocam_core::config::{GainCeiling, Resolution, SensorSettings, SensorTuning};
use monocam_core::frame::{PixelFormat, RawFrame};
use monocam_core::traits::{AcquiredFrame, CameraSensor, SensorFailure};

use super::capture::PixelCapture;

/// HM01B0 I2C address
pub const HM01B0_ADDRESS: u8 = 0x24;

/// Expected value of MODEL_ID_H:MODEL_ID_L
pub const HM01B0_CHIP_ID: u16 = 0x01B0;

/// Frame size delivered by the sensor in binned QVGA mode
pub const NATIVE_RESOLUTION: Resolution = Resolution::new(160, 120);

/// HM01B0 register addresses
pub mod reg {
    /// Model ID, high byte
    pub const MODEL_ID_H: u16 = 0x0000;
    /// Model ID, low byte
    pub const MODEL_ID_L: u16 = 0x0001;
    /// Standby / streaming select
    pub const MODE_SELECT: u16 = 0x0100;
    /// Mirror and flip
    pub const IMAGE_ORIENTATION: u16 = 0x0101;
    /// Software reset
    pub const SW_RESET: u16 = 0x0103;
    /// Latch pending register writes
    pub const GRP_PARAM_HOLD: u16 = 0x0104;
    /// Test pattern select
    pub const TEST_PATTERN_MODE: u16 = 0x0601;
    /// Frame length in lines
    pub const FRAME_LENGTH_LINES_H: u16 = 0x0340;
    pub const FRAME_LENGTH_LINES_L: u16 = 0x0341;
    /// Line length in pixel clocks
    pub const LINE_LENGTH_PCK_H: u16 = 0x0342;
    pub const LINE_LENGTH_PCK_L: u16 = 0x0343;
    /// Horizontal and vertical readout binning
    pub const BIN_RDOUT_X: u16 = 0x0383;
    pub const BIN_RDOUT_Y: u16 = 0x0387;
    pub const BINNING_MODE: u16 = 0x0390;
    /// Auto exposure enable
    pub const AE_CTRL: u16 = 0x2100;
    /// Auto exposure target mean
    pub const AE_TARGET_MEAN: u16 = 0x2101;
    /// Analog gain ceiling (log2 of the multiplier)
    pub const MAX_AGAIN_FULL: u16 = 0x2108;
    pub const MAX_AGAIN_BIN2: u16 = 0x2109;
    /// Analog gain floor
    pub const MIN_AGAIN: u16 = 0x210A;
    /// Manual analog gain, used with auto exposure off
    pub const ANALOG_GAIN: u16 = 0x0205;
    /// QVGA window enable
    pub const QVGA_WIN_EN: u16 = 0x3010;
    /// Output bus width and gating
    pub const BIT_CONTROL: u16 = 0x3059;
    /// Pixel clock divider
    pub const OSC_CLK_DIV: u16 = 0x3060;
}

/// MODE_SELECT values
const MODE_STANDBY: u8 = 0x00;
const MODE_STREAMING: u8 = 0x01;

/// Walking-ones test pattern
const TEST_PATTERN_WALKING_ONES: u8 = 0x11;

/// Register setup for binned QVGA, 8-bit parallel output
///
/// Applied after a software reset, with the sensor in standby.
const QQVGA_8BIT: &[(u16, u8)] = &[
    // Black level calibration
    (0x1000, 0x43),
    (0x1001, 0x40),
    (0x1002, 0x32),
    (0x1003, 0x08),
    (0x1006, 0x01),
    (0x1007, 0x08),
    (0x1008, 0x00),
    // Analog front end
    (0x3044, 0x0A),
    (0x3045, 0x00),
    (0x3047, 0x0A),
    (0x3050, 0xC0),
    (0x3051, 0x42),
    (0x3052, 0x50),
    (0x3053, 0x00),
    (0x3054, 0x03),
    (0x3055, 0xF7),
    (0x3056, 0xF8),
    (0x3057, 0x29),
    (0x3058, 0x1F),
    // Auto exposure statistics window
    (0x2000, 0x07),
    (0x2003, 0x00),
    (0x2004, 0x1C),
    (0x2007, 0x00),
    (0x2008, 0x58),
    (0x200B, 0x00),
    (0x200C, 0x7A),
    (0x200F, 0x00),
    (0x2010, 0xB8),
    (reg::AE_TARGET_MEAN, 0x5F),
    // Frame timing
    (reg::FRAME_LENGTH_LINES_H, 0x00),
    (reg::FRAME_LENGTH_LINES_L, 0x80),
    (reg::LINE_LENGTH_PCK_H, 0x00),
    (reg::LINE_LENGTH_PCK_L, 0xD7),
    // 320x240 window, 2x2 binning
    (reg::QVGA_WIN_EN, 0x01),
    (reg::BIN_RDOUT_X, 0x03),
    (reg::BIN_RDOUT_Y, 0x03),
    (reg::BINNING_MODE, 0x03),
    // 8-bit bus, gated pixel clock
    (reg::BIT_CONTROL, 0x02),
    (reg::OSC_CLK_DIV, 0x0A),
    (reg::IMAGE_ORIENTATION, 0x00),
];

/// Allocate a zeroed frame buffer without aborting on failure
pub(crate) fn alloc_frame(len: usize) -> Result<Vec<u8>, TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.resize(len, 0);
    Ok(buf)
}

/// Buffers owned between `configure` and `deinit`
struct Buffers {
    /// Full native frame as captured
    native: Vec<u8>,
    /// Centered window, when the source is smaller than native
    window: Option<Vec<u8>>,
    resolution: Resolution,
}

/// HM01B0 driver
pub struct Hm01b0<I2C, CAP> {
    i2c: I2C,
    capture: CAP,
    address: u8,
    buffers: Option<Buffers>,
    in_flight: bool,
}

impl<I2C, CAP> Hm01b0<I2C, CAP>
where
    I2C: I2c,
    CAP: PixelCapture,
{
    /// Create a new HM01B0 driver
    pub fn new(i2c: I2C, capture: CAP) -> Self {
        Self {
            i2c,
            capture,
            address: HM01B0_ADDRESS,
            buffers: None,
            in_flight: false,
        }
    }

    /// True between a successful `configure` and `deinit`
    pub fn is_configured(&self) -> bool {
        self.buffers.is_some()
    }

    /// True while an acquired frame has not been released
    pub fn frame_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Read a register
    pub async fn read_reg(&mut self, reg: u16) -> Result<u8, SensorFailure> {
        let mut value = [0u8; 1];
        self.i2c
            .write_read(self.address, &reg.to_be_bytes(), &mut value)
            .await
            .map_err(|_| SensorFailure::Hardware)?;
        Ok(value[0])
    }

    /// Write a register
    pub async fn write_reg(&mut self, reg: u16, value: u8) -> Result<(), SensorFailure> {
        let [hi, lo] = reg.to_be_bytes();
        self.i2c
            .write(self.address, &[hi, lo, value])
            .await
            .map_err(|_| SensorFailure::Hardware)
    }

    /// Read the model ID
    pub async fn chip_id(&mut self) -> Result<u16, SensorFailure> {
        let hi = self.read_reg(reg::MODEL_ID_H).await?;
        let lo = self.read_reg(reg::MODEL_ID_L).await?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    fn check_settings(settings: &SensorSettings) -> Result<(), SensorFailure> {
        if settings.format != PixelFormat::Grayscale {
            return Err(SensorFailure::InvalidConfiguration);
        }
        let res = settings.resolution;
        if res.width == 0 || res.height == 0 || !res.fits_within(&NATIVE_RESOLUTION) {
            return Err(SensorFailure::InvalidConfiguration);
        }
        // Single capture buffer only
        if settings.frame_buffers != 1 {
            return Err(SensorFailure::InvalidConfiguration);
        }
        Ok(())
    }

    fn allocate(resolution: Resolution) -> Result<Buffers, SensorFailure> {
        let native =
            alloc_frame(NATIVE_RESOLUTION.pixels()).map_err(|_| SensorFailure::OutOfMemory)?;
        let window = if resolution == NATIVE_RESOLUTION {
            None
        } else {
            Some(alloc_frame(resolution.pixels()).map_err(|_| SensorFailure::OutOfMemory)?)
        };
        Ok(Buffers {
            native,
            window,
            resolution,
        })
    }
}

/// Copy the centered `window` out of a native frame
fn crop_center(native: &[u8], window: &mut [u8], resolution: Resolution) {
    let native_w = NATIVE_RESOLUTION.width as usize;
    let w = resolution.width as usize;
    let h = resolution.height as usize;
    let x0 = (native_w - w) / 2;
    let y0 = (NATIVE_RESOLUTION.height as usize - h) / 2;

    for (row, dst) in window.chunks_exact_mut(w).take(h).enumerate() {
        let start = (y0 + row) * native_w + x0;
        dst.copy_from_slice(&native[start..start + w]);
    }
}

impl<I2C, CAP> CameraSensor for Hm01b0<I2C, CAP>
where
    I2C: I2c,
    CAP: PixelCapture,
{
    type Frame<'a>
        = Hm01b0Frame<'a, I2C, CAP>
    where
        Self: 'a;

    async fn configure(&mut self, settings: &SensorSettings) -> Result<(), SensorFailure> {
        Self::check_settings(settings)?;

        if self.chip_id().await? != HM01B0_CHIP_ID {
            return Err(SensorFailure::Hardware);
        }

        self.write_reg(reg::SW_RESET, 0x00).await?;
        self.write_reg(reg::MODE_SELECT, MODE_STANDBY).await?;
        for &(register, value) in QQVGA_8BIT {
            self.write_reg(register, value).await?;
        }
        self.write_reg(reg::GRP_PARAM_HOLD, 0x01).await?;

        // Allocate only once the sensor has taken the register setup
        self.buffers = Some(Self::allocate(settings.resolution)?);

        self.write_reg(reg::MODE_SELECT, MODE_STREAMING).await?;
        Ok(())
    }

    async fn apply_tuning(&mut self, tuning: &SensorTuning) -> Result<(), SensorFailure> {
        if !self.is_configured() {
            return Err(SensorFailure::InvalidConfiguration);
        }

        let ceiling = gain_code(tuning.gain_ceiling);
        self.write_reg(reg::AE_CTRL, tuning.auto_exposure as u8).await?;
        if tuning.auto_gain {
            self.write_reg(reg::MAX_AGAIN_FULL, ceiling).await?;
            self.write_reg(reg::MAX_AGAIN_BIN2, ceiling).await?;
            self.write_reg(reg::MIN_AGAIN, 0x00).await?;
        } else {
            // Pin gain at the floor
            self.write_reg(reg::MAX_AGAIN_FULL, 0x00).await?;
            self.write_reg(reg::MAX_AGAIN_BIN2, 0x00).await?;
            self.write_reg(reg::ANALOG_GAIN, 0x00).await?;
        }

        let pattern = if tuning.test_pattern {
            TEST_PATTERN_WALKING_ONES
        } else {
            0x00
        };
        self.write_reg(reg::TEST_PATTERN_MODE, pattern).await?;
        self.write_reg(reg::GRP_PARAM_HOLD, 0x01).await
    }

    async fn deinit(&mut self) {
        // A dead sensor may not ack this
        let _ = self.write_reg(reg::MODE_SELECT, MODE_STANDBY).await;
        self.buffers = None;
        self.in_flight = false;
    }

    async fn acquire(&mut self) -> Option<Self::Frame<'_>> {
        let buffers = self.buffers.as_mut()?;
        self.capture.capture(&mut buffers.native).await.ok()?;

        if let Some(window) = buffers.window.as_mut() {
            crop_center(&buffers.native, window, buffers.resolution);
        }

        self.in_flight = true;
        Some(Hm01b0Frame { sensor: self })
    }
}

/// Analog gain register encoding
const fn gain_code(ceiling: GainCeiling) -> u8 {
    ceiling.multiplier().trailing_zeros() as u8
}

/// Frame on loan from an [`Hm01b0`]
///
/// The driver cannot capture again until this is dropped.
pub struct Hm01b0Frame<'a, I2C, CAP> {
    sensor: &'a mut Hm01b0<I2C, CAP>,
}

impl<I2C, CAP> AcquiredFrame for Hm01b0Frame<'_, I2C, CAP> {
    fn raw(&self) -> RawFrame<'_> {
        match self.sensor.buffers.as_ref() {
            Some(b) => {
                let data = b.window.as_deref().unwrap_or(&b.native);
                RawFrame::new(data, b.resolution, PixelFormat::Grayscale)
            }
            None => RawFrame::new(&[], Resolution::new(0, 0), PixelFormat::Grayscale),
        }
    }
}

impl<I2C, CAP> Drop for Hm01b0Frame<'_, I2C, CAP> {
    fn drop(&mut self) {
        self.sensor.in_flight = false;
    }
}
