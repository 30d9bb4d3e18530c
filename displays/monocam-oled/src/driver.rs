//! OLED driver

use core::convert::Infallible;

use embedded_graphics::image::{Image, ImageRaw};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use embedded_hal_async::i2c::I2c;
use monocam_core::traits::{DisplayError, MonoDisplay};

use crate::command as cmd;

/// Usual I2C address (0x3D with the address pad bridged)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Display dimensions
pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
pub const PAGES: usize = HEIGHT / 8;

/// Text row pitch for the 6x10 font
const ROW_HEIGHT: i32 = 10;

/// Panel controller variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Controller {
    Ssd1306,
    /// 132-column RAM with the panel centered, so column 0 is RAM column 2
    Sh1106,
}

impl Controller {
    pub const fn column_offset(&self) -> u8 {
        match self {
            Controller::Ssd1306 => 0,
            Controller::Sh1106 => 2,
        }
    }

    /// Controller-specific part of the init sequence
    const fn power_commands(&self) -> [u8; 4] {
        match self {
            Controller::Ssd1306 => [
                cmd::SSD1306_CHARGE_PUMP,
                0x14,
                cmd::SSD1306_ADDRESSING_MODE,
                0x02,
            ],
            Controller::Sh1106 => [cmd::SH1106_DCDC, 0x8B, cmd::NOP, cmd::NOP],
        }
    }
}

/// Buffered 128x64 OLED on an async I2C bus
pub struct Oled<I2C> {
    i2c: I2C,
    address: u8,
    controller: Controller,
    /// Frame buffer, one byte per 8 vertical pixels, LSB at the top
    buffer: [[u8; WIDTH]; PAGES],
    initialized: bool,
}

impl<I2C> Oled<I2C> {
    pub fn new(i2c: I2C, address: u8, controller: Controller) -> Self {
        Self {
            i2c,
            address,
            controller,
            buffer: [[0; WIDTH]; PAGES],
            initialized: false,
        }
    }

    /// Raw page buffer
    pub fn buffer(&self) -> &[[u8; WIDTH]; PAGES] {
        &self.buffer
    }

    /// Read back one pixel of the frame buffer
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        self.buffer[y / 8][x] & (1 << (y % 8)) != 0
    }

    fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if x < 0 || y < 0 || x as usize >= WIDTH || y as usize >= HEIGHT {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let mask = 1 << (y % 8);
        if on {
            self.buffer[y / 8][x] |= mask;
        } else {
            self.buffer[y / 8][x] &= !mask;
        }
    }
}

impl<I2C: I2c> Oled<I2C> {
    /// Send a command to the display
    async fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, &[cmd::CONTROL_COMMAND, cmd])
            .await
            .map_err(|_| DisplayError::Communication)
    }
}

impl<I2C> OriginDimensions for Oled<I2C> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<I2C> DrawTarget for Oled<I2C> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<It>(&mut self, pixels: It) -> Result<(), Self::Error>
    where
        It: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}

impl<I2C: I2c> MonoDisplay for Oled<I2C> {
    fn bus_address(&self) -> u8 {
        self.address
    }

    async fn probe(&mut self) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, &[cmd::CONTROL_COMMAND, cmd::NOP])
            .await
            .map_err(|_| DisplayError::NotFound)
    }

    async fn init(&mut self) -> Result<(), DisplayError> {
        let common: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_SEG_REMAP,    // Flip horizontally
            cmd::SET_COM_SCAN_DEC, // Flip vertically
            cmd::SET_COM_PINS,
            0x12, // Alternative COM config
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
        ];

        self.initialized = false;
        for &c in common {
            self.command(c).await?;
        }
        for c in self.controller.power_commands() {
            self.command(c).await?;
        }
        self.command(cmd::SET_NORMAL).await?;
        self.command(cmd::DISPLAY_ON).await?;

        self.initialized = true;
        Ok(())
    }

    fn clear(&mut self) {
        for page in self.buffer.iter_mut() {
            page.fill(0);
        }
    }

    fn draw_bitmap(&mut self, x: i32, y: i32, bitmap: &[u8], width: u32, height: u32) {
        let stride = width.div_ceil(8) as usize;
        let len = (stride * height as usize).min(bitmap.len());
        let raw = ImageRaw::<BinaryColor>::new(&bitmap[..len], width);
        let _ = Image::new(&raw, Point::new(x, y)).draw(self);
    }

    fn draw_text(&mut self, row: u8, text: &str) {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let origin = Point::new(0, row as i32 * ROW_HEIGHT);
        let _ = Text::with_baseline(text, origin, style, Baseline::Top).draw(self);
    }

    async fn flush(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }

        let offset = self.controller.column_offset();
        for page in 0..PAGES {
            self.command(cmd::SET_PAGE_ADDR | page as u8).await?;
            self.command(cmd::SET_LOW_COLUMN | (offset & 0x0F)).await?;
            self.command(cmd::SET_HIGH_COLUMN | (offset >> 4)).await?;

            let mut data = [0u8; WIDTH + 1];
            data[0] = cmd::CONTROL_DATA;
            data[1..].copy_from_slice(&self.buffer[page]);
            self.i2c
                .write(self.address, &data)
                .await
                .map_err(|_| DisplayError::Communication)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embedded_hal_async::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};
    use std::vec::Vec;

    /// Records every write; optionally NAKs everything
    #[derive(Default)]
    struct MockI2c {
        writes: Vec<(u8, Vec<u8>)>,
        nak: bool,
    }

    impl ErrorType for MockI2c {
        type Error = ErrorKind;
    }

    impl I2c for MockI2c {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.nak {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    fn ready(controller: Controller) -> Oled<MockI2c> {
        let mut oled = Oled::new(MockI2c::default(), DEFAULT_ADDRESS, controller);
        block_on(oled.init()).unwrap();
        oled.i2c.writes.clear();
        oled
    }

    fn data_writes(oled: &Oled<MockI2c>) -> Vec<&Vec<u8>> {
        oled.i2c
            .writes
            .iter()
            .map(|(_, bytes)| bytes)
            .filter(|b| b[0] == cmd::CONTROL_DATA)
            .collect()
    }

    #[test]
    fn test_probe_found_and_missing() {
        let mut oled = Oled::new(MockI2c::default(), 0x3D, Controller::Ssd1306);
        assert_eq!(block_on(oled.probe()), Ok(()));
        assert_eq!(oled.i2c.writes[0], (0x3D, std::vec![0x00, cmd::NOP]));

        let mut oled = Oled::new(
            MockI2c {
                nak: true,
                ..Default::default()
            },
            0x3C,
            Controller::Ssd1306,
        );
        assert_eq!(block_on(oled.probe()), Err(DisplayError::NotFound));
        assert_eq!(block_on(oled.init()), Err(DisplayError::Communication));
    }

    #[test]
    fn test_init_sequence_per_controller() {
        let mut oled = Oled::new(MockI2c::default(), DEFAULT_ADDRESS, Controller::Ssd1306);
        block_on(oled.init()).unwrap();
        let cmds: Vec<u8> = oled.i2c.writes.iter().map(|(_, b)| b[1]).collect();
        assert_eq!(cmds.first(), Some(&cmd::DISPLAY_OFF));
        assert_eq!(cmds.last(), Some(&cmd::DISPLAY_ON));
        assert!(cmds.windows(2).any(|w| w == [cmd::SSD1306_CHARGE_PUMP, 0x14]));

        let mut oled = Oled::new(MockI2c::default(), DEFAULT_ADDRESS, Controller::Sh1106);
        block_on(oled.init()).unwrap();
        let cmds: Vec<u8> = oled.i2c.writes.iter().map(|(_, b)| b[1]).collect();
        assert!(cmds.windows(2).any(|w| w == [cmd::SH1106_DCDC, 0x8B]));
        assert!(!cmds.contains(&cmd::SSD1306_CHARGE_PUMP));
    }

    #[test]
    fn test_flush_requires_init() {
        let mut oled = Oled::new(MockI2c::default(), DEFAULT_ADDRESS, Controller::Ssd1306);
        assert_eq!(block_on(oled.flush()), Err(DisplayError::NotInitialized));
        assert!(oled.i2c.writes.is_empty());
    }

    #[test]
    fn test_flush_writes_every_page() {
        let mut oled = ready(Controller::Ssd1306);
        block_on(oled.flush()).unwrap();

        let data = data_writes(&oled);
        assert_eq!(data.len(), PAGES);
        assert!(data.iter().all(|d| d.len() == WIDTH + 1));
        // 3 addressing commands per page
        assert_eq!(oled.i2c.writes.len(), PAGES * 4);
    }

    #[test]
    fn test_sh1106_column_offset() {
        let mut oled = ready(Controller::Sh1106);
        block_on(oled.flush()).unwrap();
        let writes = &oled.i2c.writes;
        assert_eq!(writes[0].1, std::vec![0x00, cmd::SET_PAGE_ADDR]);
        assert_eq!(writes[1].1, std::vec![0x00, cmd::SET_LOW_COLUMN | 2]);
        assert_eq!(writes[2].1, std::vec![0x00, cmd::SET_HIGH_COLUMN]);

        let mut oled = ready(Controller::Ssd1306);
        block_on(oled.flush()).unwrap();
        assert_eq!(oled.i2c.writes[1].1, std::vec![0x00, cmd::SET_LOW_COLUMN]);
    }

    #[test]
    fn test_bitmap_blit_to_pages() {
        let mut oled = ready(Controller::Ssd1306);

        // MSB-first row-major: light (0,0), (7,0) and (0,9)
        let mut bitmap = [0u8; WIDTH * HEIGHT / 8];
        bitmap[0] = 0b1000_0001;
        bitmap[9 * WIDTH / 8] = 0b1000_0000;
        oled.draw_bitmap(0, 0, &bitmap, WIDTH as u32, HEIGHT as u32);

        assert!(oled.pixel(0, 0));
        assert!(oled.pixel(7, 0));
        assert!(!oled.pixel(1, 0));
        assert!(oled.pixel(0, 9));
        assert_eq!(oled.buffer()[0][0], 0b0000_0001);
        assert_eq!(oled.buffer()[1][0], 0b0000_0010);

        block_on(oled.flush()).unwrap();
        let data = data_writes(&oled);
        assert_eq!(data[0][1], 0b0000_0001);
        assert_eq!(data[1][1], 0b0000_0010);
    }

    #[test]
    fn test_full_bitmap_clears_stale_pixels() {
        let mut oled = ready(Controller::Ssd1306);
        oled.draw_bitmap(0, 0, &[0xFF; WIDTH * HEIGHT / 8], WIDTH as u32, HEIGHT as u32);
        assert!(oled.buffer().iter().all(|p| p.iter().all(|&b| b == 0xFF)));

        oled.draw_bitmap(0, 0, &[0x00; WIDTH * HEIGHT / 8], WIDTH as u32, HEIGHT as u32);
        assert!(oled.buffer().iter().all(|p| p.iter().all(|&b| b == 0)));
    }

    #[test]
    fn test_text_rows_and_clear() {
        let mut oled = ready(Controller::Ssd1306);
        oled.draw_text(1, "Hi");
        let lit_rows: Vec<usize> = (0..HEIGHT)
            .filter(|&y| (0..WIDTH).any(|x| oled.pixel(x, y)))
            .collect();
        assert!(!lit_rows.is_empty());
        assert!(lit_rows.iter().all(|&y| (10..20).contains(&y)));

        MonoDisplay::clear(&mut oled);
        assert!(oled.buffer().iter().all(|p| p.iter().all(|&b| b == 0)));
    }

    #[test]
    fn test_out_of_range_pixels_ignored() {
        let mut oled = ready(Controller::Ssd1306);
        oled.draw_bitmap(120, 60, &[0xFF; 2 * 16], 16, 16);
        assert!(oled.pixel(127, 63));
        assert!(!oled.pixel(119, 63));
    }
}
