// SSD1306 128x64 OLED driver (4-wire SPI, board-independent)
//
// Framebuffer lives here; the controller runs in vertical addressing
// mode so the buffer is column-major: byte x * PAGES + y / 8, bit y % 8,
// bit set = pixel lit. `display()` streams all 1024 bytes in one go.
//
// D/C low for commands, high for data. The reset line is optional; pass
// `None::<NoReset>` when the panel has none wired.

use core::convert::Infallible;

use embedded_graphics_core::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, Error as _, OutputPin};
use embedded_hal::spi::SpiDevice;
use log::{debug, info};

use super::display::MonoDisplay;
use crate::screen::Canvas;

pub const WIDTH: u16 = 128;
pub const HEIGHT: u16 = 64;
pub const PAGES: u16 = HEIGHT / 8;
pub const FRAMEBUFFER_SIZE: usize = (WIDTH as usize) * (PAGES as usize);

const RESET_HIGH_MS: u32 = 2;
const RESET_LOW_MS: u32 = 15;

#[allow(dead_code)]
mod cmd {
    pub const SET_MEM_ADDR_MODE: u8 = 0x20;
    pub const SET_COLUMN_ADDR: u8 = 0x21;
    pub const SET_PAGE_ADDR: u8 = 0x22;
    pub const SCROLL_HORIZONTAL_RIGHT: u8 = 0x26;
    pub const SCROLL_HORIZONTAL_LEFT: u8 = 0x27;
    pub const SCROLL_VERTICAL_RIGHT: u8 = 0x29;
    pub const SCROLL_VERTICAL_LEFT: u8 = 0x2A;
    pub const SCROLL_DEACTIVATE: u8 = 0x2E;
    pub const SCROLL_ACTIVATE: u8 = 0x2F;
    pub const SET_START_LINE: u8 = 0x40; // | line (0..63)
    pub const SET_CONTRAST: u8 = 0x81;
    pub const CHARGE_PUMP: u8 = 0x8D;
    pub const SEGMENT_REMAP_0: u8 = 0xA0;
    pub const SEGMENT_REMAP_1: u8 = 0xA1;
    pub const SET_VERTICAL_SCROLL_AREA: u8 = 0xA3;
    pub const ENTIRE_DISPLAY_RAM: u8 = 0xA4;
    pub const ENTIRE_DISPLAY_ON: u8 = 0xA5;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const INVERSE_DISPLAY: u8 = 0xA7;
    pub const SET_MULTIPLEX_RATIO: u8 = 0xA8;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const COM_SCAN_INC: u8 = 0xC0;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_CLOCK_DIVIDE: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DESELECT: u8 = 0xDB;
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error<E> {
    Spi(E),
    Pin(digital::ErrorKind),
    /// `set_image` got a canvas that is not the panel size.
    InvalidImageSize { width: u32, height: u32 },
    /// The controller has no such feature (brightness).
    Unsupported,
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Spi(e) => write!(f, "SSD1306 SPI error: {:?}", e),
            Error::Pin(kind) => write!(f, "SSD1306 pin error: {:?}", kind),
            Error::InvalidImageSize { width, height } => write!(
                f,
                "image is {}x{}, panel is {}x{}",
                width, height, WIDTH, HEIGHT
            ),
            Error::Unsupported => f.write_str("not supported by the SSD1306"),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for Error<E> {}

/// Placeholder for a panel without a reset line.
pub struct NoReset;

impl digital::ErrorType for NoReset {
    type Error = Infallible;
}

impl OutputPin for NoReset {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollDirection {
    #[default]
    Left,
    Right,
}

/// Continuous scroll set-up; pages are 0..=7, lines 0..=63.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollConfig {
    pub h_start: u8,
    pub h_end: u8,
    /// Rows per step; 0 turns vertical scrolling off.
    pub v_offset: u8,
    pub v_start: u8,
    pub v_end: u8,
    /// Frame interval code between steps.
    pub interval: u8,
    pub direction: ScrollDirection,
}

pub struct Ssd1306<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: Option<RST>,
    mirror_h: bool,
    mirror_v: bool,
    buf: [u8; FRAMEBUFFER_SIZE],
}

impl<SPI, DC, RST, E> Ssd1306<SPI, DC, RST>
where
    SPI: SpiDevice<Error = E>,
    DC: OutputPin,
    RST: OutputPin,
{
    pub fn new(spi: SPI, dc: DC, rst: Option<RST>, mirror_h: bool, mirror_v: bool) -> Self {
        Self {
            spi,
            dc,
            rst,
            mirror_h,
            mirror_v,
            buf: [0x00; FRAMEBUFFER_SIZE],
        }
    }

    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        let Some(rst) = self.rst.as_mut() else {
            return Ok(());
        };
        rst.set_high().map_err(|e| Error::Pin(e.kind()))?;
        delay.delay_ms(RESET_HIGH_MS);
        rst.set_low().map_err(|e| Error::Pin(e.kind()))?;
        delay.delay_ms(RESET_LOW_MS);
        rst.set_high().map_err(|e| Error::Pin(e.kind()))?;
        Ok(())
    }

    /// Reset and program the controller. The panel stays dark until `on()`.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        self.reset(delay)?;
        self.init_display()?;
        info!(
            "[OLED] SSD1306 {}x{} ready (mirror h={} v={})",
            WIDTH, HEIGHT, self.mirror_h, self.mirror_v
        );
        Ok(())
    }

    pub fn on(&mut self) -> Result<(), Error<E>> {
        self.send_command(&[cmd::DISPLAY_ON])
    }

    pub fn off(&mut self) -> Result<(), Error<E>> {
        self.send_command(&[cmd::DISPLAY_OFF])
    }

    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), Error<E>> {
        self.send_command(&[cmd::SET_CONTRAST, contrast])
    }

    /// Always `Error::Unsupported`: the SSD1306 only has contrast.
    pub fn set_brightness(&mut self, _brightness: u8) -> Result<(), Error<E>> {
        Err(Error::Unsupported)
    }

    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), Error<E>> {
        let c = if inverted {
            cmd::INVERSE_DISPLAY
        } else {
            cmd::NORMAL_DISPLAY
        };
        self.send_command(&[c])
    }

    /// Fill the framebuffer. Nothing is sent until `display()`.
    pub fn clear(&mut self, color: BinaryColor) {
        self.buf.fill(if color.is_on() { 0xFF } else { 0x00 });
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    /// Push the framebuffer to the panel.
    pub fn display(&mut self) -> Result<(), Error<E>> {
        self.set_window()?;
        let Self { spi, dc, buf, .. } = self;
        dc.set_high().map_err(|e| Error::Pin(e.kind()))?;
        spi.write(&buf[..]).map_err(Error::Spi)
    }

    /// Push an external buffer laid out like the framebuffer.
    pub fn display_buffer(&mut self, data: &[u8]) -> Result<(), Error<E>> {
        self.set_window()?;
        self.send_data(data)
    }

    /// Pack a 1-bit image of exactly panel size into the framebuffer.
    pub fn set_image(&mut self, image: &Canvas<BinaryColor>) -> Result<(), Error<E>> {
        if image.width() != WIDTH as u32 || image.height() != HEIGHT as u32 {
            return Err(Error::InvalidImageSize {
                width: image.width(),
                height: image.height(),
            });
        }

        let mut bi = 0;
        for x in 0..WIDTH as i32 {
            for page in 0..PAGES as i32 {
                let mut bits = 0u8;
                for py in 0..8 {
                    if image.pixel(x, page * 8 + py) == Some(BinaryColor::On) {
                        bits |= 1 << py;
                    }
                }
                self.buf[bi] = bits;
                bi += 1;
            }
        }
        Ok(())
    }

    // ── Scrolling ───────────────────────────────────────────

    pub fn scroll_on(&mut self) -> Result<(), Error<E>> {
        self.send_command(&[cmd::SCROLL_ACTIVATE])
    }

    pub fn scroll_off(&mut self) -> Result<(), Error<E>> {
        self.send_command(&[cmd::SCROLL_DEACTIVATE])
    }

    /// Configure and start continuous scrolling.
    pub fn scroll_with(&mut self, cfg: &ScrollConfig) -> Result<(), Error<E>> {
        self.send_command(&[cmd::SCROLL_DEACTIVATE])?;

        if cfg.v_offset != 0 {
            self.send_command(&[cmd::SET_VERTICAL_SCROLL_AREA, cfg.v_start, cfg.v_end, 0x00])?;
        }

        let dir = match cfg.direction {
            ScrollDirection::Left => cmd::SCROLL_VERTICAL_LEFT,
            ScrollDirection::Right => cmd::SCROLL_VERTICAL_RIGHT,
        };
        self.send_command(&[
            dir,
            0x00,
            cfg.h_start,
            cfg.interval,
            cfg.h_end,
            cfg.v_offset,
            0x00,
            cmd::SCROLL_ACTIVATE,
        ])?;
        debug!("[OLED] scroll {:?}", cfg);
        Ok(())
    }

    // ── Controller setup ────────────────────────────────────

    fn init_display(&mut self) -> Result<(), Error<E>> {
        let com_scan = if self.mirror_v {
            cmd::COM_SCAN_INC
        } else {
            cmd::COM_SCAN_DEC
        };
        let seg_remap = if self.mirror_h {
            cmd::SEGMENT_REMAP_0
        } else {
            cmd::SEGMENT_REMAP_1
        };

        self.send_command(&[
            cmd::DISPLAY_OFF,
            cmd::SCROLL_DEACTIVATE,
            cmd::SET_MULTIPLEX_RATIO,
            0x3F,
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_COM_PINS,
            0x02 | 0x10, // alternative COM config, no left/right remap
            cmd::SET_CONTRAST,
            0x7F,
            cmd::ENTIRE_DISPLAY_RAM,
            cmd::NORMAL_DISPLAY,
            cmd::SET_CLOCK_DIVIDE,
            0x80,
            cmd::CHARGE_PUMP,
            0x14,
            cmd::SET_MEM_ADDR_MODE,
            0x01, // vertical
            com_scan,
            seg_remap,
        ])
    }

    fn set_window(&mut self) -> Result<(), Error<E>> {
        self.send_command(&[
            cmd::SET_COLUMN_ADDR,
            0,
            (WIDTH - 1) as u8,
            cmd::SET_PAGE_ADDR,
            0,
            (PAGES - 1) as u8,
        ])
    }

    // ── Low-level SPI ───────────────────────────────────────

    fn send_command(&mut self, bytes: &[u8]) -> Result<(), Error<E>> {
        self.dc.set_low().map_err(|e| Error::Pin(e.kind()))?;
        self.spi.write(bytes).map_err(Error::Spi)
    }

    fn send_data(&mut self, bytes: &[u8]) -> Result<(), Error<E>> {
        self.dc.set_high().map_err(|e| Error::Pin(e.kind()))?;
        self.spi.write(bytes).map_err(Error::Spi)
    }

    fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        let index = x as usize * PAGES as usize + (y / 8) as usize;
        let bit = 1u8 << (y % 8);
        if on {
            self.buf[index] |= bit;
        } else {
            self.buf[index] &= !bit;
        }
    }
}

impl<SPI, DC, RST, E> MonoDisplay for Ssd1306<SPI, DC, RST>
where
    SPI: SpiDevice<Error = E>,
    DC: OutputPin,
    RST: OutputPin,
{
    type Error = Error<E>;

    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }

    fn clear(&mut self, color: BinaryColor) {
        Ssd1306::clear(self, color);
    }

    fn set_image(&mut self, image: &Canvas<BinaryColor>) -> Result<(), Self::Error> {
        Ssd1306::set_image(self, image)
    }

    fn display(&mut self) -> Result<(), Self::Error> {
        Ssd1306::display(self)
    }
}

impl<SPI, DC, RST, E> DrawTarget for Ssd1306<SPI, DC, RST>
where
    SPI: SpiDevice<Error = E>,
    DC: OutputPin,
    RST: OutputPin,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
                continue;
            }
            self.set_pixel(x as u32, y as u32, color.is_on());
        }
        Ok(())
    }
}

impl<SPI, DC, RST> OriginDimensions for Ssd1306<SPI, DC, RST> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}
