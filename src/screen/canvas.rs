// Owned pixel buffer the compositor draws into.
//
// Canvas<BinaryColor> is the monochrome mode, Canvas<Rgb888> the colour
// mode. Everything outside the buffer is clipped on draw and reads back
// as the colour's default (black / off).

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics_core::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Point, Size},
    pixelcolor::{BinaryColor, Rgb888, RgbColor},
    primitives::Rectangle,
};

/// Counter-clockwise rotation applied when the view is pushed out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const fn from_degrees(deg: u16) -> Option<Self> {
        match deg {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Width and height trade places.
    pub const fn is_sideways(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// Colours a canvas can hold. `to_mono` is how a view of that colour is
/// reduced before reaching a 1-bit display.
pub trait CanvasColor: embedded_graphics_core::pixelcolor::PixelColor + Default {
    fn to_mono(canvas: &Canvas<Self>) -> Canvas<BinaryColor>;
}

impl CanvasColor for BinaryColor {
    fn to_mono(canvas: &Canvas<Self>) -> Canvas<BinaryColor> {
        canvas.clone()
    }
}

impl CanvasColor for Rgb888 {
    // ITU-R 601 luma, then Floyd-Steinberg error diffusion; a pixel is lit
    // strictly above 128
    fn to_mono(canvas: &Canvas<Self>) -> Canvas<BinaryColor> {
        let w = canvas.width as usize;
        let h = canvas.height as usize;
        let mut luma: Vec<i16> = canvas
            .pixels
            .iter()
            .map(|c| {
                ((c.r() as u32 * 299 + c.g() as u32 * 587 + c.b() as u32 * 114) / 1000) as i16
            })
            .collect();

        let mut out = Canvas::new(Size::new(canvas.width, canvas.height));
        for y in 0..h {
            for x in 0..w {
                let i = y * w + x;
                let old = luma[i].clamp(0, 255);
                let (new, on) = if old > 128 { (255, true) } else { (0, false) };
                if on {
                    out.pixels[i] = BinaryColor::On;
                }
                let err = old - new;
                if x + 1 < w {
                    luma[i + 1] += err * 7 / 16;
                }
                if y + 1 < h {
                    if x > 0 {
                        luma[i + w - 1] += err * 3 / 16;
                    }
                    luma[i + w] += err * 5 / 16;
                    if x + 1 < w {
                        luma[i + w + 1] += err / 16;
                    }
                }
            }
        }
        out
    }
}

// in usize so a large size can't wrap before the allocation sees it
fn pixel_count(size: Size) -> usize {
    size.width as usize * size.height as usize
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas<C> {
    width: u32,
    height: u32,
    pixels: Vec<C>,
}

impl<C: CanvasColor> Canvas<C> {
    pub fn new(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            pixels: vec![C::default(); pixel_count(size)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<C> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: C) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn fill(&mut self, color: C) {
        self.pixels.fill(color);
    }

    /// Fill `area`, clipped to the canvas.
    pub fn fill_rect(&mut self, area: &Rectangle, color: C) {
        let clipped = area.intersection(&self.bounding_box());
        let Some(br) = clipped.bottom_right() else {
            return;
        };
        for y in clipped.top_left.y..=br.y {
            for x in clipped.top_left.x..=br.x {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Copy of the `[x0, y0, x1, y1)` box. Parts outside the canvas come
    /// back as the default colour.
    pub fn crop(&self, bx: [i32; 4]) -> Self {
        let [x0, y0, x1, y1] = bx;
        let w = (x1 - x0).max(0) as u32;
        let h = (y1 - y0).max(0) as u32;
        let mut out = Self::new(Size::new(w, h));
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                if let Some(c) = self.pixel(x0 + x, y0 + y) {
                    out.set_pixel(x, y, c);
                }
            }
        }
        out
    }

    /// Rotated counter-clockwise; the result grows to hold the whole image.
    pub fn rotated(&self, rotation: Rotation) -> Self {
        let (w, h) = (self.width as i32, self.height as i32);
        let size = if rotation.is_sideways() {
            Size::new(self.height, self.width)
        } else {
            Size::new(self.width, self.height)
        };
        let mut out = Self::new(size);
        for oy in 0..size.height as i32 {
            for ox in 0..size.width as i32 {
                let (sx, sy) = match rotation {
                    Rotation::Deg0 => (ox, oy),
                    Rotation::Deg90 => (w - 1 - oy, ox),
                    Rotation::Deg180 => (w - 1 - ox, h - 1 - oy),
                    Rotation::Deg270 => (oy, h - 1 - ox),
                };
                if let Some(c) = self.pixel(sx, sy) {
                    out.set_pixel(ox, oy, c);
                }
            }
        }
        out
    }

    pub fn to_mono(&self) -> Canvas<BinaryColor> {
        C::to_mono(self)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl<C: CanvasColor> DrawTarget for Canvas<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            self.set_pixel(x, y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

impl<C> OriginDimensions for Canvas<C> {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked() -> Canvas<BinaryColor> {
        // 4x2 with the top-right corner lit
        let mut c = Canvas::new(Size::new(4, 2));
        c.set_pixel(3, 0, BinaryColor::On);
        c
    }

    #[test]
    fn out_of_bounds_is_clipped() {
        let mut c: Canvas<BinaryColor> = Canvas::new(Size::new(2, 2));
        c.set_pixel(-1, 0, BinaryColor::On);
        c.set_pixel(2, 0, BinaryColor::On);
        assert_eq!(c.pixel(2, 0), None);
        assert!(c.pixels.iter().all(|p| *p == BinaryColor::Off));
    }

    #[test]
    fn crop_pads_with_default() {
        let c = marked();
        let cut = c.crop([2, -1, 5, 1]);
        assert_eq!(cut.size(), Size::new(3, 2));
        assert_eq!(cut.pixel(1, 1), Some(BinaryColor::On));
        assert_eq!(cut.pixel(2, 1), Some(BinaryColor::Off));
    }

    #[test]
    fn rotation_is_counter_clockwise() {
        let c = marked();

        let r90 = c.rotated(Rotation::Deg90);
        assert_eq!(r90.size(), Size::new(2, 4));
        assert_eq!(r90.pixel(0, 0), Some(BinaryColor::On));

        let r180 = c.rotated(Rotation::Deg180);
        assert_eq!(r180.pixel(0, 1), Some(BinaryColor::On));

        let r270 = c.rotated(Rotation::Deg270);
        assert_eq!(r270.size(), Size::new(2, 4));
        assert_eq!(r270.pixel(1, 3), Some(BinaryColor::On));

        assert_eq!(c.rotated(Rotation::Deg0), c);
    }

    #[test]
    fn fill_rect_clips() {
        let mut c: Canvas<BinaryColor> = Canvas::new(Size::new(4, 4));
        c.fill_rect(
            &Rectangle::new(Point::new(2, 2), Size::new(10, 10)),
            BinaryColor::On,
        );
        let lit = c.pixels.iter().filter(|p| **p == BinaryColor::On).count();
        assert_eq!(lit, 4);
    }

    #[test]
    fn rgb_extremes_convert_exactly() {
        let mut c: Canvas<Rgb888> = Canvas::new(Size::new(4, 4));
        c.fill(Rgb888::WHITE);
        c.set_pixel(0, 0, Rgb888::BLACK);
        let m = c.to_mono();
        assert_eq!(m.pixel(0, 0), Some(BinaryColor::Off));
        assert_eq!(m.pixel(3, 3), Some(BinaryColor::On));
    }

    #[test]
    fn mid_grey_dithers_to_about_half() {
        let mut c: Canvas<Rgb888> = Canvas::new(Size::new(16, 16));
        c.fill(Rgb888::new(128, 128, 128));
        let m = c.to_mono();
        let lit = m.pixels.iter().filter(|p| **p == BinaryColor::On).count();
        assert!((100..=156).contains(&lit), "lit = {lit}");
    }

    #[test]
    fn luma_128_stays_off() {
        let mut c: Canvas<Rgb888> = Canvas::new(Size::new(1, 1));
        c.fill(Rgb888::new(128, 128, 128));
        assert_eq!(c.to_mono().pixel(0, 0), Some(BinaryColor::Off));
        c.fill(Rgb888::new(129, 129, 129));
        assert_eq!(c.to_mono().pixel(0, 0), Some(BinaryColor::On));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn pixel_count_does_not_wrap() {
        assert_eq!(pixel_count(Size::new(65536, 65536)), 1usize << 32);
        assert_eq!(pixel_count(Size::new(u32::MAX, 2)), u32::MAX as usize * 2);
    }

    #[test]
    fn degrees_round_trip() {
        assert_eq!(Rotation::from_degrees(270), Some(Rotation::Deg270));
        assert_eq!(Rotation::from_degrees(45), None);
        assert_eq!(Rotation::Deg90.degrees(), 90);
    }
}
