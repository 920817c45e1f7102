//! Display seam for the screen compositor.
//!
//! A 1-bit panel with its own framebuffer: the compositor hands it a
//! finished image with [`MonoDisplay::set_image`], and
//! [`MonoDisplay::display`] pushes the framebuffer to the glass.

use embedded_graphics_core::{geometry::Size, pixelcolor::BinaryColor};

use crate::screen::Canvas;

pub trait MonoDisplay {
    type Error;

    /// Physical (unrotated) panel size.
    fn size(&self) -> Size;

    /// Fill the framebuffer; nothing is sent to the panel.
    fn clear(&mut self, color: BinaryColor);

    /// Replace the framebuffer with `image`, which must match [`size`](Self::size).
    fn set_image(&mut self, image: &Canvas<BinaryColor>) -> Result<(), Self::Error>;

    /// Write the framebuffer to the panel.
    fn display(&mut self) -> Result<(), Self::Error>;
}

impl<T: MonoDisplay + ?Sized> MonoDisplay for &mut T {
    type Error = T::Error;

    fn size(&self) -> Size {
        (**self).size()
    }

    fn clear(&mut self, color: BinaryColor) {
        (**self).clear(color)
    }

    fn set_image(&mut self, image: &Canvas<BinaryColor>) -> Result<(), Self::Error> {
        (**self).set_image(image)
    }

    fn display(&mut self) -> Result<(), Self::Error> {
        (**self).display()
    }
}
