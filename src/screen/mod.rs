//! Screen compositor.
//!
//! A [`Screen`] owns a drawing [`Canvas`] that may be larger than the
//! panel, and a [`ViewRect`] selecting which part of it is shown. On
//! [`refresh`](Screen::refresh) the view is cut out, reduced to 1-bit,
//! rotated to the panel's mounting direction and pushed through the
//! [`MonoDisplay`] it wraps.
//!
//! Sizes and coordinates on the screen side are logical: for a panel
//! mounted at 90 or 270 degrees width and height are already swapped.

mod canvas;
mod rect;

pub use canvas::{Canvas, CanvasColor, Rotation};
pub use rect::ViewRect;

use embedded_graphics_core::{
    geometry::{Point, Size},
    pixelcolor::BinaryColor,
    primitives::Rectangle,
};
use log::debug;

use crate::drivers::display::MonoDisplay;

pub struct Screen<D, C> {
    display: D,
    rotation: Rotation,
    display_size: Size,
    canvas: Canvas<C>,
    view: ViewRect,
}

impl<D: MonoDisplay, C: CanvasColor> Screen<D, C> {
    /// `buffer_size` defaults to the (logical) display size.
    pub fn new(display: D, buffer_size: Option<Size>, rotation: Rotation) -> Self {
        let panel = display.size();
        let display_size = if rotation.is_sideways() {
            Size::new(panel.height, panel.width)
        } else {
            panel
        };
        let canvas = Canvas::new(buffer_size.unwrap_or(display_size));
        debug!(
            "[SCREEN] {}x{} view on {}x{} buffer, rotated {}",
            display_size.width,
            display_size.height,
            canvas.width(),
            canvas.height(),
            rotation.degrees()
        );
        Self {
            display,
            rotation,
            display_size,
            canvas,
            view: Self::full_view(display_size),
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn display_size(&self) -> Size {
        self.display_size
    }

    pub fn buffer_size(&self) -> Size {
        Size::new(self.canvas.width(), self.canvas.height())
    }

    pub fn canvas(&self) -> &Canvas<C> {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas<C> {
        &mut self.canvas
    }

    pub fn view(&self) -> &ViewRect {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewRect {
        &mut self.view
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn clear_canvas(&mut self, fill: C) {
        self.canvas.fill(fill);
    }

    /// Fill only the part of the canvas under the view.
    pub fn clear_view(&mut self, fill: C) {
        let v = self.view;
        let area = Rectangle::new(
            Point::new(v.x, v.y),
            Size::new(v.width.max(0) as u32, v.height.max(0) as u32),
        );
        self.canvas.fill_rect(&area, fill);
    }

    /// Blank the canvas and the display's framebuffer. The panel itself
    /// changes on the next refresh.
    pub fn clear(&mut self) {
        self.canvas.fill(C::default());
        self.display.clear(BinaryColor::Off);
    }

    /// The current view as the panel will receive it.
    pub fn view_image(&self) -> Canvas<BinaryColor> {
        let view = self.canvas.crop(self.view.to_box(false)).to_mono();
        match self.rotation {
            Rotation::Deg0 => view,
            r => view.rotated(r),
        }
    }

    /// Push the current view to the panel.
    pub fn refresh(&mut self) -> Result<(), D::Error> {
        let image = self.view_image();
        self.display.set_image(&image)?;
        self.display.display()
    }

    /// Replace the buffer. The view is kept as is.
    pub fn redefine_buffer(&mut self, canvas: Canvas<C>) {
        self.canvas = canvas;
    }

    /// Replace the buffer with a blank one of `size`.
    pub fn redefine_buffer_size(&mut self, size: Size) {
        self.canvas = Canvas::new(size);
    }

    /// Switch colour mode. The buffer starts over blank at display size
    /// and the view is reset.
    pub fn into_color_mode<C2: CanvasColor>(self) -> Screen<D, C2> {
        Screen {
            display: self.display,
            rotation: self.rotation,
            display_size: self.display_size,
            canvas: Canvas::new(self.display_size),
            view: Self::full_view(self.display_size),
        }
    }

    pub fn release(self) -> D {
        self.display
    }

    fn full_view(size: Size) -> ViewRect {
        ViewRect::new(0, 0, size.width as i32, size.height as i32)
    }
}
