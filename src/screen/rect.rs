/// Movable window onto the screen buffer. Only this region reaches the
/// display on refresh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ViewRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    pub fn adjust_size(&mut self, dw: i32, dh: i32) {
        self.width += dw;
        self.height += dh;
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn move_offset(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    pub fn swap_wh(&mut self) {
        core::mem::swap(&mut self.width, &mut self.height);
    }

    /// `[left, top, right, bottom]`, right/bottom exclusive. With `swap`
    /// the extents are taken as if width and height were exchanged.
    pub const fn to_box(&self, swap: bool) -> [i32; 4] {
        let (w, h) = if swap {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        };
        [self.x, self.y, self.x + w, self.y + h]
    }
}
