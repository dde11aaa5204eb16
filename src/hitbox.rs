//! Axis-aligned collision boxes in screen pixel coordinates

/// Size and offset of a hitbox centred inside a square sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitboxShape {
    pub width: i32,
    pub height: i32,
    pub x_offset: i32,
    pub y_offset: i32,
}

impl HitboxShape {
    /// Scales a `size`x`size` sprite box down by `scale`, truncating to whole pixels
    pub fn new(size: u32, scale: f32) -> Self {
        let size = size as i32;
        let side = (size as f32 * scale) as i32;
        let offset = (size - side) / 2;
        Self {
            width: side,
            height: side,
            x_offset: offset,
            y_offset: offset,
        }
    }

    /// Places the shape on a sprite whose top-left corner is at `(x, y)`
    pub fn at(&self, x: i32, y: i32) -> Hitbox {
        let x1 = x + self.x_offset;
        let y1 = y + self.y_offset;
        Hitbox {
            x1,
            y1,
            x2: x1 + self.width,
            y2: y1 + self.height,
        }
    }
}

/// A box spanning `[x1, x2) x [y1, y2)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hitbox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Hitbox {
    pub fn from_rect(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width as i32,
            y2: y + height as i32,
        }
    }

    pub fn as_tuple(&self) -> (i32, i32, i32, i32) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Boxes that only touch along an edge do not intersect
    pub fn intersects(&self, other: &Hitbox) -> bool {
        self.x1 < other.x2 && self.x2 > other.x1 && self.y1 < other.y2 && self.y2 > other.y1
    }
}
