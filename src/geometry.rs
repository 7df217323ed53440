use ratatui::layout::{Rect, Size};

/// Signed screen coordinate. Overlays may be dragged or placed partially
/// off-screen, so positions are never clamped to `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset_from(self, origin: Point) -> Point {
        Point {
            x: self.x - origin.x,
            y: self.y - origin.y,
        }
    }

    pub const fn minus(self, offset: Point) -> Point {
        Point {
            x: self.x - offset.x,
            y: self.y - offset.y,
        }
    }
}

impl From<(u16, u16)> for Point {
    fn from((column, row): (u16, u16)) -> Self {
        Self {
            x: column as i32,
            y: row as i32,
        }
    }
}

/// Signed floating rectangle origin with unsigned size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        let max_x = self.x + self.width as i32;
        let max_y = self.y + self.height as i32;
        point.x >= self.x && point.x < max_x && point.y >= self.y && point.y < max_y
    }

    /// Portion of this rectangle visible inside `bounds`, or `None` when it is
    /// entirely outside.
    pub fn clip_to(&self, bounds: Rect) -> Option<Rect> {
        let left = self.x.max(bounds.x as i32);
        let top = self.y.max(bounds.y as i32);
        let right = (self.x + self.width as i32).min(bounds.x as i32 + bounds.width as i32);
        let bottom = (self.y + self.height as i32).min(bounds.y as i32 + bounds.height as i32);
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect {
            x: left as u16,
            y: top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        })
    }
}
