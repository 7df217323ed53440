use ratatui::layout::Size;

use crate::constants::VIEWPORT_MARGIN;
use crate::geometry::Point;

/// Places a measured overlay so it stays inside the viewport.
///
/// Only the right and bottom edges are enforced. When the viewport is smaller
/// than the overlay the result goes negative and the overlay overflows off the
/// top/left edge; that is accepted rather than treated as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionResolver {
    margin: i32,
}

impl PositionResolver {
    pub const fn new(margin: i32) -> Self {
        Self { margin }
    }

    pub const fn margin(&self) -> i32 {
        self.margin
    }

    pub fn resolve(&self, anchor: Point, size: Size, viewport: Size) -> Point {
        Point {
            x: clamp_axis(anchor.x, size.width, viewport.width, self.margin),
            y: clamp_axis(anchor.y, size.height, viewport.height, self.margin),
        }
    }
}

impl Default for PositionResolver {
    fn default() -> Self {
        Self::new(VIEWPORT_MARGIN)
    }
}

fn clamp_axis(start: i32, extent: u16, viewport: u16, margin: i32) -> i32 {
    let (extent, viewport) = (i32::from(extent), i32::from(viewport));
    if start.saturating_add(extent) > viewport {
        (viewport - extent).saturating_sub(margin)
    } else {
        start
    }
}
