use ratatui::layout::Direction;

use crate::element::{Element, Role};
use crate::geometry::{FloatRect, Point};

/// An element with its resolved on-surface rectangle.
#[derive(Debug, Clone, Copy)]
pub struct Placed<'a> {
    pub rect: FloatRect,
    pub element: &'a Element,
}

/// Lay `element` out inside `rect`, appending it and all descendants to
/// `out` in paint order (parents before children, earlier siblings first).
pub fn arrange<'a>(element: &'a Element, rect: FloatRect, out: &mut Vec<Placed<'a>>) {
    out.push(Placed { rect, element });
    if element.children.is_empty() {
        return;
    }
    let inner = inner_rect(element, rect);
    if element.role == Role::Scrim {
        for child in &element.children {
            let size = child.measure();
            let origin = Point {
                x: inner.x + (inner.width as i32 - size.width as i32) / 2,
                y: inner.y + (inner.height as i32 - size.height as i32) / 2,
            };
            arrange(child, FloatRect::new(origin, size), out);
        }
        return;
    }
    match element.role.axis() {
        Direction::Vertical => {
            let mut y = inner.y;
            for child in &element.children {
                let height = child.measure().height;
                let child_rect = FloatRect {
                    x: inner.x,
                    y,
                    width: inner.width,
                    height,
                };
                arrange(child, child_rect, out);
                y += height as i32;
            }
        }
        Direction::Horizontal => {
            // First children flow from the left, the last one is pinned to
            // the right edge.
            let count = element.children.len();
            let mut x = inner.x;
            for (idx, child) in element.children.iter().enumerate() {
                let width = child.measure().width;
                let child_x = if count > 1 && idx == count - 1 {
                    (inner.x + inner.width as i32 - width as i32).max(x)
                } else {
                    x
                };
                let child_rect = FloatRect {
                    x: child_x,
                    y: inner.y,
                    width,
                    height: inner.height,
                };
                arrange(child, child_rect, out);
                x = child_x + width as i32;
            }
        }
    }
}

fn inner_rect(element: &Element, rect: FloatRect) -> FloatRect {
    let border = if element.role.bordered() { 1 } else { 0 };
    let separator = u16::from(element.separator);
    FloatRect {
        x: rect.x + border as i32,
        y: rect.y + border as i32,
        width: rect.width.saturating_sub(border * 2),
        height: rect.height.saturating_sub(border * 2).saturating_sub(separator),
    }
}
