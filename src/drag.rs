use crate::geometry::Point;

/// One in-progress drag gesture: where the pointer grabbed the overlay,
/// relative to its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub offset: Point,
}

/// Pointer-drag state for a single window popup.
///
/// Positions are never clamped while dragging; the popup may be moved
/// partially or fully off-screen.
#[derive(Debug, Default, Clone)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer-down on the drag handle.
    pub fn begin(&mut self, pointer: Point, top_left: Point) -> DragSession {
        let session = DragSession {
            offset: pointer.offset_from(top_left),
        };
        self.session = Some(session);
        session
    }

    /// New top-left for a pointer-move, or `None` when no gesture is active.
    pub fn update(&self, pointer: Point) -> Option<Point> {
        self.session.map(|s| pointer.minus(s.offset))
    }

    /// Pointer-up. Returns whether a gesture was active.
    pub fn end(&mut self) -> bool {
        self.session.take().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }
}
