//! Rendering-surface capability required from the host.
//!
//! The overlay subsystem never draws anything itself. It hands element trees
//! to a [`Surface`], asks it for measurements and hit tests, and moves or
//! removes what it mounted. [`CellSurface`] is the in-memory implementation
//! used by the terminal demo and the test suite.

pub mod cell;
pub mod layout;

pub use cell::CellSurface;
pub use layout::{Placed, arrange};

use ratatui::layout::Size;

use crate::element::{Element, Role};
use crate::geometry::Point;

/// Root of one mounted element tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Top-left at the given point; moved later by `set_position`.
    Anchored(Point),
    /// Covers the whole viewport; children are centered.
    Fill,
}

/// Result of a hit test: the mounted tree and the deepest element under the
/// point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub node: NodeId,
    pub role: Role,
}

pub trait Surface {
    fn viewport(&self) -> Size;

    /// Attach `root` above everything on a lower `layer`. The tree starts
    /// hidden so it can be measured and placed before the user sees it.
    fn mount(&mut self, root: Element, layer: u32, placement: Placement) -> NodeId;

    /// Detach a mounted tree. Returns `false` when it was already gone; must
    /// never panic for unknown nodes.
    fn unmount(&mut self, node: NodeId) -> bool;

    fn is_mounted(&self, node: NodeId) -> bool;

    /// Rendered outer size of a mounted tree.
    fn measure(&self, node: NodeId) -> Option<Size>;

    fn position(&self, node: NodeId) -> Option<Point>;

    fn set_position(&mut self, node: NodeId, position: Point);

    fn set_visible(&mut self, node: NodeId, visible: bool);

    fn is_visible(&self, node: NodeId) -> bool;

    /// Topmost visible element under `point`.
    fn hit_test(&self, point: Point) -> Option<Hit>;

    /// Replace the text of the first element with `role` in a mounted tree.
    fn set_text(&mut self, node: NodeId, role: Role, text: &str);

    /// Give keyboard focus to the element with `role`, optionally selecting
    /// its whole text.
    fn focus(&mut self, _node: NodeId, _role: Role, _select_all: bool) {}

    /// Drop keyboard focus wherever it is.
    fn blur(&mut self) {}
}
