use std::collections::BTreeMap;

use ratatui::layout::Size;

use super::layout::{Placed, arrange};
use super::{Hit, NodeId, Placement, Surface};
use crate::element::{Element, Role};
use crate::geometry::{FloatRect, Point};

/// Keyboard focus inside a mounted tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusState {
    pub node: NodeId,
    pub role: Role,
    pub select_all: bool,
}

#[derive(Debug, Clone)]
struct Mounted {
    root: Element,
    layer: u32,
    placement: Placement,
    position: Point,
    visible: bool,
    /// Mount sequence; later mounts paint above earlier ones on one layer.
    seq: u64,
}

impl Mounted {
    fn size(&self, viewport: Size) -> Size {
        match self.placement {
            Placement::Anchored(_) => self.root.measure(),
            Placement::Fill => viewport,
        }
    }

    fn rect(&self, viewport: Size) -> FloatRect {
        FloatRect::new(self.position, self.size(viewport))
    }
}

/// Retained, in-memory surface measured in terminal cells.
///
/// Hosts render it with [`crate::render::render_surface`]; tests drive it
/// directly.
#[derive(Debug, Clone)]
pub struct CellSurface {
    viewport: Size,
    next_id: u64,
    next_seq: u64,
    nodes: BTreeMap<NodeId, Mounted>,
    focus: Option<FocusState>,
}

impl CellSurface {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            next_id: 0,
            next_seq: 0,
            nodes: BTreeMap::new(),
            focus: None,
        }
    }

    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn mounted_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn focus_state(&self) -> Option<FocusState> {
        self.focus
    }

    pub fn root(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(&node).map(|m| &m.root)
    }

    /// Mounted trees in paint order (lowest layer first).
    pub fn paint_order(&self) -> Vec<NodeId> {
        let mut ids: Vec<(u32, u64, NodeId)> = self
            .nodes
            .iter()
            .map(|(id, m)| (m.layer, m.seq, *id))
            .collect();
        ids.sort();
        ids.into_iter().map(|(_, _, id)| id).collect()
    }

    /// Lay out a mounted tree at its current position.
    pub fn placed(&self, node: NodeId) -> Vec<Placed<'_>> {
        let mut out = Vec::new();
        if let Some(mounted) = self.nodes.get(&node) {
            arrange(&mounted.root, mounted.rect(self.viewport), &mut out);
        }
        out
    }

    /// Rectangle of the first element with `role` in a mounted tree.
    pub fn rect_of(&self, node: NodeId, role: Role) -> Option<FloatRect> {
        self.placed(node)
            .into_iter()
            .find(|p| p.element.role == role)
            .map(|p| p.rect)
    }
}

impl Surface for CellSurface {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn mount(&mut self, root: Element, layer: u32, placement: Placement) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        let position = match placement {
            Placement::Anchored(point) => point,
            Placement::Fill => Point::default(),
        };
        self.nodes.insert(
            id,
            Mounted {
                root,
                layer,
                placement,
                position,
                visible: false,
                seq,
            },
        );
        id
    }

    fn unmount(&mut self, node: NodeId) -> bool {
        if self.focus.is_some_and(|f| f.node == node) {
            self.focus = None;
        }
        self.nodes.remove(&node).is_some()
    }

    fn is_mounted(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn measure(&self, node: NodeId) -> Option<Size> {
        self.nodes.get(&node).map(|m| m.size(self.viewport))
    }

    fn position(&self, node: NodeId) -> Option<Point> {
        self.nodes.get(&node).map(|m| m.position)
    }

    fn set_position(&mut self, node: NodeId, position: Point) {
        if let Some(mounted) = self.nodes.get_mut(&node)
            && matches!(mounted.placement, Placement::Anchored(_))
        {
            mounted.position = position;
        }
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        if let Some(mounted) = self.nodes.get_mut(&node) {
            mounted.visible = visible;
        }
    }

    fn is_visible(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(|m| m.visible)
    }

    fn hit_test(&self, point: Point) -> Option<Hit> {
        for node in self.paint_order().into_iter().rev() {
            if !self.is_visible(node) {
                continue;
            }
            let placed = self.placed(node);
            if let Some(hit) = placed.iter().rev().find(|p| p.rect.contains(point)) {
                return Some(Hit {
                    node,
                    role: hit.element.role,
                });
            }
        }
        None
    }

    fn set_text(&mut self, node: NodeId, role: Role, text: &str) {
        if let Some(element) = self
            .nodes
            .get_mut(&node)
            .and_then(|m| m.root.find_mut(role))
        {
            element.text = text.to_string();
        }
    }

    fn focus(&mut self, node: NodeId, role: Role, select_all: bool) {
        if self.is_mounted(node) {
            self.focus = Some(FocusState {
                node,
                role,
                select_all,
            });
        }
    }

    fn blur(&mut self) {
        self.focus = None;
    }
}
