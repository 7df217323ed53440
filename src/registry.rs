//! Which overlay of each kind is currently open.
//!
//! The registry only records handles; tearing overlays down is the owner's
//! job (see [`crate::OverlayManager`]). Every method that displaces or clears
//! a registration hands the affected handle back so the owner can close it.

use std::collections::BTreeMap;

use crate::overlay::{CloseHandle, OverlayId, OverlayKind};

/// Overlays that cannot outlive an open window popup, in cascade order.
const POPUP_DEPENDENTS: [OverlayKind; 3] = [
    OverlayKind::ContextMenu,
    OverlayKind::ConfirmDialog,
    OverlayKind::PromptDialog,
];

/// "Closes-with" edges: closing `kind` force-closes the returned kinds, in
/// order. The relation is one-way.
pub fn dependents(kind: OverlayKind) -> &'static [OverlayKind] {
    match kind {
        OverlayKind::WindowPopup => &POPUP_DEPENDENTS,
        _ => &[],
    }
}

#[derive(Debug, Default, Clone)]
pub struct OverlayRegistry {
    open: BTreeMap<OverlayKind, CloseHandle>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `handle` as the open overlay of its kind, returning the handle
    /// it displaced.
    pub fn open(&mut self, handle: CloseHandle) -> Option<CloseHandle> {
        self.open
            .insert(handle.kind, handle)
            .filter(|prev| prev.id != handle.id)
    }

    /// Clear and return the registration for `kind`.
    pub fn close(&mut self, kind: OverlayKind) -> Option<CloseHandle> {
        self.open.remove(&kind)
    }

    /// Clear the registration for `kind` only if it still points at `id`.
    /// Used by teardown so a stale close never unregisters a newer overlay.
    pub fn forget(&mut self, kind: OverlayKind, id: OverlayId) -> bool {
        if self.open.get(&kind).is_some_and(|h| h.id == id) {
            self.open.remove(&kind);
            true
        } else {
            false
        }
    }

    /// Drain every registration in [`OverlayKind::TEARDOWN_ORDER`].
    pub fn close_all(&mut self) -> Vec<CloseHandle> {
        OverlayKind::TEARDOWN_ORDER
            .iter()
            .filter_map(|kind| self.open.remove(kind))
            .collect()
    }

    pub fn get(&self, kind: OverlayKind) -> Option<CloseHandle> {
        self.open.get(&kind).copied()
    }

    pub fn is_open(&self, kind: OverlayKind) -> bool {
        self.open.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(id: u64, kind: OverlayKind) -> CloseHandle {
        CloseHandle {
            id: OverlayId(id),
            kind,
        }
    }

    #[test]
    fn open_returns_displaced_handle() {
        let mut reg = OverlayRegistry::new();
        assert_eq!(reg.open(handle(1, OverlayKind::ContextMenu)), None);
        let displaced = reg.open(handle(2, OverlayKind::ContextMenu));
        assert_eq!(displaced, Some(handle(1, OverlayKind::ContextMenu)));
        assert_eq!(reg.get(OverlayKind::ContextMenu), Some(handle(2, OverlayKind::ContextMenu)));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn forget_ignores_stale_ids() {
        let mut reg = OverlayRegistry::new();
        reg.open(handle(1, OverlayKind::WindowPopup));
        reg.open(handle(2, OverlayKind::WindowPopup));
        assert!(!reg.forget(OverlayKind::WindowPopup, OverlayId(1)));
        assert!(reg.is_open(OverlayKind::WindowPopup));
        assert!(reg.forget(OverlayKind::WindowPopup, OverlayId(2)));
        assert!(reg.is_empty());
    }

    #[test]
    fn close_all_drains_dialogs_before_popup() {
        let mut reg = OverlayRegistry::new();
        reg.open(handle(1, OverlayKind::WindowPopup));
        reg.open(handle(2, OverlayKind::ContextMenu));
        reg.open(handle(3, OverlayKind::PromptDialog));
        reg.open(handle(4, OverlayKind::ConfirmDialog));
        let kinds: Vec<_> = reg.close_all().into_iter().map(|h| h.kind).collect();
        assert_eq!(
            kinds,
            vec![
                OverlayKind::ConfirmDialog,
                OverlayKind::PromptDialog,
                OverlayKind::ContextMenu,
                OverlayKind::WindowPopup,
            ]
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn only_popup_has_dependents() {
        assert_eq!(dependents(OverlayKind::WindowPopup).len(), 3);
        assert!(dependents(OverlayKind::ContextMenu).is_empty());
        assert!(dependents(OverlayKind::ConfirmDialog).is_empty());
        assert!(!dependents(OverlayKind::WindowPopup).contains(&OverlayKind::WindowPopup));
    }
}
