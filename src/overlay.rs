use std::fmt;

use crate::constants::{LAYER_CONTEXT_MENU, LAYER_DIALOG, LAYER_WINDOW_POPUP};

/// The four transient surfaces managed by [`crate::OverlayManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OverlayKind {
    WindowPopup,
    ContextMenu,
    ConfirmDialog,
    PromptDialog,
}

impl OverlayKind {
    pub const ALL: [OverlayKind; 4] = [
        OverlayKind::WindowPopup,
        OverlayKind::ContextMenu,
        OverlayKind::ConfirmDialog,
        OverlayKind::PromptDialog,
    ];

    /// Order used by `close_all`: layers above the popup go first so nothing
    /// is left floating over a surface that is already gone.
    pub const TEARDOWN_ORDER: [OverlayKind; 4] = [
        OverlayKind::ConfirmDialog,
        OverlayKind::PromptDialog,
        OverlayKind::ContextMenu,
        OverlayKind::WindowPopup,
    ];

    pub const fn layer(self) -> u32 {
        match self {
            OverlayKind::WindowPopup => LAYER_WINDOW_POPUP,
            OverlayKind::ContextMenu => LAYER_CONTEXT_MENU,
            OverlayKind::ConfirmDialog | OverlayKind::PromptDialog => LAYER_DIALOG,
        }
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OverlayKind::WindowPopup => "window popup",
            OverlayKind::ContextMenu => "context menu",
            OverlayKind::ConfirmDialog => "confirm dialog",
            OverlayKind::PromptDialog => "prompt dialog",
        };
        write!(f, "{}", s)
    }
}

/// Identity of one overlay instance. Never reused within a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(pub(crate) u64);

impl OverlayId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Token returned by every `open_*` call.
///
/// Passing it to [`crate::OverlayManager::close`] tears the overlay down; any
/// later call with the same handle is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CloseHandle {
    pub(crate) id: OverlayId,
    pub(crate) kind: OverlayKind,
}

impl CloseHandle {
    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialogs_stack_above_menus_above_popup() {
        assert!(OverlayKind::ConfirmDialog.layer() > OverlayKind::ContextMenu.layer());
        assert!(OverlayKind::ContextMenu.layer() > OverlayKind::WindowPopup.layer());
        assert_eq!(
            OverlayKind::PromptDialog.layer(),
            OverlayKind::ConfirmDialog.layer()
        );
    }

    #[test]
    fn teardown_order_ends_with_popup() {
        assert_eq!(
            OverlayKind::TEARDOWN_ORDER.last(),
            Some(&OverlayKind::WindowPopup)
        );
        for kind in OverlayKind::ALL {
            assert!(OverlayKind::TEARDOWN_ORDER.contains(&kind));
        }
    }
}
