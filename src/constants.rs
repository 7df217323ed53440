//! Shared crate-wide constants.

/// Gap kept between an overlay and the right/bottom viewport edge when the
/// requested anchor would push it past that edge.
///
/// Units: surface cells. Only applied on the overflowing axis; the left/top
/// edges are never clamped, so an overlay larger than the viewport still
/// overflows off the top-left.
pub const VIEWPORT_MARGIN: i32 = 10;

/// Stacking layer of the draggable window popup.
pub const LAYER_WINDOW_POPUP: u32 = 10_000;

/// Stacking layer of context menus; above the popup they usually belong to.
pub const LAYER_CONTEXT_MENU: u32 = 20_000;

/// Stacking layer of modal dialogs and their scrim.
pub const LAYER_DIALOG: u32 = 30_000;

/// Preferred outer width of the window popup frame.
pub const POPUP_WIDTH: u16 = 70;

/// Preferred width of the confirm dialog box.
pub const CONFIRM_DIALOG_WIDTH: u16 = 40;

/// Preferred width of the prompt dialog box.
pub const PROMPT_DIALOG_WIDTH: u16 = 45;

/// Minimum width of a context menu.
pub const CONTEXT_MENU_MIN_WIDTH: u16 = 15;

/// Anchor used when the host cannot report the pointer position.
pub const FALLBACK_ANCHOR: (i32, i32) = (100, 100);
