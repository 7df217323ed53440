//! Overlay and dialog management for desktop companion plugins.
//!
//! [`OverlayManager`] opens four kinds of transient surfaces (a draggable
//! window popup, a context menu, and modal confirm and prompt dialogs),
//! keeps at most one of each kind registered, places them inside the
//! viewport and tears them down through a single path whatever dismissed
//! them. Drawing is delegated to a host [`Surface`].

pub mod clipboard;
pub mod config;
pub mod constants;
pub mod dismissal;
pub mod drag;
pub mod drivers;
pub mod element;
pub mod event_loop;
pub mod geometry;
pub mod host;
pub mod keybindings;
pub mod manager;
pub mod overlay;
pub mod position;
pub mod registry;
pub mod render;
pub mod surface;
pub mod theme;
pub mod tracing_sub;

pub use config::{Labels, Locale, OverlayConfig};
pub use element::{Element, Role};
pub use geometry::{FloatRect, Point};
pub use host::{Host, HostError};
pub use manager::{
    Callback, ConfirmOptions, MenuItem, OverlayManager, PopupContent, PopupOptions, PromptOptions,
    SubmitCallback,
};
pub use overlay::{CloseHandle, OverlayId, OverlayKind};
pub use surface::{CellSurface, NodeId, Placement, Surface};
