//! The four overlay construction routines.
//!
//! Each routine builds an element tree, picks a trigger table and hands both
//! to the manager's shared install path, so every overlay kind is placed,
//! wired, registered and torn down the same way.

use ratatui::style::{Color, Style};

use super::{Callback, Deferred, InputState, OverlayManager, State, SubmitCallback};
use crate::dismissal::{ListenerKind, TriggerTable};
use crate::drag::DragController;
use crate::element::{Element, Role};
use crate::geometry::Point;
use crate::overlay::{CloseHandle, OverlayKind};
use crate::surface::{Placement, Surface};
use crate::theme;

/// Body of a window popup.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupContent {
    /// Literal text shown as-is, line by line.
    Markup(String),
    Element(Element),
}

impl From<&str> for PopupContent {
    fn from(value: &str) -> Self {
        PopupContent::Markup(value.to_string())
    }
}

impl From<String> for PopupContent {
    fn from(value: String) -> Self {
        PopupContent::Markup(value)
    }
}

impl From<Element> for PopupContent {
    fn from(value: Element) -> Self {
        PopupContent::Element(value)
    }
}

pub struct PopupOptions<S: Surface> {
    /// Falls back to the locale's popup title.
    pub title: Option<String>,
    pub close_on_escape: bool,
    /// Tear down an already open popup first. With `false` the old popup
    /// stays alive but is no longer tracked by the registry.
    pub close_existing: bool,
    pub on_close: Option<Callback<S>>,
}

impl<S: Surface> Default for PopupOptions<S> {
    fn default() -> Self {
        Self {
            title: None,
            close_on_escape: true,
            close_existing: true,
            on_close: None,
        }
    }
}

impl<S: Surface> PopupOptions<S> {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn close_on_escape(mut self, close_on_escape: bool) -> Self {
        self.close_on_escape = close_on_escape;
        self
    }

    pub fn close_existing(mut self, close_existing: bool) -> Self {
        self.close_existing = close_existing;
        self
    }

    pub fn on_close(mut self, on_close: impl FnOnce(&mut OverlayManager<S>) + 'static) -> Self {
        self.on_close = Some(Box::new(on_close));
        self
    }
}

pub struct MenuItem<S: Surface> {
    pub label: String,
    /// Layered over the menu's base row style.
    pub style: Option<Style>,
    pub action: Option<Callback<S>>,
}

impl<S: Surface> MenuItem<S> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style: None,
            action: None,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn on_select(mut self, action: impl FnOnce(&mut OverlayManager<S>) + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }
}

pub struct ConfirmOptions<S: Surface> {
    pub cancel_text: Option<String>,
    pub confirm_text: Option<String>,
    /// Background of the confirm button; the theme accent otherwise.
    pub confirm_color: Option<Color>,
    pub on_cancel: Option<Callback<S>>,
}

impl<S: Surface> Default for ConfirmOptions<S> {
    fn default() -> Self {
        Self {
            cancel_text: None,
            confirm_text: None,
            confirm_color: None,
            on_cancel: None,
        }
    }
}

impl<S: Surface> ConfirmOptions<S> {
    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = Some(text.into());
        self
    }

    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = Some(text.into());
        self
    }

    pub fn confirm_color(mut self, color: Color) -> Self {
        self.confirm_color = Some(color);
        self
    }

    pub fn on_cancel(mut self, on_cancel: impl FnOnce(&mut OverlayManager<S>) + 'static) -> Self {
        self.on_cancel = Some(Box::new(on_cancel));
        self
    }
}

pub struct PromptOptions<S: Surface> {
    pub cancel_text: Option<String>,
    /// Falls back to the locale's "Save".
    pub confirm_text: Option<String>,
    pub confirm_color: Option<Color>,
    pub allow_empty: bool,
    pub on_cancel: Option<Callback<S>>,
}

impl<S: Surface> Default for PromptOptions<S> {
    fn default() -> Self {
        Self {
            cancel_text: None,
            confirm_text: None,
            confirm_color: None,
            allow_empty: false,
            on_cancel: None,
        }
    }
}

impl<S: Surface> PromptOptions<S> {
    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = Some(text.into());
        self
    }

    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = Some(text.into());
        self
    }

    pub fn confirm_color(mut self, color: Color) -> Self {
        self.confirm_color = Some(color);
        self
    }

    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    pub fn on_cancel(mut self, on_cancel: impl FnOnce(&mut OverlayManager<S>) + 'static) -> Self {
        self.on_cancel = Some(Box::new(on_cancel));
        self
    }
}

fn button_row(cancel: String, confirm: String, accent: Option<Color>) -> Element {
    Element::new(Role::ButtonRow)
        .child(
            Element::new(Role::CancelButton)
                .text(cancel)
                .style(theme::cancel_style()),
        )
        .child(
            Element::new(Role::ConfirmButton)
                .text(confirm)
                .style(theme::confirm_style(accent.unwrap_or_else(theme::accent))),
        )
}

fn modal(dialog: Element) -> Element {
    Element::new(Role::Scrim)
        .style(theme::scrim_style())
        .child(dialog)
}

impl<S: Surface> OverlayManager<S> {
    /// Open a draggable popup with its top-left near `anchor`.
    pub fn open_window_popup(
        &mut self,
        content: impl Into<PopupContent>,
        anchor: Point,
        options: PopupOptions<S>,
    ) -> CloseHandle {
        let PopupOptions {
            title,
            close_on_escape,
            close_existing,
            on_close,
        } = options;
        let title = title.unwrap_or_else(|| self.config.labels.popup_title.clone());
        let body = match content.into() {
            PopupContent::Markup(text) => Element::markup(text),
            PopupContent::Element(element) => element,
        };
        let root = Element::new(Role::Frame)
            .style(theme::panel_style())
            .min_width(self.config.popup_width)
            .child(
                Element::new(Role::TitleBar)
                    .style(theme::title_bar_style())
                    .child(Element::new(Role::Title).text(title))
                    .child(
                        Element::new(Role::CloseButton)
                            .text(self.config.labels.close_glyph.clone()),
                    ),
            )
            .child(Element::new(Role::Content).child(body));
        let state = State::Popup {
            drag: DragController::new(),
            on_close,
        };
        let handle = self.install(
            OverlayKind::WindowPopup,
            root,
            Placement::Anchored(anchor),
            TriggerTable::for_window_popup(close_on_escape),
            state,
            close_existing,
        );
        self.dismissal.listen(handle.id, ListenerKind::PointerMove);
        self.dismissal.listen(handle.id, ListenerKind::PointerUp);
        handle
    }

    /// Open a context menu at `anchor`. Selecting an item closes the menu
    /// before its action runs.
    pub fn open_context_menu(
        &mut self,
        anchor: Point,
        items: impl IntoIterator<Item = MenuItem<S>>,
    ) -> CloseHandle {
        let items: Vec<MenuItem<S>> = items.into_iter().collect();
        let last = items.len().saturating_sub(1);
        let base = theme::panel_style();
        let mut rows = Vec::with_capacity(items.len());
        let mut actions = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let style = match item.style {
                Some(over) => base.patch(over),
                None => base,
            };
            rows.push(
                Element::new(Role::MenuItem(index))
                    .text(item.label)
                    .style(style)
                    .separator(index != last),
            );
            actions.push(item.action);
        }
        let root = Element::new(Role::Menu)
            .style(base)
            .min_width(self.config.menu_min_width)
            .children(rows);
        self.install(
            OverlayKind::ContextMenu,
            root,
            Placement::Anchored(anchor),
            TriggerTable::for_context_menu(),
            State::Menu { actions },
            true,
        )
    }

    /// Open a modal yes/no dialog. `on_confirm` runs after the dialog is gone.
    pub fn open_confirm_dialog(
        &mut self,
        message: impl Into<String>,
        on_confirm: Option<Callback<S>>,
        options: ConfirmOptions<S>,
    ) -> CloseHandle {
        let ConfirmOptions {
            cancel_text,
            confirm_text,
            confirm_color,
            on_cancel,
        } = options;
        let labels = &self.config.labels;
        let dialog = Element::new(Role::DialogBox)
            .style(theme::panel_style())
            .min_width(self.config.confirm_width)
            .child(Element::new(Role::Message).text(message).separator(true))
            .child(button_row(
                cancel_text.unwrap_or_else(|| labels.cancel.clone()),
                confirm_text.unwrap_or_else(|| labels.confirm.clone()),
                confirm_color,
            ));
        self.install(
            OverlayKind::ConfirmDialog,
            modal(dialog),
            Placement::Fill,
            TriggerTable::for_confirm_dialog(),
            State::Confirm {
                on_confirm,
                on_cancel,
            },
            true,
        )
    }

    /// Open a modal single-line prompt. The input is focused with its text
    /// selected once the dialog is shown; `on_confirm` gets the trimmed value.
    pub fn open_prompt_dialog(
        &mut self,
        title: impl Into<String>,
        default_value: impl Into<String>,
        on_confirm: Option<SubmitCallback<S>>,
        options: PromptOptions<S>,
    ) -> CloseHandle {
        let PromptOptions {
            cancel_text,
            confirm_text,
            confirm_color,
            allow_empty,
            on_cancel,
        } = options;
        let input = InputState::new(default_value);
        let labels = &self.config.labels;
        let dialog = Element::new(Role::DialogBox)
            .style(theme::panel_style())
            .min_width(self.config.prompt_width)
            .child(Element::new(Role::Heading).text(title))
            .child(
                Element::new(Role::Input)
                    .text(input.value())
                    .style(Style::default().bg(theme::input_bg()))
                    .separator(true),
            )
            .child(button_row(
                cancel_text.unwrap_or_else(|| labels.cancel.clone()),
                confirm_text.unwrap_or_else(|| labels.save.clone()),
                confirm_color,
            ));
        let handle = self.install(
            OverlayKind::PromptDialog,
            modal(dialog),
            Placement::Fill,
            TriggerTable::for_prompt_dialog(),
            State::Prompt {
                input,
                allow_empty,
                on_confirm,
                on_cancel,
            },
            true,
        );
        self.deferred.push_back(Deferred::Focus(handle.id));
        handle
    }
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Size;

    use super::*;
    use crate::surface::CellSurface;

    fn manager() -> OverlayManager<CellSurface> {
        OverlayManager::new(CellSurface::new(Size::new(120, 40)))
    }

    #[test]
    fn popup_tree_has_title_bar_and_content() {
        let mut m = manager();
        let h = m.open_window_popup("hello", Point::new(2, 2), PopupOptions::default());
        let node = m.node_of(h).expect("mounted");
        let root = m.surface().root(node).expect("root");
        assert_eq!(root.role, Role::Frame);
        assert_eq!(root.find(Role::Title).map(|e| e.text.as_str()), Some("Plugin"));
        assert_eq!(root.find(Role::Markup).map(|e| e.text.as_str()), Some("hello"));
        assert!(root.find(Role::CloseButton).is_some());
        assert_eq!(m.surface().measure(node).map(|s| s.width), Some(70));
    }

    #[test]
    fn menu_separators_on_all_but_last() {
        let mut m = manager();
        let h = m.open_context_menu(
            Point::new(0, 0),
            ["A", "B", "C"].map(MenuItem::new),
        );
        let node = m.node_of(h).expect("mounted");
        let root = m.surface().root(node).expect("root");
        let seps: Vec<bool> = root.children.iter().map(|c| c.separator).collect();
        assert_eq!(seps, vec![true, true, false]);
    }

    #[test]
    fn menu_item_style_is_layered_over_base() {
        let mut m = manager();
        let red = Style::default().fg(Color::Red);
        let h = m.open_context_menu(
            Point::new(0, 0),
            [MenuItem::new("Delete").style(red), MenuItem::new("Keep")],
        );
        let node = m.node_of(h).expect("mounted");
        let root = m.surface().root(node).expect("root");
        let delete = root.find(Role::MenuItem(0)).expect("item");
        assert_eq!(delete.style.fg, Some(Color::Red));
        assert_eq!(delete.style.bg, Some(theme::panel_bg()));
        let keep = root.find(Role::MenuItem(1)).expect("item");
        assert_eq!(keep.style, theme::panel_style());
    }

    #[test]
    fn confirm_labels_default_and_override() {
        let mut m = manager();
        let h = m.open_confirm_dialog("Sure?", None, ConfirmOptions::default());
        let node = m.node_of(h).expect("mounted");
        let root = m.surface().root(node).expect("root");
        assert_eq!(root.role, Role::Scrim);
        assert_eq!(root.find(Role::CancelButton).map(|e| e.text.as_str()), Some("Cancel"));
        assert_eq!(root.find(Role::ConfirmButton).map(|e| e.text.as_str()), Some("Confirm"));

        let h = m.open_confirm_dialog(
            "Delete?",
            None,
            ConfirmOptions::default()
                .confirm_text("Delete")
                .confirm_color(Color::Red),
        );
        let node = m.node_of(h).expect("mounted");
        let confirm = m
            .surface()
            .root(node)
            .and_then(|r| r.find(Role::ConfirmButton))
            .expect("button");
        assert_eq!(confirm.text, "Delete");
        assert_eq!(confirm.style.bg, Some(Color::Red));
    }

    #[test]
    fn prompt_prefills_and_uses_save_label() {
        let mut m = manager();
        let h = m.open_prompt_dialog("Name", "draft", None, PromptOptions::default());
        let node = m.node_of(h).expect("mounted");
        let root = m.surface().root(node).expect("root");
        assert_eq!(root.find(Role::Input).map(|e| e.text.as_str()), Some("draft"));
        assert_eq!(root.find(Role::ConfirmButton).map(|e| e.text.as_str()), Some("Save"));
        assert_eq!(m.prompt_value(h), Some("draft"));
    }
}
