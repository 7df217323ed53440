//! Structured overlay content.
//!
//! Overlays are described as a small tree of [`Element`]s tagged with a
//! [`Role`]. The role drives layout (stacking axis, borders, padding), hit
//! testing (which control was clicked) and rendering. Surfaces never need to
//! know which overlay kind they are drawing.

use ratatui::layout::{Direction, Size};
use ratatui::style::Style;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Outer frame of a window popup.
    Frame,
    /// Drag handle strip along the top of a popup.
    TitleBar,
    Title,
    CloseButton,
    /// Content slot of a popup.
    Content,
    /// Literal markup text supplied by a caller.
    Markup,
    Text,
    Menu,
    MenuItem(usize),
    /// Full-viewport backdrop behind a modal dialog.
    Scrim,
    DialogBox,
    Heading,
    Message,
    Input,
    ButtonRow,
    CancelButton,
    ConfirmButton,
}

impl Role {
    pub const fn axis(self) -> Direction {
        match self {
            Role::TitleBar | Role::ButtonRow => Direction::Horizontal,
            _ => Direction::Vertical,
        }
    }

    pub const fn bordered(self) -> bool {
        matches!(self, Role::Frame | Role::Menu | Role::DialogBox)
    }

    /// Horizontal padding applied on each side of the text.
    pub const fn padding(self) -> u16 {
        match self {
            Role::Title
            | Role::CloseButton
            | Role::MenuItem(_)
            | Role::Input
            | Role::CancelButton
            | Role::ConfirmButton => 1,
            Role::Content => 1,
            _ => 0,
        }
    }

    pub const fn is_drag_handle(self) -> bool {
        matches!(self, Role::TitleBar | Role::Title)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub role: Role,
    pub text: String,
    pub style: Style,
    /// Fixed outer size; overrides the measured one.
    pub size: Option<Size>,
    pub min_width: u16,
    /// Draw a separator line under this element.
    pub separator: bool,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            text: String::new(),
            style: Style::default(),
            size: None,
            min_width: 0,
            separator: false,
            children: Vec::new(),
        }
    }

    /// Plain block of caller-supplied text, rendered line by line.
    pub fn markup(text: impl Into<String>) -> Self {
        Self::new(Role::Markup).text(text)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn min_width(mut self, width: u16) -> Self {
        self.min_width = width;
        self
    }

    pub fn separator(mut self, separator: bool) -> Self {
        self.separator = separator;
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Depth-first search for the first element with `role`.
    pub fn find(&self, role: Role) -> Option<&Element> {
        if self.role == role {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(role))
    }

    pub fn find_mut(&mut self, role: Role) -> Option<&mut Element> {
        if self.role == role {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(role))
    }

    /// Size this element wants, before the parent stretches it.
    pub fn measure(&self) -> Size {
        if let Some(size) = self.size {
            return size;
        }
        let border = if self.role.bordered() { 2 } else { 0 };
        let separator = u16::from(self.separator);
        let (width, height) = if self.children.is_empty() {
            let pad = self.role.padding().saturating_mul(2);
            let lines = saturate(self.text.lines().count().max(1));
            let widest = saturate(
                self.text
                    .lines()
                    .map(UnicodeWidthStr::width)
                    .max()
                    .unwrap_or(0),
            );
            (widest.saturating_add(pad), lines)
        } else {
            let sizes: Vec<Size> = self.children.iter().map(Element::measure).collect();
            match self.role.axis() {
                Direction::Horizontal => (
                    sizes.iter().map(|s| s.width).fold(0u16, u16::saturating_add),
                    sizes.iter().map(|s| s.height).max().unwrap_or(0),
                ),
                Direction::Vertical => (
                    sizes.iter().map(|s| s.width).max().unwrap_or(0),
                    sizes.iter().map(|s| s.height).fold(0u16, u16::saturating_add),
                ),
            }
        };
        Size {
            width: width.saturating_add(border).max(self.min_width),
            height: height.saturating_add(border).saturating_add(separator),
        }
    }
}

fn saturate(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_measure_includes_padding_and_separator() {
        let item = Element::new(Role::MenuItem(0)).text("Open").separator(true);
        assert_eq!(item.measure(), Size::new(6, 2));
    }

    #[test]
    fn bordered_container_stacks_children() {
        let menu = Element::new(Role::Menu)
            .child(Element::new(Role::MenuItem(0)).text("Rename").separator(true))
            .child(Element::new(Role::MenuItem(1)).text("Close"));
        // widest row "Rename" + padding, three rows, plus border
        assert_eq!(menu.measure(), Size::new(10, 5));
    }

    #[test]
    fn horizontal_row_sums_widths() {
        let row = Element::new(Role::ButtonRow)
            .child(Element::new(Role::CancelButton).text("Cancel"))
            .child(Element::new(Role::ConfirmButton).text("OK"));
        assert_eq!(row.measure(), Size::new(12, 1));
    }

    #[test]
    fn fixed_size_wins() {
        let e = Element::markup("long text here").size(Size::new(300, 200));
        assert_eq!(e.measure(), Size::new(300, 200));
    }

    #[test]
    fn wide_glyphs_count_double() {
        let e = Element::new(Role::Title).text("プラグイン");
        assert_eq!(e.measure().width, 12);
    }

    #[test]
    fn huge_content_saturates() {
        let e = Element::markup("a\n".repeat(70_000));
        assert_eq!(e.measure().height, u16::MAX);
        let wide = Element::markup("x".repeat(70_000));
        assert_eq!(wide.measure().width, u16::MAX);
    }

    #[test]
    fn find_descends_depth_first() {
        let root = Element::new(Role::DialogBox)
            .child(Element::new(Role::Heading).text("Name"))
            .child(Element::new(Role::Input).text("draft"));
        assert_eq!(root.find(Role::Input).map(|e| e.text.as_str()), Some("draft"));
        assert!(root.find(Role::Scrim).is_none());
    }
}
