//! Draws a [`CellSurface`] into a ratatui frame.
//!
//! Overlays may hang off the top or left edge of the viewport, so every
//! element is clipped against the frame and its text scrolled by the amount
//! that was cut away.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::element::Role;
use crate::geometry::FloatRect;
use crate::surface::{CellSurface, Placed, Surface};
use crate::theme;

/// Paint every visible tree of `surface`, lowest layer first.
pub fn render_surface(frame: &mut Frame, surface: &CellSurface) {
    let area = frame.area();
    for node in surface.paint_order() {
        if !surface.is_visible(node) {
            continue;
        }
        let focus = surface
            .focus_state()
            .filter(|focus| focus.node == node);
        for placed in surface.placed(node) {
            let select_all = focus.is_some_and(|f| f.role == placed.element.role && f.select_all);
            render_element(frame, area, &placed, select_all);
        }
    }
}

/// Number of cells of `rect` cut off above and to the left of `visible`.
fn scroll_offset(rect: FloatRect, visible: Rect) -> (u16, u16) {
    let dy = (visible.y as i32 - rect.y).max(0) as u16;
    let dx = (visible.x as i32 - rect.x).max(0) as u16;
    (dy, dx)
}

fn render_element(frame: &mut Frame, area: Rect, placed: &Placed<'_>, select_all: bool) {
    let Some(visible) = placed.rect.clip_to(area) else {
        return;
    };
    let element = placed.element;
    if element.role == Role::Scrim {
        dim(frame, visible);
        return;
    }

    if element.role.bordered() {
        frame.render_widget(Clear, visible);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::border()))
            .style(element.style);
        // a partially visible border would draw its edges on the clip line
        if visible.width == placed.rect.width && visible.height == placed.rect.height {
            frame.render_widget(block, visible);
        } else {
            frame.render_widget(Block::default().style(element.style), visible);
        }
    } else if element.style != Style::default() {
        frame.render_widget(Block::default().style(element.style), visible);
    }

    if element.separator {
        separator(frame, area, placed.rect);
    }

    if !element.children.is_empty() || element.text.is_empty() {
        return;
    }
    let pad = element.role.padding() as i32;
    let text_rect = FloatRect {
        x: placed.rect.x + pad,
        y: placed.rect.y,
        width: placed.rect.width.saturating_sub(element.role.padding() * 2),
        height: placed.rect.height.saturating_sub(u16::from(element.separator)),
    };
    let Some(text_visible) = text_rect.clip_to(area) else {
        return;
    };
    let style = if select_all {
        element.style.patch(theme::input_selection())
    } else {
        element.style
    };
    let paragraph = Paragraph::new(element.text.as_str())
        .style(style)
        .scroll(scroll_offset(text_rect, text_visible));
    frame.render_widget(paragraph, text_visible);
}

fn separator(frame: &mut Frame, area: Rect, rect: FloatRect) {
    let row = FloatRect {
        x: rect.x,
        y: rect.y + rect.height as i32 - 1,
        width: rect.width,
        height: 1,
    };
    let Some(visible) = row.clip_to(area) else {
        return;
    };
    let style = Style::default().fg(theme::menu_separator());
    let buffer = frame.buffer_mut();
    for x in visible.x..visible.x.saturating_add(visible.width) {
        if let Some(cell) = buffer.cell_mut((x, visible.y)) {
            cell.set_symbol("─");
            cell.set_style(style);
        }
    }
}

fn dim(frame: &mut Frame, rect: Rect) {
    let buffer = frame.buffer_mut();
    let style = theme::scrim_style();
    for y in rect.y..rect.y.saturating_add(rect.height) {
        for x in rect.x..rect.x.saturating_add(rect.width) {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Size;
    use ratatui::style::Modifier;

    use super::*;
    use crate::element::Element;
    use crate::geometry::Point;
    use crate::surface::Placement;

    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn hidden_trees_are_not_drawn() {
        let mut surface = CellSurface::new(Size::new(20, 5));
        surface.mount(
            Element::new(Role::Menu).child(Element::new(Role::MenuItem(0)).text("Open")),
            1,
            Placement::Anchored(Point::new(0, 0)),
        );
        let mut terminal = Terminal::new(TestBackend::new(20, 5)).expect("terminal");
        terminal
            .draw(|frame| render_surface(frame, &surface))
            .expect("draw");
        assert!(!row_text(&terminal, 1).contains("Open"));
    }

    #[test]
    fn menu_draws_items_and_separators() {
        let mut surface = CellSurface::new(Size::new(20, 6));
        let node = surface.mount(
            Element::new(Role::Menu)
                .child(Element::new(Role::MenuItem(0)).text("Open").separator(true))
                .child(Element::new(Role::MenuItem(1)).text("Quit")),
            1,
            Placement::Anchored(Point::new(0, 0)),
        );
        surface.set_visible(node, true);
        let mut terminal = Terminal::new(TestBackend::new(20, 6)).expect("terminal");
        terminal
            .draw(|frame| render_surface(frame, &surface))
            .expect("draw");
        assert!(row_text(&terminal, 1).contains("Open"));
        assert!(row_text(&terminal, 2).contains("──"));
        assert!(row_text(&terminal, 3).contains("Quit"));
    }

    #[test]
    fn offscreen_overlay_is_clipped_not_panicking() {
        let mut surface = CellSurface::new(Size::new(10, 4));
        let node = surface.mount(
            Element::new(Role::Menu).child(Element::new(Role::MenuItem(0)).text("Rename")),
            1,
            Placement::Anchored(Point::new(-3, -1)),
        );
        surface.set_visible(node, true);
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).expect("terminal");
        terminal
            .draw(|frame| render_surface(frame, &surface))
            .expect("draw");
        // border and padding put "Rename" at x = -1
        assert!(row_text(&terminal, 0).starts_with("ename"));
    }

    #[test]
    fn scrim_dims_the_viewport() {
        let mut surface = CellSurface::new(Size::new(10, 4));
        let node = surface.mount(Element::new(Role::Scrim), 1, Placement::Fill);
        surface.set_visible(node, true);
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).expect("terminal");
        terminal
            .draw(|frame| render_surface(frame, &surface))
            .expect("draw");
        let cell = &terminal.backend().buffer()[(9, 3)];
        assert!(cell.modifier.contains(Modifier::DIM));
    }
}
