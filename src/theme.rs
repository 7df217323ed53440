use ratatui::style::{Color, Modifier, Style};

// Centralized theme colors for overlay chrome. Keep these as small helpers so
// factories and the renderer agree on one palette.

pub const ACCENT_RGB: (u8, u8, u8) = (66, 153, 225);
pub const CANCEL_RGB: (u8, u8, u8) = (226, 232, 240);

pub fn accent() -> Color {
    Color::Rgb(ACCENT_RGB.0, ACCENT_RGB.1, ACCENT_RGB.2)
}

// Popup / title bar
pub fn title_bar_bg() -> Color {
    accent()
}
pub fn title_bar_fg() -> Color {
    Color::White
}
pub fn panel_bg() -> Color {
    Color::White
}
pub fn panel_fg() -> Color {
    Color::Black
}
pub fn border() -> Color {
    Color::DarkGray
}

// Menu
pub fn menu_separator() -> Color {
    Color::Gray
}

// Dialog / confirm
pub fn cancel_bg() -> Color {
    Color::Rgb(CANCEL_RGB.0, CANCEL_RGB.1, CANCEL_RGB.2)
}
pub fn cancel_fg() -> Color {
    Color::Black
}
pub fn confirm_fg() -> Color {
    Color::White
}
pub fn input_bg() -> Color {
    Color::Gray
}
pub fn input_selection() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

pub fn title_bar_style() -> Style {
    Style::default()
        .bg(title_bar_bg())
        .fg(title_bar_fg())
        .add_modifier(Modifier::BOLD)
}

pub fn panel_style() -> Style {
    Style::default().bg(panel_bg()).fg(panel_fg())
}

pub fn cancel_style() -> Style {
    Style::default().bg(cancel_bg()).fg(cancel_fg())
}

pub fn confirm_style(accent: Color) -> Style {
    Style::default().bg(accent).fg(confirm_fg())
}

/// Style applied to every cell under a modal scrim.
pub fn scrim_style() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_style_uses_given_accent() {
        let s = confirm_style(Color::Red);
        assert_eq!(s.bg, Some(Color::Red));
        assert_eq!(s.fg, Some(confirm_fg()));
    }

    #[test]
    fn accent_is_rgb() {
        assert!(matches!(accent(), Color::Rgb(_, _, _)));
    }
}
