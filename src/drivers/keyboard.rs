//! Normalization of raw crossterm key events before they reach the overlay
//! manager.
//!
//! Terminals that report key releases (Windows consoles, the kitty protocol)
//! would otherwise deliver Escape twice, and a held Escape would walk down
//! through every stacked overlay in one keystroke.

use crossterm::event::{Event, KeyCode, KeyEventKind};

#[derive(Debug, Default)]
pub struct KeyNormalizer {
    esc_down: bool,
}

impl KeyNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` for events the manager should never see.
    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        let Event::Key(key) = evt else {
            return Some(evt);
        };
        match key.kind {
            KeyEventKind::Release => {
                if key.code == KeyCode::Esc {
                    self.esc_down = false;
                }
                return None;
            }
            KeyEventKind::Repeat if key.code == KeyCode::Esc => return None,
            KeyEventKind::Repeat | KeyEventKind::Press => {}
        }
        if key.code == KeyCode::Esc {
            if self.esc_down && cfg!(windows) {
                // no release was reported between two presses
                return None;
            }
            self.esc_down = true;
        } else {
            self.esc_down = false;
        }
        Some(Event::Key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        let mut key = KeyEvent::new(code, KeyModifiers::NONE);
        key.kind = kind;
        Event::Key(key)
    }

    #[test]
    fn releases_are_dropped() {
        let mut norm = KeyNormalizer::new();
        assert!(
            norm.normalize(key(KeyCode::Char('a'), KeyEventKind::Release))
                .is_none()
        );
        assert!(norm.normalize(key(KeyCode::Esc, KeyEventKind::Release)).is_none());
    }

    #[test]
    fn held_escape_fires_once() {
        let mut norm = KeyNormalizer::new();
        assert!(norm.normalize(key(KeyCode::Esc, KeyEventKind::Press)).is_some());
        assert!(norm.normalize(key(KeyCode::Esc, KeyEventKind::Repeat)).is_none());
        assert!(norm.normalize(key(KeyCode::Esc, KeyEventKind::Release)).is_none());
        assert!(norm.normalize(key(KeyCode::Esc, KeyEventKind::Press)).is_some());
    }

    #[test]
    fn repeated_characters_pass_through() {
        let mut norm = KeyNormalizer::new();
        assert!(
            norm.normalize(key(KeyCode::Char('x'), KeyEventKind::Repeat))
                .is_some()
        );
    }

    #[test]
    fn non_key_events_pass_through() {
        let mut norm = KeyNormalizer::new();
        assert!(norm.normalize(Event::Resize(10, 20)).is_some());
    }
}
