pub mod console;
pub mod keyboard;

use ::crossterm::event::Event;
use ratatui::Frame;
use std::io;
use std::time::Duration;

pub trait InputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
    fn set_mouse_capture(&mut self, _enabled: bool) -> io::Result<()> {
        Ok(())
    }
}

impl<T: InputDriver + ?Sized> InputDriver for &mut T {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        (**self).read()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        (**self).set_mouse_capture(enabled)
    }
}

pub trait OutputDriver {
    fn enter(&mut self) -> io::Result<()>;
    fn exit(&mut self) -> io::Result<()>;

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct Scripted(Vec<Event>);

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.0.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            if self.0.is_empty() {
                return Err(io::Error::other("no more events"));
            }
            Ok(self.0.remove(0))
        }
    }

    fn read_all<D: InputDriver>(mut driver: D) -> Vec<Event> {
        let mut events = Vec::new();
        while driver.poll(Duration::from_millis(0)).unwrap() {
            events.push(driver.read().unwrap());
        }
        events
    }

    #[test]
    fn blanket_impl_for_mut_ref_works() {
        let mut d = Scripted(vec![Event::Key(KeyEvent::new(
            KeyCode::Esc,
            KeyModifiers::NONE,
        ))]);
        let events = read_all(&mut d);
        assert!(matches!(events.as_slice(), [Event::Key(k)] if k.code == KeyCode::Esc));
        assert!(d.0.is_empty());
        assert!((&mut d).set_mouse_capture(true).is_ok());
    }
}
