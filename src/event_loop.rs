use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

pub enum ControlFlow {
    Continue,
    Quit,
}

/// Message pump driving the host's single UI thread.
///
/// The handler sees `None` once per iteration before input is polled; hosts
/// use that call to run the overlay manager's deferred work and redraw. Each
/// input event is then passed as `Some(event)`.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(&mut self.driver, None)? {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain bursts (drags, pastes) before the next tick so the
                // popup follows the pointer without lag.
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(&mut self.driver, Some(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

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

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn ticks_before_each_batch_and_quits_on_request() {
        let mut lp = EventLoop::new(
            Scripted(vec![key('a'), key('b'), key('q')]),
            Duration::from_millis(0),
        );
        let mut seen = Vec::new();
        lp.run(|_, event| {
            match event {
                None => seen.push('.'),
                Some(Event::Key(k)) => {
                    if let KeyCode::Char(c) = k.code {
                        seen.push(c);
                        if c == 'q' {
                            return Ok(ControlFlow::Quit);
                        }
                    }
                }
                Some(_) => {}
            }
            Ok(ControlFlow::Continue)
        })
        .unwrap();
        assert_eq!(seen, vec!['.', 'a', 'b', 'q']);
        assert!(lp.driver().0.is_empty());
    }
}
