use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// The loop driving the host's UI thread.
///
/// It is the only place that polls the input driver. Each pass calls the
/// handler once with `None` (timers, animations, drawing) and then once per
/// pending input event. Polling waits at most `poll_interval`, so fades and
/// the delayed quit keep advancing without input.
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
        F: FnMut(Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if handler(None)? == ControlFlow::Quit {
                return Ok(());
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain bursts so key repeat doesn't lag behind drawing.
                loop {
                    let event = self.driver.read()?;
                    if handler(Some(event))? == ControlFlow::Quit {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Event>);

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.0.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::other("no input"))
        }
    }

    #[test]
    fn idle_pass_runs_before_events_and_quit_stops() {
        let key = |c| Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        let mut ev = EventLoop::new(
            Scripted(VecDeque::from([key('a'), key('q'), key('z')])),
            Duration::ZERO,
        );
        let mut seen = Vec::new();
        ev.run(|event| {
            let label = match event {
                None => '-',
                Some(Event::Key(k)) => match k.code {
                    KeyCode::Char(c) => c,
                    _ => '?',
                },
                Some(_) => '?',
            };
            seen.push(label);
            Ok(if label == 'q' {
                ControlFlow::Quit
            } else {
                ControlFlow::Continue
            })
        })
        .unwrap();
        assert_eq!(seen, vec!['-', 'a', 'q']);
        assert_eq!(ev.driver().0.len(), 1);
    }
}
