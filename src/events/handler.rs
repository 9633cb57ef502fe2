//! Event handler implementation.
//!
//! Polls crossterm for terminal events and converts them to application events.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent};

use super::Event;

/// The default tick rate for the event loop in milliseconds.
const TICK_RATE_MS: u64 = 100;

/// Handles application events by polling crossterm for terminal events.
pub struct EventHandler {
    /// The tick rate duration.
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler with the default tick rate.
    pub fn new() -> Self {
        Self::with_tick_rate(TICK_RATE_MS)
    }

    /// Create a new event handler with a custom tick rate.
    pub fn with_tick_rate(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event.
    ///
    /// Blocks until an event is available or the tick rate elapses, in which
    /// case `Event::Tick` is returned.
    pub fn next(&self) -> std::io::Result<Event> {
        if event::poll(self.tick_rate)? {
            Ok(convert(event::read()?))
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a crossterm event onto an application event.
fn convert(event: CrosstermEvent) -> Event {
    match event {
        CrosstermEvent::Key(key_event) => Event::Key(key_event),
        CrosstermEvent::Mouse(mouse_event) => Event::Mouse(mouse_event),
        CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
        // Focus and paste events are not handled
        CrosstermEvent::FocusGained | CrosstermEvent::FocusLost | CrosstermEvent::Paste(_) => {
            Event::Tick
        }
    }
}
