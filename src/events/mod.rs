//! Event handling for the application.
//!
//! Terminal input is polled on the UI thread and turned into [`Event`]s.
//! Tag lookup results arrive separately over the task channel.

mod handler;

use crossterm::event::{KeyEvent, MouseEvent};

pub use handler::EventHandler;

/// An input event for the application loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key event (press, repeat or release).
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// No input arrived within the tick rate.
    Tick,
}
