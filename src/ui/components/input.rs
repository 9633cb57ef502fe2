//! Text input component.
//!
//! A single-line input with cursor movement and the usual readline-style
//! shortcuts. The cursor is a byte offset that always sits on a char
//! boundary, so multi-byte tag names edit correctly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// A text input widget.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    /// The current input value.
    value: String,
    /// Cursor position (byte offset) within the value.
    cursor: usize,
    /// Placeholder text shown when empty.
    placeholder: String,
}

impl TextInput {
    /// Create a new empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new input with an initial value.
    pub fn with_value(value: impl Into<String>) -> Self {
        let mut input = Self::new();
        input.set_value(value);
        input
    }

    /// Set the placeholder text.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// Get the current value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the value and move cursor to end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    /// Clear the input.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Check if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Get the cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Byte offset of the char before the cursor.
    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Byte offset of the char after the cursor.
    fn next_boundary(&self) -> usize {
        self.value[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.value.len())
    }

    /// Handle keyboard input.
    ///
    /// Returns true if the value was modified.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.value.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                true
            }
            (KeyCode::Backspace, _) => {
                if self.cursor > 0 {
                    let start = self.prev_boundary();
                    self.value.replace_range(start..self.cursor, "");
                    self.cursor = start;
                    true
                } else {
                    false
                }
            }
            (KeyCode::Delete, _) => {
                if self.cursor < self.value.len() {
                    let end = self.next_boundary();
                    self.value.replace_range(self.cursor..end, "");
                    true
                } else {
                    false
                }
            }
            (KeyCode::Left, KeyModifiers::NONE) => {
                self.cursor = self.prev_boundary();
                false
            }
            (KeyCode::Right, KeyModifiers::NONE) => {
                self.cursor = self.next_boundary();
                false
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                false
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.value.len();
                false
            }
            // Ctrl+U - clear line
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                if self.value.is_empty() {
                    false
                } else {
                    self.clear();
                    true
                }
            }
            // Ctrl+W - delete the tag before the cursor
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                if self.cursor == 0 {
                    return false;
                }
                let before = self.value[..self.cursor].trim_end_matches(' ');
                let word_start = before.rfind(' ').map(|i| i + 1).unwrap_or(0);
                self.value.replace_range(word_start..self.cursor, "");
                self.cursor = word_start;
                true
            }
            _ => false,
        }
    }

    /// Render the input field with a label.
    ///
    /// The input always has focus, so the cursor is placed in it.
    pub fn render_with_label(&self, frame: &mut Frame, area: Rect, label: &str) {
        let showing_placeholder = self.value.is_empty() && !self.placeholder.is_empty();
        let (display, style) = if showing_placeholder {
            (self.placeholder.as_str(), Style::default().fg(Color::DarkGray))
        } else {
            (self.value.as_str(), Style::default().fg(Color::Yellow))
        };

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", label),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        frame.render_widget(Paragraph::new(display).style(style).block(block), area);

        let column = self.value[..self.cursor].chars().count() as u16;
        let cursor_x = area.x + 1 + column;
        let cursor_y = area.y + 1;

        if cursor_x < area.x + area.width.saturating_sub(1) {
            frame.set_cursor_position(Position::new(cursor_x, cursor_y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_new_input() {
        let input = TextInput::new();
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_with_value_puts_cursor_at_end() {
        let input = TextInput::with_value("hello");
        assert_eq!(input.value(), "hello");
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn test_character_input() {
        let mut input = TextInput::new();
        assert!(input.handle_input(key(KeyCode::Char('a'))));
        assert!(input.handle_input(KeyEvent::new(KeyCode::Char('B'), KeyModifiers::SHIFT)));
        assert_eq!(input.value(), "aB");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut input = TextInput::with_value("abc");
        assert!(input.handle_input(key(KeyCode::Backspace)));
        assert_eq!(input.value(), "ab");

        input.handle_input(key(KeyCode::Home));
        assert!(input.handle_input(key(KeyCode::Delete)));
        assert_eq!(input.value(), "b");
        assert_eq!(input.cursor(), 0);

        assert!(!input.handle_input(key(KeyCode::Backspace)));
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::with_value("café");
        input.handle_input(key(KeyCode::Left));
        assert_eq!(input.cursor(), 3);
        input.handle_input(key(KeyCode::Right));
        assert_eq!(input.cursor(), "café".len());

        assert!(input.handle_input(key(KeyCode::Backspace)));
        assert_eq!(input.value(), "caf");
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = TextInput::with_value("ac");
        input.handle_input(key(KeyCode::Left));
        input.handle_input(key(KeyCode::Char('b')));
        assert_eq!(input.value(), "abc");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_cursor_movement_shortcuts() {
        let mut input = TextInput::with_value("abc");
        assert!(!input.handle_input(ctrl('a')));
        assert_eq!(input.cursor(), 0);
        assert!(!input.handle_input(ctrl('e')));
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_ctrl_u_clear() {
        let mut input = TextInput::with_value("hello");
        assert!(input.handle_input(ctrl('u')));
        assert!(input.is_empty());
        assert!(!input.handle_input(ctrl('u')));
    }

    #[test]
    fn test_ctrl_w_deletes_last_tag() {
        let mut input = TextInput::with_value("blue-sky sun_set");
        assert!(input.handle_input(ctrl('w')));
        assert_eq!(input.value(), "blue-sky ");

        assert!(input.handle_input(ctrl('w')));
        assert_eq!(input.value(), "");
    }

    fn rendered_line(input: &TextInput) -> (String, Color) {
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        terminal
            .draw(|frame| input.render_with_label(frame, frame.area(), "Tags"))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let line = (0..buffer.area.width)
            .map(|x| buffer[(x, 1)].symbol().to_string())
            .collect();
        (line, buffer[(1, 1)].fg)
    }

    #[test]
    fn test_placeholder_shown_only_when_empty() {
        let mut input = TextInput::new();
        input.set_placeholder("space separated tags");

        let (line, fg) = rendered_line(&input);
        assert!(line.contains("space separated tags"));
        assert_eq!(fg, Color::DarkGray);

        input.handle_input(key(KeyCode::Char('f')));
        let (line, fg) = rendered_line(&input);
        assert!(!line.contains("space separated tags"));
        assert!(line.contains('f'));
        assert_eq!(fg, Color::Yellow);
    }

    #[test]
    fn test_unhandled_key() {
        let mut input = TextInput::with_value("abc");
        assert!(!input.handle_input(key(KeyCode::F(5))));
        assert_eq!(input.value(), "abc");
    }
}
