//! Tag autocomplete component.
//!
//! Completes the last word of a space separated tag line against the
//! server's tag index. Typing any key other than Tab starts a new lookup for
//! the trailing word; Tab cycles through the returned suggestions and writes
//! the selected one over that word. Clicking a suggestion selects it and
//! closes the list.
//!
//! The widget never performs I/O itself. [`AutoCompleteBox::handle_input`]
//! hands back a [`SearchRequest`] for the caller to dispatch, and the result
//! is fed in through [`AutoCompleteBox::apply_search_result`]. Each request
//! carries a ticket; only the result for the most recent ticket is applied,
//! so a slow response can never overwrite suggestions for newer input.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::{debug, error, trace};

use super::TextInput;

/// The key that cycles through suggestions.
pub const CYCLE_KEY: KeyCode = KeyCode::Tab;

/// Height of the input box, borders included.
const INPUT_HEIGHT: u16 = 3;

/// Spinner frames shown while a lookup is in flight.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A lookup the caller should dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Identifies the request; results must be reported with the same ticket.
    pub ticket: u64,
    /// The word to complete.
    pub seed: String,
}

/// Return the word being completed: everything after the last space.
///
/// Only the space character separates words, matching the server's tag
/// syntax. A trailing space yields an empty seed.
pub fn seed_word(text: &str) -> &str {
    match text.rfind(' ') {
        Some(i) => &text[i + 1..],
        None => text,
    }
}

/// Replace the trailing seed word of `text` with `suggestion`.
pub fn replace_seed_word(text: &str, suggestion: &str) -> String {
    let keep = text.len() - seed_word(text).len();
    let mut out = String::with_capacity(keep + suggestion.len());
    out.push_str(&text[..keep]);
    out.push_str(suggestion);
    out
}

/// Tag autocomplete widget bound to a single text input.
#[derive(Debug)]
pub struct AutoCompleteBox {
    /// The input being completed.
    input: TextInput,
    /// Suggestions from the latest lookup, in server order.
    suggestions: Vec<String>,
    /// Selected suggestion, if any.
    selected: Option<usize>,
    /// Ticket of the most recently dispatched lookup.
    latest_ticket: u64,
    /// Whether the latest lookup is still outstanding.
    pending: bool,
    /// Current spinner frame.
    spinner_frame: usize,
}

impl AutoCompleteBox {
    /// Bind a new widget to `input`.
    ///
    /// No lookup is made until the first key is handled.
    pub fn new(input: TextInput) -> Self {
        Self {
            input,
            suggestions: Vec::new(),
            selected: None,
            latest_ticket: 0,
            pending: false,
            spinner_frame: 0,
        }
    }

    /// Bind a new widget to an input pre-filled with `value`.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self::new(TextInput::with_value(value))
    }

    /// The current input text.
    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Current suggestions, in server order.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// The selected suggestion index, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Whether the latest lookup has not reported back yet.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Handle a key press.
    ///
    /// The cycle key advances the selection and is consumed; it never starts
    /// a lookup. Any other key is applied to the input and then triggers
    /// [`request_suggestions`](Self::request_suggestions).
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<SearchRequest> {
        if key.code == CYCLE_KEY {
            self.cycle_selection();
            return None;
        }

        self.input.handle_input(key);
        self.request_suggestions()
    }

    /// Start a lookup for the current seed word.
    ///
    /// Clears the suggestion list and selection. Returns the request to
    /// dispatch, or `None` when the seed word is empty.
    pub fn request_suggestions(&mut self) -> Option<SearchRequest> {
        self.clear_suggestions();

        // Every call supersedes the outstanding lookup, even when nothing new is sent
        self.latest_ticket += 1;

        let seed = seed_word(self.input.value());
        if seed.is_empty() {
            self.pending = false;
            return None;
        }

        self.pending = true;
        trace!(ticket = self.latest_ticket, seed, "Requesting suggestions");

        Some(SearchRequest {
            ticket: self.latest_ticket,
            seed: seed.to_string(),
        })
    }

    /// Apply the outcome of a lookup.
    ///
    /// Results for anything but the latest ticket are discarded. Errors
    /// clear the list and are logged; the input text is left alone.
    pub fn apply_search_result(&mut self, ticket: u64, result: Result<Vec<String>, String>) {
        if ticket != self.latest_ticket {
            debug!(
                ticket,
                latest = self.latest_ticket,
                "Discarding stale suggestion result"
            );
            return;
        }

        self.pending = false;
        match result {
            Ok(names) => {
                debug!(ticket, count = names.len(), "Received suggestions");
                self.suggestions = names;
                self.selected = None;
            }
            Err(e) => {
                error!(ticket, "Tag lookup failed: {}", e);
                self.clear_suggestions();
            }
        }
    }

    /// Empty the suggestion list and reset the selection.
    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.selected = None;
    }

    /// Select the suggestion at `index` and write it over the seed word.
    ///
    /// Out-of-range indices are ignored. Returns whether a suggestion was
    /// selected.
    pub fn select_suggestion(&mut self, index: usize) -> bool {
        let Some(suggestion) = self.suggestions.get(index) else {
            return false;
        };

        let value = replace_seed_word(self.input.value(), suggestion);
        self.input.set_value(value);
        self.selected = Some(index);
        true
    }

    /// Advance the selection by one, wrapping to the first suggestion.
    ///
    /// On an empty list this resolves to index 0 and selects nothing.
    pub fn cycle_selection(&mut self) -> bool {
        let mut next = self.selected.map_or(0, |i| i + 1);
        if next >= self.suggestions.len() {
            next = 0;
        }
        self.select_suggestion(next)
    }

    /// Select the suggestion at `index` and close the list.
    pub fn click_suggestion(&mut self, index: usize) -> bool {
        let selected = self.select_suggestion(index);
        self.clear_suggestions();
        selected
    }

    /// Advance the spinner while a lookup is pending.
    pub fn tick(&mut self) {
        if self.pending {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    /// Split the widget area into input and suggestion areas.
    fn split_area(area: Rect) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(INPUT_HEIGHT), Constraint::Min(0)])
            .split(area);
        (chunks[0], chunks[1])
    }

    /// First suggestion shown when the list is `rows` tall.
    ///
    /// Mirrors how a fresh `ListState` scrolls to keep the selection visible.
    fn scroll_offset(&self, rows: usize) -> usize {
        match self.selected {
            Some(i) if rows > 0 && i >= rows => i + 1 - rows,
            _ => 0,
        }
    }

    fn suggestion_block() -> Block<'static> {
        Block::default()
            .title(" Suggestions ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
    }

    /// Map a screen position to a suggestion index.
    ///
    /// `area` must be the same area passed to [`render`](Self::render).
    pub fn suggestion_at(&self, area: Rect, column: u16, row: u16) -> Option<usize> {
        if self.suggestions.is_empty() {
            return None;
        }

        let (_, list_area) = Self::split_area(area);
        let inner = Self::suggestion_block().inner(list_area);
        if column < inner.x
            || column >= inner.x + inner.width
            || row < inner.y
            || row >= inner.y + inner.height
        {
            return None;
        }

        let index = self.scroll_offset(inner.height as usize) + (row - inner.y) as usize;
        (index < self.suggestions.len()).then_some(index)
    }

    /// Render the input and, below it, the suggestion list.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (input_area, list_area) = Self::split_area(area);

        self.input.render_with_label(frame, input_area, "Tags");

        if self.suggestions.is_empty() {
            if self.pending && list_area.height > 0 {
                let line = Line::from(vec![
                    Span::styled(
                        SPINNER_FRAMES[self.spinner_frame],
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(" searching...", Style::default().fg(Color::DarkGray)),
                ]);
                let hint_area = Rect { height: 1, ..list_area };
                frame.render_widget(Paragraph::new(line), hint_area);
            }
            return;
        }

        let items: Vec<ListItem> = self
            .suggestions
            .iter()
            .map(|name| ListItem::new(name.as_str()))
            .collect();

        let list = List::new(items)
            .block(Self::suggestion_block())
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );

        let mut state = ListState::default().with_selected(self.selected);
        frame.render_stateful_widget(list, list_area, &mut state);
    }
}
