//! Main application state and event loop logic.
//!
//! Follows The Elm Architecture: events flow through [`App::update`] and
//! [`App::handle_api_message`], and [`App::view`] draws the current state.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::{debug, info, trace};

use crate::api::TagClient;
use crate::events::Event;
use crate::tasks::{ApiMessage, TaskSpawner};
use crate::ui::{AutoCompleteBox, SearchRequest, TextInput};

/// Key hints shown in the footer.
const HELP_HINTS: &[(&str, &str)] = &[
    ("Tab", "next suggestion"),
    ("Click", "pick"),
    ("Enter", "accept"),
    ("Esc", "cancel"),
];

/// The current state of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// The user is editing the tag line.
    #[default]
    Editing,
    /// The line was accepted with Enter.
    Accepted,
    /// The editor was cancelled.
    Cancelled,
}

/// The main application struct that holds all state.
pub struct App {
    /// The current state.
    state: AppState,
    /// The autocomplete widget.
    autocomplete: AutoCompleteBox,
    /// Client used for lookups.
    client: TagClient,
    /// Spawner for background lookups.
    spawner: TaskSpawner,
    /// Label shown in the title bar.
    server_label: String,
    /// Area the widget was last drawn in, for mouse hit testing.
    widget_area: Rect,
}

impl App {
    /// Create a new application editing `initial`.
    pub fn new(
        client: TagClient,
        spawner: TaskSpawner,
        server_label: impl Into<String>,
        initial: &str,
    ) -> Self {
        debug!("Creating new application instance");
        let mut input = TextInput::with_value(initial);
        input.set_placeholder("space separated tags, Tab completes");
        Self {
            state: AppState::Editing,
            autocomplete: AutoCompleteBox::new(input),
            client,
            spawner,
            server_label: server_label.into(),
            widget_area: Rect::default(),
        }
    }

    /// Returns the current application state.
    pub fn state(&self) -> AppState {
        self.state
    }

    /// Whether the event loop should stop.
    pub fn should_quit(&self) -> bool {
        self.state != AppState::Editing
    }

    /// The accepted tag line, if the user pressed Enter.
    pub fn accepted(&self) -> Option<&str> {
        (self.state == AppState::Accepted).then(|| self.autocomplete.value())
    }

    /// The autocomplete widget.
    pub fn autocomplete(&self) -> &AutoCompleteBox {
        &self.autocomplete
    }

    /// Update the application state based on an event.
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Key(key_event) => {
                trace!(key = ?key_event.code, kind = ?key_event.kind, "Key event");
                self.handle_key_event(key_event);
            }
            Event::Mouse(mouse) => {
                if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                    self.handle_click(mouse.column, mouse.row);
                }
            }
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => self.autocomplete.tick(),
        }
    }

    /// Handle keyboard input events.
    ///
    /// Release events are ignored; a press runs both the key-down (cycle)
    /// and key-up (lookup) handling of the widget.
    fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.kind == KeyEventKind::Release {
            return;
        }

        match (key_event.code, key_event.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                info!("Editor cancelled");
                self.state = AppState::Cancelled;
            }
            (KeyCode::Enter, _) => {
                info!(value = %self.autocomplete.value(), "Tag line accepted");
                self.state = AppState::Accepted;
            }
            _ => {
                if let Some(request) = self.autocomplete.handle_input(key_event) {
                    self.dispatch(request);
                }
            }
        }
    }

    /// Handle a left click at a screen position.
    fn handle_click(&mut self, column: u16, row: u16) {
        if let Some(index) = self.autocomplete.suggestion_at(self.widget_area, column, row) {
            debug!(index, "Suggestion clicked");
            self.autocomplete.click_suggestion(index);
        }
    }

    /// Send a lookup to a background task.
    fn dispatch(&self, request: SearchRequest) {
        self.spawner.spawn_tag_search(&self.client, request);
    }

    /// Handle a message from a background task.
    pub fn handle_api_message(&mut self, message: ApiMessage) {
        match message {
            ApiMessage::TagsFetched {
                ticket,
                seed,
                result,
            } => {
                trace!(ticket, seed = %seed, "Tag lookup finished");
                self.autocomplete.apply_search_result(ticket, result);
            }
        }
    }

    /// Render the application UI.
    pub fn view(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(4),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let title = Line::from(vec![
            Span::styled(
                " tagbox ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {}", self.server_label),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(title), chunks[0]);

        self.widget_area = chunks[1];
        self.autocomplete.render(frame, self.widget_area);

        frame.render_widget(Paragraph::new(help_line()), chunks[2]);
    }
}

/// Footer with key hints.
fn help_line() -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, action)) in HELP_HINTS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(format!("[{}]", key), Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(
            format!(" {}", action),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SEARCH_PATH;
    use crossterm::event::MouseEvent;
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc::UnboundedReceiver;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn test_app(uri: &str, initial: &str) -> (App, UnboundedReceiver<ApiMessage>) {
        let client = TagClient::with_credentials(uri, DEFAULT_SEARCH_PATH, None).unwrap();
        let (spawner, rx) = TaskSpawner::channel();
        (App::new(client, spawner, "test", initial), rx)
    }

    async fn mount_tags(server: &MockServer, seed: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path("/api/TagName"))
            .and(query_param("tagNameQuery", seed))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
            .mount(server)
            .await;
    }

    /// Feed the next background result into the app.
    async fn pump(app: &mut App, rx: &mut UnboundedReceiver<ApiMessage>) {
        let message = rx.recv().await.unwrap();
        app.handle_api_message(message);
    }

    #[tokio::test]
    async fn test_landscape_sunset_summer_cycle() {
        let server = MockServer::start().await;
        mount_tags(
            &server,
            "su",
            r#"{"Tags":[{"Name":"sunset"},{"Name":"summer"}]}"#,
        )
        .await;

        let (mut app, mut rx) = test_app(&server.uri(), "landscape s");
        app.update(key(KeyCode::Char('u')));
        pump(&mut app, &mut rx).await;

        assert_eq!(app.autocomplete().suggestions(), ["sunset", "summer"]);
        assert_eq!(app.autocomplete().selected(), None);

        app.update(key(KeyCode::Tab));
        assert_eq!(app.autocomplete().value(), "landscape sunset");
        app.update(key(KeyCode::Tab));
        assert_eq!(app.autocomplete().value(), "landscape summer");
        app.update(key(KeyCode::Tab));
        assert_eq!(app.autocomplete().value(), "landscape sunset");

        // Cycling never starts another lookup
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_trailing_space_sends_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"Tags":[]}"#))
            .expect(0)
            .mount(&server)
            .await;

        let (mut app, mut rx) = test_app(&server.uri(), "fog");
        app.update(key(KeyCode::Char(' ')));

        assert_eq!(app.autocomplete().value(), "fog ");
        assert!(app.autocomplete().suggestions().is_empty());
        assert!(!app.autocomplete().is_pending());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_server_error_clears_suggestions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/TagName"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (mut app, mut rx) = test_app(&server.uri(), "landscape s");
        app.update(key(KeyCode::Char('u')));
        pump(&mut app, &mut rx).await;

        assert!(app.autocomplete().suggestions().is_empty());
        assert_eq!(app.autocomplete().value(), "landscape su");
        assert!(!app.autocomplete().is_pending());
    }

    #[tokio::test]
    async fn test_click_picks_suggestion() {
        let server = MockServer::start().await;
        mount_tags(&server, "fo", r#"{"Tags":[{"Name":"fog"},{"Name":"forest"}]}"#).await;

        let (mut app, mut rx) = test_app(&server.uri(), "f");
        app.update(key(KeyCode::Char('o')));
        pump(&mut app, &mut rx).await;

        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();

        // Title row 0, input rows 1..4, list border row 4, items from row 5
        app.update(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 6,
            modifiers: KeyModifiers::NONE,
        }));

        assert_eq!(app.autocomplete().value(), "forest");
        assert!(app.autocomplete().suggestions().is_empty());
    }

    #[tokio::test]
    async fn test_enter_accepts_and_esc_cancels() {
        let server = MockServer::start().await;
        let (mut app, _rx) = test_app(&server.uri(), "red fog");
        assert_eq!(app.accepted(), None);

        app.update(key(KeyCode::Enter));
        assert_eq!(app.state(), AppState::Accepted);
        assert!(app.should_quit());
        assert_eq!(app.accepted(), Some("red fog"));

        let (mut app, _rx) = test_app(&server.uri(), "red fog");
        app.update(key(KeyCode::Esc));
        assert_eq!(app.state(), AppState::Cancelled);
        assert_eq!(app.accepted(), None);
    }

    #[tokio::test]
    async fn test_key_release_is_ignored() {
        let server = MockServer::start().await;
        let (mut app, mut rx) = test_app(&server.uri(), "fo");

        let mut release = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        app.update(Event::Key(release));

        assert_eq!(app.autocomplete().value(), "fo");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_help_line_lists_cycle_key() {
        let text: String = help_line()
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        assert!(text.contains("[Tab] next suggestion"));
    }
}
