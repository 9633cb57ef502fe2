//! tagbox - tag autocompletion in the terminal.

use std::io::{self, BufRead, Write};

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use tagbox::api::{auth, TagClient};
use tagbox::app::App;
use tagbox::cli::{Cli, Command};
use tagbox::config::Config;
use tagbox::error::{AppError, Result};
use tagbox::events::EventHandler;
use tagbox::logging::{self, LogOptions};
use tagbox::tasks::TaskSpawner;
use tagbox::ui::seed_word;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_dir = logging::init(&LogOptions {
        directory: cli.log_dir.clone(),
        verbose: cli.verbose,
    })?;

    let outcome = run(&cli).await;
    logging::shutdown(&log_dir);

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        eprintln!("error: {}", e.user_message());
        if let Some(action) = e.suggested_action() {
            eprintln!("hint: {}", action);
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;

    match cli.command() {
        Command::Edit { initial } => {
            let server = cli.resolve_server(&config)?;
            let client = TagClient::new(&server, &config.settings)?;
            // The editor polls the terminal synchronously; let lookups run on other workers
            let accepted = tokio::task::block_in_place(|| {
                run_editor(client, &server.name, &initial, &config)
            })?;
            if let Some(line) = accepted {
                println!("{}", line);
            }
        }
        Command::Query { text } => {
            let server = cli.resolve_server(&config)?;
            let client = TagClient::new(&server, &config.settings)?;
            let seed = seed_word(&text);
            if seed.is_empty() {
                return Ok(());
            }
            for name in client.search_tag_names(seed).await? {
                println!("{}", name);
            }
        }
        Command::Login { server, user } => login(cli, config, &server, &user)?,
        Command::Logout { server } => {
            auth::delete_token(&server)?;
            info!(server = %server, "Deleted stored token");
            eprintln!("Token for '{}' removed.", server);
        }
    }

    Ok(())
}

/// Store a token read from stdin and record the user name in the config.
fn login(cli: &Cli, mut config: Config, server_name: &str, user: &str) -> Result<()> {
    // Rejects bad user names before anything reaches the keyring
    config.set_username(server_name, user)?;

    eprint!("API token for {}@{}: ", user, server_name);
    io::stderr().flush()?;
    let mut token = String::new();
    io::stdin().lock().read_line(&mut token)?;
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::other("no token given"));
    }

    auth::store_token(server_name, token)?;
    config.save_to(&cli.config_path()?)?;

    info!(server = %server_name, user = %user, "Stored token");
    eprintln!("Token stored.");
    Ok(())
}

/// Run the interactive editor and return the accepted line.
fn run_editor(
    client: TagClient,
    server_label: &str,
    initial: &str,
    config: &Config,
) -> Result<Option<String>> {
    // Restore the terminal before the panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    enable_raw_mode().map_err(|e| AppError::terminal(e.to_string()))?;
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| AppError::terminal(e.to_string()))?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stderr))
        .map_err(|e| AppError::terminal(e.to_string()))?;

    let (spawner, rx) = TaskSpawner::channel();
    let mut app = App::new(client, spawner, server_label, initial);
    let events = EventHandler::with_tick_rate(config.settings.tick_rate_ms);

    let result = event_loop(&mut terminal, &mut app, rx, &events);

    if let Err(e) = disable_raw_mode() {
        warn!("Failed to disable raw mode: {}", e);
    }
    if let Err(e) = execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    ) {
        warn!("Failed to leave alternate screen: {}", e);
    }
    let _ = terminal.show_cursor();

    result?;
    Ok(app.accepted().map(str::to_string))
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    app: &mut App,
    mut rx: tokio::sync::mpsc::UnboundedReceiver<tagbox::tasks::ApiMessage>,
    events: &EventHandler,
) -> Result<()> {
    while !app.should_quit() {
        while let Ok(message) = rx.try_recv() {
            app.handle_api_message(message);
        }

        terminal.draw(|frame| app.view(frame))?;

        let event = events.next()?;
        app.update(event);
    }
    Ok(())
}
