//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, Server};
use crate::error::Result;

/// Name given to a server passed with `--url`.
const ADHOC_SERVER_NAME: &str = "adhoc";

#[derive(Debug, Parser)]
#[command(name = "tagbox", version)]
#[command(about = "Tag autocompletion against an image board's tag search API")]
pub struct Cli {
    /// Configured server to use (defaults to `default_server`)
    #[arg(long, global = true, conflicts_with = "url")]
    pub server: Option<String>,

    /// Use an unconfigured server at this URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Path to the configuration file (or set TAGBOX_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for log files
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Edit a tag line interactively and print the accepted line
    Edit {
        /// Text to start with
        #[arg(long, default_value = "")]
        initial: String,
    },
    /// Print suggestions for the last word of TEXT, one per line
    Query {
        /// Tag line whose trailing word is completed
        text: String,
    },
    /// Store an API token for a server (read from stdin)
    Login {
        /// Configured server name
        server: String,
        /// Account name, saved to the configuration
        #[arg(long)]
        user: String,
    },
    /// Delete the stored API token for a server
    Logout {
        /// Configured server name
        server: String,
    },
}

impl Cli {
    /// The command to run; interactive editing when none is given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Edit {
            initial: String::new(),
        })
    }

    /// The configuration file path: `--config`, or the default location.
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::config_path()?),
        }
    }

    /// Load the configuration file.
    pub fn load_config(&self) -> Result<Config> {
        Ok(Config::load_from(&self.config_path()?)?)
    }

    /// Pick the server to talk to from the flags and configuration.
    pub fn resolve_server(&self, config: &Config) -> Result<Server> {
        if let Some(url) = &self.url {
            let server = Server::new(ADHOC_SERVER_NAME, url.clone());
            server.validate()?;
            return Ok(server);
        }
        Ok(config.resolve_server(self.server.as_deref())?.clone())
    }
}
