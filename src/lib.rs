//! tagbox - terminal tag autocompletion for image boards.
//!
//! The core is [`ui::AutoCompleteBox`], which completes the trailing word of a
//! tag line against the server's `/api/TagName` search endpoint.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod tasks;
pub mod ui;
