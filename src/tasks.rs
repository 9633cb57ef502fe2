//! Async task management for non-blocking tag lookups.
//!
//! Lookups run on background tokio tasks so typing never waits on the
//! network. Results come back to the main loop as [`ApiMessage`]s over an
//! unbounded channel, which the loop drains with `try_recv()`.
//!
//! Lookups are never cancelled. Every request carries the ticket the widget
//! assigned it, and the widget drops results whose ticket is not the latest.

use tokio::sync::mpsc;
use tracing::trace;

use crate::api::TagClient;
use crate::ui::SearchRequest;

/// Messages sent from background tasks to the main event loop.
#[derive(Debug)]
pub enum ApiMessage {
    /// A tag-name lookup finished.
    TagsFetched {
        /// Ticket of the request that produced this result.
        ticket: u64,
        /// Seed word the lookup was made for.
        seed: String,
        /// Tag names in server order, or the error text.
        result: Result<Vec<String>, String>,
    },
}

/// Spawns background tasks for async operations.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<ApiMessage>,
}

impl TaskSpawner {
    /// Create a new TaskSpawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<ApiMessage>) -> Self {
        Self { tx }
    }

    /// Create a spawner together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ApiMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Spawn a task that looks up tag names for `request.seed`.
    pub fn spawn_tag_search(&self, client: &TagClient, request: SearchRequest) {
        let tx = self.tx.clone();
        let client = client.clone();
        trace!(ticket = request.ticket, seed = %request.seed, "Spawning tag search");
        tokio::spawn(async move {
            let result = client
                .search_tag_names(&request.seed)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(ApiMessage::TagsFetched {
                ticket: request.ticket,
                seed: request.seed,
                result,
            });
        });
    }
}
