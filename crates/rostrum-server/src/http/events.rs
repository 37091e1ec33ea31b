//! Reload notifications over Server-Sent Events.
//!
//! In development the browser opens an event stream; whenever the reload
//! coordinator publishes new render inputs it broadcasts an event here,
//! and the client runtime refreshes the page in response. The endpoint is
//! not mounted in production.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

use crate::http::AppState;

/// Path the event stream is mounted under in development.
pub const EVENTS_PATH: &str = "/__rostrum_events__";

/// Events pushed to connected clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReloadEvent {
    /// The page template changed
    TemplateChanged,
    /// A new server bundle was published
    BundleUpdated,
    /// A new client manifest was published
    ManifestUpdated,
}

/// Tracks connected event stream clients.
pub struct EventHub {
    clients: RwLock<HashMap<usize, mpsc::Sender<String>>>,
    next_id: RwLock<usize>,
}

impl EventHub {
    /// Create a hub with no clients.
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            next_id: RwLock::new(0),
        }
    }

    /// Register a client and return its id plus the event receiver.
    pub fn register(&self) -> (usize, mpsc::Receiver<String>) {
        let id = {
            let mut next_id = self.next_id.write();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let (tx, rx) = mpsc::channel(100);
        self.clients.write().insert(id, tx);

        (id, rx)
    }

    /// Remove a client.
    pub fn unregister(&self, id: usize) {
        self.clients.write().remove(&id);
    }

    /// Send an event to every connected client.
    ///
    /// Clients whose stream has gone away are dropped from the registry.
    pub async fn broadcast(&self, event: &ReloadEvent) {
        let json = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());

        let clients = self.clients.read().clone();
        let mut stale = Vec::new();
        for (id, tx) in clients {
            if tx.send(json.clone()).await.is_err() {
                stale.push(id);
            }
        }
        for id in stale {
            self.unregister(id);
        }
    }

    /// Number of connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle SSE connections for reload notifications.
pub async fn handle_events(
    State(app): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let (id, rx) = app.hub.register();
    tracing::debug!("reload client {} connected", id);

    let stream = ReceiverStream::new(rx).map(|data| Ok(Event::default().data(data)));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
