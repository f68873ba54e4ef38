//! Change notifications for store consumers.
//!
//! The store owns an `Events` hub and publishes a `StoreEvent` after every change it makes to
//! the document. Consumers call `Store::subscribe` and hold on to the returned `Subscription`
//! for as long as they want updates; dropping it unsubscribes.

use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{trace, warn};

const CAPACITY: usize = 64;

/// Something that happened to the document.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum StoreEvent {
    /// The document did not exist and the default document was written.
    Created,
    /// The document was missing the fallback category and was corrected on disk.
    Migrated,
    /// The whole document was written.
    Saved { last_updated: String },
    ExpenseAdded { id: String },
    PaymentMethodAdded { id: String },
    CategoryAdded { id: String },
    /// The document was replaced by the contents of a backup file.
    Imported { path: PathBuf },
    Exported { path: PathBuf },
}

/// A broadcast hub for `StoreEvent`s. Clones share the same channel.
#[derive(Debug, Clone)]
pub struct Events {
    sender: broadcast::Sender<StoreEvent>,
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

impl Events {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CAPACITY);
        Self { sender }
    }

    /// Registers a new listener. Only events published after this call are received.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// The number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Sends `event` to every live subscription. Having no subscribers is fine.
    pub(crate) fn publish(&self, event: StoreEvent) {
        trace!("Publishing {event:?}");
        // An error here only means nobody is listening.
        let _ = self.sender.send(event);
    }
}

/// A live registration with an `Events` hub.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<StoreEvent>,
}

impl Subscription {
    /// Waits for the next event. Returns `None` once the hub and every store holding it are
    /// gone. A listener that falls too far behind skips the events it missed.
    pub async fn next(&mut self) -> Option<StoreEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(n)) => {
                    warn!("Subscriber fell behind and skipped {n} store events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next event if one is already waiting.
    pub fn try_next(&mut self) -> Option<StoreEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    warn!("Subscriber fell behind and skipped {n} store events");
                }
                Err(_) => return None,
            }
        }
    }
}
