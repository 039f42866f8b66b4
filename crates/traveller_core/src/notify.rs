//! crates/traveller_core/src/notify.rs
//!
//! The notification channel. Stores publish typed events here; whatever
//! renders them (a toast layer, a log, a test) subscribes independently.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub type NotificationId = Uuid;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Loading,
    Success,
    Error,
}

/// The store operation a notification belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Logout,
    Register,
    SendSos,
    LovedOnes,
    FetchItems,
    AddItem,
    UpdateItemStatus,
    DeleteItem,
    Alerts,
    Suggestions,
    GenerateTrip,
    Translate,
    TransportRoutes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub operation: Operation,
    pub message: String,
}

impl Notification {
    /// How long a renderer should keep this on screen. Loading notifications
    /// stay until they are explicitly dismissed.
    pub fn auto_dismiss_after(&self) -> Option<Duration> {
        match self.kind {
            NotificationKind::Loading => None,
            NotificationKind::Success => Some(Duration::from_secs(2)),
            NotificationKind::Error => Some(Duration::from_secs(4)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Shown(Notification),
    Dismissed(NotificationId),
}

/// Fire-and-forget publisher. Cloning yields another handle onto the same channel.
#[derive(Clone, Debug)]
pub struct Notifier {
    sender: broadcast::Sender<NotificationEvent>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.sender.subscribe()
    }

    pub fn loading(&self, operation: Operation, message: impl Into<String>) -> NotificationId {
        self.publish(NotificationKind::Loading, operation, message.into())
    }

    pub fn success(&self, operation: Operation, message: impl Into<String>) -> NotificationId {
        self.publish(NotificationKind::Success, operation, message.into())
    }

    pub fn error(&self, operation: Operation, message: impl Into<String>) -> NotificationId {
        self.publish(NotificationKind::Error, operation, message.into())
    }

    pub fn dismiss(&self, id: NotificationId) {
        // No subscribers is not an error for a fire-and-forget channel.
        let _ = self.sender.send(NotificationEvent::Dismissed(id));
    }

    fn publish(
        &self,
        kind: NotificationKind,
        operation: Operation,
        message: String,
    ) -> NotificationId {
        let id = Uuid::new_v4();
        let _ = self.sender.send(NotificationEvent::Shown(Notification {
            id,
            kind,
            operation,
            message,
        }));
        id
    }
}

/// Spawns a subscriber that renders every notification as a log line.
/// The task ends once every `Notifier` handle has been dropped.
pub fn spawn_tracing_renderer(notifier: &Notifier) -> JoinHandle<()> {
    let mut receiver = notifier.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(NotificationEvent::Shown(n)) => match n.kind {
                    NotificationKind::Loading => debug!(operation = ?n.operation, "{}", n.message),
                    NotificationKind::Success => info!(operation = ?n.operation, "{}", n.message),
                    NotificationKind::Error => warn!(operation = ?n.operation, "{}", n.message),
                },
                Ok(NotificationEvent::Dismissed(id)) => debug!("Notification {} dismissed", id),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Notification renderer lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
