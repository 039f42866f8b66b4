//! Shared helpers for the store tests.

use tokio::sync::broadcast::Receiver;

use crate::notify::{Notification, NotificationEvent, NotificationKind};

/// Drains every event published so far and returns the shown notifications.
pub(crate) fn shown(rx: &mut Receiver<NotificationEvent>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let NotificationEvent::Shown(n) = event {
            out.push(n);
        }
    }
    out
}

pub(crate) fn count(notifications: &[Notification], kind: NotificationKind) -> usize {
    notifications.iter().filter(|n| n.kind == kind).count()
}
