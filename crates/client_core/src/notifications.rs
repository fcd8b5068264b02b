use std::{collections::VecDeque, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{error, info};

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Queue {
    next_id: u64,
    entries: VecDeque<Notification>,
}

/// Ordered queue of notifications. Each posted entry schedules its own
/// removal on the tokio runtime after the configured TTL.
#[derive(Clone)]
pub struct NotificationSink {
    queue: Arc<Mutex<Queue>>,
    ttl: Duration,
}

impl Default for NotificationSink {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl NotificationSink {
    pub fn new(ttl: Duration) -> Self {
        Self {
            queue: Arc::new(Mutex::new(Queue::default())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn post(&self, kind: NotificationKind, message: impl Into<String>) -> Notification {
        let message = message.into();
        match kind {
            NotificationKind::Info => info!(%message, "notification"),
            NotificationKind::Error => error!(%message, "notification"),
        }

        let notification = {
            let mut queue = self.queue.lock().await;
            queue.next_id += 1;
            let notification = Notification {
                id: queue.next_id,
                kind,
                message,
                created_at: Utc::now(),
            };
            queue.entries.push_back(notification.clone());
            notification
        };

        let queue = Arc::clone(&self.queue);
        let ttl = self.ttl;
        let id = notification.id;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            queue.lock().await.entries.retain(|entry| entry.id != id);
        });

        notification
    }

    pub async fn info(&self, message: impl Into<String>) -> Notification {
        self.post(NotificationKind::Info, message).await
    }

    pub async fn error(&self, message: impl Into<String>) -> Notification {
        self.post(NotificationKind::Error, message).await
    }

    pub async fn visible(&self) -> Vec<Notification> {
        self.queue.lock().await.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
#[path = "tests/notifications_tests.rs"]
mod tests;
