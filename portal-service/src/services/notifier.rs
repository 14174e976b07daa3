//! Operator notices: the server-side form of the admin UI's toasts.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
    pub created_at: DateTime<Utc>,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Default,
            created_at: Utc::now(),
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: NoticeVariant::Destructive,
            ..Self::info(title, description)
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Bounded, newest-last ring of items.
pub struct RecentLog<T> {
    capacity: usize,
    items: Mutex<VecDeque<T>>,
}

impl<T: Clone> RecentLog<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn push(&self, item: T) {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        if items.len() == self.capacity {
            items.pop_front();
        }
        items.push_back(item);
    }

    /// Newest first.
    pub fn snapshot(&self) -> Vec<T> {
        let items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.iter().rev().cloned().collect()
    }
}

/// Logs every notice and keeps the most recent ones for the admin UI to poll.
pub struct NoticeBoard {
    recent: RecentLog<Notice>,
}

impl NoticeBoard {
    pub fn new(capacity: usize) -> Self {
        Self {
            recent: RecentLog::new(capacity),
        }
    }

    pub fn recent(&self) -> Vec<Notice> {
        self.recent.snapshot()
    }
}

impl Notifier for NoticeBoard {
    fn notify(&self, notice: Notice) {
        match notice.variant {
            NoticeVariant::Default => tracing::info!(
                title = %notice.title,
                description = %notice.description,
                "Notice"
            ),
            NoticeVariant::Destructive => tracing::warn!(
                title = %notice.title,
                description = %notice.description,
                "Notice"
            ),
        }
        self.recent.push(notice);
    }
}
