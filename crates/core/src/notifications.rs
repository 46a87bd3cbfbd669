use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);
pub const NOTIFICATION_LIMIT: usize = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct NotificationQueue {
    entries: VecDeque<Notification>,
    ttl: Duration,
    next_id: u64,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(NOTIFICATION_TTL)
    }
}

impl NotificationQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: VecDeque::new(),
            ttl,
            next_id: 0,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, now: Instant) -> u64 {
        let message = message.into();
        let expires_at = now + self.ttl;
        self.next_id += 1;
        let id = self.next_id;

        if let Some(last) = self.entries.back_mut() {
            if last.message == message && last.severity == severity {
                last.id = id;
                last.expires_at = expires_at;
                return id;
            }
        }

        self.entries.push_back(Notification {
            id,
            message,
            severity,
            expires_at,
        });
        while self.entries.len() > NOTIFICATION_LIMIT {
            self.entries.pop_front();
        }
        id
    }

    pub fn drain_expired(&mut self, now: Instant) -> Vec<Notification> {
        let (expired, live): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.expires_at <= now);
        self.entries = live.into();
        expired
    }

    pub fn active(&self, now: Instant) -> impl Iterator<Item = &Notification> {
        self.entries.iter().filter(move |entry| entry.expires_at > now)
    }

    pub fn next_expiry(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.expires_at).min()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
