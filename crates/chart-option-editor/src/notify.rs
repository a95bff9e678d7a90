//! Transient feedback messages.
//!
//! The queue is display state only. Nothing reads it back into the document.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::NotificationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub text: String,
    pub severity: Severity,
    pub expires_after: Duration,
    pub posted_at: Instant,
}

impl Notification {
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.posted_at) >= self.expires_after
    }
}

/// Bounded queue of recent messages; the newest unexpired one is shown.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
    ttl: Duration,
    capacity: usize,
    next_id: u64,
}

impl NotificationQueue {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
            capacity: capacity.max(1),
            next_id: 1,
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(Duration::from_millis(config.ttl_ms), config.capacity)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn show(&mut self, text: impl Into<String>, severity: Severity) -> u64 {
        self.show_at(text, severity, Instant::now())
    }

    pub fn show_at(&mut self, text: impl Into<String>, severity: Severity, now: Instant) -> u64 {
        let ttl = self.ttl;
        self.show_with_ttl(text, severity, ttl, now)
    }

    pub fn show_with_ttl(
        &mut self,
        text: impl Into<String>,
        severity: Severity,
        ttl: Duration,
        now: Instant,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        while self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        let text = text.into();
        tracing::trace!(id, ?severity, %text, "notification posted");
        self.items.push_back(Notification {
            id,
            text,
            severity,
            expires_after: ttl,
            posted_at: now,
        });
        id
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current_at(Instant::now())
    }

    /// Most recent message still within its display window.
    pub fn current_at(&self, now: Instant) -> Option<&Notification> {
        self.items.iter().rev().find(|n| !n.is_expired_at(now))
    }

    /// Drop expired messages, returning how many were removed.
    pub fn prune_at(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        self.items.retain(|n| !n.is_expired_at(now));
        before - self.items.len()
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        match self.items.iter().position(|n| n.id == id) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::from_config(&NotificationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_message_is_current() {
        let t0 = Instant::now();
        let mut q = NotificationQueue::new(Duration::from_secs(3), 5);
        q.show_at("saved", Severity::Success, t0);
        q.show_at("bad json", Severity::Error, t0 + Duration::from_millis(10));
        let cur = q.current_at(t0 + Duration::from_millis(20)).unwrap();
        assert_eq!(cur.text, "bad json");
        assert_eq!(cur.severity, Severity::Error);
    }

    #[test]
    fn test_messages_expire() {
        let t0 = Instant::now();
        let mut q = NotificationQueue::new(Duration::from_secs(3), 5);
        q.show_at("saved", Severity::Success, t0);
        assert!(q.current_at(t0 + Duration::from_secs(2)).is_some());
        assert!(q.current_at(t0 + Duration::from_secs(3)).is_none());
        assert_eq!(q.prune_at(t0 + Duration::from_secs(4)), 1);
        assert!(q.is_empty());
    }

    #[test]
    fn test_older_message_shows_when_newer_expired_sooner() {
        let t0 = Instant::now();
        let mut q = NotificationQueue::new(Duration::from_secs(10), 5);
        q.show_at("long", Severity::Success, t0);
        q.show_with_ttl("short", Severity::Error, Duration::from_secs(1), t0);
        assert_eq!(q.current_at(t0 + Duration::from_secs(2)).unwrap().text, "long");
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let t0 = Instant::now();
        let mut q = NotificationQueue::new(Duration::from_secs(3), 2);
        q.show_at("a", Severity::Success, t0);
        q.show_at("b", Severity::Success, t0);
        q.show_at("c", Severity::Success, t0);
        let texts: Vec<&str> = q.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }

    #[test]
    fn test_dismiss() {
        let mut q = NotificationQueue::default();
        let id = q.show("saved", Severity::Success);
        assert!(q.dismiss(id));
        assert!(!q.dismiss(id));
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn test_severity_serde() {
        assert_eq!(serde_json::to_string(&Severity::Error).unwrap(), "\"error\"");
    }
}
