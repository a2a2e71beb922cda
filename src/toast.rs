//! Transient user notifications.
//!
//! A bounded queue: ids come from a counter, the oldest entry is evicted when
//! the queue is full, and entries can be dismissed or left to expire once they
//! have been shown.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Default,
    Success,
    Error,
    Warning,
    Destructive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toast {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub variant: Variant,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub seen: bool,
}

/// A toast before it is queued.
#[derive(Debug, Default, Clone)]
pub struct NewToast {
    pub title: String,
    pub description: Option<String>,
    pub variant: Variant,
}

impl NewToast {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title).description(description).variant(Variant::Success)
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title)
            .description(description)
            .variant(Variant::Destructive)
    }
}

#[derive(Debug)]
pub struct Toaster {
    queue: VecDeque<Toast>,
    next_id: u64,
    capacity: usize,
    ttl: TimeDelta,
}

impl Toaster {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            next_id: 1,
            capacity: capacity.max(1),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    pub fn toast(&mut self, entry: NewToast) -> u64 {
        self.toast_at(entry, Utc::now())
    }

    fn toast_at(&mut self, entry: NewToast, now: DateTime<Utc>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        if self.queue.len() == self.capacity {
            self.queue.pop_front();
        }

        self.queue.push_back(Toast {
            id,
            title: entry.title,
            description: entry.description,
            variant: entry.variant,
            created_at: now,
            seen: false,
        });

        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.queue.len();
        self.queue.retain(|t| t.id != id);
        self.queue.len() != before
    }

    /// Drops shown toasts older than the configured time to live. Toasts that
    /// were never shown are kept regardless of age.
    pub fn expire(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.queue
            .retain(|t| !t.seen || now.signed_duration_since(t.created_at) < ttl);
    }

    /// Returns the toasts not shown yet and marks them as shown.
    pub fn take_unseen(&mut self) -> Vec<Toast> {
        self.queue
            .iter_mut()
            .filter(|t| !t.seen)
            .map(|t| {
                t.seen = true;
                t.clone()
            })
            .collect()
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(8, Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_under_bursts() {
        let mut toaster = Toaster::new(100, Duration::from_secs(5));
        let ids = (0..50)
            .map(|i| toaster.toast(NewToast::new(format!("t{i}"))))
            .collect::<Vec<_>>();

        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn variant_defaults_to_default() {
        let mut toaster = Toaster::default();
        toaster.toast(NewToast::new("hello"));
        assert_eq!(toaster.toasts().next().unwrap().variant, Variant::Default);
    }

    #[test]
    fn full_queue_evicts_oldest() {
        let mut toaster = Toaster::new(2, Duration::from_secs(5));
        toaster.toast(NewToast::new("a"));
        toaster.toast(NewToast::new("b"));
        toaster.toast(NewToast::new("c"));

        let titles = toaster.toasts().map(|t| t.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, ["b", "c"]);
    }

    #[test]
    fn dismiss_removes_only_the_named_toast() {
        let mut toaster = Toaster::default();
        let a = toaster.toast(NewToast::new("a"));
        toaster.toast(NewToast::new("b"));

        assert!(toaster.dismiss(a));
        assert!(!toaster.dismiss(a));
        assert_eq!(toaster.len(), 1);
    }

    #[test]
    fn expire_drops_only_shown_stale_toasts() {
        let mut toaster = Toaster::new(8, Duration::from_secs(5));
        let start = Utc::now();
        toaster.toast_at(NewToast::new("old"), start);
        toaster.toast_at(NewToast::new("new"), start + TimeDelta::seconds(4));

        toaster.expire(start + TimeDelta::seconds(6));
        assert_eq!(toaster.len(), 2);

        let shown = toaster.take_unseen();
        assert_eq!(shown.len(), 2);
        toaster.expire(start + TimeDelta::seconds(6));
        let titles = toaster.toasts().map(|t| t.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, ["new"]);
    }

    #[test]
    fn take_unseen_returns_each_toast_once() {
        let mut toaster = Toaster::default();
        toaster.toast(NewToast::new("a"));
        assert_eq!(toaster.take_unseen().len(), 1);
        assert!(toaster.take_unseen().is_empty());

        toaster.toast(NewToast::new("b"));
        let titles = toaster.take_unseen().into_iter().map(|t| t.title).collect::<Vec<_>>();
        assert_eq!(titles, ["b"]);
    }

    #[test]
    fn variants_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&Variant::Destructive).unwrap(),
            "\"destructive\""
        );
    }
}
