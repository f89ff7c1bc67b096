use crate::history::window::ClassHistory;
use crate::interface::{BoundingBox, Timestamp};
use std::collections::HashMap;

/// Per-class sighting windows, keyed by class label.
///
/// Histories are created on first sighting and live until `clear` or
/// `prune_stale` removes them.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    classes: HashMap<String, ClassHistory>,
    window_size: usize,
}

impl HistoryStore {
    pub fn new(window_size: usize) -> Self {
        Self {
            classes: HashMap::new(),
            window_size,
        }
    }

    /// Appends one sighting to the class's window and returns the updated window.
    pub fn record_sighting(
        &mut self,
        class_label: &str,
        confidence: u32,
        bbox: BoundingBox,
        now: Timestamp,
    ) -> &ClassHistory {
        let window_size = self.window_size;
        let history = self
            .classes
            .entry(class_label.to_string())
            .or_insert_with(|| ClassHistory::with_capacity(window_size));
        history.push(confidence, bbox, now);
        history
    }

    pub fn get(&self, class_label: &str) -> Option<&ClassHistory> {
        self.classes.get(class_label)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Known class labels, sorted for stable output.
    pub fn class_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    pub fn clear(&mut self) {
        self.classes.clear();
    }

    /// Drops every history whose latest sighting is more than `ttl` before `now`.
    /// Returns how many classes were removed.
    pub fn prune_stale(&mut self, now: Timestamp, ttl: u64) -> usize {
        let before = self.classes.len();
        self.classes
            .retain(|_, history| now.saturating_sub(history.last_seen()) <= ttl);
        before - self.classes.len()
    }
}
