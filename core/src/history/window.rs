use crate::interface::{BoundingBox, Timestamp};
use std::collections::VecDeque;

/// Bounded sliding window of recent sightings for one class.
///
/// `confidences[i]` and `bboxes[i]` always describe the same sighting; the
/// oldest pair is evicted first once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct ClassHistory {
    confidences: VecDeque<u32>,
    bboxes: VecDeque<BoundingBox>,
    capacity: usize,
    last_seen: Timestamp,
}

impl ClassHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            confidences: VecDeque::with_capacity(capacity),
            bboxes: VecDeque::with_capacity(capacity),
            capacity,
            last_seen: 0,
        }
    }

    pub fn push(&mut self, confidence: u32, bbox: BoundingBox, now: Timestamp) {
        self.confidences.push_back(confidence);
        self.bboxes.push_back(bbox);
        while self.confidences.len() > self.capacity {
            self.confidences.pop_front();
            self.bboxes.pop_front();
        }
        self.last_seen = now;
    }

    pub fn len(&self) -> usize {
        self.confidences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confidences.is_empty()
    }

    pub fn confidences(&self) -> &VecDeque<u32> {
        &self.confidences
    }

    pub fn bboxes(&self) -> &VecDeque<BoundingBox> {
        &self.bboxes
    }

    /// Timestamp of the most recent sighting.
    pub fn last_seen(&self) -> Timestamp {
        self.last_seen
    }
}
