use serde::Serialize;
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

/// Counters accumulated over a detection session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub batches: usize,
    pub raw_detections: usize,
    pub stable_emitted: usize,
    pub classes_pruned: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_batch(&self, raw: usize, stable: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.batches += 1;
            metrics.raw_detections += raw;
            metrics.stable_emitted += stable;
        }
    }

    pub fn record_pruned(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.classes_pruned += count;
        }
    }

    pub fn reset(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            *metrics = MetricsSnapshot::default();
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().map(|metrics| *metrics).unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_accumulate_until_reset() {
        let metrics = MetricsRecorder::new();
        metrics.record_batch(3, 1);
        metrics.record_batch(2, 0);
        metrics.record_pruned(4);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.batches, 2);
        assert_eq!(snapshot.raw_detections, 5);
        assert_eq!(snapshot.stable_emitted, 1);
        assert_eq!(snapshot.classes_pruned, 4);

        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }
}
