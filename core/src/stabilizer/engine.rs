use crate::history::HistoryStore;
use crate::interface::{RawDetection, StableDetection, Timestamp};
use crate::math::stats::StatsHelper;
use crate::prelude::{StabilityConfig, StabilizerResult};
use crate::stabilizer::verdict::evaluate;
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};

/// Turns noisy per-frame model output into detections steady enough to draw.
///
/// The engine owns the per-class history for one detection session. Only the
/// history persists between calls; every `process_batch` builds its output
/// from scratch. Not meant for concurrent use: wrap it in a lock if several
/// threads need to feed it.
pub struct StabilizationEngine {
    config: StabilityConfig,
    history: HistoryStore,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl StabilizationEngine {
    pub fn new(config: StabilityConfig) -> StabilizerResult<Self> {
        config.validate()?;
        Ok(Self {
            history: HistoryStore::new(config.window_size),
            config,
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        })
    }

    pub fn config(&self) -> &StabilityConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Feeds one frame's raw detections and returns the classes that are stable now.
    ///
    /// Detections are applied in order. A class absent from `detections` is not
    /// reported, whatever its history says.
    pub fn process_batch(
        &mut self,
        detections: &[RawDetection],
        now: Timestamp,
    ) -> Vec<StableDetection> {
        let mut stable = Vec::new();

        for detection in detections {
            let history = self.history.record_sighting(
                &detection.class_label,
                detection.rounded_confidence(),
                detection.bbox,
                now,
            );
            let verdict = evaluate(history, &self.config);

            if !verdict.stable {
                self.logger
                    .suppressed(&detection.class_label, &verdict.describe(&self.config));
                continue;
            }

            stable.push(StableDetection {
                class_label: detection.class_label.clone(),
                confidence: verdict.avg_confidence,
                detection_count: verdict.frames,
                last_detected_at: now,
                bbox: StatsHelper::mean_bbox(history.bboxes()),
            });
        }

        self.metrics.record_batch(detections.len(), stable.len());
        self.logger.record(&format!(
            "StabilizationEngine batch {} raw -> {} stable ({} classes tracked)",
            detections.len(),
            stable.len(),
            self.history.len()
        ));

        stable
    }

    /// Drops histories not refreshed within `history_ttl_ms`. No-op without a TTL.
    pub fn prune_stale(&mut self, now: Timestamp) -> usize {
        let Some(ttl) = self.config.history_ttl_ms else {
            return 0;
        };
        let removed = self.history.prune_stale(now, ttl);
        if removed > 0 {
            self.metrics.record_pruned(removed);
            self.logger
                .record(&format!("StabilizationEngine pruned {} stale classes", removed));
        }
        removed
    }

    /// Starts a fresh session: all histories and counters are discarded.
    pub fn reset(&mut self) {
        self.history.clear();
        self.metrics.reset();
        self.logger.record("StabilizationEngine session reset");
    }
}

impl Default for StabilizationEngine {
    fn default() -> Self {
        let config = StabilityConfig::default();
        Self {
            history: HistoryStore::new(config.window_size),
            config,
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        }
    }
}
