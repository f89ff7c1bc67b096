use crate::workflow::runner::CycleResult;
use objectifycore::telemetry::MetricsSnapshot;
use objectifycore::{BoundingBox, StableDetection, Timestamp};
use serde::{Deserialize, Serialize};

/// What the overlay renderer needs for one frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayBox {
    pub label: String,
    pub summary: String,
    pub bbox: BoundingBox,
}

impl From<&StableDetection> for OverlayBox {
    fn from(detection: &StableDetection) -> Self {
        Self {
            label: detection.label(),
            summary: detection.summary(),
            bbox: detection.bbox,
        }
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct VisualizationModel {
    pub cycle: usize,
    pub updated_at: Timestamp,
    pub detections: Vec<StableDetection>,
    pub overlays: Vec<OverlayBox>,
    pub metrics: MetricsSnapshot,
}

impl From<&CycleResult> for VisualizationModel {
    fn from(result: &CycleResult) -> Self {
        Self {
            cycle: result.cycle,
            updated_at: result.timestamp,
            detections: result.detections.clone(),
            overlays: result.detections.iter().map(OverlayBox::from).collect(),
            metrics: result.metrics,
        }
    }
}
