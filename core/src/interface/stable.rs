use crate::interface::{BoundingBox, Timestamp};
use serde::{Deserialize, Serialize};

/// Class-level aggregate that has been consistent long enough to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StableDetection {
    pub class_label: String,
    /// Rounded mean of the class's confidence window, in percent.
    pub confidence: u32,
    /// Current window length.
    pub detection_count: usize,
    pub last_detected_at: Timestamp,
    /// Element-wise mean of every box in the window.
    pub bbox: BoundingBox,
}

impl StableDetection {
    /// Caption drawn above the box.
    pub fn label(&self) -> String {
        format!("{} ({}%)", self.class_label, self.confidence)
    }

    pub fn summary(&self) -> String {
        format!(
            "Confidence: {}% (Stable for {} frames)",
            self.confidence, self.detection_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_text_matches_panel_format() {
        let detection = StableDetection {
            class_label: "person".into(),
            confidence: 87,
            detection_count: 6,
            last_detected_at: 1_000,
            bbox: BoundingBox::new(10.0, 20.0, 100.0, 200.0),
        };
        assert_eq!(detection.label(), "person (87%)");
        assert_eq!(detection.summary(), "Confidence: 87% (Stable for 6 frames)");
    }
}
