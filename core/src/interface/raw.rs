use crate::math::stats::StatsHelper;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in pixel space, top-left corner plus extent.
///
/// On the wire it is the `[x, y, width, height]` array the detection model emits.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([x, y, width, height]: [f64; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_array()
    }
}

/// One unfiltered model output for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    #[serde(alias = "class")]
    pub class_label: String,
    /// Model confidence in `[0, 1]`.
    pub score: f64,
    pub bbox: BoundingBox,
}

impl RawDetection {
    pub fn new(class_label: impl Into<String>, score: f64, bbox: BoundingBox) -> Self {
        Self {
            class_label: class_label.into(),
            score,
            bbox,
        }
    }

    /// Confidence as a whole percentage.
    pub fn rounded_confidence(&self) -> u32 {
        StatsHelper::round_percent(self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_detection_accepts_model_json() {
        let raw: RawDetection =
            serde_json::from_str(r#"{"class": "cat", "score": 0.957, "bbox": [1.5, 2.0, 30.0, 40.0]}"#)
                .unwrap();
        assert_eq!(raw.class_label, "cat");
        assert_eq!(raw.bbox, BoundingBox::new(1.5, 2.0, 30.0, 40.0));
        assert_eq!(raw.rounded_confidence(), 96);
    }

    #[test]
    fn bbox_serializes_as_array() {
        let json = serde_json::to_string(&BoundingBox::new(0.0, 5.0, 10.0, 20.0)).unwrap();
        assert_eq!(json, "[0.0,5.0,10.0,20.0]");
    }

    #[test]
    fn short_bbox_array_is_rejected() {
        let parsed: Result<RawDetection, _> =
            serde_json::from_str(r#"{"class_label": "dog", "score": 0.5, "bbox": [1.0, 2.0]}"#);
        assert!(parsed.is_err());
    }
}
