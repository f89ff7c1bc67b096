use crate::history::ClassHistory;
use crate::interface::BoundingBox;
use crate::math::stats::StatsHelper;
use crate::prelude::StabilityConfig;

/// Outcome of checking one class window against the stability thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityVerdict {
    pub frames: usize,
    pub avg_confidence: u32,
    pub consistent: bool,
    pub stable: bool,
}

impl StabilityVerdict {
    pub fn describe(&self, config: &StabilityConfig) -> String {
        format!(
            "{}/{} frames, avg {}% (needs >{}%), {}",
            self.frames,
            config.min_frames,
            self.avg_confidence,
            config.min_confidence,
            if self.consistent { "steady" } else { "jittery" }
        )
    }
}

/// True when every pair of boxes differs by less than `max_jitter` pixels in
/// both `x` and `y`. Width and height are not compared.
pub fn bbox_consistent<'a, I>(boxes: I, max_jitter: f64) -> bool
where
    I: IntoIterator<Item = &'a BoundingBox>,
    I::IntoIter: Clone,
{
    let boxes = boxes.into_iter();
    boxes.clone().enumerate().all(|(idx, a)| {
        boxes
            .clone()
            .skip(idx + 1)
            .all(|b| (a.x - b.x).abs() < max_jitter && (a.y - b.y).abs() < max_jitter)
    })
}

pub fn evaluate(history: &ClassHistory, config: &StabilityConfig) -> StabilityVerdict {
    let frames = history.len();
    let avg_confidence = StatsHelper::mean_rounded(history.confidences());
    let consistent = bbox_consistent(history.bboxes(), config.max_jitter);
    let stable =
        frames >= config.min_frames && avg_confidence > config.min_confidence && consistent;

    StabilityVerdict {
        frames,
        avg_confidence,
        consistent,
        stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x: f64, y: f64) -> BoundingBox {
        BoundingBox::new(x, y, 40.0, 40.0)
    }

    #[test]
    fn consistency_checks_all_pairs_not_just_neighbours() {
        // Each neighbour moves 30px, but first and last are 60px apart.
        let drifting = [bbox(0.0, 0.0), bbox(30.0, 0.0), bbox(60.0, 0.0)];
        assert!(!bbox_consistent(&drifting, 50.0));

        let steady = [bbox(0.0, 0.0), bbox(20.0, 10.0), bbox(40.0, 45.0)];
        assert!(bbox_consistent(&steady, 50.0));
    }

    #[test]
    fn jitter_bound_is_strict_and_ignores_size() {
        assert!(!bbox_consistent(&[bbox(0.0, 0.0), bbox(0.0, 50.0)], 50.0));
        assert!(bbox_consistent(&[bbox(0.0, 0.0), bbox(0.0, 49.9)], 50.0));

        let resized = [
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            BoundingBox::new(0.0, 0.0, 300.0, 300.0),
        ];
        assert!(bbox_consistent(&resized, 50.0));
    }

    #[test]
    fn trivial_windows_are_consistent() {
        assert!(bbox_consistent(&[] as &[BoundingBox], 50.0));
        assert!(bbox_consistent(&[bbox(500.0, 500.0)], 50.0));
    }

    #[test]
    fn verdict_requires_every_threshold() {
        let config = StabilityConfig::default();
        let mut history = ClassHistory::with_capacity(config.window_size);
        for t in 0..4 {
            history.push(100, bbox(0.0, 0.0), t);
        }
        let verdict = evaluate(&history, &config);
        assert!(!verdict.stable);
        assert!(verdict.consistent);
        assert_eq!(verdict.avg_confidence, 100);

        history.push(100, bbox(0.0, 0.0), 4);
        assert!(evaluate(&history, &config).stable);
    }
}
