use anyhow::bail;
use objectifycore::{BoundingBox, DetectionSource, RawDetection, StabilizerResult};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// One object the synthetic camera keeps seeing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    pub class_label: String,
    pub bbox: BoundingBox,
    pub score: f64,
    /// Uniform noise applied to `x` and `y`, in pixels.
    #[serde(default)]
    pub jitter_px: f64,
    /// Uniform noise applied to the score.
    #[serde(default)]
    pub score_noise: f64,
    /// Probability that the model misses the object in a frame.
    #[serde(default)]
    pub dropout: f64,
}

impl SceneObject {
    pub fn steady(class_label: &str, bbox: [f64; 4], score: f64) -> Self {
        Self {
            class_label: class_label.to_string(),
            bbox: bbox.into(),
            score,
            jitter_px: 0.0,
            score_noise: 0.0,
            dropout: 0.0,
        }
    }
}

/// A 1280x720 webcam view: a person who sits still, a cup that is sometimes
/// missed and a dog that never holds still.
pub fn default_scene() -> Vec<SceneObject> {
    vec![
        SceneObject {
            jitter_px: 8.0,
            score_noise: 0.05,
            ..SceneObject::steady("person", [420.0, 120.0, 380.0, 560.0], 0.88)
        },
        SceneObject {
            jitter_px: 4.0,
            score_noise: 0.1,
            dropout: 0.25,
            ..SceneObject::steady("cup", [900.0, 480.0, 90.0, 120.0], 0.72)
        },
        SceneObject {
            jitter_px: 70.0,
            score_noise: 0.05,
            ..SceneObject::steady("dog", [150.0, 400.0, 260.0, 220.0], 0.8)
        },
    ]
}

/// Seeded stand-in for the detection model.
pub struct SyntheticSource {
    scene: Vec<SceneObject>,
    rng: StdRng,
}

impl SyntheticSource {
    pub fn new(scene: Vec<SceneObject>, seed: u64) -> anyhow::Result<Self> {
        for object in &scene {
            if !(0.0..=1.0).contains(&object.dropout) {
                bail!(
                    "scene object {} has dropout {} outside [0, 1]",
                    object.class_label,
                    object.dropout
                );
            }
            if !(0.0..=1.0).contains(&object.score) {
                bail!(
                    "scene object {} has score {} outside [0, 1]",
                    object.class_label,
                    object.score
                );
            }
            let noise_ok = |amplitude: f64| amplitude.is_finite() && amplitude >= 0.0;
            if !noise_ok(object.jitter_px) || !noise_ok(object.score_noise) {
                bail!(
                    "scene object {} needs finite, non-negative noise (jitter {}, score {})",
                    object.class_label,
                    object.jitter_px,
                    object.score_noise
                );
            }
        }

        Ok(Self {
            scene,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn noise(&mut self, amplitude: f64) -> f64 {
        if amplitude > 0.0 {
            self.rng.gen_range(-amplitude..=amplitude)
        } else {
            0.0
        }
    }
}

impl DetectionSource for SyntheticSource {
    fn next_batch(&mut self) -> StabilizerResult<Vec<RawDetection>> {
        let mut batch = Vec::with_capacity(self.scene.len());
        for idx in 0..self.scene.len() {
            let object = self.scene[idx].clone();
            if object.dropout > 0.0 && self.rng.gen_bool(object.dropout) {
                continue;
            }

            let bbox = BoundingBox {
                x: object.bbox.x + self.noise(object.jitter_px),
                y: object.bbox.y + self.noise(object.jitter_px),
                ..object.bbox
            };
            let score = (object.score + self.noise(object.score_noise)).clamp(0.0, 1.0);
            batch.push(RawDetection::new(object.class_label, score, bbox));
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_object_is_reported_unchanged() {
        let scene = vec![SceneObject::steady("cat", [0.0, 0.0, 10.0, 10.0], 0.95)];
        let mut source = SyntheticSource::new(scene, 1).unwrap();
        let batch = source.next_batch().unwrap();
        assert_eq!(
            batch,
            vec![RawDetection::new(
                "cat",
                0.95,
                BoundingBox::new(0.0, 0.0, 10.0, 10.0)
            )]
        );
    }

    #[test]
    fn jitter_stays_within_amplitude() {
        let scene = vec![SceneObject {
            jitter_px: 5.0,
            ..SceneObject::steady("cup", [100.0, 100.0, 10.0, 10.0], 0.7)
        }];
        let mut source = SyntheticSource::new(scene, 42).unwrap();
        for _ in 0..50 {
            let batch = source.next_batch().unwrap();
            let bbox = batch[0].bbox;
            assert!((bbox.x - 100.0).abs() <= 5.0);
            assert!((bbox.y - 100.0).abs() <= 5.0);
            assert_eq!(bbox.width, 10.0);
        }
    }

    #[test]
    fn full_dropout_hides_object() {
        let scene = vec![SceneObject {
            dropout: 1.0,
            ..SceneObject::steady("dog", [0.0, 0.0, 1.0, 1.0], 0.9)
        }];
        let mut source = SyntheticSource::new(scene, 3).unwrap();
        assert!(source.next_batch().unwrap().is_empty());
    }

    #[test]
    fn same_seed_replays_same_frames() {
        let mut a = SyntheticSource::new(default_scene(), 9).unwrap();
        let mut b = SyntheticSource::new(default_scene(), 9).unwrap();
        for _ in 0..5 {
            assert_eq!(a.next_batch().unwrap(), b.next_batch().unwrap());
        }
    }

    #[test]
    fn invalid_dropout_is_rejected() {
        let scene = vec![SceneObject {
            dropout: 1.5,
            ..SceneObject::steady("dog", [0.0, 0.0, 1.0, 1.0], 0.9)
        }];
        assert!(SyntheticSource::new(scene, 0).is_err());
    }

    #[test]
    fn non_finite_noise_is_rejected() {
        let jitter = vec![SceneObject {
            jitter_px: f64::INFINITY,
            ..SceneObject::steady("cat", [0.0, 0.0, 1.0, 1.0], 0.9)
        }];
        assert!(SyntheticSource::new(jitter, 0).is_err());

        let score = vec![SceneObject {
            score_noise: f64::NAN,
            ..SceneObject::steady("cat", [0.0, 0.0, 1.0, 1.0], 0.9)
        }];
        assert!(SyntheticSource::new(score, 0).is_err());

        let negative = vec![SceneObject {
            jitter_px: -1.0,
            ..SceneObject::steady("cat", [0.0, 0.0, 1.0, 1.0], 0.9)
        }];
        assert!(SyntheticSource::new(negative, 0).is_err());
    }
}
