use crate::interface::RawDetection;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW_SIZE: usize = 7;
pub const DEFAULT_MIN_FRAMES: usize = 5;
pub const DEFAULT_MIN_CONFIDENCE: u32 = 60;
pub const DEFAULT_MAX_JITTER: f64 = 50.0;
pub const DEFAULT_BATCH_CADENCE_MS: u64 = 2000;

/// Tunables that decide when a class is steady enough to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Number of recent sightings kept per class.
    pub window_size: usize,
    /// Sightings required in the window before a class may be reported.
    pub min_frames: usize,
    /// Average confidence (percent) that must be strictly exceeded.
    pub min_confidence: u32,
    /// Largest allowed x/y difference, in pixels, between any two boxes in a window.
    pub max_jitter: f64,
    /// How often the consumer pulls a batch and feeds the engine.
    pub batch_cadence_ms: u64,
    /// Histories not refreshed for this long are dropped by `prune_stale`.
    /// `None` keeps them for the whole session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_ttl_ms: Option<u64>,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_frames: DEFAULT_MIN_FRAMES,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_jitter: DEFAULT_MAX_JITTER,
            batch_cadence_ms: DEFAULT_BATCH_CADENCE_MS,
            history_ttl_ms: None,
        }
    }
}

impl StabilityConfig {
    pub fn validate(&self) -> StabilizerResult<()> {
        if self.window_size == 0 {
            return Err(StabilizerError::InvalidConfig(
                "window_size must be at least 1".into(),
            ));
        }
        if self.min_frames == 0 || self.min_frames > self.window_size {
            return Err(StabilizerError::InvalidConfig(format!(
                "min_frames must be within 1..={} (got {})",
                self.window_size, self.min_frames
            )));
        }
        if self.min_confidence > 100 {
            return Err(StabilizerError::InvalidConfig(format!(
                "min_confidence is a percentage (got {})",
                self.min_confidence
            )));
        }
        if !self.max_jitter.is_finite() || self.max_jitter <= 0.0 {
            return Err(StabilizerError::InvalidConfig(format!(
                "max_jitter must be a positive pixel distance (got {})",
                self.max_jitter
            )));
        }
        if self.batch_cadence_ms == 0 {
            return Err(StabilizerError::InvalidConfig(
                "batch_cadence_ms must be non-zero".into(),
            ));
        }
        if self.history_ttl_ms == Some(0) {
            return Err(StabilizerError::InvalidConfig(
                "history_ttl_ms must be non-zero when set".into(),
            ));
        }
        Ok(())
    }
}

/// Common error type for the stabilization core and its collaborators.
#[derive(thiserror::Error, Debug)]
pub enum StabilizerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("detection source failure: {0}")]
    SourceFailure(String),
}

pub type StabilizerResult<T> = Result<T, StabilizerError>;

/// Anything that can hand over the raw detections for the current frame.
pub trait DetectionSource {
    fn next_batch(&mut self) -> StabilizerResult<Vec<RawDetection>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = StabilityConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_size, 7);
        assert_eq!(config.min_frames, 5);
        assert_eq!(config.min_confidence, 60);
        assert_eq!(config.batch_cadence_ms, 2000);
    }

    #[test]
    fn min_frames_larger_than_window_is_rejected() {
        let config = StabilityConfig {
            window_size: 3,
            min_frames: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StabilizerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn non_positive_jitter_is_rejected() {
        let config = StabilityConfig {
            max_jitter: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = StabilityConfig {
            max_jitter: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: StabilityConfig =
            serde_json::from_str(r#"{"min_confidence": 75, "history_ttl_ms": 10000}"#).unwrap();
        assert_eq!(config.min_confidence, 75);
        assert_eq!(config.window_size, DEFAULT_WINDOW_SIZE);
        assert_eq!(config.history_ttl_ms, Some(10_000));
    }
}
