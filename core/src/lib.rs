//! Detection stabilization core for the Objectify live object-detection viewer.
//!
//! Raw per-frame model output goes in, temporally smoothed detections that are
//! safe to draw come out. The engine keeps a bounded per-class window of recent
//! sightings and only reports a class once it has been seen often enough, with
//! enough confidence and little enough positional jitter.

pub mod history;
pub mod interface;
pub mod math;
pub mod prelude;
pub mod stabilizer;
pub mod telemetry;

pub use interface::{BoundingBox, RawDetection, StableDetection, Timestamp};
pub use prelude::{DetectionSource, StabilityConfig, StabilizerError, StabilizerResult};
pub use stabilizer::StabilizationEngine;
