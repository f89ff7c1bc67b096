pub mod engine;
pub mod verdict;

pub use engine::StabilizationEngine;
pub use verdict::{bbox_consistent, evaluate, StabilityVerdict};
