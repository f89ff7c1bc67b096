pub mod raw;
pub mod stable;

pub use raw::{BoundingBox, RawDetection};
pub use stable::StableDetection;

/// Milliseconds since the Unix epoch, as stamped by the consumer.
pub type Timestamp = u64;
