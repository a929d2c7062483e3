//! Command implementations for kmdiff.

pub mod streaming_diff;

pub use streaming_diff::{DiffStats, StreamingDiffCommand};
