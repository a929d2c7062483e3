//! Buffer size constants for streaming operations.
//!
//! These constants control memory usage vs I/O throughput tradeoffs.

/// Default output buffer size (2 MB).
pub const DEFAULT_OUTPUT_BUFFER: usize = 2 * 1024 * 1024;

/// Default input buffer size (256 KB) per matrix.
pub const DEFAULT_INPUT_BUFFER: usize = 256 * 1024;

/// Initial line buffer capacity (1 KB).
/// Grows on demand for matrices with many samples, never shrinks.
pub const DEFAULT_LINE_BUFFER: usize = 1024;
