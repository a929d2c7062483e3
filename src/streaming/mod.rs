//! Centralized streaming utilities for kmdiff.
//!
//! This module provides shared components for streaming matrix operations:
//! - Zero-allocation matrix line parsing
//! - Inline sort validation
//! - Buffered output formatting
//!
//! Streaming operations hold one line per input in memory at a time.

pub mod buffers;
pub mod output;
pub mod parsing;
pub mod validation;

pub use output::{create_output, MatrixWriter};
pub use parsing::{find_invalid_base, first_column, is_nucleotide, sample_count};
pub use validation::SortValidator;
