//! Per-run configuration for the matrix difference engine.
//!
//! Everything here is fixed before the first record is read and stays
//! immutable for the lifetime of a run. There is no global state: two runs
//! with different settings can execute side by side.

use crate::matrix::MatrixError;
use crate::order::KmerOrder;

/// Default k-mer length used by kmtricks matrices.
pub const DEFAULT_KMER_SIZE: usize = 31;

/// Validated k-mer length (always positive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KmerSize(usize);

impl KmerSize {
    /// Validate a k-mer length.
    ///
    /// # Example
    ///
    /// ```
    /// use kmdiff::config::KmerSize;
    ///
    /// assert_eq!(KmerSize::new(21).unwrap().get(), 21);
    /// assert!(KmerSize::new(0).is_err());
    /// ```
    pub fn new(k: usize) -> Result<Self, MatrixError> {
        if k == 0 {
            return Err(MatrixError::InvalidKmerSize(k));
        }
        Ok(Self(k))
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for KmerSize {
    fn default() -> Self {
        Self(DEFAULT_KMER_SIZE)
    }
}

impl std::fmt::Display for KmerSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settings for a single difference run.
#[derive(Debug, Clone, Default)]
pub struct DiffConfig {
    /// Length of the key at the start of every line
    pub ksize: KmerSize,
    /// Order the input matrices are sorted by
    pub order: KmerOrder,
    /// Emit a blank line for every merge step that writes no record,
    /// byte-compatible with km_diff output
    pub legacy_blank_lines: bool,
    /// Fail when a key is smaller than the one before it
    pub check_sorted: bool,
}

impl DiffConfig {
    pub fn new(ksize: KmerSize) -> Self {
        Self {
            ksize,
            ..Self::default()
        }
    }

    pub fn with_order(mut self, order: KmerOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_legacy_blank_lines(mut self, enabled: bool) -> Self {
        self.legacy_blank_lines = enabled;
        self
    }

    pub fn with_check_sorted(mut self, enabled: bool) -> Self {
        self.check_sorted = enabled;
        self
    }
}
