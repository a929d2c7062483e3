//! Sort validation for streaming operations.
//!
//! The difference engine assumes each matrix is sorted under the active
//! [`KmerOrder`] and never re-sorts. [`SortValidator`] checks that assumption
//! one adjacent pair at a time, inline with the merge, so the input is read
//! only once. It does not detect anything a pairwise check cannot.

use crate::matrix::{MatrixError, Side};
use crate::order::KmerOrder;
use std::cmp::Ordering;

/// Inline sort validator for use within streaming loops.
#[derive(Debug)]
pub struct SortValidator {
    side: Side,
    order: KmerOrder,
    prev_kmer: Option<Vec<u8>>,
}

impl SortValidator {
    /// Create a new sort validator for one input.
    pub fn new(side: Side, order: KmerOrder) -> Self {
        Self {
            side,
            order,
            prev_kmer: None,
        }
    }

    /// Validate that `kmer` is not smaller than the previous one.
    ///
    /// `line` is only used for the error message. Equal keys are accepted.
    #[inline]
    pub fn validate(&mut self, kmer: &[u8], line: usize) -> Result<(), MatrixError> {
        if let Some(prev) = &self.prev_kmer {
            if self.order.compare(prev, kmer) == Ordering::Greater {
                return Err(MatrixError::Unsorted {
                    side: self.side,
                    line,
                    previous: String::from_utf8_lossy(prev).into_owned(),
                    current: String::from_utf8_lossy(kmer).into_owned(),
                });
            }
        }

        // Reuses the allocation
        let prev = self.prev_kmer.get_or_insert_with(Vec::new);
        prev.clear();
        prev.extend_from_slice(kmer);
        Ok(())
    }
}
