//! Parallel processing of independent difference jobs using Rayon.
//!
//! A single difference is strictly sequential. Batches of jobs over
//! disjoint files share nothing, so each job runs on its own worker.

use crate::commands::{DiffStats, StreamingDiffCommand};
use crate::matrix::{is_stdin, open_input, MatrixError};
use crate::streaming::create_output;
use rayon::prelude::*;
use std::path::PathBuf;

/// One `A - B` difference writing to its own output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffJob {
    pub matrix_a: PathBuf,
    pub matrix_b: PathBuf,
    pub output: PathBuf,
}

impl DiffJob {
    pub fn new(
        matrix_a: impl Into<PathBuf>,
        matrix_b: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            matrix_a: matrix_a.into(),
            matrix_b: matrix_b.into(),
            output: output.into(),
        }
    }

    /// Run this job on the calling thread.
    pub fn run(&self, cmd: &StreamingDiffCommand) -> Result<DiffStats, MatrixError> {
        if is_stdin(&self.matrix_a) || is_stdin(&self.matrix_b) {
            return Err(MatrixError::InvalidInput(
                "stdin cannot be used in a batch job".to_string(),
            ));
        }
        let a = open_input(&self.matrix_a)?;
        let b = open_input(&self.matrix_b)?;
        let mut output = create_output(&self.output)?;
        cmd.run_readers(a, b, &mut output)
    }
}

/// Run every job in parallel. Results are returned in job order; a failed
/// job does not stop the others.
pub fn run_jobs(
    cmd: &StreamingDiffCommand,
    jobs: &[DiffJob],
) -> Vec<Result<DiffStats, MatrixError>> {
    jobs.par_iter().map(|job| job.run(cmd)).collect()
}
