//! kmdiff: difference between two sorted k-mer matrices
//!
//! This library removes from one k-mer abundance matrix every k-mer found in
//! a second one, streaming both files in a single merge pass.
//!
//! # Features
//!
//! - **Streaming I/O**: one line per input in memory, any file size
//! - **Two key orders**: plain lexicographic, or the kmtricks order A < C < T < G
//! - **Drop-in compatibility**: same output as `km_diff`, with
//!   an opt-in mode for its blank-line quirk
//! - **Parallel batches**: independent jobs run on a Rayon pool
//!
//! # Example
//!
//! ```rust,no_run
//! use kmdiff::{DiffConfig, KmerOrder, KmerSize, StreamingDiffCommand};
//!
//! let config = DiffConfig::new(KmerSize::new(31).unwrap()).with_order(KmerOrder::Nucleotide);
//! let cmd = StreamingDiffCommand::new(config);
//!
//! let mut output = Vec::new();
//! let stats = cmd.run("a.mat", "b.mat", &mut output).unwrap();
//! eprintln!("{}", stats);
//! ```

pub mod commands;
pub mod config;
pub mod matrix;
pub mod order;
pub mod parallel;
pub mod streaming;

// Re-export commonly used types
pub use commands::{DiffStats, StreamingDiffCommand};
pub use config::{DiffConfig, KmerSize};
pub use matrix::{MatrixError, MatrixReader, MatrixRecord, StopReason};
pub use order::KmerOrder;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::commands::{DiffStats, StreamingDiffCommand};
    pub use crate::config::{DiffConfig, KmerSize};
    pub use crate::matrix::{MatrixError, MatrixReader, MatrixRecord, StopReason};
    pub use crate::order::KmerOrder;
    pub use crate::parallel::{run_jobs, DiffJob};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_basic_workflow() {
        use crate::prelude::*;
        use std::io::Cursor;

        let a = "AAAA 1 2\nCCCC 3 4\n";
        let b = "AAAA 5 6\n";

        let cmd = StreamingDiffCommand::new(DiffConfig::new(KmerSize::new(4).unwrap()));
        let mut output = Vec::new();
        let stats = cmd
            .run_readers(Cursor::new(a), Cursor::new(b), &mut output)
            .unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "CCCC 3 4 0 0\n");
        assert_eq!(stats.records_written(), 1);
    }
}
