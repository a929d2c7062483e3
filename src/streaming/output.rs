//! Buffered output for k-mer matrices.
//!
//! The writer is append-only: it performs no sorting, deduplication or
//! validation. Every record method terminates the record with one `\n`.

use crate::matrix::MatrixError;
use crate::streaming::buffers::DEFAULT_OUTPUT_BUFFER;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column written for every missing sample during trailing emission.
const ZERO_COLUMN: &[u8] = b" 0";

/// Create (or truncate) an output matrix file.
pub fn create_output<P: AsRef<Path>>(path: P) -> Result<File, MatrixError> {
    let path = path.as_ref();
    File::create(path).map_err(|source| MatrixError::CreateOutput {
        path: path.to_path_buf(),
        source,
    })
}

/// High-throughput matrix output writer.
pub struct MatrixWriter<W: Write> {
    writer: BufWriter<W>,
    lines_written: usize,
}

impl<W: Write> MatrixWriter<W> {
    /// Create a new MatrixWriter with the default 2MB buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_OUTPUT_BUFFER, output)
    }

    /// Create a new MatrixWriter with specified buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            lines_written: 0,
        }
    }

    /// Write a full line as-is with newline.
    #[inline]
    pub fn write_line(&mut self, line: &[u8]) -> Result<(), MatrixError> {
        self.writer.write_all(line)?;
        self.write_newline()
    }

    /// Write a k-mer with its sample columns followed by `zeros` zero columns.
    ///
    /// Produces `<kmer> <columns> 0 0 ...\n`. `columns` is written verbatim,
    /// so an empty slice still leaves the separator after the key.
    #[inline]
    pub fn write_padded(
        &mut self,
        kmer: &[u8],
        columns: &[u8],
        zeros: usize,
    ) -> Result<(), MatrixError> {
        self.writer.write_all(kmer)?;
        self.writer.write_all(b" ")?;
        self.writer.write_all(columns)?;
        for _ in 0..zeros {
            self.writer.write_all(ZERO_COLUMN)?;
        }
        self.write_newline()
    }

    /// Write a newline character.
    #[inline]
    pub fn write_newline(&mut self) -> Result<(), MatrixError> {
        self.writer.write_all(b"\n")?;
        self.lines_written += 1;
        Ok(())
    }

    /// Number of line terminators written so far.
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<(), MatrixError> {
        self.writer.flush()?;
        Ok(())
    }
}
