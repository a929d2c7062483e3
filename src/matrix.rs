//! Streaming k-mer matrix reader.
//!
//! A matrix is a text file with one k-mer per line followed by its
//! per-sample abundances. [`MatrixReader`] yields one validated record at a
//! time from a reusable line buffer, so a whole run reads each input with a
//! single growing allocation.

use crate::config::KmerSize;
use crate::streaming::buffers::{DEFAULT_INPUT_BUFFER, DEFAULT_LINE_BUFFER};
use crate::streaming::parsing::{find_invalid_base, strip_line_terminator};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a matrix run.
///
/// Malformed lines are not errors: they end the stream for their side and
/// are reported through [`StopReason`].
#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Cannot open file \"{}\": {source}", .path.display())]
    OpenInput { path: PathBuf, source: io::Error },

    #[error("Cannot open output file \"{}\": {source}", .path.display())]
    CreateOutput { path: PathBuf, source: io::Error },

    #[error("Invalid value of k-mer size: {0} (must be at least 1)")]
    InvalidKmerSize(usize),

    #[error("Only one input matrix can be read from stdin")]
    StdinTwice,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "Matrix {side} not sorted: k-mer {current} at line {line} comes after {previous}"
    )]
    Unsorted {
        side: Side,
        line: usize,
        previous: String,
        current: String,
    },
}

pub type Result<T> = std::result::Result<T, MatrixError>;

/// Which input of the difference a reader or error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The matrix k-mers are removed from
    A,
    /// The matrix whose k-mers are removed
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "1"),
            Side::B => write!(f, "2"),
        }
    }
}

/// Why a reader stopped producing records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Clean end of input.
    EndOfFile,
    /// A line shorter than the k-mer size.
    ShortLine { line: usize },
    /// A byte outside {A,C,G,T,a,c,g,t} inside the k-mer.
    InvalidBase { line: usize, position: usize, base: u8 },
}

impl StopReason {
    /// True if the stream ended on a malformed line rather than at EOF.
    pub fn is_malformed(self) -> bool {
        !matches!(self, StopReason::EndOfFile)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            StopReason::EndOfFile => write!(f, "end of file"),
            StopReason::ShortLine { line } => write!(f, "short line {}", line),
            StopReason::InvalidBase {
                line,
                position,
                base,
            } => {
                if base.is_ascii_graphic() {
                    write!(
                        f,
                        "invalid base '{}' at line {} position {}",
                        base as char, line, position
                    )
                } else {
                    write!(
                        f,
                        "invalid base 0x{:02x} at line {} position {}",
                        base, line, position
                    )
                }
            }
        }
    }
}

/// The current record of a [`MatrixReader`].
///
/// Borrows the reader's line buffer; the next call to
/// [`MatrixReader::advance`] replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixRecord<'a> {
    /// The first `ksize` bytes of the line, case preserved.
    pub kmer: &'a [u8],
    /// The whole line including the k-mer, without its line terminator.
    pub line: &'a [u8],
}

/// Open an input matrix. `-` reads standard input.
pub fn open_input<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    if is_stdin(path) {
        return Ok(Box::new(BufReader::with_capacity(
            DEFAULT_INPUT_BUFFER,
            io::stdin(),
        )));
    }
    let file = File::open(path).map_err(|source| MatrixError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(BufReader::with_capacity(DEFAULT_INPUT_BUFFER, file)))
}

/// Check if a path names standard input.
pub fn is_stdin<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().as_os_str() == "-"
}

/// A streaming k-mer matrix reader.
pub struct MatrixReader<R: BufRead> {
    reader: R,
    ksize: usize,
    buffer: Vec<u8>,
    has_record: bool,
    line_number: usize,
    records_read: usize,
    stop: Option<StopReason>,
}

impl<R: BufRead> MatrixReader<R> {
    /// Create a new matrix reader from any buffered source.
    pub fn new(reader: R, ksize: KmerSize) -> Self {
        Self {
            reader,
            ksize: ksize.get(),
            buffer: Vec::with_capacity(DEFAULT_LINE_BUFFER),
            has_record: false,
            line_number: 0,
            records_read: 0,
            stop: None,
        }
    }

    /// Read the next record and make it current.
    ///
    /// Returns `Ok(false)` once the stream is exhausted. A short line or an
    /// invalid base exhausts the stream permanently; later calls never read
    /// past it. Only I/O failures are errors.
    pub fn advance(&mut self) -> Result<bool> {
        self.has_record = false;
        if self.stop.is_some() {
            return Ok(false);
        }

        self.buffer.clear();
        let bytes_read = self.reader.read_until(b'\n', &mut self.buffer)?;
        if bytes_read == 0 {
            self.stop = Some(StopReason::EndOfFile);
            return Ok(false);
        }
        self.line_number += 1;

        let len = strip_line_terminator(&self.buffer).len();
        self.buffer.truncate(len);

        if len < self.ksize {
            self.stop = Some(StopReason::ShortLine {
                line: self.line_number,
            });
            return Ok(false);
        }

        if let Some(position) = find_invalid_base(&self.buffer[..self.ksize]) {
            self.stop = Some(StopReason::InvalidBase {
                line: self.line_number,
                position,
                base: self.buffer[position],
            });
            return Ok(false);
        }

        self.has_record = true;
        self.records_read += 1;
        Ok(true)
    }

    /// Advance and return the new current record.
    pub fn next_record(&mut self) -> Result<Option<MatrixRecord<'_>>> {
        self.advance()?;
        Ok(self.current())
    }

    /// The current record, if the last [`advance`](Self::advance) produced one.
    #[inline]
    pub fn current(&self) -> Option<MatrixRecord<'_>> {
        if !self.has_record {
            return None;
        }
        Some(MatrixRecord {
            kmer: &self.buffer[..self.ksize],
            line: &self.buffer,
        })
    }

    /// Why the reader stopped, once it has.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop
    }

    pub fn is_exhausted(&self) -> bool {
        self.stop.is_some()
    }

    /// Number of lines consumed, including a final malformed one.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Number of valid records produced.
    pub fn records_read(&self) -> usize {
        self.records_read
    }
}
