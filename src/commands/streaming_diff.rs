//! Streaming difference of two sorted k-mer matrices.
//!
//! Removes from matrix A every k-mer that also appears in matrix B with a
//! single merge pass over both files:
//!
//! - k-mer only in A (while B still has records): the A line is written unchanged
//! - k-mer in both: dropped
//! - k-mer only in B: skipped
//! - once B is exhausted, every remaining A k-mer is written with one `0`
//!   column appended per sample of B
//!
//! # Memory Complexity
//!
//! O(1) records: one reusable line buffer per input.
//!
//! # Requirements
//!
//! Both input files MUST be sorted by k-mer under the selected [`KmerOrder`].
//! A malformed line (shorter than k, or a non-ACGT byte in the k-mer) ends
//! that input early; it is logged, not treated as an error.
//!
//! [`KmerOrder`]: crate::order::KmerOrder

use crate::config::DiffConfig;
use crate::matrix::{is_stdin, open_input, MatrixError, MatrixReader, Side, StopReason};
use crate::streaming::parsing::{first_column, sample_count};
use crate::streaming::{MatrixWriter, SortValidator};
use std::cmp::Ordering;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, info, info_span, warn};

/// Streaming difference command.
#[derive(Debug, Clone, Default)]
pub struct StreamingDiffCommand {
    pub config: DiffConfig,
}

/// Statistics from a streaming difference run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiffStats {
    /// Sample columns detected on the first record of A
    pub samples_a: usize,
    /// Sample columns detected on the first record of B
    pub samples_b: usize,
    /// Valid records read from A
    pub a_records: usize,
    /// Valid records read from B
    pub b_records: usize,
    /// k-mers present in both matrices (removed)
    pub shared: usize,
    /// A records written unchanged during the merge
    pub unique_written: usize,
    /// A records written zero-padded after B ran out
    pub trailing_written: usize,
    /// Line terminators written, legacy blank lines included
    pub lines_written: usize,
    /// Why A stopped; `None` if it was not read to the end
    pub a_stop: Option<StopReason>,
    /// Why B stopped; `None` if it was not read to the end
    pub b_stop: Option<StopReason>,
}

impl DiffStats {
    /// Total data lines written.
    pub fn records_written(&self) -> usize {
        self.unique_written + self.trailing_written
    }

    /// True if either input ended on a malformed line instead of at EOF.
    pub fn truncated(&self) -> bool {
        [self.a_stop, self.b_stop]
            .into_iter()
            .flatten()
            .any(StopReason::is_malformed)
    }
}

impl fmt::Display for DiffStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A: {} ({} samples), B: {} ({} samples), Shared: {}, Written: {} ({} padded), Lines: {}",
            self.a_records,
            self.samples_a,
            self.b_records,
            self.samples_b,
            self.shared,
            self.records_written(),
            self.trailing_written,
            self.lines_written
        )
    }
}

/// One side of the merge: the reader plus its optional order check.
struct Input<R: BufRead> {
    side: Side,
    reader: MatrixReader<R>,
    validator: Option<SortValidator>,
}

impl<R: BufRead> Input<R> {
    /// Advance to the next record, logging why the stream ended if it just did.
    fn advance(&mut self, warned: &mut bool) -> Result<bool, MatrixError> {
        let was_exhausted = self.reader.is_exhausted();

        if self.reader.advance()? {
            if let (Some(validator), Some(record)) =
                (self.validator.as_mut(), self.reader.current())
            {
                validator.validate(record.kmer, self.reader.line_number())?;
            }
            return Ok(true);
        }

        if !was_exhausted {
            match self.reader.stop_reason() {
                Some(reason @ StopReason::InvalidBase { .. }) => {
                    if !*warned {
                        warn!(matrix = %self.side, %reason, "input does not seem valid");
                        *warned = true;
                    }
                }
                Some(reason @ StopReason::ShortLine { .. }) => {
                    debug!(matrix = %self.side, %reason, "matrix ended on a short line");
                }
                _ => {}
            }
        }
        Ok(false)
    }

    /// Sample count of the current record, 0 if there is none.
    fn sample_count(&self) -> usize {
        self.reader
            .current()
            .map_or(0, |record| sample_count(record.line))
    }
}

impl StreamingDiffCommand {
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    /// Execute the difference A - B on two matrix files.
    ///
    /// Both inputs are opened before anything is written. Either path may be
    /// `-` for stdin, but not both.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        a_path: P,
        b_path: P,
        output: &mut W,
    ) -> Result<DiffStats, MatrixError> {
        if is_stdin(&a_path) && is_stdin(&b_path) {
            return Err(MatrixError::StdinTwice);
        }

        let a = open_input(a_path)?;
        let b = open_input(b_path)?;

        self.run_readers(a, b, output)
    }

    /// Execute the difference A - B on two buffered sources.
    pub fn run_readers<RA: BufRead, RB: BufRead, W: Write>(
        &self,
        a: RA,
        b: RB,
        output: &mut W,
    ) -> Result<DiffStats, MatrixError> {
        let ksize = self.config.ksize;
        let order = self.config.order;
        let legacy = self.config.legacy_blank_lines;

        let _span = info_span!("diff", k = ksize.get(), %order).entered();

        let mut a = Input {
            side: Side::A,
            reader: MatrixReader::new(a, ksize),
            validator: self
                .config
                .check_sorted
                .then(|| SortValidator::new(Side::A, order)),
        };
        let mut b = Input {
            side: Side::B,
            reader: MatrixReader::new(b, ksize),
            validator: self
                .config
                .check_sorted
                .then(|| SortValidator::new(Side::B, order)),
        };

        let mut out = MatrixWriter::new(output);
        let mut stats = DiffStats::default();
        let mut warned = false;

        a.advance(&mut warned)?;
        stats.samples_a = a.sample_count();
        info!("samples in 1st matrix: {}", stats.samples_a);

        b.advance(&mut warned)?;
        stats.samples_b = b.sample_count();
        info!("samples in 2nd matrix: {}", stats.samples_b);

        // Merge while both sides have a record
        while let (Some(rec_a), Some(rec_b)) = (a.reader.current(), b.reader.current()) {
            match order.compare(rec_a.kmer, rec_b.kmer) {
                Ordering::Equal => {
                    stats.shared += 1;
                    a.advance(&mut warned)?;
                    b.advance(&mut warned)?;
                    if legacy {
                        out.write_newline()?;
                    }
                }
                Ordering::Less => {
                    out.write_line(rec_a.line)?;
                    stats.unique_written += 1;
                    a.advance(&mut warned)?;
                }
                Ordering::Greater => {
                    b.advance(&mut warned)?;
                    if legacy {
                        out.write_newline()?;
                    }
                }
            }
        }

        // B is done: pad what is left of A with B's zero counts.
        // If A ran out first, the rest of B cannot affect the result.
        while let Some(rec_a) = a.reader.current() {
            out.write_padded(rec_a.kmer, first_column(rec_a.line), stats.samples_b)?;
            stats.trailing_written += 1;
            a.advance(&mut warned)?;
        }

        out.flush()?;

        stats.lines_written = out.lines_written();
        stats.a_records = a.reader.records_read();
        stats.b_records = b.reader.records_read();
        stats.a_stop = a.reader.stop_reason();
        stats.b_stop = b.reader.stop_reason();

        debug!(
            shared = stats.shared,
            written = stats.records_written(),
            truncated = stats.truncated(),
            "matrix difference complete"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KmerSize;
    use crate::order::KmerOrder;
    use std::io::{Cursor, Write as IoWrite};
    use tempfile::NamedTempFile;

    fn create_temp_matrix(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn cmd(k: usize) -> StreamingDiffCommand {
        StreamingDiffCommand::new(DiffConfig::new(KmerSize::new(k).unwrap()))
    }

    fn diff(cmd: &StreamingDiffCommand, a: &str, b: &str) -> (String, DiffStats) {
        let mut output = Vec::new();
        let stats = cmd
            .run_readers(Cursor::new(a), Cursor::new(b), &mut output)
            .unwrap();
        (String::from_utf8(output).unwrap(), stats)
    }

    #[test]
    fn test_basic_streaming_diff() {
        let a_file = create_temp_matrix("AAAA 1 2\nCCCC 3 4\n");
        let b_file = create_temp_matrix("AAAA 5 6\n");

        let mut output = Vec::new();
        let stats = cmd(4)
            .run(a_file.path(), b_file.path(), &mut output)
            .unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "CCCC 3 4 0 0\n");
        assert_eq!(stats.samples_a, 2);
        assert_eq!(stats.samples_b, 2);
        assert_eq!(stats.shared, 1);
        assert_eq!(stats.trailing_written, 1);
    }

    #[test]
    fn test_unique_a_written_verbatim_while_b_remains() {
        let (out, stats) = diff(&cmd(4), "AAAA 1\nCCCC 2\nTTTT 3\n", "GGGG 7 8\nTTTT 9 9\n");
        assert_eq!(out, "AAAA 1\nCCCC 2\n");
        assert_eq!(stats.unique_written, 2);
        assert_eq!(stats.shared, 1);
        assert_eq!(stats.trailing_written, 0);
    }

    #[test]
    fn test_trailing_records_padded() {
        let (out, _) = diff(&cmd(4), "AAAA 1\nGGGG 2\nTTTT\t3\t4\n", "CCCC 5 6\n");
        assert_eq!(out, "AAAA 1\nGGGG 2 0 0\nTTTT 3\t4 0 0\n");
    }

    #[test]
    fn test_b_only_records_skipped() {
        let (out, stats) = diff(&cmd(4), "GGGG 1\n", "AAAA 1\nCCCC 2\nTTTT 3\n");
        assert_eq!(out, "GGGG 1\n");
        assert_eq!(stats.b_records, 3);
    }

    #[test]
    fn test_remaining_b_discarded() {
        let (out, stats) = diff(&cmd(4), "AAAA 1\n", "AAAA 1\nCCCC 2\nGGGG 3\n");
        assert!(out.is_empty());
        // B is not read past the point where A ran out
        assert_eq!(stats.b_records, 2);
        assert_eq!(stats.b_stop, None);
        assert_eq!(stats.a_stop, Some(StopReason::EndOfFile));
    }

    #[test]
    fn test_identical_matrices() {
        let m = "AAAA 1\nCCCC 2\nGGGG 3\n";
        let (out, stats) = diff(&cmd(4), m, m);
        assert!(out.is_empty());
        assert_eq!(stats.shared, 3);
    }

    #[test]
    fn test_empty_b_returns_a() {
        let a = "AAAA 1 2\nCCCC 3 4\n";
        let (out, stats) = diff(&cmd(4), a, "");
        assert_eq!(out, a);
        assert_eq!(stats.samples_b, 0);
        assert_eq!(stats.trailing_written, 2);
    }

    #[test]
    fn test_empty_a() {
        let (out, stats) = diff(&cmd(4), "", "AAAA 1\n");
        assert!(out.is_empty());
        assert_eq!(stats.samples_a, 0);
        assert_eq!(stats.samples_b, 1);
    }

    #[test]
    fn test_invalid_base_stops_a() {
        let (out, stats) = diff(&cmd(4), "AAAA 1\nCCNC 2\nGGGG 3\n", "");
        assert_eq!(out, "AAAA 1\n");
        assert_eq!(
            stats.a_stop,
            Some(StopReason::InvalidBase {
                line: 2,
                position: 2,
                base: b'N'
            })
        );
    }

    #[test]
    fn test_invalid_base_stops_b() {
        let (out, _) = diff(&cmd(4), "AAAA 1\nCCCC 2\n", "AAAA 1 1\nNNNN 2 2\nCCCC 3 3\n");
        // B ends at the bad line, so CCCC is treated as unmatched
        assert_eq!(out, "CCCC 2 0 0\n");
    }

    #[test]
    fn test_short_line_stops_a() {
        let (out, stats) = diff(&cmd(4), "AAAA 1\nAC\nGGGG 3\n", "");
        assert_eq!(out, "AAAA 1\n");
        assert_eq!(stats.a_stop, Some(StopReason::ShortLine { line: 2 }));
    }

    #[test]
    fn test_nucleotide_order() {
        let a = "AAAA 1\nTTTT 2\nGGGG 3\n";
        let b = "GGGG 7\n";

        let nuc = StreamingDiffCommand::new(
            DiffConfig::new(KmerSize::new(4).unwrap()).with_order(KmerOrder::Nucleotide),
        );
        let (out, _) = diff(&nuc, a, b);
        assert_eq!(out, "AAAA 1\nTTTT 2\n");

        // Same input read as lexicographic: TTTT > GGGG exhausts B early
        let (out, _) = diff(&cmd(4), a, b);
        assert_eq!(out, "AAAA 1\nTTTT 2 0\nGGGG 3 0\n");
    }

    #[test]
    fn test_case_preserved_in_output() {
        let (out, _) = diff(&cmd(4), "acgt 1\n", "");
        assert_eq!(out, "acgt 1\n");
    }

    #[test]
    fn test_legacy_blank_lines() {
        let config = DiffConfig::new(KmerSize::new(4).unwrap()).with_legacy_blank_lines(true);
        let legacy = StreamingDiffCommand::new(config);

        let a = "AAAA 1\nCCCC 2\n";
        let b = "AAAA 3\nGGGG 4\n";
        let (out, _) = diff(&legacy, a, b);
        assert_eq!(out, "\nCCCC 2\n");
        let (out, _) = diff(&cmd(4), a, b);
        assert_eq!(out, "CCCC 2\n");

        let (out, _) = diff(&legacy, "GGGG 1\n", "AAAA 2\nGGGG 3\n");
        assert_eq!(out, "\n\n");
    }

    #[test]
    fn test_check_sorted() {
        let config = DiffConfig::new(KmerSize::new(4).unwrap()).with_check_sorted(true);
        let checked = StreamingDiffCommand::new(config);

        let mut output = Vec::new();
        let err = checked
            .run_readers(Cursor::new("CCCC 1\nAAAA 2\n"), Cursor::new(""), &mut output)
            .unwrap_err();
        assert!(matches!(
            err,
            MatrixError::Unsorted {
                side: Side::A,
                line: 2,
                ..
            }
        ));
        // Already emitted lines are not rolled back
        assert_eq!(output, b"CCCC 1\n");
    }

    #[test]
    fn test_missing_input() {
        let b_file = create_temp_matrix("AAAA 1\n");
        let mut output = Vec::new();
        let result = cmd(4).run(
            Path::new("/nonexistent/a.txt"),
            b_file.path(),
            &mut output,
        );
        assert!(matches!(result, Err(MatrixError::OpenInput { .. })));
        assert!(output.is_empty());
    }

    #[test]
    fn test_stdin_twice_rejected() {
        let mut output = Vec::new();
        let result = cmd(4).run("-", "-", &mut output);
        assert!(matches!(result, Err(MatrixError::StdinTwice)));
    }

    #[test]
    fn test_padding_follows_b_sample_count() {
        let (out, stats) = diff(&cmd(4), "CCCC 1\n", "AAAA 5 6 7\n");
        assert_eq!(out, "CCCC 1 0 0 0\n");
        assert_eq!(stats.samples_a, 1);
        assert_eq!(stats.samples_b, 3);
    }

    #[test]
    fn test_truncated() {
        let (_, stats) = diff(&cmd(4), "AAAA 1\n", "AAAA 1\n");
        assert!(!stats.truncated());

        let (_, stats) = diff(&cmd(4), "AAAA 1\nAC\n", "");
        assert!(stats.truncated());

        let (_, stats) = diff(&cmd(4), "CCCC 1\n", "AAAA 1\nNNNN 2\n");
        assert!(stats.truncated());
    }

    #[test]
    fn test_lines_written_counts_blank_lines() {
        let config = DiffConfig::new(KmerSize::new(4).unwrap()).with_legacy_blank_lines(true);
        let legacy = StreamingDiffCommand::new(config);

        let (_, stats) = diff(&legacy, "AAAA 1\nCCCC 2\n", "AAAA 3\nGGGG 4\n");
        assert_eq!(stats.records_written(), 1);
        assert_eq!(stats.lines_written, 2);

        let (_, stats) = diff(&cmd(4), "AAAA 1\nCCCC 2\n", "AAAA 3\nGGGG 4\n");
        assert_eq!(stats.lines_written, 1);
    }

    #[test]
    fn test_stats_display() {
        let (_, stats) = diff(&cmd(4), "AAAA 1\nCCCC 2\n", "AAAA 3 4\n");
        assert_eq!(
            stats.to_string(),
            "A: 2 (1 samples), B: 1 (2 samples), Shared: 1, Written: 1 (1 padded), Lines: 1"
        );
    }
}
