//! Zero-allocation k-mer matrix line parsing utilities.
//!
//! A matrix line is `<kmer><ws><count_1><ws>...<count_n>`, where `<ws>` is
//! one or more spaces or tabs. These helpers operate on raw bytes and never
//! allocate in the hot path.

use memchr::memchr2;

/// Check if a byte is a nucleotide (A, C, G, T in either case).
#[inline(always)]
pub fn is_nucleotide(base: u8) -> bool {
    matches!(
        base,
        b'A' | b'C' | b'G' | b'T' | b'a' | b'c' | b'g' | b't'
    )
}

/// Return the position of the first non-nucleotide byte in a key, if any.
#[inline]
pub fn find_invalid_base(key: &[u8]) -> Option<usize> {
    key.iter().position(|&b| !is_nucleotide(b))
}

#[inline(always)]
fn is_column_separator(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Strip a single line terminator (`\n` or `\r\n`) from the end of a line.
#[inline]
pub fn strip_line_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Count the sample columns on a line: every whitespace-delimited token
/// after the first one.
///
/// # Example
///
/// ```
/// use kmdiff::streaming::parsing::sample_count;
///
/// assert_eq!(sample_count(b"ACGT 1 2 3"), 3);
/// assert_eq!(sample_count(b"ACGT\t4\t\t5"), 2);
/// assert_eq!(sample_count(b"ACGT"), 0);
/// ```
pub fn sample_count(line: &[u8]) -> usize {
    line.split(|&b| is_column_separator(b) || b == b'\n')
        .filter(|token| !token.is_empty())
        .count()
        .saturating_sub(1)
}

/// Return the line starting at its first sample column.
///
/// Skips the first token (the k-mer) and the whitespace after it. Returns an
/// empty slice if the line has no columns after the key.
#[inline]
pub fn first_column(line: &[u8]) -> &[u8] {
    let Some(sep) = memchr2(b' ', b'\t', line) else {
        return &line[line.len()..];
    };
    let rest = &line[sep..];
    let skip = rest
        .iter()
        .position(|&b| !is_column_separator(b))
        .unwrap_or(rest.len());
    &rest[skip..]
}
