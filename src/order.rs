//! Total orders over fixed-length k-mer keys.
//!
//! Two orders are supported:
//! - [`KmerOrder::Lexicographic`]: plain byte order (A < C < G < T, case-sensitive)
//! - [`KmerOrder::Nucleotide`]: the kmtricks order A < C < T < G, case-insensitive
//!
//! The order only drives comparisons. Keys are always written back unchanged.

use std::cmp::Ordering;
use std::fmt;

/// Rank given to any byte outside the nucleotide alphabet, and to the end of a key.
const DEFAULT_RANK: u8 = 1;

/// Rank lookup for the nucleotide order, built at compile time.
static NUCLEOTIDE_RANKS: [u8; 256] = build_ranks();

const fn build_ranks() -> [u8; 256] {
    let mut table = [DEFAULT_RANK; 256];
    table[b'A' as usize] = 0;
    table[b'a' as usize] = 0;
    table[b'C' as usize] = 1;
    table[b'c' as usize] = 1;
    table[b'T' as usize] = 2;
    table[b't' as usize] = 2;
    table[b'G' as usize] = 3;
    table[b'g' as usize] = 3;
    table
}

/// Rank of a byte under the nucleotide order.
///
/// A=0, C=1, T=2, G=3 (either case). Every other byte ranks alongside C.
#[inline(always)]
pub fn nucleotide_rank(base: u8) -> u8 {
    NUCLEOTIDE_RANKS[base as usize]
}

/// Comparator mode, selected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KmerOrder {
    /// Byte-for-byte order, identical to sorting the keys as strings.
    #[default]
    Lexicographic,
    /// kmtricks nucleotide order: A < C < T < G, case-insensitive.
    Nucleotide,
}

impl KmerOrder {
    /// Select the order from the `-z` style boolean flag.
    pub fn from_kmtricks_flag(kmtricks: bool) -> Self {
        if kmtricks {
            Self::Nucleotide
        } else {
            Self::Lexicographic
        }
    }

    /// Compare two keys under this order.
    #[inline]
    pub fn compare(self, a: &[u8], b: &[u8]) -> Ordering {
        match self {
            Self::Lexicographic => a.cmp(b),
            Self::Nucleotide => nucleotide_cmp(a, b),
        }
    }
}

impl fmt::Display for KmerOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexicographic => write!(f, "lexicographic"),
            Self::Nucleotide => write!(f, "nucleotide (A<C<T<G)"),
        }
    }
}

/// Compare two keys under the nucleotide order.
///
/// Scans while the bytes are identical and decides on the first differing
/// position by rank alone. Two different bytes of equal rank (`A` and `a`,
/// or two non-nucleotide bytes) therefore compare equal at that position.
/// A key that ends first is read as a terminator with [`DEFAULT_RANK`].
#[inline]
fn nucleotide_cmp(a: &[u8], b: &[u8]) -> Ordering {
    let common = a
        .iter()
        .zip(b.iter())
        .position(|(x, y)| x != y)
        .unwrap_or_else(|| a.len().min(b.len()));

    let rank_a = a.get(common).map_or(DEFAULT_RANK, |&x| nucleotide_rank(x));
    let rank_b = b.get(common).map_or(DEFAULT_RANK, |&y| nucleotide_rank(y));

    rank_a.cmp(&rank_b)
}
