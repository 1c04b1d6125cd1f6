//! Index construction and queries.

use std::collections::HashMap;
use std::time::Instant;

use bitvec::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::rank::{RankDirectory, Symbol, ALPHABET_SIZE};
use crate::suffix_array::suffix_array;

const SENTINEL_BYTE: u8 = b'$';

/// Shortest sequence the builder accepts. Below this the sample step and
/// the rank block widths degenerate.
pub const MIN_SEQUENCE_LEN: usize = 4;

/// Error type returned by index construction and queries.
#[derive(Debug, Error)]
pub enum FmIndexError {
    /// Input sequence shorter than the supported minimum.
    #[error("sequence must be at least 4 characters long, got {len}")]
    SequenceTooShort {
        /// Length of the rejected sequence.
        len: usize,
    },

    /// Encountered a character outside the binary alphabet.
    #[error("unsupported character '{ch}' at position {position}")]
    UnsupportedCharacter {
        /// Character that could not be encoded.
        ch: char,
        /// Position within the sequence or pattern where it was observed.
        position: usize,
    },

    /// A row index beyond the last transform row.
    #[error("row {row} out of range for a transform of {rows} rows")]
    RowOutOfRange {
        /// Offending row index.
        row: usize,
        /// Number of rows in the transform.
        rows: usize,
    },

    /// The sentinel row was not found while building the transform.
    #[error("sentinel row missing after transform construction")]
    SentinelMissing,

    /// The transform bit occupancy disagrees with the input sequence.
    #[error("transform holds {actual} one-bits, sequence holds {expected}")]
    OccupancyMismatch {
        /// One-bits counted in the input sequence.
        expected: usize,
        /// One-bits counted in the transform.
        actual: usize,
    },
}

impl FmIndexError {
    /// Whether the error reports rejected caller input rather than an
    /// internal failure.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::SequenceTooShort { .. } | Self::UnsupportedCharacter { .. }
        )
    }
}

/// Succinct self-index over a binary sequence.
///
/// Holds the Burrows-Wheeler transform of `S$` behind a constant-time rank
/// directory, the cumulative count table for LF-mapping, and a sparse sample
/// of the suffix array. The input and the full suffix array are released
/// when [`FmIndex::build`] returns; every query method takes `&self`, so a
/// built index can be shared across threads freely.
#[derive(Debug, Clone)]
pub struct FmIndex {
    occ: RankDirectory,
    c_table: [usize; ALPHABET_SIZE],
    samples: HashMap<usize, usize>,
    sample_step: usize,
    n: usize,
}

impl FmIndex {
    /// Build the index from an ASCII sequence of `0` and `1` characters.
    pub fn build(sequence: &[u8]) -> Result<Self, FmIndexError> {
        if sequence.len() < MIN_SEQUENCE_LEN {
            return Err(FmIndexError::SequenceTooShort {
                len: sequence.len(),
            });
        }

        let mut ones = 0usize;
        for (position, &byte) in sequence.iter().enumerate() {
            match Symbol::from_ascii(byte) {
                Some(Symbol::Zero) => {}
                Some(Symbol::One) => ones += 1,
                _ => {
                    return Err(FmIndexError::UnsupportedCharacter {
                        ch: byte as char,
                        position,
                    })
                }
            }
        }

        let n = sequence.len();
        let started = Instant::now();
        let mut text = Vec::with_capacity(n + 1);
        text.extend_from_slice(sequence);
        text.push(SENTINEL_BYTE);
        let sa = suffix_array(&text);
        debug!(elapsed = ?started.elapsed(), rows = sa.len(), "suffix array built");

        let started = Instant::now();
        let (bits, sentinel_index) = build_transform(&text, &sa)?;
        let actual = bits.count_ones();
        if actual != ones {
            return Err(FmIndexError::OccupancyMismatch {
                expected: ones,
                actual,
            });
        }
        debug!(elapsed = ?started.elapsed(), sentinel_index, "transform built");

        let started = Instant::now();
        let occ = RankDirectory::build(bits, sentinel_index);
        debug!(elapsed = ?started.elapsed(), "rank directory built");

        let started = Instant::now();
        let sample_step = n.ilog2() as usize;
        let mut samples = HashMap::new();
        for (row, &offset) in sa.iter().enumerate() {
            if offset % sample_step == 0 {
                samples.insert(row, offset);
            }
        }
        debug!(
            elapsed = ?started.elapsed(),
            sampled = samples.len(),
            step = sample_step,
            "suffix array sampled"
        );

        info!(n, rows = n + 1, "index ready");
        Ok(Self {
            occ,
            c_table: build_c_table(n, ones),
            samples,
            sample_step,
            n,
        })
    }

    /// Length of the indexed sequence (excluding the sentinel).
    pub fn len(&self) -> usize {
        self.n
    }

    /// Number of rows in the transform (`len() + 1`).
    pub fn rows(&self) -> usize {
        self.n + 1
    }

    /// Row holding the sentinel.
    pub fn sentinel_index(&self) -> usize {
        self.occ.sentinel_index()
    }

    /// Sample step of the sparse suffix array.
    pub fn sample_step(&self) -> usize {
        self.sample_step
    }

    /// Cumulative count table indexed by [`Symbol::order`].
    pub fn c_table(&self) -> &[usize; ALPHABET_SIZE] {
        &self.c_table
    }

    /// The transform rows as a bit slice (the sentinel row reads as zero).
    pub fn transform(&self) -> &BitSlice {
        self.occ.bits()
    }

    /// Occurrences of `symbol` in transform rows `0..=row`.
    ///
    /// Negative rows yield 0; rows past the last clamp to the last row.
    pub fn rank(&self, symbol: Symbol, row: isize) -> usize {
        if row < 0 {
            return 0;
        }
        self.occ.rank(symbol, row as usize)
    }

    /// LF-mapping: the row whose suffix-array value is one less than that of
    /// `row`, wrapping at zero. A permutation of the transform rows; the
    /// sentinel row maps to row 0.
    pub fn lf(&self, row: usize) -> usize {
        let symbol = self.occ.symbol_at(row);
        self.c_table[symbol.order()] + self.occ.rank(symbol, row) - 1
    }

    /// Suffix-array value at `row`, recovered by LF-walking to the nearest
    /// sampled row. Runs in at most `sample_step` steps.
    pub fn locate(&self, row: usize) -> Result<usize, FmIndexError> {
        if row > self.n {
            return Err(FmIndexError::RowOutOfRange {
                row,
                rows: self.n + 1,
            });
        }
        let mut row = row;
        let mut steps = 0;
        loop {
            if let Some(&offset) = self.samples.get(&row) {
                return Ok(offset + steps);
            }
            row = self.lf(row);
            steps += 1;
        }
    }

    /// Number of occurrences of `pattern` in the sequence.
    pub fn count(&self, pattern: &[u8]) -> Result<usize, FmIndexError> {
        if pattern.is_empty() {
            return Ok(self.n);
        }
        Ok(match self.interval(pattern)? {
            Some((lower, upper)) => upper - lower + 1,
            None => 0,
        })
    }

    /// Starting offsets of every occurrence of `pattern`, sorted ascending.
    ///
    /// The empty pattern matches at every offset. Patterns containing a
    /// character outside `{0, 1}` are rejected.
    pub fn occurrences(&self, pattern: &[u8]) -> Result<Vec<usize>, FmIndexError> {
        if pattern.is_empty() {
            return Ok((0..self.n).collect());
        }
        let Some((lower, upper)) = self.interval(pattern)? else {
            return Ok(Vec::new());
        };
        let mut offsets = Vec::with_capacity(upper - lower + 1);
        for row in lower..=upper {
            offsets.push(self.locate(row)?);
        }
        offsets.sort_unstable();
        Ok(offsets)
    }

    /// Reconstruct the original sequence from the transform.
    pub fn invert(&self) -> Vec<u8> {
        let mut sequence = vec![0u8; self.n];
        let mut row = 0;
        for slot in sequence.iter_mut().rev() {
            *slot = if self.occ.bit(row) { b'1' } else { b'0' };
            row = self.lf(row);
        }
        sequence
    }

    /// Backward search: narrow the closed row interval `[0, n]` one pattern
    /// symbol at a time, right to left. `None` means no row matches.
    fn interval(&self, pattern: &[u8]) -> Result<Option<(usize, usize)>, FmIndexError> {
        let mut lower = 0usize;
        let mut upper = self.n;
        for (position, &byte) in pattern.iter().enumerate().rev() {
            let symbol = match Symbol::from_ascii(byte) {
                Some(symbol @ (Symbol::Zero | Symbol::One)) => symbol,
                _ => {
                    return Err(FmIndexError::UnsupportedCharacter {
                        ch: byte as char,
                        position,
                    })
                }
            };
            let base = self.c_table[symbol.order()];
            lower = base
                + if lower > 0 {
                    self.occ.rank(symbol, lower - 1)
                } else {
                    0
                };
            upper = base + self.occ.rank(symbol, upper) - 1;
            if lower > upper {
                return Ok(None);
            }
        }
        Ok(Some((lower, upper)))
    }
}

fn build_transform(text: &[u8], sa: &[usize]) -> Result<(BitVec, usize), FmIndexError> {
    let mut bits = bitvec![0; sa.len()];
    let mut sentinel_index = None;
    for (row, &suffix) in sa.iter().enumerate() {
        if suffix == 0 {
            sentinel_index = Some(row);
        } else {
            bits.set(row, text[suffix - 1] == b'1');
        }
    }
    let sentinel_index = sentinel_index.ok_or(FmIndexError::SentinelMissing)?;
    Ok((bits, sentinel_index))
}

fn build_c_table(n: usize, ones: usize) -> [usize; ALPHABET_SIZE] {
    let zeros = n - ones;
    [0, 1, 1 + zeros]
}
