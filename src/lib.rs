//! # Succinct FM-index over binary sequences
//!
//! This library builds a read-only self-index from a sequence of `0` and `1`
//! characters and answers two queries against it: the starting offsets of a
//! pattern, and the reconstruction of the original sequence from its
//! Burrows-Wheeler transform.
//!
//! ## Core Components
//!
//! 1. **Transform**: the BWT of `S$` packed into a bitvector, with the
//!    sentinel row recorded separately
//! 2. **Rank directory**: constant-time rank via large blocks, small blocks,
//!    and an in-block prefix lookup
//! 3. **Sampled suffix array**: every row whose suffix-array value is a
//!    multiple of `⌊log₂ n⌋`, enabling offset recovery by LF-walking
//! 4. **Backward search**: pattern matching that narrows a row interval one
//!    symbol at a time
//!
//! ## Usage Example
//!
//! ```
//! use manzini::FmIndex;
//!
//! let index = FmIndex::build(b"0010110101")?;
//! assert_eq!(index.occurrences(b"01")?, vec![1, 3, 6, 8]);
//! assert_eq!(index.invert(), b"0010110101");
//! # Ok::<(), manzini::FmIndexError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod fm_index; // Index construction and queries
pub mod rank; // Constant-time rank directory
pub mod suffix_array; // Suffix-array construction contract

// Re-exports for convenience
pub use fm_index::{FmIndex, FmIndexError, MIN_SEQUENCE_LEN};
pub use rank::{RankDirectory, Symbol, ALPHABET_SIZE};
pub use suffix_array::suffix_array;
