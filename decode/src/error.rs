//! Error types for the submission decoding pipeline.

use thiserror::Error;

/// Failures raised while parsing keys, building the tree, or reconciling
/// index-keyed branches into sequences.
///
/// Each variant carries the offending key, path, or segment so the request
/// layer can render a useful rejection. Decoding never partially applies:
/// the first failure aborts the whole submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A bracket-path key contains an empty segment (e.g. `root[]`).
    #[error("empty path segment in key '{key}'")]
    EmptySegment {
        /// The submitted field name as received.
        key: String,
    },

    /// A segment addressing an established sequence is not a decimal index.
    #[error("list index must be a number at '{path}': got '{segment}'")]
    MalformedIndex {
        /// Dotted path of the sequence being addressed.
        path: String,
        /// The offending segment.
        segment: String,
    },

    /// Sibling keys disagree about whether a node is a list or an object.
    #[error("cannot mix list indexes and field names at '{path}'")]
    AmbiguousStructure {
        /// Dotted path of the conflicting node.
        path: String,
    },

    /// Submitted list indexes are not contiguous from zero.
    #[error("non-contiguous list indexes at '{path}': expected {expected}, found {found}")]
    IndexGap {
        /// Dotted path of the list node.
        path: String,
        /// The index that should have been present.
        expected: usize,
        /// The index actually found.
        found: usize,
    },
}

/// Convenience alias for results with [`DecodeError`].
pub type Result<T> = std::result::Result<T, DecodeError>;
