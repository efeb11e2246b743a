//! The error taxonomy of SPEC_FULL.md §6/§7: requests are validated once,
//! up front, and every rejection is a matchable, named-option `EngineError`
//! rather than a panic. Enumeration bodies assume a validated `Request`
//! and only ever hit these internal invariants as programmer errors
//! (`debug_assert!`), never as a recoverable `Result`.

use thiserror::Error;

/// Errors returned at the library boundary. Never raised from inside an
/// enumerator body — only from `RequestBuilder::build` and the
/// `combinatorics`/`count`/`nth`/`cursor` entry points.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// A caller-supplied option failed validation: wrong type, negative
    /// frequency, `m < 1`, two equal limits, equality in a two-limit
    /// comparison, an out-of-range rank, and so on.
    #[error("invalid value for `{option}`: {reason}")]
    InvalidInput { option: &'static str, reason: String },

    /// The resolved row count would exceed `i32::MAX`.
    #[error("row count for `{option}` exceeds i32::MAX")]
    Overflow { option: &'static str },

    /// The requested combination of options is never supported, e.g.
    /// limit constraints on a `character` or `logical` base sequence.
    #[error("`{option}` is not supported: {reason}")]
    Unsupported { option: &'static str, reason: String },
}

impl EngineError {
    pub fn invalid(option: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput { option, reason: reason.into() }
    }

    pub fn unsupported(option: &'static str, reason: impl Into<String>) -> Self {
        EngineError::Unsupported { option, reason: reason.into() }
    }

    pub fn overflow(option: &'static str) -> Self {
        EngineError::Overflow { option }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
