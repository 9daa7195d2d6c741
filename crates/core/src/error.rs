use thiserror::Error;

/// Why a candidate `{...}` line was not accepted as a block attribute.
///
/// Rejections are never surfaced as failures of the document scan; the
/// caller treats the line as ordinary text. The variants exist so callers
/// and logs can tell the cases apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeRejection {
    /// The buffer does not begin with `{`, or is too short to hold one.
    #[error("not an attribute annotation")]
    NotAnAnnotation,
    /// The annotation line must contain exactly one `}`.
    #[error("expected exactly one '}}' before the end of line, found {found}")]
    UnbalancedBraces {
        /// Number of `}` bytes seen on the line.
        found: usize,
    },
    /// The only `}` on the line was escaped or quoted.
    #[error("annotation is not closed by an unescaped '}}'")]
    Unterminated,
    /// Text other than whitespace follows the closing `}` on its line.
    #[error("text after '}}' at offset {offset}")]
    TrailingText {
        /// Offset just past the closing brace.
        offset: usize,
    },
    /// A chunk between the last separator and `}` was empty.
    #[error("empty chunk before '}}' at offset {offset}")]
    EmptyChunk {
        /// Offset of the closing brace.
        offset: usize,
    },
    /// A chunk is neither `.class`, `#id`, nor `key="value"`.
    #[error("chunk {chunk:?} at offset {offset} is not a class, id or key=\"value\" pair")]
    InvalidChunk {
        /// The offending chunk, lossily decoded.
        chunk: String,
        /// Offset of the chunk's first byte.
        offset: usize,
    },
}

/// Why a line was not accepted as a fence or vessel marker line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerRejection {
    /// The line does not start with an eligible marker byte.
    #[error("line does not start with a marker character")]
    NoMarker,
    /// The marker run is shorter than three bytes.
    #[error("marker run of {len} is shorter than 3")]
    TooShort {
        /// Length of the run found.
        len: usize,
    },
    /// A closing line uses another character or a shorter run than its opener.
    #[error("closing marker {found:?} does not match opener {expected:?}")]
    Mismatch {
        /// The opener's marker.
        expected: String,
        /// The run found on this line.
        found: String,
    },
    /// A closing line carries text after its marker run.
    #[error("closing marker is followed by text")]
    TrailingText,
}

/// Errors raised while loading [`ScanOptions`](crate::ScanOptions).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON or has the wrong shape.
    #[error("invalid scan options: {0}")]
    Json(#[from] serde_json::Error),
    /// A shorthand key would never match a class token.
    #[error("invalid class shorthand {key:?}: {reason}")]
    InvalidShorthand {
        /// The offending key.
        key: String,
        /// Why it was refused.
        reason: &'static str,
    },
}
