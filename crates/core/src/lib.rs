#![deny(missing_docs)]
//! vesselmark core: line recognizers for block attributes, code fences,
//! vessel directives, and heading ids.
//!
//! Each recognizer looks at the unconsumed suffix of a document and either
//! declines, leaving the cursor where it was, or reports how many bytes
//! the construct occupies along with its parsed fields.

/// Block attribute annotations and the pending-attribute slot.
pub mod attribute;
/// Code fence lines and fenced blocks.
pub mod code_fence;
/// Rejection and configuration error types.
pub mod error;
/// Scanner configuration.
pub mod options;
/// Byte-scanning primitives.
pub mod scan;
/// Shorthand class expansion.
pub mod shorthand;
/// Heading id generation.
pub mod slug;
/// Vessel directive lines and vessel blocks.
pub mod vessel;

pub use attribute::{
    Attribute, AttributeMatch, AttributeParser, PendingAttribute, parse_attribute,
};
pub use code_fence::{
    FENCE_CHARS, FenceLine, FencePhase, FenceState, FencedBlock, LineParseOutcome,
    advance_fence_state, is_fence_line, scan_fenced_block, try_fence_line,
};
pub use error::{AttributeRejection, ConfigError, MarkerRejection};
pub use options::ScanOptions;
pub use shorthand::{DEFAULT_CLASS_SHORTHANDS, expand_class, expand_class_with};
pub use slug::{EMPTY_SLUG, HeadingIds, sanitize_heading_id, split_heading_id};
pub use vessel::{
    VESSEL_CHAR, VesselBlock, VesselLine, is_vessel_line, scan_vessel_block, try_vessel_line,
};
