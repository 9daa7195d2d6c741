//! Vessel directives: `::: name @annotation description`.
//!
//! A vessel opens a custom container block. The opener's text after the
//! colon run splits into a name, an optional annotation and a free-text
//! description. Two spellings carry an annotation:
//!
//! ```text
//! ::: details @anno message
//! ::: details anno@message
//! ```
//!
//! Both yield `name = "details"`, `annotation = "anno"`,
//! `description = "message"`.

use std::ops::Range;

use serde::Serialize;

use crate::code_fence::{FenceState, advance_fence_state};
use crate::error::MarkerRejection;
use crate::scan::{consume_line, line_end, lossy, qualifying_run, token_end, trim_line};

/// The byte a vessel marker run repeats.
pub const VESSEL_CHAR: u8 = b':';

/// A recognized vessel line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VesselLine {
    /// Offset just past the line's newline, or the buffer length.
    pub consumed: usize,
    /// The colon run exactly as written.
    pub marker: String,
    /// First token after the run.
    pub name: String,
    /// Annotation split off with `@`.
    pub annotation: String,
    /// Remaining text.
    pub description: String,
}

impl VesselLine {
    /// Returns true for a bare marker line with no text after the run.
    pub fn is_bare(&self) -> bool {
        self.name.is_empty() && self.annotation.is_empty() && self.description.is_empty()
    }
}

/// Recognizes a vessel line at the start of `data`.
///
/// With `required` set to an opener's marker, only a bare colon run of at
/// least that length qualifies.
pub fn is_vessel_line(data: &[u8], required: Option<&str>) -> Option<VesselLine> {
    match try_vessel_line(data, required) {
        Ok(line) => Some(line),
        Err(MarkerRejection::NoMarker) => None,
        Err(reason) => {
            log::trace!("not a vessel line: {reason}");
            None
        }
    }
}

/// Like [`is_vessel_line`], reporting why a line did not qualify.
pub fn try_vessel_line(
    data: &[u8],
    required: Option<&str>,
) -> Result<VesselLine, MarkerRejection> {
    let closing = required.is_some_and(|m| !m.is_empty());
    let run = qualifying_run(data, &[VESSEL_CHAR], required)?;
    let text = trim_line(&data[run.len()..line_end(data, run.len())]);

    if closing && !text.is_empty() {
        return Err(MarkerRejection::TrailingText);
    }

    let (name, annotation, description) = split_fields(text);
    Ok(VesselLine {
        consumed: consume_line(data, 0),
        marker: lossy(run),
        name: lossy(name),
        annotation: lossy(annotation),
        description: lossy(description),
    })
}

/// Splits trimmed opener text into name, annotation and description.
fn split_fields(text: &[u8]) -> (&[u8], &[u8], &[u8]) {
    let name_end = token_end(text, 0);
    let name = &text[..name_end];
    let rest = trim_line(&text[name_end..]);

    if rest.is_empty() {
        return (name, b"", b"");
    }

    // `name @anno description`
    if rest[0] == b'@' {
        let anno_end = token_end(rest, 1);
        return (name, &rest[1..anno_end], trim_line(&rest[anno_end..]));
    }

    // `name anno@description`; only the first token is searched.
    let first_end = token_end(rest, 0);
    if let Some(at) = rest[..first_end].iter().position(|b| *b == b'@') {
        return (name, &rest[..at], trim_line(&rest[at + 1..]));
    }

    (name, b"", rest)
}

/// A vessel block from opener to closer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VesselBlock {
    /// The opening line.
    pub opener: VesselLine,
    /// Byte range of the contents between opener and closer.
    pub body: Range<usize>,
    /// False when the input ended before a closing line.
    pub closed: bool,
    /// Bytes covered by the whole block, closer included.
    pub consumed: usize,
}

/// Scans a vessel block starting at `data`.
///
/// Lines inside fenced code never close the vessel. A nested opener that
/// carries a name is tracked by its marker length: a bare run closes the
/// innermost nested vessel unless it is longer than that vessel's marker
/// and at least as long as this block's, in which case it closes this
/// block. An unclosed vessel extends to the end of the input.
pub fn scan_vessel_block(data: &[u8]) -> Option<VesselBlock> {
    let opener = is_vessel_line(data, None)?;
    let body_start = opener.consumed;
    let mut pos = body_start;
    let mut nested: Vec<usize> = Vec::new();
    let mut fence = FenceState::default();

    while pos < data.len() {
        let line = &data[pos..];
        let outcome = advance_fence_state(line, fence);
        fence = outcome.next_state;

        if !outcome.in_fence
            && let Some(found) = is_vessel_line(line, None)
        {
            if !found.is_bare() {
                nested.push(found.marker.len());
            } else if nested.last().is_some_and(|inner| found.marker.len() <= *inner) {
                nested.pop();
            } else if let Some(closer) = is_vessel_line(line, Some(opener.marker.as_str())) {
                return Some(VesselBlock {
                    opener,
                    body: body_start..pos,
                    closed: true,
                    consumed: pos + closer.consumed,
                });
            } else {
                nested.pop();
            }
        }
        pos = consume_line(data, pos);
    }

    log::debug!("vessel {:?} runs to end of input", opener.name);
    Some(VesselBlock {
        opener,
        body: body_start..data.len(),
        closed: false,
        consumed: data.len(),
    })
}
