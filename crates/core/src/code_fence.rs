//! Code fence recognition.
//!
//! [`is_fence_line`] classifies a single line; [`advance_fence_state`] and
//! [`scan_fenced_block`] build on it to follow a fence from its opener to
//! the line that closes it.

use std::ops::Range;

use serde::Serialize;

use crate::error::MarkerRejection;
use crate::scan::{consume_line, line_end, lossy, qualifying_run, trim_line};

/// Bytes that may form a fence marker run.
pub const FENCE_CHARS: &[u8] = b"`~";

/// A recognized fence line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FenceLine {
    /// Offset just past the line's newline, or the buffer length.
    pub consumed: usize,
    /// The marker run exactly as written, e.g. "````".
    pub marker: String,
    /// Trimmed text after the run; `Some` only when requested.
    pub syntax: Option<String>,
}

/// Recognizes a fence line at the start of `data`.
///
/// With `required` set to an opener's marker, only a matching closing line
/// qualifies: same character, at least as long, and nothing but whitespace
/// after the run. `want_syntax` asks for the info text after an opener.
pub fn is_fence_line(
    data: &[u8],
    want_syntax: bool,
    required: Option<&str>,
) -> Option<FenceLine> {
    match try_fence_line(data, want_syntax, required) {
        Ok(line) => Some(line),
        Err(MarkerRejection::NoMarker) => None,
        Err(reason) => {
            log::trace!("not a fence line: {reason}");
            None
        }
    }
}

/// Like [`is_fence_line`], reporting why a line did not qualify.
pub fn try_fence_line(
    data: &[u8],
    want_syntax: bool,
    required: Option<&str>,
) -> Result<FenceLine, MarkerRejection> {
    let closing = required.is_some_and(|m| !m.is_empty());
    let run = qualifying_run(data, FENCE_CHARS, required)?;
    let rest = trim_line(&data[run.len()..line_end(data, run.len())]);

    if closing && !rest.is_empty() {
        return Err(MarkerRejection::TrailingText);
    }

    Ok(FenceLine {
        consumed: consume_line(data, 0),
        marker: lossy(run),
        syntax: (want_syntax && !closing).then(|| lossy(rest)),
    })
}

/// Fence parsing phases tracked across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FencePhase {
    /// Not currently inside a fence.
    #[default]
    Outside,
    /// Within fence contents.
    InsideFence,
}

/// Current fence state: phase plus the opener's marker character and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenceState {
    /// Current fence phase.
    pub phase: FencePhase,
    /// Marker character of the open fence.
    pub marker: Option<u8>,
    /// Length of the opening run.
    pub length: usize,
}

impl FenceState {
    /// The marker a closing line has to match, while a fence is open.
    pub fn required_marker(&self) -> Option<String> {
        match (self.phase, self.marker) {
            (FencePhase::InsideFence, Some(marker)) => {
                Some(char::from(marker).to_string().repeat(self.length))
            }
            _ => None,
        }
    }
}

/// Outcome of processing a single line for fence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParseOutcome {
    /// State to carry into the next line.
    pub next_state: FenceState,
    /// Whether the line belongs to a fence (opener, body or closer).
    pub in_fence: bool,
}

/// Advance fence state based on one line at the start of `line`.
pub fn advance_fence_state(line: &[u8], state: FenceState) -> LineParseOutcome {
    match state.required_marker() {
        None => match is_fence_line(line, false, None) {
            Some(opener) => LineParseOutcome {
                next_state: FenceState {
                    phase: FencePhase::InsideFence,
                    marker: opener.marker.bytes().next(),
                    length: opener.marker.len(),
                },
                in_fence: true,
            },
            None => LineParseOutcome {
                next_state: state,
                in_fence: false,
            },
        },
        Some(required) => {
            let closed = is_fence_line(line, false, Some(required.as_str())).is_some();
            let next_state = if closed { FenceState::default() } else { state };
            LineParseOutcome {
                next_state,
                in_fence: true,
            }
        }
    }
}

/// A fenced block from opener to closer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FencedBlock {
    /// The opener's marker run.
    pub marker: String,
    /// The opener's info text, empty when absent.
    pub syntax: String,
    /// Byte range of the raw contents between opener and closer.
    pub body: Range<usize>,
    /// False when the input ended before a closing line.
    pub closed: bool,
    /// Bytes covered by the whole block, closer included.
    pub consumed: usize,
}

/// Scans a fenced block starting at `data`.
///
/// An unclosed fence extends to the end of the input.
pub fn scan_fenced_block(data: &[u8]) -> Option<FencedBlock> {
    let opener = is_fence_line(data, true, None)?;
    let body_start = opener.consumed;
    let mut pos = body_start;

    while pos < data.len() {
        let required = Some(opener.marker.as_str());
        if let Some(closer) = is_fence_line(&data[pos..], false, required) {
            return Some(FencedBlock {
                marker: opener.marker,
                syntax: opener.syntax.unwrap_or_default(),
                body: body_start..pos,
                closed: true,
                consumed: pos + closer.consumed,
            });
        }
        pos = consume_line(data, pos);
    }

    log::debug!("fence {:?} runs to end of input", opener.marker);
    Some(FencedBlock {
        marker: opener.marker,
        syntax: opener.syntax.unwrap_or_default(),
        body: body_start..data.len(),
        closed: false,
        consumed: data.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fence_line_table() {
        // (input, want syntax, consumed, marker, syntax)
        let cases: Vec<(&str, bool, usize, &str, Option<&str>)> = vec![
            ("```", false, 3, "```", None),
            ("```\nstuff here\n", false, 4, "```", None),
            ("```\nstuff here\n", true, 4, "```", Some("")),
            ("```", true, 3, "```", Some("")),
            ("``` go", true, 6, "```", Some("go")),
            ("``` go", false, 6, "```", None),
            ("~~~~rust  \nfn main() {}\n", true, 11, "~~~~", Some("rust")),
            ("```\tpython linenos\r\n", true, 20, "```", Some("python linenos")),
        ];

        for (input, want_syntax, consumed, marker, syntax) in cases {
            let line = is_fence_line(input.as_bytes(), want_syntax, None)
                .unwrap_or_else(|| panic!("{input:?} should be a fence line"));
            assert_eq!(line.consumed, consumed, "consumed for {input:?}");
            assert_eq!(line.marker, marker, "marker for {input:?}");
            assert_eq!(line.syntax.as_deref(), syntax, "syntax for {input:?}");
        }
    }

    #[test]
    fn rejects_non_fence_lines() {
        for input in ["stuff here\n```\n", "``", "`` `", " ```", "", "--- "] {
            assert_eq!(is_fence_line(input.as_bytes(), true, None), None, "{input:?}");
        }
    }

    #[test]
    fn closing_line_rules() {
        assert!(is_fence_line(b"```\n", false, Some("```")).is_some());
        assert!(is_fence_line(b"`````", false, Some("```")).is_some());
        assert!(is_fence_line(b"```  \n", false, Some("```")).is_some());
        assert_eq!(
            try_fence_line(b"```", false, Some("````")),
            Err(MarkerRejection::Mismatch {
                expected: "````".to_string(),
                found: "```".to_string(),
            })
        );
        assert!(matches!(
            try_fence_line(b"~~~", false, Some("```")),
            Err(MarkerRejection::Mismatch { .. })
        ));
        assert_eq!(
            try_fence_line(b"```js", false, Some("```")),
            Err(MarkerRejection::TrailingText)
        );
    }

    #[test]
    fn closer_never_reports_syntax() {
        let line = is_fence_line(b"```\n", true, Some("```")).expect("closing line");
        assert_eq!(line.syntax, None);
    }

    #[test]
    fn opens_and_closes_backtick_fence() {
        let start = advance_fence_state(b"```js", FenceState::default());
        assert!(start.in_fence);
        assert_eq!(start.next_state.phase, FencePhase::InsideFence);
        assert_eq!(start.next_state.marker, Some(b'`'));
        assert_eq!(start.next_state.length, 3);

        let inner = advance_fence_state(b"console.log('hi');", start.next_state);
        assert!(inner.in_fence);
        assert_eq!(inner.next_state.phase, FencePhase::InsideFence);

        let end = advance_fence_state(b"```", inner.next_state);
        assert!(end.in_fence);
        assert_eq!(end.next_state, FenceState::default());

        let after = advance_fence_state(b"plain", end.next_state);
        assert!(!after.in_fence);
    }

    #[test]
    fn four_backtick_fence_contains_three_backtick() {
        let start = advance_fence_state(b"````markdown", FenceState::default());
        assert_eq!(start.next_state.required_marker().as_deref(), Some("````"));

        let inner_open = advance_fence_state(b"```js", start.next_state);
        assert_eq!(inner_open.next_state.length, 4);

        let inner_close = advance_fence_state(b"```", inner_open.next_state);
        assert_eq!(inner_close.next_state.phase, FencePhase::InsideFence);

        let outer_close = advance_fence_state(b"````", inner_close.next_state);
        assert_eq!(outer_close.next_state.phase, FencePhase::Outside);
    }

    #[test]
    fn ignores_mismatched_marker() {
        let start = advance_fence_state(b"~~~ts", FenceState::default());
        let still_inside = advance_fence_state(b"```", start.next_state);
        assert!(still_inside.in_fence);
        assert_eq!(still_inside.next_state.marker, Some(b'~'));
    }

    #[test]
    fn scans_closed_block() {
        let input = b"```go\nfmt.Println()\n```\nafter\n";
        let block = scan_fenced_block(input).expect("fenced block");
        assert_eq!(block.syntax, "go");
        assert!(block.closed);
        assert_eq!(&input[block.body.clone()], b"fmt.Println()\n");
        assert_eq!(&input[block.consumed..], b"after\n");
    }

    #[test]
    fn unclosed_block_runs_to_end() {
        let input = b"~~~\nline one\n```\n";
        let block = scan_fenced_block(input).expect("fenced block");
        assert!(!block.closed);
        assert_eq!(block.body, 4..input.len());
        assert_eq!(block.consumed, input.len());
    }

    #[test]
    fn tolerates_invalid_utf8() {
        let input = b"~~~~\xb4~\x94~\x94~\xd1\r\r:\xb4\x94\x94~\x9f~\xb4~\x94~\x94\x94";
        let block = scan_fenced_block(input).expect("fenced block");
        assert_eq!(block.marker, "~~~~");
        assert!(!block.closed);
        assert_eq!(block.consumed, input.len());
    }
}
