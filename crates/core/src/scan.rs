//! Byte-scanning primitives shared by the line recognizers.
//!
//! Every helper takes the buffer and a starting offset and returns a new
//! offset. None of them allocate or look past the end of `data`.

use crate::error::MarkerRejection;

/// Shortest marker run that opens a fence or vessel.
pub const MIN_MARKER_LEN: usize = 3;

/// Returns true for the horizontal whitespace bytes that separate chunks:
/// space, tab, form feed and vertical tab.
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | 0x0c | 0x0b)
}

/// Advances past horizontal whitespace starting at `i`.
pub fn skip_space(data: &[u8], mut i: usize) -> usize {
    while i < data.len() && is_space(data[i]) {
        i += 1;
    }
    i
}

/// Advances past a run of `c` starting at `i`.
pub fn skip_char(data: &[u8], mut i: usize, c: u8) -> usize {
    while i < data.len() && data[i] == c {
        i += 1;
    }
    i
}

/// Returns the offset of the next `c` at or after `i`, or `data.len()`.
pub fn skip_until_char(data: &[u8], i: usize, c: u8) -> usize {
    if i >= data.len() {
        return data.len();
    }
    data[i..]
        .iter()
        .position(|b| *b == c)
        .map_or(data.len(), |pos| i + pos)
}

/// Returns the offset of the newline ending the line that contains `i`
/// (exclusive), or `data.len()` when the buffer ends first.
pub fn line_end(data: &[u8], i: usize) -> usize {
    skip_until_char(data, i, b'\n')
}

/// Returns the offset just past the newline ending the line that contains
/// `i`, or `data.len()` when the buffer ends without one.
pub fn consume_line(data: &[u8], i: usize) -> usize {
    let end = line_end(data, i);
    if end < data.len() { end + 1 } else { end }
}

/// Returns the leading run of one repeated byte from `eligible`, or `None`
/// when the buffer does not start with an eligible byte.
pub fn marker_run<'a>(data: &'a [u8], eligible: &[u8]) -> Option<&'a [u8]> {
    let first = *data.first()?;
    if !eligible.contains(&first) {
        return None;
    }
    Some(&data[..skip_char(data, 0, first)])
}

/// Returns the leading marker run when it is long enough and, for a closing
/// line, matches the opener's character without being shorter than it.
pub(crate) fn qualifying_run<'a>(
    data: &'a [u8],
    eligible: &[u8],
    required: Option<&str>,
) -> Result<&'a [u8], MarkerRejection> {
    let run = marker_run(data, eligible).ok_or(MarkerRejection::NoMarker)?;
    if run.len() < MIN_MARKER_LEN {
        return Err(MarkerRejection::TooShort { len: run.len() });
    }
    if let Some(expected) = required.filter(|m| !m.is_empty()) {
        let expected_bytes = expected.as_bytes();
        if expected_bytes[0] != run[0] || run.len() < expected_bytes.len() {
            return Err(MarkerRejection::Mismatch {
                expected: expected.to_string(),
                found: lossy(run),
            });
        }
    }
    Ok(run)
}

/// Offset of the first horizontal whitespace byte at or after `i`.
pub(crate) fn token_end(data: &[u8], i: usize) -> usize {
    data.iter()
        .skip(i)
        .position(|b| is_space(*b))
        .map_or(data.len(), |pos| i + pos)
}

/// Trims horizontal whitespace and a trailing carriage return from both ends.
pub(crate) fn trim_line(data: &[u8]) -> &[u8] {
    let start = skip_space(data, 0);
    let mut end = data.len();
    while end > start && (is_space(data[end - 1]) || data[end - 1] == b'\r') {
        end -= 1;
    }
    &data[start..end]
}

pub(crate) fn lossy(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}
