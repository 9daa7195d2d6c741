//! Block attribute annotations: `{.class #id key="value"}`.
//!
//! An annotation occupies the start of a line and attaches to the next
//! block the driver builds. Parsing is all-or-nothing: any malformed chunk
//! rejects the whole annotation and leaves the buffer untouched.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::AttributeRejection;
use crate::options::ScanOptions;
use crate::scan::{is_space, line_end, lossy, skip_space, trim_line};
use crate::shorthand::expand_class_with;

/// Classes, id and key/value pairs attached to one block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Class names in encounter order, shorthands already expanded.
    pub classes: Vec<String>,
    /// The last `#id` seen.
    pub id: Option<String>,
    /// `key="value"` pairs; a repeated key keeps its last value.
    pub attrs: BTreeMap<String, String>,
}

impl Attribute {
    /// Returns true when no class, id or pair was recorded.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.id.is_none() && self.attrs.is_empty()
    }

    /// Classes joined by single spaces, as emitted in a `class` attribute.
    pub fn class_string(&self) -> String {
        self.classes.join(" ")
    }
}

/// A recognized annotation and the number of bytes it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeMatch {
    /// The parsed attribute.
    pub attribute: Attribute,
    /// Offset just past the closing `}`.
    pub consumed: usize,
}

/// Recognizes block attribute annotations.
#[derive(Debug, Clone, Default)]
pub struct AttributeParser {
    options: ScanOptions,
}

impl AttributeParser {
    /// Creates a parser with the given options.
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// The options this parser expands classes with.
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Attempts to parse an annotation at the start of `data`.
    ///
    /// Returns `None` when the line is not an annotation; the reason is
    /// logged at trace level.
    pub fn parse(&self, data: &[u8]) -> Option<AttributeMatch> {
        match self.try_parse(data) {
            Ok(found) => Some(found),
            Err(AttributeRejection::NotAnAnnotation) => None,
            Err(reason) => {
                log::trace!("ignoring attribute annotation: {reason}");
                None
            }
        }
    }

    /// Attempts to parse an annotation, reporting why it was rejected.
    pub fn try_parse(&self, data: &[u8]) -> Result<AttributeMatch, AttributeRejection> {
        if data.len() < 3 || data[0] != b'{' {
            return Err(AttributeRejection::NotAnAnnotation);
        }

        let line = &data[..line_end(data, 1)];
        let found = line.iter().filter(|b| **b == b'}').count();
        if found != 1 {
            return Err(AttributeRejection::UnbalancedBraces { found });
        }

        let mut attribute = Attribute::default();
        let mut escaped = false;
        let mut quoted = false;
        let mut i = skip_space(line, 1);
        let mut chunk_start = i;

        while i < line.len() {
            match line[i] {
                b'\\' => {
                    escaped = !escaped;
                    i += 1;
                    continue;
                }
                b'"' if !escaped => quoted = !quoted,
                b'}' if !escaped && !quoted => {
                    if chunk_start == i {
                        return Err(AttributeRejection::EmptyChunk { offset: i });
                    }
                    if !trim_line(&line[i + 1..]).is_empty() {
                        return Err(AttributeRejection::TrailingText { offset: i + 1 });
                    }
                    self.classify(line, chunk_start, i, &mut attribute)?;
                    return Ok(AttributeMatch {
                        attribute,
                        consumed: i + 1,
                    });
                }
                b if is_space(b) && !quoted => {
                    if chunk_start < i {
                        self.classify(line, chunk_start, i, &mut attribute)?;
                    }
                    chunk_start = i + 1;
                }
                _ => {}
            }
            escaped = false;
            i += 1;
        }

        Err(AttributeRejection::Unterminated)
    }

    fn classify(
        &self,
        line: &[u8],
        start: usize,
        end: usize,
        attribute: &mut Attribute,
    ) -> Result<(), AttributeRejection> {
        let chunk = &line[start..end];
        match chunk[0] {
            b'.' => {
                let token = lossy(&chunk[1..]);
                let class = expand_class_with(&token, &self.options).into_owned();
                attribute.classes.push(class);
            }
            b'#' => attribute.id = Some(lossy(&chunk[1..])),
            _ => {
                let Some((key, value)) = key_value(chunk) else {
                    return Err(AttributeRejection::InvalidChunk {
                        chunk: lossy(chunk),
                        offset: start,
                    });
                };
                attribute.attrs.insert(lossy(key), lossy(value));
            }
        }
        Ok(())
    }
}

/// Splits `key="value"`; quotes are mandatory and the value keeps escapes.
fn key_value(chunk: &[u8]) -> Option<(&[u8], &[u8])> {
    let eq = chunk.iter().position(|b| *b == b'=')?;
    let (key, value) = (&chunk[..eq], &chunk[eq + 1..]);
    if key.is_empty() || value.len() < 3 {
        return None;
    }
    if value[0] != b'"' || value[value.len() - 1] != b'"' {
        return None;
    }
    Some((key, &value[1..value.len() - 1]))
}

/// Parses an annotation with default options.
pub fn parse_attribute(data: &[u8]) -> Option<AttributeMatch> {
    AttributeParser::default().parse(data)
}

/// Holds at most one parsed attribute until the next block claims it.
#[derive(Debug, Clone, Default)]
pub struct PendingAttribute {
    slot: Option<Attribute>,
}

impl PendingAttribute {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans `data` for an annotation.
    ///
    /// On success the attribute replaces whatever was pending and the
    /// returned slice starts just past the `}`. Otherwise `data` is
    /// returned unchanged and the slot is left as it was.
    pub fn scan<'d>(&mut self, parser: &AttributeParser, data: &'d [u8]) -> &'d [u8] {
        match parser.parse(data) {
            Some(found) => {
                self.slot = Some(found.attribute);
                &data[found.consumed..]
            }
            None => data,
        }
    }

    /// Hands the pending attribute to the block being constructed.
    pub fn take(&mut self) -> Option<Attribute> {
        self.slot.take()
    }

    /// The pending attribute, if any, without consuming it.
    pub fn peek(&self) -> Option<&Attribute> {
        self.slot.as_ref()
    }

    /// Returns true while an attribute awaits a block.
    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    /// Drops the pending attribute.
    pub fn clear(&mut self) {
        self.slot = None;
    }
}
