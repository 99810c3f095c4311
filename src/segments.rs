// Copyright 2024, The Tremor Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Splits a glob pattern into its `.`-separated segments.

use crate::errors::{Error, Result};
use log::trace;

/// One building block of a pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Part {
    /// Literal text, escapes already resolved.
    Literal(String),
    /// `*`, zero or more characters within one path element.
    Any,
    /// `?`, exactly one character within one path element.
    One,
}

/// One `.`-separated element of a glob pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// `**`, zero or more whole path elements. Only recognized when it is
    /// the entire content of a segment, `a**b` is wildcard text.
    Globstar,
    /// Anything else, matched against exactly one path element.
    Pattern(Vec<Part>),
}

impl Segment {
    /// The literal text of a segment that contains no wildcards, if any.
    /// Such a segment can only ever match a path element equal to it.
    pub(crate) fn plain_literal(&self) -> Option<&str> {
        match self {
            Segment::Pattern(parts) => match parts.as_slice() {
                [Part::Literal(text)] => Some(text),
                [] => Some(""),
                _ => None,
            },
            Segment::Globstar => None,
        }
    }
}

/// Position of the leftmost globstar segment, if there is one.
pub(crate) fn globstar_index(segments: &[Segment]) -> Option<usize> {
    segments.iter().position(|s| matches!(s, Segment::Globstar))
}

/// Splits a pattern on unescaped `.` into typed segments.
///
/// The empty pattern yields no segments and therefore matches nothing. A
/// trailing separator is discarded, `a..b` keeps its empty middle segment.
///
/// # Errors
///
/// Only if the scan fails to advance, which would be a parser bug.
pub(crate) fn parse(pattern: &str) -> Result<Vec<Segment>> {
    if pattern.is_empty() {
        return Ok(Vec::new());
    }
    let chars: Vec<char> = pattern.chars().collect();
    let mut segments = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let (segment, end) = scan_segment(&chars, start);
        segments.push(segment);
        let mut next = end;
        if next < chars.len() {
            // consume the terminating separator
            next += 1;
        }
        if next <= start {
            return Err(Error::Stalled(start));
        }
        start = next;
    }
    Ok(segments)
}

/// Scans one segment beginning at `start`, returning it together with the
/// exclusive end offset (the separator or the end of the pattern).
fn scan_segment(chars: &[char], start: usize) -> (Segment, usize) {
    let mut parts: Vec<Part> = Vec::new();
    let mut in_escape = false;
    let mut i = start;
    while i < chars.len() && (in_escape || chars[i] != '.') {
        let c = chars[i];
        if in_escape {
            in_escape = false;
            push_literal(&mut parts, c);
        } else {
            match c {
                '\\' => in_escape = true,
                '?' => parts.push(Part::One),
                '*' => parts.push(Part::Any),
                _ => push_literal(&mut parts, c),
            }
        }
        i += 1;
    }
    if in_escape {
        // dangling escape, take the whole segment literally
        let raw: String = chars[start..i].iter().collect();
        trace!("glob segment `{raw}` has a dangling escape, degrading to literal");
        return (Segment::Pattern(vec![Part::Literal(raw)]), i);
    }
    if i - start == 2 && chars[start] == '*' && chars[start + 1] == '*' {
        return (Segment::Globstar, i);
    }
    (Segment::Pattern(parts), i)
}

fn push_literal(parts: &mut Vec<Part>, c: char) {
    if let Some(Part::Literal(text)) = parts.last_mut() {
        text.push(c);
    } else {
        parts.push(Part::Literal(String::from(c)));
    }
}
