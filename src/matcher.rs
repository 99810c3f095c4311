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

//! Compiles parsed segments into matchers over dot-joined paths.

use crate::errors::Result;
use crate::segments::{Part, Segment};
use regex::Regex;

/// A matcher for complete dot-joined paths, anchored at both ends.
///
/// Immutable once built, safe to reuse across traversals.
#[derive(Debug, Clone)]
pub(crate) struct CompiledMatcher {
    re: Regex,
    /// If the final segment is plain literal text a candidate whose last
    /// element differs can be rejected without running the regex. The regex
    /// stays authoritative, dropping this never changes results.
    tail: Option<String>,
}

impl CompiledMatcher {
    /// Tests a joined candidate path, `last` being its final element.
    pub(crate) fn accepts(&self, joined: &str, last: &str) -> bool {
        if let Some(tail) = &self.tail {
            if tail != last {
                return false;
            }
        }
        self.re.is_match(joined)
    }

    /// Tests a joined path without the precheck.
    pub(crate) fn is_match(&self, joined: &str) -> bool {
        self.re.is_match(joined)
    }
}

/// Compiles a segment sequence into a single anchored matcher.
///
/// Wildcards never cross an element boundary, only a globstar consumes
/// whole elements and it may consume zero of them: `a.**.d` accepts `a.d`.
///
/// # Errors
///
/// Only if the generated regex source is rejected, which would be a
/// compiler defect, never a property of the input pattern.
pub(crate) fn compile(segments: &[Segment]) -> Result<CompiledMatcher> {
    let mut src = String::with_capacity(16 + 8 * segments.len());
    src.push('^');
    let mut needs_sep = false;
    for (i, segment) in segments.iter().enumerate() {
        let is_last = i + 1 == segments.len();
        match segment {
            Segment::Globstar if is_last => {
                if needs_sep {
                    // zero or more further elements after what we have
                    src.push_str(r"(?:\.[^.]+)*");
                } else {
                    src.push_str(".*");
                }
            }
            Segment::Globstar => {
                if needs_sep {
                    src.push_str(r"\.");
                    needs_sep = false;
                }
                // whole elements only, aligned on separators
                src.push_str(r"(?:[^.]+\.)*");
            }
            Segment::Pattern(parts) => {
                if needs_sep {
                    src.push_str(r"\.");
                }
                for part in parts {
                    match part {
                        Part::Literal(text) => src.push_str(&regex::escape(text)),
                        Part::Any => src.push_str("[^.]*"),
                        Part::One => src.push_str("[^.]"),
                    }
                }
                needs_sep = true;
            }
        }
    }
    src.push('$');
    let tail = segments
        .last()
        .and_then(Segment::plain_literal)
        .map(ToOwned::to_owned);
    Ok(CompiledMatcher {
        re: Regex::new(&src)?,
        tail,
    })
}

/// Prefix matchers for partial-path pruning, keyed by prefix depth.
///
/// Depth `k` holds the matcher for the first `k` segments. Slots exist for
/// every depth the traverser can consult: everything below the globstar, or
/// below the full length when there is none. Built once per pattern so no
/// matcher is ever recompiled during traversal.
#[derive(Debug, Clone)]
pub(crate) struct MatcherCache {
    prefixes: Vec<CompiledMatcher>,
}

impl MatcherCache {
    pub(crate) fn build(segments: &[Segment], globstar: Option<usize>) -> Result<Self> {
        let limit = globstar.unwrap_or(segments.len());
        let mut prefixes = Vec::with_capacity(limit.saturating_sub(1));
        for depth in 1..limit {
            prefixes.push(compile(&segments[..depth])?);
        }
        Ok(Self { prefixes })
    }

    pub(crate) fn prefix(&self, depth: usize) -> Option<&CompiledMatcher> {
        depth.checked_sub(1).and_then(|i| self.prefixes.get(i))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::segments::parse;

    fn matcher(pattern: &str) -> CompiledMatcher {
        compile(&parse(pattern).expect("parse failed")).expect("compile failed")
    }

    #[test]
    fn literal_is_anchored() {
        let m = matcher("a");
        assert!(m.is_match("a"));
        assert!(!m.is_match("aa"));
        assert!(!m.is_match("ba"));
        assert!(!m.is_match("a.b"));
        assert!(!m.is_match(""));
    }

    #[test]
    fn wildcard_stays_within_its_element() {
        let m = matcher("a*");
        assert!(m.is_match("a"));
        assert!(m.is_match("abc"));
        assert!(!m.is_match("a.b"));
        assert!(!m.is_match("ba"));

        let m = matcher("*.b");
        assert!(m.is_match("a.b"));
        assert!(m.is_match(".b"));
        assert!(!m.is_match("a.c.b"));
    }

    #[test]
    fn single_char_wildcard() {
        let m = matcher("b?");
        assert!(m.is_match("ba"));
        assert!(m.is_match("bc"));
        assert!(!m.is_match("b"));
        assert!(!m.is_match("bcc"));
        assert!(!m.is_match("b."));
    }

    #[test]
    fn nested_literals() {
        let m = matcher("a.b.c");
        assert!(m.is_match("a.b.c"));
        assert!(!m.is_match("a.b"));
        assert!(!m.is_match("a.b.c.d"));
    }

    #[test]
    fn globstar_consumes_whole_elements() {
        let m = matcher("a.**.d");
        assert!(m.is_match("a.d"));
        assert!(m.is_match("a.b.d"));
        assert!(m.is_match("a.b.c.d"));
        assert!(!m.is_match("a.d.x"));
        assert!(!m.is_match("ab.d"));
        // never partial text
        assert!(!m.is_match("a.xd"));
    }

    #[test]
    fn leading_and_trailing_globstar() {
        let m = matcher("**.d");
        assert!(m.is_match("d"));
        assert!(m.is_match("a.d"));
        assert!(m.is_match("a.b.d"));
        assert!(!m.is_match("a.dx"));

        let m = matcher("a.**");
        assert!(m.is_match("a"));
        assert!(m.is_match("a.b"));
        assert!(m.is_match("a.b.c"));
        assert!(!m.is_match("b"));

        let m = matcher("**");
        assert!(m.is_match("a"));
        assert!(m.is_match("a.b.c"));
    }

    #[test]
    fn escaped_metacharacters_match_literally() {
        let m = matcher(r"a\*");
        assert!(m.is_match("a*"));
        assert!(!m.is_match("ab"));

        let m = matcher(r"a\.b");
        assert!(m.is_match("a.b"));
        assert!(!m.is_match("axb"));
    }

    #[test]
    fn degraded_segment_matches_its_raw_text() {
        let m = matcher("a\\");
        assert!(m.is_match("a\\"));
        assert!(!m.is_match("a"));
    }

    #[test]
    fn empty_pattern_matches_no_path() {
        let m = compile(&[]).expect("compile failed");
        assert!(!m.is_match("a"));
        assert!(!m.is_match("a.b"));
    }

    #[test]
    fn precheck_agrees_with_the_regex() {
        let m = matcher("a.b");
        for (joined, last) in [("a.b", "b"), ("a.c", "c"), ("x.b", "b")] {
            assert_eq!(m.accepts(joined, last), m.is_match(joined));
        }
        // wildcard tails have no precheck and still work
        let m = matcher("a.*");
        assert!(m.accepts("a.b", "b"));
        assert!(!m.accepts("b.b", "b"));
    }

    #[test]
    fn prefix_cache_covers_depths_below_the_globstar() {
        let segments = parse("a.b.c").expect("parse failed");
        let cache = MatcherCache::build(&segments, None).expect("build failed");
        assert!(cache.prefix(1).expect("depth 1").is_match("a"));
        assert!(!cache.prefix(1).expect("depth 1").is_match("b"));
        assert!(cache.prefix(2).expect("depth 2").is_match("a.b"));
        assert!(cache.prefix(3).is_none());
        assert!(cache.prefix(0).is_none());

        let segments = parse("a.b.**").expect("parse failed");
        let cache = MatcherCache::build(&segments, Some(2)).expect("build failed");
        assert!(cache.prefix(1).expect("depth 1").is_match("a"));
        assert!(cache.prefix(2).is_none());
    }
}
