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

//! Structural glob matching for nested values.
//!
//! Answers "which paths or values inside this tree match a dot-separated
//! glob pattern" for any JSON-like value, without visiting subtrees that
//! can no longer produce a match.
//!
//! ## Patterns
//!
//! | Pattern | Matches                                                          |
//! |---------|------------------------------------------------------------------|
//! | `?`     | exactly one character within a path element                      |
//! | `*`     | any (0 or more) characters within a path element                 |
//! | `**`    | any (0 or more) whole path elements, must fill its own segment   |
//! | `\`     | escapes the next character, including `.` and the wildcards      |
//!
//! Wildcards never cross a `.` boundary, only `**` consumes whole elements
//! and it may consume zero of them, so `a.**.d` also matches `a.d`. Array
//! elements are addressed by their stringified index. Results come in the
//! order the tree exposes its entries, a match is terminal for its branch:
//! a matched node is not searched for deeper matches.
//!
//! ```
//! use simd_json::json;
//! use tremor_glob::{glob_paths, glob_values, GlobOptions};
//!
//! # fn main() -> tremor_glob::Result<()> {
//! let tree = json!({"a": {"b": {"d": 1}, "c": {"d": 2, "f": 3}}});
//! let options = GlobOptions::default();
//!
//! assert_eq!(glob_paths("a.*.d", &tree, options)?, vec!["a.b.d", "a.c.d"]);
//! assert_eq!(glob_values("**.f", &tree, options)?, vec![&json!(3)]);
//! # Ok(())
//! # }
//! ```
//!
//! A pattern that is used repeatedly should be compiled once into a
//! [`Glob`] and reused, the compiled matchers are then shared across all
//! searches instead of being rebuilt per call.

#![warn(unused_extern_crates)]
#![deny(
    clippy::all,
    clippy::unwrap_used,
    clippy::unnecessary_unwrap,
    clippy::pedantic,
    clippy::mod_module_files
)]
#![deny(missing_docs)]
#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod errors;
mod matcher;
mod segments;
mod walker;

pub use errors::{Error, Result};

use log::trace;
use matcher::{CompiledMatcher, MatcherCache};
use std::borrow::Borrow;
use std::hash::Hash;
use value_trait::ValueAccess;

/// What a search reports for each match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report the dot-joined path of the matched node.
    Path,
    /// Report a reference to the matched node itself.
    Value,
}

/// Traversal options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlobOptions {
    /// Refuse to re-enter a node already visited during this call. This
    /// guards against non-termination on cyclic graphs at the price of
    /// tracking every composite node entered. Trees built from owned
    /// values cannot be cyclic, so this defaults to off.
    pub safe_mode: bool,
}

/// One search result, the flavor depends on the requested [`Mode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Matched<'v, V> {
    /// The dot-joined path of a matched node.
    Path(String),
    /// The matched node itself.
    Value(&'v V),
}

/// A compiled glob pattern.
///
/// Compiling is the expensive part: the full matcher and every prefix
/// matcher the pruning step can consult are built here, once. The handle is
/// immutable afterwards and can be shared freely between threads and
/// traversals.
#[derive(Debug, Clone)]
pub struct Glob {
    source: String,
    segment_count: usize,
    globstar: Option<usize>,
    full: CompiledMatcher,
    cache: MatcherCache,
}

impl Glob {
    /// Compiles a pattern.
    ///
    /// Malformed pattern text never fails, a segment that cannot be parsed
    /// (a dangling trailing escape) degrades to matching its literal text.
    ///
    /// # Errors
    ///
    /// Only for internal compiler defects, never for bad pattern text.
    pub fn compile(pattern: &str) -> Result<Self> {
        let segments = segments::parse(pattern)?;
        let globstar = segments::globstar_index(&segments);
        let full = matcher::compile(&segments)?;
        let cache = MatcherCache::build(&segments, globstar)?;
        trace!(
            "compiled glob `{pattern}`: {} segments, globstar at {globstar:?}",
            segments.len()
        );
        Ok(Self {
            source: pattern.to_owned(),
            segment_count: segments.len(),
            globstar,
            full,
            cache,
        })
    }

    /// The pattern this glob was compiled from.
    pub fn pattern(&self) -> &str {
        &self.source
    }

    /// Tests a dot-joined path against the full pattern.
    ///
    /// This is pure pattern semantics with no traversal involved, `**`
    /// accepts any path here even though a search stops at the shallowest
    /// match of every branch.
    pub fn is_match(&self, path: &str) -> bool {
        self.full.is_match(path)
    }

    /// Searches `root` depth-first and returns every match in the order
    /// the tree exposes its entries.
    ///
    /// The traversal is recursive, stack use is bounded by the depth of
    /// the input tree.
    pub fn search<'v, V>(&self, root: &'v V, mode: Mode, options: GlobOptions) -> Vec<Matched<'v, V>>
    where
        V: ValueAccess<Target = V>,
        <V as ValueAccess>::Key: Borrow<str> + Hash + Eq,
    {
        let mut results = Vec::new();
        let visits = walker::walk(self, root, options, &mut |path: &str, value: &'v V| {
            results.push(match mode {
                Mode::Path => Matched::Path(path.to_owned()),
                Mode::Value => Matched::Value(value),
            });
        });
        trace!(
            "glob `{}` visited {visits} nodes for {} matches",
            self.source,
            results.len()
        );
        results
    }

    /// Searches `root` and returns the dot-joined paths of all matches.
    pub fn paths<V>(&self, root: &V, options: GlobOptions) -> Vec<String>
    where
        V: ValueAccess<Target = V>,
        <V as ValueAccess>::Key: Borrow<str> + Hash + Eq,
    {
        let mut results = Vec::new();
        let visits = walker::walk(self, root, options, &mut |path: &str, _: &V| {
            results.push(path.to_owned());
        });
        trace!(
            "glob `{}` visited {visits} nodes for {} matches",
            self.source,
            results.len()
        );
        results
    }

    /// Searches `root` and returns references to all matched values.
    pub fn values<'v, V>(&self, root: &'v V, options: GlobOptions) -> Vec<&'v V>
    where
        V: ValueAccess<Target = V>,
        <V as ValueAccess>::Key: Borrow<str> + Hash + Eq,
    {
        let mut results = Vec::new();
        let visits = walker::walk(self, root, options, &mut |_: &str, value: &'v V| {
            results.push(value);
        });
        trace!(
            "glob `{}` visited {visits} nodes for {} matches",
            self.source,
            results.len()
        );
        results
    }

    /// Whether a path of `len` elements could be a complete match: exactly
    /// the pattern length without a globstar, anything from the globstar's
    /// position onwards with one.
    pub(crate) fn match_possible(&self, len: usize) -> bool {
        match self.globstar {
            None => len == self.segment_count,
            Some(g) => len >= g,
        }
    }

    pub(crate) fn full(&self) -> &CompiledMatcher {
        &self.full
    }

    pub(crate) fn cache(&self) -> &MatcherCache {
        &self.cache
    }

    pub(crate) fn globstar_at(&self) -> Option<usize> {
        self.globstar
    }
}

/// Compiles `pattern` and searches `root`, reporting matches in the
/// requested [`Mode`].
///
/// # Errors
///
/// Only for internal compiler defects, never for bad pattern text.
pub fn glob<'v, V>(
    pattern: &str,
    root: &'v V,
    mode: Mode,
    options: GlobOptions,
) -> Result<Vec<Matched<'v, V>>>
where
    V: ValueAccess<Target = V>,
    <V as ValueAccess>::Key: Borrow<str> + Hash + Eq,
{
    Ok(Glob::compile(pattern)?.search(root, mode, options))
}

/// Compiles `pattern` and returns the dot-joined paths of all matches in
/// `root`.
///
/// # Errors
///
/// Only for internal compiler defects, never for bad pattern text.
pub fn glob_paths<V>(pattern: &str, root: &V, options: GlobOptions) -> Result<Vec<String>>
where
    V: ValueAccess<Target = V>,
    <V as ValueAccess>::Key: Borrow<str> + Hash + Eq,
{
    Ok(Glob::compile(pattern)?.paths(root, options))
}

/// Compiles `pattern` and returns references to all matched values in
/// `root`.
///
/// # Errors
///
/// Only for internal compiler defects, never for bad pattern text.
pub fn glob_values<'v, V>(pattern: &str, root: &'v V, options: GlobOptions) -> Result<Vec<&'v V>>
where
    V: ValueAccess<Target = V>,
    <V as ValueAccess>::Key: Borrow<str> + Hash + Eq,
{
    Ok(Glob::compile(pattern)?.values(root, options))
}
