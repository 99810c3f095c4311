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

//! Pruned depth-first traversal of a value tree.
//!
//! The walk tests every child of every visited node against the pattern at
//! the child's depth. A child that matches is emitted and not explored any
//! further, a composite child that does not match is only entered when the
//! pattern could still be completed below it: unconditionally once a
//! globstar is in play, otherwise only when the prefix matcher for that
//! depth accepts the path so far. Everything else is pruned.

use crate::{Glob, GlobOptions};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;
use value_trait::prelude::*;

/// Walks `root` and feeds every match into `emit` as a pair of the joined
/// path and the matched value, in child-iteration order. Returns the number
/// of composite nodes entered, the measure of how much pruning saved.
pub(crate) fn walk<'v, V, F>(glob: &Glob, root: &'v V, options: GlobOptions, emit: &mut F) -> usize
where
    V: ValueAccess<Target = V>,
    <V as ValueAccess>::Key: Borrow<str> + Hash + Eq,
    F: FnMut(&str, &'v V),
{
    let mut walk = Walk {
        glob,
        options,
        visited: HashSet::new(),
        joined: String::with_capacity(64),
        visits: 0,
    };
    if options.safe_mode {
        walk.visited.insert(identity(root));
    }
    walk.level(root, 0, emit);
    walk.visits
}

struct Walk<'g> {
    glob: &'g Glob,
    options: GlobOptions,
    /// Addresses of nodes already entered, only consulted in safe mode.
    visited: HashSet<usize>,
    /// Dot-joined path of the node currently visited, grown and truncated
    /// per child so the traversal allocates no per-step path vectors.
    joined: String,
    visits: usize,
}

impl Walk<'_> {
    fn level<'v, V, F>(&mut self, node: &'v V, depth: usize, emit: &mut F)
    where
        V: ValueAccess<Target = V>,
        <V as ValueAccess>::Key: Borrow<str> + Hash + Eq,
        F: FnMut(&str, &'v V),
    {
        self.visits += 1;
        if let Some(object) = node.as_object() {
            for (key, child) in object.iter() {
                self.step(key.borrow(), child, depth, emit);
            }
        } else if let Some(array) = node.as_array() {
            for (idx, child) in array.iter().enumerate() {
                self.step(&idx.to_string(), child, depth, emit);
            }
        }
    }

    /// Handles one child: record a match, or descend, or prune. A match and
    /// a descent are mutually exclusive for the same child, a matched
    /// composite is not explored any deeper.
    fn step<'v, V, F>(&mut self, key: &str, child: &'v V, depth: usize, emit: &mut F)
    where
        V: ValueAccess<Target = V>,
        <V as ValueAccess>::Key: Borrow<str> + Hash + Eq,
        F: FnMut(&str, &'v V),
    {
        let base = self.joined.len();
        if depth > 0 {
            self.joined.push('.');
        }
        self.joined.push_str(key);
        let len = depth + 1;

        if self.glob.match_possible(len) && self.glob.full().accepts(&self.joined, key) {
            emit(&self.joined, child);
        } else if is_composite(child) && self.may_descend(len, key) && self.enter(child) {
            self.level(child, len, emit);
        }
        self.joined.truncate(base);
    }

    fn may_descend(&self, len: usize, key: &str) -> bool {
        match self.glob.globstar_at() {
            // the globstar has opened, every deeper node remains a candidate
            Some(g) if len >= g => true,
            _ => self
                .glob
                .cache()
                .prefix(len)
                .is_some_and(|m| m.accepts(&self.joined, key)),
        }
    }

    /// In safe mode a node is entered at most once per call, re-entering it
    /// means the tree has a cycle and that branch is skipped.
    fn enter<V>(&mut self, node: &V) -> bool {
        if !self.options.safe_mode {
            return true;
        }
        self.visited.insert(identity(node))
    }
}

fn is_composite<V>(v: &V) -> bool
where
    V: ValueAccess<Target = V>,
{
    v.as_object().is_some() || v.as_array().is_some()
}

fn identity<V>(node: &V) -> usize {
    node as *const V as usize
}
