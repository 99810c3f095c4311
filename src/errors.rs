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

use std::fmt;

/// Glob compiler error
///
/// Malformed pattern text is never an error, it degrades to literal
/// matching for the affected segment. The variants here signal bugs in
/// the compiler itself, not bad input.
#[derive(Debug)]
pub enum Error {
    /// The segment scan failed to advance at the given offset. This would
    /// mean an infinite loop in the parser so we abort instead.
    Stalled(usize),
    /// The generated regex source was rejected. The compiler only emits
    /// valid regex syntax, so hitting this is a compiler defect.
    Regex(regex::Error),
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Error::Stalled(o1), Error::Stalled(o2)) => o1 == o2,
            (Error::Regex(_), Error::Regex(_)) => true,
            (_, _) => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Stalled(offset) => {
                write!(f, "glob segment scan stalled at offset {offset}")
            }
            Error::Regex(e) => write!(f, "generated matcher was rejected: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Self::Regex(e)
    }
}

/// Glob compiler result type
pub type Result<T> = std::result::Result<T, Error>;
