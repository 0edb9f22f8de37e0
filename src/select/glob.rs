// Copyright © 2024 Don Isaac
//
// This file is part of DocQuery.
//
// DocQuery is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// DocQuery is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details.
//
// You should have received a copy of the GNU General Public License along with
// DocQuery. If not, see <https://www.gnu.org/licenses/>.
use std::fmt;

use log::debug;
use regex::Regex;

/// Shell-style wildcard pattern used for class, id and attribute-key
/// comparisons.
///
/// Supports `*` (any run of characters except `/`), `?` (one character
/// except `/`), `[...]` / `[^...]` character classes and `\` escapes.
/// Malformed patterns (unclosed class, trailing escape, empty class) compile
/// to [`Glob::Invalid`], which never matches.
#[derive(Debug, Clone)]
pub(crate) enum Glob {
    /// No wildcards; compared with `==`.
    Literal(String),
    Pattern(Regex),
    Invalid,
}

impl Glob {
    pub fn new(pattern: &str) -> Self {
        if !pattern.contains(['*', '?', '[', '\\']) {
            return Self::Literal(pattern.to_string());
        }

        let Some(source) = translate(pattern) else {
            debug!("malformed glob '{pattern}', it will never match");
            return Self::Invalid;
        };

        match Regex::new(&source) {
            Ok(regex) => Self::Pattern(regex),
            Err(e) => {
                debug!("glob '{pattern}' did not compile ({e}), it will never match");
                Self::Invalid
            }
        }
    }

    #[inline]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == value,
            Self::Pattern(regex) => regex.is_match(value),
            Self::Invalid => false,
        }
    }
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => literal.fmt(f),
            Self::Pattern(regex) => regex.fmt(f),
            Self::Invalid => write!(f, "<invalid>"),
        }
    }
}

/// Translate a glob into an anchored regular expression. Returns [`None`]
/// for malformed globs.
fn translate(pattern: &str) -> Option<String> {
    let mut source = String::with_capacity(pattern.len() * 2 + 2);
    source.push('^');

    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '*' => source.push_str("[^/]*"),
            '?' => source.push_str("[^/]"),
            '\\' => {
                let escaped = chars.next()?;
                push_escaped(&mut source, escaped);
            }
            '[' => {
                let negated = chars.clone().next() == Some('^');
                if negated {
                    chars.next();
                }

                let mut class = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        ']' => {
                            closed = true;
                            break;
                        }
                        '\\' => push_class_member(&mut class, chars.next()?),
                        // ranges keep their dash
                        '-' => class.push('-'),
                        c => push_class_member(&mut class, c),
                    }
                }

                if !closed || class.is_empty() {
                    return None;
                }
                source.push('[');
                if negated {
                    source.push_str("^/");
                }
                source.push_str(&class);
                source.push(']');
            }
            c => push_escaped(&mut source, c),
        }
    }

    source.push('$');
    Some(source)
}

fn push_escaped(source: &mut String, c: char) {
    let mut buf = [0u8; 4];
    source.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

fn push_class_member(class: &mut String, c: char) {
    if c.is_ascii_punctuation() {
        class.push('\\');
    }
    class.push(c);
}
