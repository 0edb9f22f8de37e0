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

/// A string buffer that stops accepting text after `max_chars` characters.
///
/// Writes that would cross the limit are cut on a char boundary, and every
/// write after that is ignored. Writing never fails.
#[derive(Debug, Default, Clone)]
pub struct LimitedBuffer {
    buf: String,
    max_chars: Option<usize>,
    chars: usize,
    truncated: bool,
}

impl LimitedBuffer {
    /// `None` means no limit.
    pub fn new(max_chars: Option<usize>) -> Self {
        Self {
            buf: String::new(),
            max_chars,
            chars: 0,
            truncated: false,
        }
    }

    pub fn push_str(&mut self, s: &str) {
        if self.truncated {
            return;
        }

        let len = s.chars().count();
        match self.remaining() {
            Some(remaining) if len > remaining => {
                let end = s
                    .char_indices()
                    .nth(remaining)
                    .map_or(s.len(), |(end, _)| end);
                self.buf.push_str(&s[..end]);
                self.chars += remaining;
                self.truncated = true;
            }
            _ => {
                self.buf.push_str(s);
                self.chars += len;
            }
        }
    }

    /// Write `s` only if all of it fits. Otherwise nothing is written and
    /// the buffer is marked truncated.
    pub fn push_whole(&mut self, s: &str) -> bool {
        if self.truncated {
            return false;
        }

        let len = s.chars().count();
        if self.remaining().is_some_and(|remaining| len > remaining) {
            self.truncated = true;
            return false;
        }
        self.buf.push_str(s);
        self.chars += len;
        true
    }

    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Number of characters written so far.
    #[inline]
    pub fn char_count(&self) -> usize {
        self.chars
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    fn remaining(&self) -> Option<usize> {
        self.max_chars.map(|max| max.saturating_sub(self.chars))
    }
}

impl fmt::Write for LimitedBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl fmt::Display for LimitedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}
