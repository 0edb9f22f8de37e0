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
/// A window of lines taken from rendered output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// The selected lines, joined with `\n`. Empty when the offset is past
    /// the end of the output.
    pub text: String,
    /// Number of lines in the whole output.
    pub total_lines: usize,
    /// Whether lines remain after this page.
    pub has_more: bool,
}

impl Page {
    /// Take `limit` lines of `output`, starting at line `offset`.
    ///
    /// A trailing newline counts as the start of one last, empty line, so
    /// `"a\nb\n"` has three lines.
    pub fn new(output: &str, offset: usize, limit: usize) -> Self {
        let lines: Vec<&str> = output.split('\n').collect();
        let total_lines = lines.len();
        if offset >= total_lines {
            return Self {
                text: String::new(),
                total_lines,
                has_more: false,
            };
        }

        let end = offset.saturating_add(limit).min(total_lines);
        Self {
            text: lines[offset..end].join("\n"),
            total_lines,
            has_more: end < total_lines,
        }
    }

    /// Offset of the line after this page, if there is one.
    pub fn next_offset(&self, offset: usize, limit: usize) -> Option<usize> {
        self.has_more.then(|| offset.saturating_add(limit))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const OUTPUT: &str = "# Overview\nfirst\nsecond\nthird\nfourth";

    #[test]
    fn test_first_page() {
        let page = Page::new(OUTPUT, 0, 2);
        assert_eq!(page.text, "# Overview\nfirst");
        assert_eq!(page.total_lines, 5);
        assert!(page.has_more);
        assert_eq!(page.next_offset(0, 2), Some(2));
    }

    #[test]
    fn test_exact_last_page() {
        let page = Page::new(OUTPUT, 3, 2);
        assert_eq!(page.text, "third\nfourth");
        assert_eq!(page.total_lines, 5);
        assert!(!page.has_more);
        assert_eq!(page.next_offset(3, 2), None);
    }

    #[test]
    fn test_limit_past_end() {
        let page = Page::new(OUTPUT, 4, 100);
        assert_eq!(page.text, "fourth");
        assert!(!page.has_more);

        let page = Page::new(OUTPUT, 0, usize::MAX);
        assert_eq!(page.text, OUTPUT);
        assert!(!page.has_more);
    }

    #[test]
    fn test_offset_past_end() {
        for offset in [5, 6, usize::MAX] {
            let page = Page::new(OUTPUT, offset, 10);
            assert!(page.text.is_empty());
            assert_eq!(page.total_lines, 5);
            assert!(!page.has_more);
        }
    }

    #[test]
    fn test_trailing_newline_and_empty_output() {
        let page = Page::new("a\nb\n", 1, 1);
        assert_eq!(page.text, "b");
        assert_eq!(page.total_lines, 3);
        assert!(page.has_more);

        let page = Page::new("", 0, 10);
        assert_eq!(page.total_lines, 1);
        assert!(page.text.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn test_zero_limit() {
        let page = Page::new(OUTPUT, 1, 0);
        assert!(page.text.is_empty());
        assert!(page.has_more);
    }
}
