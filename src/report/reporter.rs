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
use std::io::{self, Write};

use log::debug;
use miette::{IntoDiagnostic as _, Result};

use super::{statistics::Statistics, LimitedBuffer, Page, ReportHandler};
use crate::recipe::Extraction;

/// Renders extractions with a [`ReportHandler`] and keeps running totals.
#[must_use]
pub struct Reporter<R> {
    handler: R,
    max_chars: Option<usize>,
    stats: Statistics,
}

impl<R: ReportHandler + Default> Default for Reporter<R> {
    #[inline]
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R> Reporter<R> {
    pub fn new(handler: R) -> Self {
        Self {
            handler,
            max_chars: None,
            stats: Statistics::default(),
        }
    }

    /// Default output limit per document.
    pub fn with_max_chars(mut self, max_chars: Option<usize>) -> Self {
        self.max_chars = max_chars;
        self
    }

    #[inline]
    pub fn documents(&self) -> usize {
        self.stats.documents()
    }

    #[inline]
    pub fn documents_matched(&self) -> usize {
        self.stats.matched()
    }

    #[inline]
    pub fn extracts(&self) -> usize {
        self.stats.extracts()
    }

    #[inline]
    pub fn documents_truncated(&self) -> usize {
        self.stats.truncated()
    }
}

impl<R: ReportHandler> Reporter<R> {
    /// Render `extraction` into a string, using the default limit.
    ///
    /// Returns the rendered text and whether it was truncated.
    pub fn render(&self, extraction: &Extraction) -> Result<(String, bool)> {
        self.render_limited(extraction, self.max_chars)
    }

    /// Render `extraction` into a string, using `max_chars` instead of the
    /// default limit.
    pub fn render_limited(
        &self,
        extraction: &Extraction,
        max_chars: Option<usize>,
    ) -> Result<(String, bool)> {
        let mut out = LimitedBuffer::new(max_chars);
        self.handler.render(&mut out, extraction).into_diagnostic()?;

        let truncated = out.is_truncated();
        if truncated {
            debug!(
                "output for recipe {:?} truncated after {} chars",
                extraction.recipe,
                out.char_count()
            );
        }
        self.stats.record(extraction, truncated);
        Ok((out.into_string(), truncated))
    }

    /// Render `extraction` to stdout.
    pub fn report(&self, extraction: &Extraction, max_chars: Option<usize>) -> Result<bool> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.report_to(&mut lock, extraction, max_chars)
    }

    pub fn report_to<W: Write>(
        &self,
        w: &mut W,
        extraction: &Extraction,
        max_chars: Option<usize>,
    ) -> Result<bool> {
        let (text, truncated) = self.render_limited(extraction, max_chars.or(self.max_chars))?;
        w.write_all(text.as_bytes()).into_diagnostic()?;
        Ok(truncated)
    }

    /// Render all of `extraction`, then keep `limit` lines starting at line
    /// `offset`. The character limit does not apply.
    pub fn render_page(&self, extraction: &Extraction, offset: usize, limit: usize) -> Result<Page> {
        let (text, _) = self.render_limited(extraction, None)?;
        let page = Page::new(&text, offset, limit);
        if page.has_more {
            debug!(
                "page at line {offset} of recipe {:?} has more lines ({} total)",
                extraction.recipe, page.total_lines
            );
        }
        Ok(page)
    }

    /// Render one page of `extraction` to stdout.
    pub fn report_page(&self, extraction: &Extraction, offset: usize, limit: usize) -> Result<Page> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.report_page_to(&mut lock, extraction, offset, limit)
    }

    pub fn report_page_to<W: Write>(
        &self,
        w: &mut W,
        extraction: &Extraction,
        offset: usize,
        limit: usize,
    ) -> Result<Page> {
        let page = self.render_page(extraction, offset, limit)?;
        if !page.text.is_empty() {
            writeln!(w, "{}", page.text).into_diagnostic()?;
        }
        Ok(page)
    }
}
