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
mod json;
mod text;

use std::fmt;

use super::LimitedBuffer;
use crate::recipe::{Extract, Extraction};

pub use json::JsonReportHandler;
pub use text::TextReportHandler;

pub trait ReportHandler {
    /// Render every extract, in order, until `out` is full.
    fn render(&self, out: &mut LimitedBuffer, extraction: &Extraction) -> fmt::Result {
        for extract in &extraction.extracts {
            if out.is_truncated() {
                break;
            }
            self.render_extract(out, extract)?;
        }
        Ok(())
    }

    fn render_extract(&self, out: &mut LimitedBuffer, extract: &Extract) -> fmt::Result;
}

impl<R> ReportHandler for Box<R>
where
    R: ReportHandler + ?Sized,
{
    fn render(&self, out: &mut LimitedBuffer, extraction: &Extraction) -> fmt::Result {
        (**self).render(out, extraction)
    }
    fn render_extract(&self, out: &mut LimitedBuffer, extract: &Extract) -> fmt::Result {
        (**self).render_extract(out, extract)
    }
}
