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
use std::fmt::{self, Write as _};

use super::ReportHandler;
use crate::{
    recipe::{Emit, Extract},
    report::LimitedBuffer,
};

/// Renders extracts as Markdown-like plain text.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReportHandler;

impl TextReportHandler {
    const INDENT: &'static str = "    ";
}

impl ReportHandler for TextReportHandler {
    fn render_extract(&self, out: &mut LimitedBuffer, extract: &Extract) -> fmt::Result {
        let text = extract.text.as_str();
        match extract.kind {
            Emit::Mark => Ok(()),
            Emit::Heading => writeln!(out, "\n{} {text}", "#".repeat(extract.depth.max(1))),
            Emit::Item => writeln!(out, "{}- {text}", Self::INDENT.repeat(extract.depth)),
            Emit::Code => writeln!(out, "```\n{}\n```", text.trim_end_matches('\n')),
            Emit::Link => match &extract.href {
                Some(href) => writeln!(out, "[{text}]({href})"),
                None => writeln!(out, "{text}"),
            },
            Emit::Text | Emit::Raw => writeln!(out, "{text}"),
        }
    }
}
