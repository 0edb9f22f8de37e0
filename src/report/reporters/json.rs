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

use super::ReportHandler;
use crate::{recipe::Extract, report::LimitedBuffer};

/// Renders one JSON object per extract, one per line.
///
/// A line that does not fit in the output limit is dropped whole so the
/// output stays valid JSON lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReportHandler;

impl ReportHandler for JsonReportHandler {
    fn render_extract(&self, out: &mut LimitedBuffer, extract: &Extract) -> fmt::Result {
        let mut line = serde_json::to_string(extract).map_err(|e| {
            debug!("failed to serialize {} extract from <{}>: {e}", extract.kind, extract.tag);
            fmt::Error
        })?;
        line.push('\n');
        out.push_whole(&line);
        Ok(())
    }
}
