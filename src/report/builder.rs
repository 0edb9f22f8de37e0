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
use super::{
    reporters::{JsonReportHandler, ReportHandler, TextReportHandler},
    Reporter,
};

#[derive(Debug, Default, Clone)]
pub struct ReporterBuilder {
    max_chars: Option<usize>,
}

impl ReporterBuilder {
    #[inline]
    #[must_use]
    pub fn new(max_chars: Option<usize>) -> Self {
        Self { max_chars }
    }

    #[inline]
    #[must_use]
    pub fn with_max_chars(mut self, max_chars: Option<usize>) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn text(&self) -> Reporter<TextReportHandler> {
        Reporter::new(TextReportHandler).with_max_chars(self.max_chars)
    }

    pub fn json(&self) -> Reporter<JsonReportHandler> {
        Reporter::new(JsonReportHandler).with_max_chars(self.max_chars)
    }

    /// A reporter whose handler is picked at runtime.
    pub fn boxed(&self, json: bool) -> Reporter<Box<dyn ReportHandler + Send + Sync>> {
        let handler: Box<dyn ReportHandler + Send + Sync> = if json {
            Box::new(JsonReportHandler)
        } else {
            Box::new(TextReportHandler)
        };
        Reporter::new(handler).with_max_chars(self.max_chars)
    }
}
