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

//! Rendering of [`Extraction`](crate::recipe::Extraction)s.
mod buffer;
mod builder;
mod page;
mod reporter;
mod reporters;
mod statistics;

pub use buffer::LimitedBuffer;
pub use builder::ReporterBuilder;
pub use page::Page;
pub use reporter::Reporter;
pub use reporters::{JsonReportHandler, ReportHandler, TextReportHandler};
