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
extern crate pretty_env_logger;
#[macro_use]
extern crate log;

mod cmd;

use std::{process::ExitCode, time::Instant};

use clap::Parser;
use cmd::{
    cli::{Cli, Format},
    runner::Runner,
};
use docquery::report::ReporterBuilder;
use miette::{GraphicalTheme, IntoDiagnostic, Result};
use owo_colors::OwoColorize;

fn main() -> Result<ExitCode> {
    let cmd = Cli::parse();

    let mut builder = pretty_env_logger::formatted_timed_builder();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .graphical_theme(GraphicalTheme::unicode())
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .width(120)
                .color(true)
                .with_cause_chain()
                .build(),
        )
    }))
    .into_diagnostic()?;

    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        builder.parse_filters(&rust_log);
    } else {
        builder.filter_module("docquery", cmd.log_level_filter());
        builder.filter_module("dq", cmd.log_level_filter());
    }
    builder.try_init().into_diagnostic()?;

    debug!("cli args: {:?}", cmd);

    let start = Instant::now();

    let runner = Runner::new(cmd.query()?, cmd.base_url().cloned());
    let (sources, errors) = Runner::read_sources(cmd.files());
    for error in &errors {
        eprintln!("{:?}", error);
    }

    let reporter = ReporterBuilder::default().boxed(cmd.format() == Format::Json);
    let extractions = runner.run(&sources);
    for (source, extraction) in sources.iter().zip(&extractions) {
        if !extraction.matched {
            warn!("nothing matched in {}", source.name);
        }
        if let Some((offset, limit)) = cmd.page() {
            let page = reporter.report_page(extraction, offset, limit)?;
            if let Some(next) = page.next_offset(offset, limit) {
                info!(
                    "{} has {} lines, continue with --offset {next}",
                    source.name, page.total_lines
                );
            }
            continue;
        }

        let max_chars = cmd
            .max_chars()
            .or_else(|| runner.max_chars_for(extraction));
        if reporter.report(extraction, max_chars)? {
            info!("output for {} truncated to {:?} chars", source.name, max_chars);
        }
    }

    let elapsed = start.elapsed().as_secs_f64();
    let num_extracts = reporter.extracts();
    let num_documents = reporter.documents();
    let num_matched = reporter.documents_matched();

    eprintln!(
        "Extracted {} {} from {} {} in {:.2}{}",
        num_extracts.yellow(),
        if num_extracts == 1 { "entry" } else { "entries" },
        num_matched.yellow(),
        if num_matched == 1 {
            "document"
        } else {
            "documents"
        },
        elapsed.cyan(),
        "s".cyan()
    );
    if num_documents > num_matched {
        eprintln!(
            "{} of {} documents did not match",
            (num_documents - num_matched).red(),
            num_documents
        );
    }

    if errors.is_empty() && num_matched > 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
