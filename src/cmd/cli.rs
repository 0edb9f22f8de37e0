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
use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum, ValueHint};
use clap_verbosity_flag::Verbosity;
use docquery::{
    recipe::{Emit, InvalidRuleDiagnostic, Recipe, Rule, RuleProblem},
    SequenceMatcher,
};
use miette::Result;
use url::Url;

use super::runner::Query;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(group(ArgGroup::new("query").required(true).args(["select", "sequence", "recipe"])))]
pub struct Cli {
    /// HTML files to read. Use `-` to read from stdin.
    #[arg(name = "FILES", required = true)]
    #[arg(value_hint = ValueHint::FilePath)]
    files: Vec<PathBuf>,

    /// Print the text of every element matching a selector, at any depth.
    #[arg(long, short)]
    select: Option<String>,

    /// Print the text of elements completing a step sequence, e.g. `ul > li`.
    #[arg(long)]
    sequence: Option<String>,

    /// Match `--sequence` again inside elements that complete it.
    #[arg(long, requires = "sequence")]
    recursive: bool,

    /// TOML recipe to run. Repeat to fall back to later recipes when earlier
    /// ones do not match.
    #[arg(long, short)]
    #[arg(value_hint = ValueHint::FilePath)]
    recipe: Vec<PathBuf>,

    /// Print text as written in the source for `--select` and `--sequence`.
    #[arg(long)]
    raw: bool,

    #[arg(long, short, value_enum)]
    #[arg(default_value_t = Format::Text)]
    format: Format,

    /// Maximum number of characters printed per document.
    ///
    /// Overrides the limit set by a recipe.
    #[arg(long)]
    max_chars: Option<usize>,

    /// Print only this many lines of each document's output.
    #[arg(long, conflicts_with = "max_chars")]
    limit: Option<usize>,

    /// First line to print when paging with `--limit`.
    #[arg(long, requires = "limit", default_value_t = 0)]
    offset: usize,

    /// Resolve relative links against this URL.
    #[arg(long)]
    #[arg(value_hint = ValueHint::Url)]
    base_url: Option<Url>,

    #[command(flatten)]
    verbose: Verbosity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Markdown-like text
    Text,
    /// One JSON object per line
    Json,
}

impl Cli {
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn max_chars(&self) -> Option<usize> {
        self.max_chars
    }

    /// Line window as `(offset, limit)`, when paging was requested.
    pub fn page(&self) -> Option<(usize, usize)> {
        self.limit.map(|limit| (self.offset, limit))
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.verbose.log_level_filter()
    }

    /// Build the query selected by the command line flags, loading recipe
    /// files if there are any.
    pub fn query(&self) -> Result<Query> {
        let emit = if self.raw { Emit::Raw } else { Emit::Text };

        if let Some(select) = &self.select {
            return Ok(Query::Select {
                pattern: select.clone(),
                emit,
            });
        }

        if let Some(sequence) = &self.sequence {
            if SequenceMatcher::new(sequence).is_empty() {
                return InvalidRuleDiagnostic::new("sequence", "--sequence", RuleProblem::EmptyPattern)
                    .into();
            }
            let rule = Rule::sequence(sequence.as_str())
                .recursive(self.recursive)
                .with_emit(emit);
            return Ok(Query::Recipes(vec![Recipe::new("sequence").with_rule(rule)]));
        }

        let recipes = self
            .recipe
            .iter()
            .map(Recipe::from_file)
            .collect::<Result<Vec<_>>>()?;
        Ok(Query::Recipes(recipes))
    }
}
