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
use std::{
    fs,
    io::{self, Read as _},
    path::{Path, PathBuf},
};

use docquery::{
    dom::{find_all, inner_text, raw_inner_text, tag_name, Document},
    recipe::{extract_many, Emit, Extract, Extraction, Recipe},
};
use miette::{Context as _, Error, IntoDiagnostic as _, Result};
use rayon::prelude::*;
use url::Url;

/// What to pull out of each document.
#[derive(Debug)]
pub enum Query {
    /// Every element matching a selector, at any depth.
    Select { pattern: String, emit: Emit },
    /// Recipes tried in order until one matches.
    Recipes(Vec<Recipe>),
}

/// An HTML document read from a file or stdin.
#[derive(Debug)]
pub struct Source {
    pub name: String,
    pub html: String,
}

impl AsRef<str> for Source {
    fn as_ref(&self) -> &str {
        &self.html
    }
}

#[derive(Debug)]
pub struct Runner {
    query: Query,
    base_url: Option<Url>,
}

impl Runner {
    pub fn new(query: Query, base_url: Option<Url>) -> Self {
        Self { query, base_url }
    }

    /// Read every path, `-` meaning stdin. Sources that fail to load are
    /// returned as errors instead of stopping the rest.
    pub fn read_sources(paths: &[PathBuf]) -> (Vec<Source>, Vec<Error>) {
        let mut sources = Vec::with_capacity(paths.len());
        let mut errors = Vec::new();
        for path in paths {
            match Self::read_source(path) {
                Ok(source) => sources.push(source),
                Err(error) => errors.push(error),
            }
        }

        (sources, errors)
    }

    fn read_source(path: &Path) -> Result<Source> {
        if path.as_os_str() == "-" {
            let mut html = String::new();
            io::stdin()
                .read_to_string(&mut html)
                .into_diagnostic()
                .context("Failed to read HTML from stdin")?;
            return Ok(Source {
                name: "<stdin>".to_string(),
                html,
            });
        }

        let html = fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("Failed to read {}", path.display()))?;
        trace!("read {} bytes from {}", html.len(), path.display());
        Ok(Source {
            name: path.display().to_string(),
            html,
        })
    }

    /// Extract from every source in parallel. Results are in source order.
    pub fn run(&self, sources: &[Source]) -> Vec<Extraction> {
        match &self.query {
            Query::Recipes(recipes) => extract_many(recipes, sources, self.base_url.as_ref()),
            Query::Select { pattern, emit } => sources
                .par_iter()
                .map(|source| select_all(&Document::parse(&source.html), pattern, *emit))
                .collect(),
        }
    }

    /// Output limit set by the recipe that produced `extraction`, if any.
    pub fn max_chars_for(&self, extraction: &Extraction) -> Option<usize> {
        let Query::Recipes(recipes) = &self.query else {
            return None;
        };
        let name = extraction.recipe.as_deref()?;
        recipes
            .iter()
            .find(|recipe| recipe.name() == name)
            .and_then(Recipe::max_chars)
    }
}

fn select_all(doc: &Document, pattern: &str, emit: Emit) -> Extraction {
    let nodes = find_all(doc.root(), pattern);
    let extracts = nodes
        .iter()
        .filter_map(|&node| {
            let text = match emit {
                Emit::Raw => raw_inner_text(node, true),
                _ => inner_text(node, true),
            };
            if text.trim().is_empty() {
                return None;
            }
            Some(Extract {
                kind: emit,
                tag: tag_name(node).unwrap_or_default().to_string(),
                text,
                href: None,
                depth: 0,
            })
        })
        .collect();

    Extraction {
        recipe: None,
        matched: !nodes.is_empty(),
        extracts,
    }
}
