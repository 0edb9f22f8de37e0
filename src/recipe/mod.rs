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

//! Matcher trees declared as TOML.
//!
//! ```toml
//! name = "godoc"
//!
//! [[rule]]
//! select = "div.Documentation"
//!
//!   [[rule.rule]]
//!   select = "h1,h2,h3"
//!   emit   = "heading"
//!
//!   [[rule.rule]]
//!   sequence  = "ul > li"
//!   recursive = true
//!   emit      = "item"
//! ```
//!
//! Each `[[rule]]` becomes a [`NodeMatcher`] (`select`) or a
//! [`SequenceMatcher`] (`sequence`); nested `[[rule.rule]]` tables become its
//! children. A document matches a recipe when any top-level rule fires.
mod error;
mod extract;

use std::{fs, path::Path};

use log::debug;
use miette::{Context as _, IntoDiagnostic as _, Result};
use rayon::prelude::*;
use serde::Deserialize;
use url::Url;

use crate::{
    dom::{Document, DomNode},
    query::{MatcherRef, NodeMatcher, SequenceMatcher},
    select::Selector,
};
use extract::Collector;

pub use error::{EmptyRecipeDiagnostic, InvalidRuleDiagnostic, RecipeParseDiagnostic, RuleProblem};
pub use extract::{Emit, Extract, Extraction};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecipeConfig {
    name: Option<String>,
    max_chars: Option<usize>,
    skip: Option<String>,
    #[serde(default)]
    rule: Vec<RuleConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleConfig {
    select: Option<String>,
    sequence: Option<String>,
    recursive: Option<bool>,
    rooted: Option<bool>,
    emit: Option<Emit>,
    #[serde(default)]
    rule: Vec<RuleConfig>,
}

/// A validated set of extraction rules.
///
/// Recipes are plain data and can be shared between threads. Each call to
/// [`Recipe::extract`] compiles a fresh matcher tree.
#[derive(Debug, Clone)]
pub struct Recipe {
    name: String,
    max_chars: Option<usize>,
    skip: Option<Selector>,
    rules: Vec<Rule>,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Pattern,
    emit: Option<Emit>,
    children: Vec<Rule>,
}

#[derive(Debug, Clone)]
enum Pattern {
    Select(Selector),
    Sequence {
        pattern: String,
        recursive: bool,
        rooted: bool,
    },
}

impl Recipe {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            max_chars: None,
            skip: None,
            rules: Vec::new(),
        }
    }

    /// Parse a recipe from TOML source.
    pub fn from_toml(source: &str) -> Result<Self> {
        Self::parse("recipe", source.to_string())
    }

    /// Read and parse a recipe file. Recipes without a `name` are named
    /// after the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("Failed to read recipe at {}", path.display()))?;
        let name = path.file_stem().map_or_else(
            || path.display().to_string(),
            |stem| stem.to_string_lossy().into_owned(),
        );

        Self::parse(&name, source)
    }

    fn parse(default_name: &str, source: String) -> Result<Self> {
        let config: RecipeConfig = match toml::from_str(&source) {
            Ok(config) => config,
            Err(error) => return RecipeParseDiagnostic::new(default_name, source, &error).into(),
        };

        let name = config.name.unwrap_or_else(|| default_name.to_string());
        if config.rule.is_empty() {
            return EmptyRecipeDiagnostic::new(name).into();
        }

        let rules = config
            .rule
            .into_iter()
            .enumerate()
            .map(|(i, rule)| Rule::from_config(&name, format!("rule[{i}]"), rule))
            .collect::<Result<Vec<_>>>()?;
        let skip = config
            .skip
            .filter(|skip| !skip.trim().is_empty())
            .map(Selector::from);

        debug!("loaded recipe '{name}' with {} top-level rules", rules.len());
        Ok(Self {
            name,
            max_chars: config.max_chars,
            skip,
            rules,
        })
    }

    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Leave elements matching `skip` out of extracted text.
    #[must_use]
    pub fn with_skip<S: Into<Selector>>(mut self, skip: S) -> Self {
        self.skip = Some(skip.into());
        self
    }

    #[must_use]
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Preferred output limit, in characters.
    pub fn max_chars(&self) -> Option<usize> {
        self.max_chars
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Run this recipe over `doc`. Links are resolved against `base_url`
    /// when one is given.
    pub fn extract(&self, doc: &Document, base_url: Option<&Url>) -> Extraction {
        let collector = Collector::new(self.skip.as_ref(), base_url);
        let matchers: Vec<MatcherRef<'_>> = self
            .rules
            .iter()
            .map(|rule| rule.compile(&collector, true))
            .collect();
        doc.traverse(&matchers);
        drop(matchers);

        let extraction = collector.finish(Some(self.name.clone()));
        debug!(
            "recipe '{}' matched: {}, extracted {} entries",
            self.name,
            extraction.matched,
            extraction.len()
        );
        extraction
    }
}

impl Rule {
    /// A rule backed by a [`NodeMatcher`].
    pub fn select<S: Into<Selector>>(selector: S) -> Self {
        Self {
            pattern: Pattern::Select(selector.into()),
            emit: None,
            children: Vec::new(),
        }
    }

    /// A rooted, non-recursive rule backed by a [`SequenceMatcher`].
    pub fn sequence<S: Into<String>>(pattern: S) -> Self {
        Self {
            pattern: Pattern::Sequence {
                pattern: pattern.into(),
                recursive: false,
                rooted: true,
            },
            emit: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_emit(mut self, emit: Emit) -> Self {
        self.emit = Some(emit);
        self
    }

    /// Has no effect on `select` rules.
    #[must_use]
    pub fn recursive(mut self, yes: bool) -> Self {
        if let Pattern::Sequence { recursive, .. } = &mut self.pattern {
            *recursive = yes;
        }
        self
    }

    /// Has no effect on `select` rules.
    #[must_use]
    pub fn rooted(mut self, yes: bool) -> Self {
        if let Pattern::Sequence { rooted, .. } = &mut self.pattern {
            *rooted = yes;
        }
        self
    }

    #[must_use]
    pub fn with_child(mut self, rule: Rule) -> Self {
        self.children.push(rule);
        self
    }

    pub fn emit(&self) -> Option<Emit> {
        self.emit
    }

    pub fn children(&self) -> &[Rule] {
        &self.children
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.pattern, Pattern::Sequence { .. })
    }

    fn from_config(recipe: &str, path: String, config: RuleConfig) -> Result<Self> {
        let invalid = |problem| InvalidRuleDiagnostic::new(recipe, path.as_str(), problem);

        let pattern = match (config.select, config.sequence) {
            (None, None) => return invalid(RuleProblem::MissingPattern).into(),
            (Some(_), Some(_)) => return invalid(RuleProblem::AmbiguousPattern).into(),
            (Some(select), None) => {
                if select.trim().is_empty() {
                    return invalid(RuleProblem::EmptyPattern).into();
                }
                if config.recursive.is_some() {
                    return invalid(RuleProblem::SequenceOption("recursive")).into();
                }
                if config.rooted.is_some() {
                    return invalid(RuleProblem::SequenceOption("rooted")).into();
                }
                Pattern::Select(Selector::parse(&select))
            }
            (None, Some(sequence)) => {
                if SequenceMatcher::new(&sequence).is_empty() {
                    return invalid(RuleProblem::EmptyPattern).into();
                }
                Pattern::Sequence {
                    pattern: sequence,
                    recursive: config.recursive.unwrap_or(false),
                    rooted: config.rooted.unwrap_or(true),
                }
            }
        };

        let children = config
            .rule
            .into_iter()
            .enumerate()
            .map(|(i, child)| Self::from_config(recipe, format!("{path}.rule[{i}]"), child))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            pattern,
            emit: config.emit,
            children,
        })
    }

    fn compile<'h>(&self, collector: &'h Collector<'_>, marks: bool) -> MatcherRef<'h> {
        let emit = self.emit;
        let handler = move |node: DomNode<'_>| collector.record(emit, node, marks);
        let children = self
            .children
            .iter()
            .map(|child| child.compile(collector, false));

        match &self.pattern {
            Pattern::Select(selector) => NodeMatcher::new(selector.clone())
                .on_match(handler)
                .with_children(children)
                .into_ref(),
            Pattern::Sequence {
                pattern,
                recursive,
                rooted,
            } => SequenceMatcher::new(pattern)
                .recursive(*recursive)
                .rooted(*rooted)
                .on_match(handler)
                .with_children(children)
                .into_ref(),
        }
    }
}

/// Run each recipe in turn and keep the first extraction that matched.
///
/// Returns an unmatched, empty [`Extraction`] when no recipe matches.
pub fn extract_first(recipes: &[Recipe], doc: &Document, base_url: Option<&Url>) -> Extraction {
    for recipe in recipes {
        let extraction = recipe.extract(doc, base_url);
        if extraction.matched {
            return extraction;
        }
        debug!("recipe '{}' did not match, trying next", recipe.name);
    }

    Extraction::default()
}

/// Parse and extract many HTML sources in parallel. Results are in the
/// same order as `sources`.
pub fn extract_many<S>(recipes: &[Recipe], sources: &[S], base_url: Option<&Url>) -> Vec<Extraction>
where
    S: AsRef<str> + Sync,
{
    sources
        .par_iter()
        .map(|source| extract_first(recipes, &Document::parse(source.as_ref()), base_url))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    const GODOC_RECIPE: &str = r#"
name = "godoc"
max_chars = 20000
skip = "span.Documentation-sinceVersion"

[[rule]]
select = "div.Documentation"
emit   = "mark"

  [[rule.rule]]
  select = "h1,h2,h3"
  emit   = "heading"

  [[rule.rule]]
  sequence  = "ul > li"
  recursive = true
  rooted    = false
  emit      = "item"

  [[rule.rule]]
  select = "pre"
  emit   = "code"
"#;

    const GODOC_PAGE: &str = r##"
<html><body>
<header><h1>pkg.go.dev</h1></header>
<div class="Documentation">
  <h2>Overview <a aria-label="Go to Overview" href="#pkg-overview">¶</a></h2>
  <ul>
    <li>Constants</li>
    <li>Functions
      <ul><li>func Valid <span class="Documentation-sinceVersion">added in go1.9</span></li></ul>
    </li>
  </ul>
  <pre>json.Valid(data)
</pre>
</div>
</body></html>
"##;

    fn problem(source: &str) -> (RuleProblem, String) {
        let err = Recipe::from_toml(source).unwrap_err();
        let diagnostic = err
            .downcast_ref::<InvalidRuleDiagnostic>()
            .unwrap_or_else(|| panic!("expected an invalid rule diagnostic, got {err:?}"));
        (diagnostic.problem(), diagnostic.path().to_string())
    }

    #[test]
    fn test_parse_recipe() {
        let recipe = Recipe::from_toml(GODOC_RECIPE).unwrap();
        assert_eq!(recipe.name(), "godoc");
        assert_eq!(recipe.max_chars(), Some(20000));
        assert_eq!(recipe.rules().len(), 1);

        let root = &recipe.rules()[0];
        assert_eq!(root.emit(), Some(Emit::Mark));
        assert!(!root.is_sequence());
        assert_eq!(root.children().len(), 3);
        assert!(root.children()[1].is_sequence());
    }

    #[test]
    fn test_unnamed_recipe() {
        let recipe = Recipe::from_toml("[[rule]]\nselect = 'p'").unwrap();
        assert_eq!(recipe.name(), "recipe");
        assert_eq!(recipe.max_chars(), None);
    }

    #[test]
    fn test_extract() {
        let recipe = Recipe::from_toml(GODOC_RECIPE).unwrap();
        let doc = Document::parse(GODOC_PAGE);
        let extraction = recipe.extract(&doc, None);

        assert!(extraction.matched);
        assert_eq!(extraction.recipe.as_deref(), Some("godoc"));
        let summary: Vec<_> = extraction
            .extracts
            .iter()
            .map(|extract| (extract.kind, extract.depth, extract.text.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Emit::Heading, 2, "Overview"),
                (Emit::Item, 0, "Constants"),
                (Emit::Item, 0, "Functions func Valid"),
                (Emit::Item, 1, "func Valid"),
                (Emit::Code, 0, "json.Valid(data)\n"),
            ]
        );
    }

    #[test]
    fn test_unmatched_document() {
        let recipe = Recipe::from_toml(GODOC_RECIPE).unwrap();
        let doc = Document::parse("<h1>Title</h1><ul><li>item</li></ul>");
        let extraction = recipe.extract(&doc, None);
        assert!(!extraction.matched);
        assert!(extraction.is_empty());
    }

    #[test]
    fn test_fallback_chaining() {
        let godoc = Recipe::from_toml(GODOC_RECIPE).unwrap();
        let readme = Recipe::new("readme")
            .with_rule(Rule::select("article").with_child(Rule::select("p").with_emit(Emit::Text)));

        let doc = Document::parse("<article><p>Read me</p></article>");
        let extraction = extract_first(&[godoc.clone(), readme.clone()], &doc, None);
        assert!(extraction.matched);
        assert_eq!(extraction.recipe.as_deref(), Some("readme"));
        assert_eq!(extraction.extracts[0].text, "Read me");

        let doc = Document::parse(GODOC_PAGE);
        let extraction = extract_first(&[godoc, readme], &doc, None);
        assert_eq!(extraction.recipe.as_deref(), Some("godoc"));

        let extraction = extract_first(&[], &doc, None);
        assert!(!extraction.matched);
        assert_eq!(extraction.recipe, None);
    }

    #[test]
    fn test_extract_many_keeps_order() {
        let recipe = Recipe::new("paragraphs").with_rule(Rule::select("p").with_emit(Emit::Text));
        let sources: Vec<String> = (0..32).map(|i| format!("<p>doc {i}</p>")).collect();

        let extractions = extract_many(&[recipe], &sources, None);
        assert_eq!(extractions.len(), 32);
        for (i, extraction) in extractions.iter().enumerate() {
            assert_eq!(extraction.extracts[0].text, format!("doc {i}"));
        }
    }

    #[test]
    fn test_sequence_builder_options() {
        let doc = Document::parse("<ul><li>A<ul><li>B</li></ul></li><li>C</li></ul>");
        let run = |rule: Rule| {
            Recipe::new("list")
                .with_rule(rule.with_emit(Emit::Item))
                .extract(&doc, None)
                .extracts
                .len()
        };

        assert_eq!(run(Rule::sequence("ul > li")), 3);
        assert_eq!(run(Rule::sequence("ul > li").rooted(false)), 2);
        assert_eq!(run(Rule::sequence("ul > li").recursive(true).rooted(false)), 3);
        assert_eq!(run(Rule::sequence("ul > li").recursive(true)), 4);
        // `li` alone never advances past the first list item
        assert_eq!(run(Rule::select("li").recursive(true)), 2);
    }

    #[test]
    fn test_missing_pattern() {
        let (problem, path) = problem("[[rule]]\nemit = 'text'");
        assert_eq!(problem, RuleProblem::MissingPattern);
        assert_eq!(path, "rule[0]");
    }

    #[test]
    fn test_ambiguous_pattern() {
        let (problem, _) = problem("[[rule]]\nselect = 'p'\nsequence = 'ul > li'");
        assert_eq!(problem, RuleProblem::AmbiguousPattern);
    }

    #[test]
    fn test_empty_pattern() {
        let (problem, _) = problem("[[rule]]\nselect = '  '");
        assert_eq!(problem, RuleProblem::EmptyPattern);

        let (problem, _) = self::problem("[[rule]]\nsequence = ' > '");
        assert_eq!(problem, RuleProblem::EmptyPattern);
    }

    #[test]
    fn test_sequence_options_on_select_rule() {
        let (problem, path) = problem(
            "[[rule]]\nselect = 'div'\n\n[[rule.rule]]\nselect = 'p'\n\n[[rule.rule]]\nselect = 'li'\nrecursive = true",
        );
        assert_eq!(problem, RuleProblem::SequenceOption("recursive"));
        assert_eq!(path, "rule[0].rule[1]");

        let (problem, _) = self::problem("[[rule]]\nselect = 'li'\nrooted = false");
        assert_eq!(problem, RuleProblem::SequenceOption("rooted"));
    }

    #[test]
    fn test_empty_recipe() {
        let err = Recipe::from_toml("name = 'nothing'").unwrap_err();
        assert!(err.downcast_ref::<EmptyRecipeDiagnostic>().is_some());
        assert_eq!(err.to_string(), "Recipe 'nothing' has no rules");
    }

    #[test]
    fn test_syntax_error() {
        let err = Recipe::from_toml("[[rule]\nselect = 'p'").unwrap_err();
        assert!(err.downcast_ref::<RecipeParseDiagnostic>().is_some());

        let err = Recipe::from_toml("[[rule]]\nselector = 'p'").unwrap_err();
        assert!(err.downcast_ref::<RecipeParseDiagnostic>().is_some());

        let err = Recipe::from_toml("[[rule]]\nselect = 'p'\nemit = 'bold'").unwrap_err();
        assert!(err.downcast_ref::<RecipeParseDiagnostic>().is_some());
    }

    #[test]
    fn test_missing_file() {
        let err = Recipe::from_file("does/not/exist.toml").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.toml"));
    }
}
