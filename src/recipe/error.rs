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
use miette::{self, Diagnostic, NamedSource, Result, SourceSpan};
use thiserror::{self, Error};

#[derive(Debug, Error, Diagnostic)]
#[error("Failed to parse recipe '{name}': {message}")]
#[diagnostic(code(docquery::recipe::parse))]
pub struct RecipeParseDiagnostic {
    name: String,
    message: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("here")]
    span: Option<SourceSpan>,
}
impl RecipeParseDiagnostic {
    pub fn new(name: &str, source: String, error: &toml::de::Error) -> Self {
        Self {
            name: name.to_string(),
            message: error.message().to_string(),
            source_code: NamedSource::new(name, source),
            span: error.span().map(SourceSpan::from),
        }
    }
}
impl<T> From<RecipeParseDiagnostic> for Result<T> {
    fn from(val: RecipeParseDiagnostic) -> Self {
        Err(val.into())
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("Recipe '{name}' has no rules")]
#[diagnostic(
    code(docquery::recipe::empty),
    help("Add at least one [[rule]] table with a `select` or `sequence` pattern.")
)]
pub struct EmptyRecipeDiagnostic {
    name: String,
}
impl EmptyRecipeDiagnostic {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }
}
impl<T> From<EmptyRecipeDiagnostic> for Result<T> {
    fn from(val: EmptyRecipeDiagnostic) -> Self {
        Err(val.into())
    }
}

/// What is wrong with a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleProblem {
    #[error("has neither a `select` nor a `sequence` pattern")]
    MissingPattern,
    #[error("has both a `select` and a `sequence` pattern")]
    AmbiguousPattern,
    #[error("has an empty pattern")]
    EmptyPattern,
    #[error("sets `{0}`, which only applies to `sequence` rules")]
    SequenceOption(&'static str),
}

impl RuleProblem {
    fn help(self) -> &'static str {
        match self {
            Self::MissingPattern | Self::AmbiguousPattern => {
                "Use `select` for a single-step selector or `sequence` for a `ul > li` style chain."
            }
            Self::EmptyPattern => "Patterns need at least one tag, class, id or attribute.",
            Self::SequenceOption(_) => "Replace `select` with `sequence`, or drop the option.",
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("Rule {path} in recipe '{recipe}' {problem}")]
#[diagnostic(code(docquery::recipe::invalid_rule))]
pub struct InvalidRuleDiagnostic {
    recipe: String,
    /// Position of the rule, e.g. `rule[0].rule[2]`.
    path: String,
    problem: RuleProblem,
    #[help]
    help: Option<String>,
}
impl InvalidRuleDiagnostic {
    pub fn new<S: Into<String>>(recipe: &str, path: S, problem: RuleProblem) -> Self {
        Self {
            recipe: recipe.to_string(),
            path: path.into(),
            problem,
            help: Some(problem.help().to_string()),
        }
    }

    pub fn problem(&self) -> RuleProblem {
        self.problem
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}
impl<T> From<InvalidRuleDiagnostic> for Result<T> {
    fn from(val: InvalidRuleDiagnostic) -> Self {
        Err(val.into())
    }
}
