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
    cell::{Cell, RefCell},
    fmt,
};

use log::trace;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    dom::{
        href, inner_text_with, raw_inner_text_with, resolve_href, skip_labelled_anchor, tag_name,
        DomNode,
    },
    select::Selector,
};

/// What a rule records about the elements it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emit {
    /// Record only that the document matched.
    Mark,
    /// Whitespace-collapsed text, including nested elements.
    Text,
    /// Text exactly as written in the source.
    Raw,
    /// Like [`Emit::Raw`], rendered as a code block.
    Code,
    /// Text of an `h1`..`h6`; the level is kept in [`Extract::depth`].
    Heading,
    /// A list item, nested [`Extract::depth`] lists deep.
    Item,
    /// Text plus the element's `href`.
    Link,
}

impl Emit {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mark => "mark",
            Self::Text => "text",
            Self::Raw => "raw",
            Self::Code => "code",
            Self::Heading => "heading",
            Self::Item => "item",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for Emit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A piece of content pulled from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extract {
    pub kind: Emit,
    /// Tag name of the element the text came from.
    pub tag: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Heading level for headings, list nesting for items, `0` otherwise.
    pub depth: usize,
}

/// Everything a recipe pulled from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// Name of the recipe that produced this extraction.
    pub recipe: Option<String>,
    /// Whether any top-level rule (or `mark` rule) fired.
    pub matched: bool,
    pub extracts: Vec<Extract>,
}

impl Extraction {
    #[inline]
    pub fn len(&self) -> usize {
        self.extracts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extracts.is_empty()
    }
}

/// Accumulator shared by every handler of one compiled recipe.
pub(super) struct Collector<'a> {
    extracts: RefCell<Vec<Extract>>,
    matched: Cell<bool>,
    skip: Option<&'a Selector>,
    base_url: Option<&'a Url>,
}

impl<'a> Collector<'a> {
    pub fn new(skip: Option<&'a Selector>, base_url: Option<&'a Url>) -> Self {
        Self {
            extracts: RefCell::default(),
            matched: Cell::new(false),
            skip,
            base_url,
        }
    }

    pub fn record(&self, emit: Option<Emit>, node: DomNode<'_>, marks: bool) {
        if marks || emit == Some(Emit::Mark) {
            self.matched.set(true);
        }
        let Some(emit) = emit else {
            return;
        };
        if let Some(extract) = self.extract(emit, node) {
            self.extracts.borrow_mut().push(extract);
        }
    }

    pub fn finish(self, recipe: Option<String>) -> Extraction {
        Extraction {
            recipe,
            matched: self.matched.get(),
            extracts: self.extracts.into_inner(),
        }
    }

    fn extract(&self, kind: Emit, node: DomNode<'_>) -> Option<Extract> {
        let tag = tag_name(node)?;
        let skip = |child: DomNode<'_>| {
            skip_labelled_anchor(child) || self.skip.is_some_and(|skip| skip.matches(child))
        };

        let (text, href, depth) = match kind {
            Emit::Mark => return None,
            Emit::Text => (inner_text_with(node, true, skip), None, 0),
            Emit::Raw | Emit::Code => (raw_inner_text_with(node, true, skip), None, 0),
            Emit::Heading => (inner_text_with(node, true, skip), None, heading_level(tag)),
            Emit::Item => (inner_text_with(node, true, skip), None, list_depth(node)),
            Emit::Link => (inner_text_with(node, true, skip), self.link(node), 0),
        };

        if text.trim().is_empty() {
            trace!("skipping empty {kind} from <{tag}>");
            return None;
        }

        Some(Extract {
            kind,
            tag: tag.to_string(),
            text,
            href,
            depth,
        })
    }

    fn link(&self, node: DomNode<'_>) -> Option<String> {
        match self.base_url {
            Some(base) => resolve_href(node, base).map(String::from),
            None => href(node)
                .filter(|link| !link.is_empty())
                .map(str::to_string),
        }
    }
}

/// `h3` -> 3. Anything else is a top-level heading.
fn heading_level(tag: &str) -> usize {
    tag.strip_prefix('h')
        .and_then(|level| level.parse().ok())
        .filter(|level| (1..=6).contains(level))
        .unwrap_or(1)
}

/// Number of lists enclosing `node`, not counting its own.
fn list_depth(node: DomNode<'_>) -> usize {
    node.ancestors()
        .filter(|ancestor| matches!(tag_name(*ancestor), Some("ul" | "ol")))
        .count()
        .saturating_sub(1)
}
