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
mod find;
mod text;

use std::fmt;

use ego_tree::NodeRef;
use log::trace;
use scraper::{Html, Node};

use crate::query::{traverse, MatcherRef};

pub use find::{find_all, find_direct_child, find_one, has_child};
pub use text::{
    href, inner_text, inner_text_with, raw_inner_text, raw_inner_text_with, resolve_href,
    skip_labelled_anchor,
};

/// A borrowed node in a parsed document.
///
/// Nodes are `Copy` and never mutated; the [`Document`] owns the tree.
pub type DomNode<'dom> = NodeRef<'dom, Node>;

/// A parsed HTML document.
pub struct Document {
    dom: Html,
}

impl Document {
    /// Parse a complete HTML document. Parsing is lenient and never fails;
    /// malformed markup is repaired the way a browser would.
    pub fn parse(html: &str) -> Self {
        let dom = Html::parse_document(html);
        if !dom.errors.is_empty() {
            trace!("parsed document with {} recoverable errors", dom.errors.len());
        }
        Self { dom }
    }

    /// Parse an HTML fragment. Elements are wrapped in an `<html>` element
    /// under the root.
    pub fn parse_fragment(html: &str) -> Self {
        Self {
            dom: Html::parse_fragment(html),
        }
    }

    /// The document (or fragment) node at the top of the tree.
    #[inline]
    pub fn root(&self) -> DomNode<'_> {
        self.dom.tree.root()
    }

    /// Run `matchers` over the whole document. See [`traverse`].
    pub fn traverse<'h>(&self, matchers: &[MatcherRef<'h>]) {
        traverse(self.root(), matchers);
    }

    /// First element in the document matching `pattern`, in document order.
    pub fn find_one(&self, pattern: &str) -> Option<DomNode<'_>> {
        find_one(self.root(), pattern)
    }

    /// Every element in the document matching `pattern`, in document order.
    pub fn find_all(&self, pattern: &str) -> Vec<DomNode<'_>> {
        find_all(self.root(), pattern)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.root().descendants().count())
            .finish()
    }
}

impl From<Html> for Document {
    fn from(dom: Html) -> Self {
        Self { dom }
    }
}

/// Tag name of `node`, if it is an element.
#[inline]
pub fn tag_name<'dom>(node: DomNode<'dom>) -> Option<&'dom str> {
    node.value().as_element().map(|element| element.name())
}

/// Value of the first `name` attribute on `node`, if it is an element.
#[inline]
pub fn attr<'dom>(node: DomNode<'dom>, name: &str) -> Option<&'dom str> {
    node.value().as_element().and_then(|element| element.attr(name))
}
