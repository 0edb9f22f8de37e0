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

//! Declarative document traversal.
//!
//! A query is a tree of [`Matcher`]s. [`traverse`] walks a document once,
//! testing each element against the matchers active at its level. When a
//! matcher matches, its handler fires and its [`next_matchers`] replace it
//! for that element's subtree. Matchers that do not match are carried down
//! unchanged, so they keep searching deeper. The structure of the matcher
//! tree is thereby preserved in the document tree.
//!
//! ```
//! use std::cell::RefCell;
//! use docquery::{dom::{inner_text, Document}, query::NodeMatcher};
//!
//! let doc = Document::parse(r#"<div class="Documentation"><h1>Title</h1></div><h1>Other</h1>"#);
//! let headings = RefCell::new(vec![]);
//!
//! let root = NodeMatcher::new("div.Documentation")
//!     .with_child(NodeMatcher::new("h1").on_match(|node| {
//!         headings.borrow_mut().push(inner_text(node, true));
//!     }))
//!     .into_ref();
//! doc.traverse(&[root]);
//!
//! assert_eq!(headings.into_inner(), vec!["Title"]);
//! ```
//!
//! [`next_matchers`]: Matcher::next_matchers
mod node_matcher;
mod sequence;
mod set;

use std::{borrow::Cow, rc::Rc};

use crate::dom::DomNode;
use set::MatcherSet;

pub use node_matcher::NodeMatcher;
pub use sequence::SequenceMatcher;

/// A shared handle to a matcher. Identity (the allocation) matters: the
/// same handle reached through two paths is only applied once per element.
pub type MatcherRef<'h> = Rc<dyn Matcher<'h> + 'h>;

/// Callback fired when a matcher matches an element.
///
/// `'h` is the lifetime of whatever the handler borrows, typically an
/// accumulator owned by the caller.
pub type Handler<'h> = Box<dyn Fn(DomNode<'_>) + 'h>;

pub trait Matcher<'h> {
    /// Check if this matcher applies to `node`. Must be free of side effects.
    fn is_match(&self, node: DomNode<'_>) -> bool;

    /// Called by [`traverse`] only after [`Matcher::is_match`] returned
    /// `true` for `node`.
    fn handle(&self, node: DomNode<'_>);

    /// Matchers to apply to the children of a node this matcher matched.
    fn next_matchers(&self) -> Cow<'_, [MatcherRef<'h>]>;
}

/// Apply `matchers` to the subtree under `node`.
///
/// Each direct child element is tested against every active matcher, in
/// order. On a match the handler fires and the matcher's
/// [`next_matchers`](Matcher::next_matchers) are merged into the set for
/// the child's subtree; otherwise the matcher itself is carried down. The
/// merged set is de-duplicated by identity, keeping first-seen order. A
/// child whose merged set is empty is not descended into.
///
/// Non-element nodes are skipped. Handlers fire in document order, and every
/// element is visited at most once per call.
pub fn traverse<'h>(node: DomNode<'_>, matchers: &[MatcherRef<'h>]) {
    for child in node.children() {
        if !child.value().is_element() {
            continue;
        }

        let mut next = MatcherSet::with_capacity(matchers.len());
        for matcher in matchers {
            if matcher.is_match(child) {
                matcher.handle(child);
                next.extend(matcher.next_matchers().iter());
            } else {
                next.insert(matcher);
            }
        }

        if next.is_empty() {
            continue;
        }
        traverse(child, next.as_slice());
    }
}
