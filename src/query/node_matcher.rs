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
use std::{borrow::Cow, fmt, rc::Rc};

use super::{Handler, Matcher, MatcherRef};
use crate::{dom::DomNode, select::Selector};

/// A matcher with a fixed selector and a fixed set of children.
///
/// Holds no mutable state, so one instance can be shared between parents,
/// reused across traversals, and applied at many tree positions at once.
pub struct NodeMatcher<'h> {
    selector: Selector,
    handler: Option<Handler<'h>>,
    children: Vec<MatcherRef<'h>>,
}

impl<'h> NodeMatcher<'h> {
    pub fn new<S: Into<Selector>>(selector: S) -> Self {
        Self {
            selector: selector.into(),
            handler: None,
            children: Vec::new(),
        }
    }

    /// Set the callback fired for every element this matcher matches.
    #[must_use]
    pub fn on_match<F>(mut self, handler: F) -> Self
    where
        F: Fn(DomNode<'_>) + 'h,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Add a matcher to apply beneath matched elements.
    ///
    /// Accepts a built matcher or a shared [`MatcherRef`]. Pass clones of the
    /// same [`MatcherRef`] to several parents to have it apply only once
    /// where those parents overlap.
    #[must_use]
    pub fn with_child<M: Into<MatcherRef<'h>>>(mut self, child: M) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<MatcherRef<'h>>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Move this matcher into a shared [`MatcherRef`].
    pub fn into_ref(self) -> MatcherRef<'h> {
        Rc::new(self)
    }
}

impl<'h> Matcher<'h> for NodeMatcher<'h> {
    #[inline]
    fn is_match(&self, node: DomNode<'_>) -> bool {
        self.selector.matches(node)
    }

    fn handle(&self, node: DomNode<'_>) {
        if let Some(handler) = &self.handler {
            handler(node);
        }
    }

    fn next_matchers(&self) -> Cow<'_, [MatcherRef<'h>]> {
        Cow::Borrowed(&self.children)
    }
}

impl<'h> From<NodeMatcher<'h>> for MatcherRef<'h> {
    fn from(matcher: NodeMatcher<'h>) -> Self {
        matcher.into_ref()
    }
}

impl fmt::Debug for NodeMatcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeMatcher")
            .field("selector", &self.selector.as_str())
            .field("has_handler", &self.handler.is_some())
            .field("children", &self.children.len())
            .finish()
    }
}
