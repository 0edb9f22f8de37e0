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

/// A multi-step matcher for patterns like `ul > li > ol > li`.
///
/// Each step is a [`Selector`]; steps are separated by `>` or whitespace.
/// Like every other matcher, a step that does not match is carried down, so
/// steps may be separated by any number of intermediate elements.
///
/// The handler fires only when the last step matches. Children added with
/// [`with_child`](Self::with_child) apply beneath the element that
/// completed the sequence.
///
/// - A *rooted* sequence (the default) restarts from its first step
///   beneath every element it advances through, so independent instances
///   of the pattern are found anywhere below the starting point.
/// - A *recursive* sequence restarts beneath the element that completed it,
///   so nested instances are matched again (a `ul > li` inside an `li`).
///   A recursive sequence does not also add a rooted restart on completion.
///
/// This type is the configuration; [`into_ref`](Self::into_ref) produces the
/// matcher at its first step. Advancing never mutates a matcher, it
/// allocates a new one, so the same sequence can be active at many tree
/// positions at once.
pub struct SequenceMatcher<'h> {
    source: String,
    steps: Vec<Selector>,
    handler: Option<Handler<'h>>,
    recursive: bool,
    rooted: bool,
    children: Vec<MatcherRef<'h>>,
}

impl<'h> SequenceMatcher<'h> {
    pub fn new(pattern: &str) -> Self {
        let steps = pattern
            .split(|c: char| c == '>' || c.is_whitespace())
            .filter(|step| !step.is_empty())
            .map(Selector::parse)
            .collect();

        Self {
            source: pattern.to_string(),
            steps,
            handler: None,
            recursive: false,
            rooted: true,
            children: Vec::new(),
        }
    }

    /// Match the sequence again beneath the element that completed it.
    ///
    /// Default `false`
    #[must_use]
    pub fn recursive(mut self, yes: bool) -> Self {
        self.recursive = yes;
        self
    }

    /// Restart the sequence beneath every element it advances through.
    ///
    /// Default `true`
    #[must_use]
    pub fn rooted(mut self, yes: bool) -> Self {
        self.rooted = yes;
        self
    }

    /// Set the callback fired when the last step matches.
    #[must_use]
    pub fn on_match<F>(mut self, handler: F) -> Self
    where
        F: Fn(DomNode<'_>) + 'h,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Add a matcher to apply beneath elements that complete the sequence.
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

    /// Number of steps in the sequence.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The matcher for this sequence's first step.
    pub fn into_ref(self) -> MatcherRef<'h> {
        let is_root = self.rooted;
        Rc::new(SequenceStep {
            sequence: Rc::new(self),
            step: 0,
            is_root,
        })
    }
}

impl<'h> From<SequenceMatcher<'h>> for MatcherRef<'h> {
    fn from(matcher: SequenceMatcher<'h>) -> Self {
        matcher.into_ref()
    }
}

impl fmt::Debug for SequenceMatcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceMatcher")
            .field("pattern", &self.source)
            .field("steps", &self.steps.len())
            .field("recursive", &self.recursive)
            .field("rooted", &self.rooted)
            .field("children", &self.children.len())
            .finish()
    }
}

/// A [`SequenceMatcher`] positioned at one of its steps.
struct SequenceStep<'h> {
    sequence: Rc<SequenceMatcher<'h>>,
    step: usize,
    is_root: bool,
}

impl<'h> SequenceStep<'h> {
    #[inline]
    fn is_last(&self) -> bool {
        self.step + 1 == self.sequence.steps.len()
    }

    fn at(&self, step: usize, is_root: bool) -> MatcherRef<'h> {
        Rc::new(Self {
            sequence: Rc::clone(&self.sequence),
            step,
            is_root,
        })
    }
}

impl<'h> Matcher<'h> for SequenceStep<'h> {
    fn is_match(&self, node: DomNode<'_>) -> bool {
        // a consumed sequence never matches
        self.sequence
            .steps
            .get(self.step)
            .is_some_and(|selector| selector.matches(node))
    }

    fn handle(&self, node: DomNode<'_>) {
        if !self.is_last() {
            return;
        }
        if let Some(handler) = &self.sequence.handler {
            handler(node);
        }
    }

    fn next_matchers(&self) -> Cow<'_, [MatcherRef<'h>]> {
        if self.step >= self.sequence.steps.len() {
            return Cow::Owned(Vec::new());
        }

        if !self.is_last() {
            let mut next = Vec::with_capacity(2);
            next.push(self.at(self.step + 1, false));
            if self.is_root {
                next.push(self.at(0, true));
            }
            return Cow::Owned(next);
        }

        let mut next = Vec::with_capacity(self.sequence.children.len() + 1);
        next.extend(self.sequence.children.iter().cloned());
        if self.sequence.recursive {
            next.push(self.at(0, false));
        } else if self.is_root {
            next.push(self.at(0, true));
        }
        Cow::Owned(next)
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;

    use super::*;
    use crate::{
        dom::{inner_text, Document},
        query::NodeMatcher,
    };

    fn items<'h>(log: &'h RefCell<Vec<String>>) -> impl Fn(DomNode<'_>) + 'h {
        move |node| log.borrow_mut().push(inner_text(node, false))
    }

    #[test]
    fn test_parse_steps() {
        assert_eq!(SequenceMatcher::new("ul > li > ol > li").len(), 4);
        assert_eq!(SequenceMatcher::new("ul>li").len(), 2);
        assert_eq!(SequenceMatcher::new("  div.content   p ").len(), 2);
        assert_eq!(SequenceMatcher::new("ul,ol > li").len(), 2);
        assert!(SequenceMatcher::new(" > ").is_empty());
    }

    #[test]
    fn test_fires_on_last_step_only() {
        let doc = Document::parse("<ul><li>A</li><li>B</li></ul>");
        let log = RefCell::default();
        let matcher = SequenceMatcher::new("ul > li").on_match(items(&log)).into_ref();

        doc.traverse(&[matcher]);
        assert_eq!(log.into_inner(), vec!["A", "B"]);
    }

    #[test]
    fn test_three_siblings_at_top_level() {
        let doc = Document::parse_fragment("<li>1</li><li>2</li><li>3</li>");
        let log = RefCell::default();
        let matcher = SequenceMatcher::new("li").on_match(items(&log)).into_ref();

        doc.traverse(&[matcher]);
        assert_eq!(log.into_inner(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_rooted_restart_finds_later_lists() {
        let doc = Document::parse(
            "<ul><li>A</li></ul><div><ul><li>B</li></ul></div><ul><li>C</li><li>D</li></ul>",
        );
        let log = RefCell::default();
        let matcher = SequenceMatcher::new("ul > li").on_match(items(&log)).into_ref();

        doc.traverse(&[matcher]);
        assert_eq!(log.into_inner(), vec!["A", "B", "C", "D"]);
    }

    const NESTED: &str = "<ul><li>A<ul><li>B</li></ul></li><li>C</li></ul>";

    #[test]
    fn test_recursive_unrooted() {
        let doc = Document::parse(NESTED);
        let log = RefCell::default();
        let matcher = SequenceMatcher::new("ul > li")
            .recursive(true)
            .rooted(false)
            .on_match(items(&log))
            .into_ref();

        doc.traverse(&[matcher]);
        assert_eq!(log.into_inner(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_unrooted_without_recursion_stops_after_completion() {
        let doc = Document::parse(NESTED);
        let log = RefCell::default();
        let matcher = SequenceMatcher::new("ul > li")
            .rooted(false)
            .on_match(items(&log))
            .into_ref();

        doc.traverse(&[matcher]);
        assert_eq!(log.into_inner(), vec!["A", "C"]);
    }

    #[test]
    fn test_recursive_rooted() {
        // The nested list is reached both by the recursive restart and by the
        // rooted restart; they are separate matchers, so both fire.
        let doc = Document::parse(NESTED);
        let log = RefCell::default();
        let matcher = SequenceMatcher::new("ul > li")
            .recursive(true)
            .on_match(items(&log))
            .into_ref();

        doc.traverse(&[matcher]);
        assert_eq!(log.into_inner(), vec!["A", "B", "B", "C"]);
    }

    #[test]
    fn test_children_apply_after_completion() {
        let doc = Document::parse(
            "<dl><dt>sig</dt><dd><p>one</p></dd></dl><p>outside</p><dd><p>two</p></dd>",
        );
        let log = RefCell::default();
        let matcher = SequenceMatcher::new("dl > dd")
            .with_child(NodeMatcher::new("p").on_match(items(&log)))
            .into_ref();

        doc.traverse(&[matcher]);
        assert_eq!(log.into_inner(), vec!["one"]);
    }

    #[test]
    fn test_next_matchers_are_fresh_instances() {
        let matcher = SequenceMatcher::new("ul > li").into_ref();

        let first = matcher.next_matchers().into_owned();
        let second = matcher.next_matchers().into_owned();
        assert_eq!(first.len(), 2, "advanced step and rooted restart");
        for (a, b) in first.iter().zip(&second) {
            assert!(!Rc::ptr_eq(a, b));
        }
        assert!(!Rc::ptr_eq(&first[0], &matcher));
        assert!(!Rc::ptr_eq(&first[1], &matcher));

        // last step, not recursive, not rooted: nothing to carry on
        let last = first[0].next_matchers();
        assert!(last.is_empty());

        // the rooted restart starts over like the original
        let restart_advanced = first[1].next_matchers().into_owned();
        assert_eq!(restart_advanced.len(), 2);
    }

    #[test]
    fn test_empty_sequence_never_matches() {
        let doc = Document::parse("<ul><li>A</li></ul>");
        let log = RefCell::default();
        let matcher = SequenceMatcher::new("").on_match(items(&log)).into_ref();

        doc.traverse(&[matcher]);
        assert!(log.borrow().is_empty());
    }
}
