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
use std::rc::Rc;

use rustc_hash::FxHashSet;

use super::MatcherRef;

/// Ordered set of matchers, unique by allocation.
///
/// Two matchers with identical contents but separate allocations are
/// distinct members.
pub(super) struct MatcherSet<'h> {
    matchers: Vec<MatcherRef<'h>>,
    seen: FxHashSet<*const ()>,
}

impl<'h> MatcherSet<'h> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            matchers: Vec::with_capacity(capacity),
            seen: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Add `matcher` unless the same allocation is already present.
    pub fn insert(&mut self, matcher: &MatcherRef<'h>) {
        // Only the data pointer identifies the allocation; vtable pointers
        // are not guaranteed unique.
        let key = Rc::as_ptr(matcher) as *const ();
        if self.seen.insert(key) {
            self.matchers.push(Rc::clone(matcher));
        }
    }

    pub fn extend<'m, I>(&mut self, matchers: I)
    where
        'h: 'm,
        I: IntoIterator<Item = &'m MatcherRef<'h>>,
    {
        for matcher in matchers {
            self.insert(matcher);
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[MatcherRef<'h>] {
        &self.matchers
    }
}
