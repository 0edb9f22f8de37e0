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
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::recipe::Extraction;

#[derive(Debug, Default)]
pub(super) struct Statistics {
    documents: AtomicUsize,
    matched: AtomicUsize,
    extracts: AtomicUsize,
    truncated: AtomicUsize,
}

impl Statistics {
    pub fn record(&self, extraction: &Extraction, truncated: bool) {
        self.documents.fetch_add(1, Ordering::Relaxed);
        self.extracts.fetch_add(extraction.len(), Ordering::Relaxed);
        if extraction.matched {
            self.matched.fetch_add(1, Ordering::Relaxed);
        }
        if truncated {
            self.truncated.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn documents(&self) -> usize {
        self.documents.load(Ordering::SeqCst)
    }

    #[inline]
    pub fn matched(&self) -> usize {
        self.matched.load(Ordering::SeqCst)
    }

    #[inline]
    pub fn extracts(&self) -> usize {
        self.extracts.load(Ordering::SeqCst)
    }

    #[inline]
    pub fn truncated(&self) -> usize {
        self.truncated.load(Ordering::SeqCst)
    }
}
