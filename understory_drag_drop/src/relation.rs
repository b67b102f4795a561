// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial relations: ancestry walks and overlap resolution between drop targets.
//!
//! ## Ancestry
//!
//! [`is_ancestor`] walks parent links upward from a node and reports whether a
//! candidate is reached. A node is never its own ancestor. [`ancestors`]
//! exposes the same walk as an iterator for callers that need to search the
//! chain for something else (for example a registered participant).
//!
//! ## Overlap
//!
//! When several drop targets report the pointer inside their zone, the
//! coordinator folds them left to right with [`resolve_overlap`]:
//!
//! 1) The strictly higher [`OverlapCandidate::priority`] wins.
//! 2) On a tie, a candidate that is an ancestor of the other loses (the deeper,
//!    more specific node wins).
//! 3) Otherwise the first argument (the one seen first) wins.
//!
//! ```
//! use understory_drag_drop::relation::{OverlapCandidate, resolve_overlap};
//!
//! // 2 is a child of 1.
//! let parent = |n: &u32| (*n == 2).then_some(1);
//!
//! let outer = OverlapCandidate { node: 1, priority: 0 };
//! let inner = OverlapCandidate { node: 2, priority: 0 };
//! assert_eq!(resolve_overlap(outer, inner, &parent), inner);
//! assert_eq!(resolve_overlap(inner, outer, &parent), inner);
//!
//! // Priority beats depth.
//! let raised = OverlapCandidate { node: 1, priority: 5 };
//! assert_eq!(resolve_overlap(raised, inner, &parent), raised);
//! ```

use crate::host::ParentLookup;

/// Iterator over the ancestors of a node, nearest first.
#[derive(Debug)]
pub struct Ancestors<'a, K, P: ?Sized> {
    lookup: &'a P,
    next: Option<K>,
}

impl<K, P> Iterator for Ancestors<'_, K, P>
where
    P: ParentLookup<K> + ?Sized,
{
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let current = self.next.take()?;
        self.next = self.lookup.parent_of(&current);
        Some(current)
    }
}

/// Walk the ancestors of `node`, starting with its parent.
pub fn ancestors<'a, K, P>(lookup: &'a P, node: &K) -> Ancestors<'a, K, P>
where
    P: ParentLookup<K> + ?Sized,
{
    Ancestors {
        lookup,
        next: lookup.parent_of(node),
    }
}

/// Returns `true` if `candidate` is a strict ancestor of `node`.
pub fn is_ancestor<K, P>(lookup: &P, candidate: &K, node: &K) -> bool
where
    K: PartialEq,
    P: ParentLookup<K> + ?Sized,
{
    ancestors(lookup, node).any(|a| a == *candidate)
}

/// A drop target competing for the pointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverlapCandidate<K> {
    /// The target's node.
    pub node: K,
    /// Declared visibility priority; higher wins.
    pub priority: i32,
}

/// Pick the winner between two overlapping drop targets.
///
/// See the [module docs](self) for the ordering rules.
pub fn resolve_overlap<K, P>(
    first: OverlapCandidate<K>,
    second: OverlapCandidate<K>,
    lookup: &P,
) -> OverlapCandidate<K>
where
    K: PartialEq,
    P: ParentLookup<K> + ?Sized,
{
    if first.priority != second.priority {
        return if first.priority > second.priority {
            first
        } else {
            second
        };
    }
    if is_ancestor(lookup, &first.node, &second.node) {
        second
    } else {
        first
    }
}

/// Fold candidates in iteration order with [`resolve_overlap`].
///
/// Returns `None` for an empty input.
pub fn best_candidate<K, P>(
    candidates: impl IntoIterator<Item = OverlapCandidate<K>>,
    lookup: &P,
) -> Option<OverlapCandidate<K>>
where
    K: PartialEq,
    P: ParentLookup<K> + ?Sized,
{
    candidates
        .into_iter()
        .reduce(|best, next| resolve_overlap(best, next, lookup))
}
