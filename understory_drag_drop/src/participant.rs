// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag sources, drop targets, and drop-group filtering.
//!
//! Host elements take part in drag and drop by implementing [`DragSource`]
//! and/or [`DropTarget`]. Both are open traits: the coordinator stores them as
//! boxed trait objects and identifies each participant by its node key in the
//! host's visual tree.
//!
//! ## Drop groups
//!
//! Every source carries a drag group name. Each target carries a
//! [`GroupFilter`] holding an allow-list and a deny-list of group names. A
//! non-empty allow-list takes precedence: the deny-list is only consulted when
//! the allow-list is empty.
//!
//! ```
//! use understory_drag_drop::participant::GroupFilter;
//!
//! let mut filter = GroupFilter::new();
//! assert!(filter.accepts("cards"));
//!
//! filter.deny("cards");
//! assert!(!filter.accepts("cards"));
//!
//! // Once an allow-list exists, it alone decides.
//! filter.allow("cards");
//! assert!(filter.accepts("cards"));
//! assert!(!filter.accepts("columns"));
//! ```

use alloc::string::{String, ToString};

use hashbrown::HashSet;

use crate::host::PointerEvent;

/// An element that can be picked up and moved.
pub trait DragSource<K> {
    /// The source's node in the visual tree.
    fn node(&self) -> K;

    /// The node whose pointer-down arms a drag.
    ///
    /// Defaults to the source node itself.
    fn capture_zone(&self) -> K {
        self.node()
    }

    /// Whether the source is part of the current selection.
    fn is_selected(&self) -> bool;

    /// Group tag used by drop targets to filter what they accept.
    fn drag_group_name(&self) -> &str;

    /// Replace the group tag for the coming session.
    fn set_drag_group_name(&mut self, name: &str);

    /// The visual moved around while dragging.
    ///
    /// Called once per session when dragging starts. Returning [`node`](Self::node)
    /// moves the source itself; any other node is treated as a detached proxy.
    fn display_drag_source(&mut self) -> K {
        self.node()
    }
}

/// The items a drop target is told about while a drag hovers it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragPayload<'a, K> {
    /// A single item is being dragged.
    Single(&'a K),
    /// Several items move together, in registration order.
    Multiple(&'a [K]),
}

impl<K> DragPayload<'_, K> {
    /// Number of items being dragged.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multiple(items) => items.len(),
        }
    }

    /// Returns `true` if no items are carried.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An element that can receive dropped items.
pub trait DropTarget<K> {
    /// The target's node in the visual tree.
    fn node(&self) -> K;

    /// Priority used to pick between overlapping targets; higher wins.
    fn drop_visibility_priority(&self) -> i32 {
        0
    }

    /// Allow/deny lists of drag group names.
    fn group_filter(&self) -> &GroupFilter;

    /// Mutable access to the allow/deny lists.
    fn group_filter_mut(&mut self) -> &mut GroupFilter;

    /// Whether more than one item may be dropped at once.
    fn can_multiple_drop(&self) -> bool {
        false
    }

    /// Hit test: is the pointer inside this target's drop zone?
    ///
    /// `main_source` is the node of the item under the pointer.
    fn is_in_drop_zone(&self, main_source: &K, pointer: &PointerEvent) -> bool;

    /// Whether this target accepts `item`.
    fn can_drop(&self, item: &dyn DragSource<K>, pointer: &PointerEvent) -> bool;

    /// The drag entered this target.
    fn on_enter_drop_zone(&mut self, payload: DragPayload<'_, K>, pointer: &PointerEvent) {
        let _ = (payload, pointer);
    }

    /// The drag moved while staying over this target.
    fn on_move_in_drop_zone(&mut self, payload: DragPayload<'_, K>, pointer: &PointerEvent) {
        let _ = (payload, pointer);
    }

    /// The drag left this target, or is about to be dropped on it.
    fn on_leave_drop_zone(&mut self) {}
}

/// Allow-list and deny-list of drag group names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupFilter {
    allowed: HashSet<String>,
    unallowed: HashSet<String>,
}

impl GroupFilter {
    /// An empty filter that accepts every group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name` to the allow-list.
    pub fn allow(&mut self, name: &str) {
        self.allowed.insert(name.to_string());
    }

    /// Add `name` to the deny-list.
    pub fn deny(&mut self, name: &str) {
        self.unallowed.insert(name.to_string());
    }

    /// Remove `name` from the allow-list. Returns `true` if it was present.
    pub fn disallow(&mut self, name: &str) -> bool {
        self.allowed.remove(name)
    }

    /// Remove `name` from the deny-list. Returns `true` if it was present.
    pub fn undeny(&mut self, name: &str) -> bool {
        self.unallowed.remove(name)
    }

    /// Empty both lists.
    pub fn clear(&mut self) {
        self.allowed.clear();
        self.unallowed.clear();
    }

    /// Returns `true` if the allow-list is non-empty.
    #[must_use]
    pub fn has_allowed(&self) -> bool {
        !self.allowed.is_empty()
    }

    /// Returns `true` if the deny-list is non-empty.
    #[must_use]
    pub fn has_unallowed(&self) -> bool {
        !self.unallowed.is_empty()
    }

    /// Allowed group names, in no particular order.
    pub fn allowed(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }

    /// Denied group names, in no particular order.
    pub fn unallowed(&self) -> impl Iterator<Item = &str> {
        self.unallowed.iter().map(String::as_str)
    }

    /// Whether a source tagged `group` passes this filter.
    #[must_use]
    pub fn accepts(&self, group: &str) -> bool {
        if self.has_allowed() {
            return self.allowed.contains(group);
        }
        !self.unallowed.contains(group)
    }
}

impl<S: AsRef<str>> FromIterator<S> for GroupFilter {
    /// Build a filter whose allow-list holds every name.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut filter = Self::new();
        for name in iter {
            filter.allow(name.as_ref());
        }
        filter
    }
}
