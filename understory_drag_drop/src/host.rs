// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host collaborators: the visual tree, the drop area's render surface, and the cursor.
//!
//! The coordinator never owns the visual tree. Every operation that needs to
//! look at or mutate it takes a host value implementing [`DragHost`], which is
//! blanket-implemented for anything providing the three smaller traits:
//!
//! - [`VisualTree`] (and its supertrait [`ParentLookup`]): parent links and
//!   coordinate transforms between nodes.
//! - [`RenderSurface`]: insertion, removal and placement of display proxies in
//!   the drop area.
//! - [`CursorManager`]: the process-wide "forbidden" indicator.
//!
//! [`ParentLookup`] is also implemented for closures, which keeps the pure
//! ancestry helpers in [`crate::relation`] easy to use on their own:
//!
//! ```
//! use understory_drag_drop::host::ParentLookup;
//!
//! // 3 -> 2 -> 1 (root)
//! let parent = |n: &u32| match *n {
//!     3 => Some(2),
//!     2 => Some(1),
//!     _ => None,
//! };
//! assert_eq!(parent.parent_of(&3), Some(2));
//! assert_eq!(parent.parent_of(&1), None);
//! ```

use kurbo::{Affine, Point, Size};

/// Parent links of a visual tree.
pub trait ParentLookup<K> {
    /// Return the visual parent of `node`, or `None` for a root or detached node.
    fn parent_of(&self, node: &K) -> Option<K>;
}

impl<K, F> ParentLookup<K> for F
where
    F: Fn(&K) -> Option<K>,
{
    fn parent_of(&self, node: &K) -> Option<K> {
        self(node)
    }
}

/// Geometry queries over the host's visual tree.
pub trait VisualTree<K>: ParentLookup<K> {
    /// Transform mapping coordinates local to `from` into coordinates local to `to`.
    ///
    /// Returns `None` when the two nodes do not share a tree.
    fn transform_to(&self, from: &K, to: &K) -> Option<Affine>;

    /// Rendered size of `node`.
    fn size_of(&self, node: &K) -> Size;
}

/// The drop area's child list, which hosts display proxies during a drag.
pub trait RenderSurface<K> {
    /// Insert `child` as a child of `surface`.
    fn add_child(&mut self, surface: &K, child: K);

    /// Remove `child` from `surface`.
    fn remove_child(&mut self, surface: &K, child: &K);

    /// Place `child` at `position`, expressed in its surface's coordinate space.
    fn set_child_position(&mut self, child: &K, position: Point);
}

/// Global cursor indicator kinds the coordinator requests.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CursorKind {
    /// The current drag cannot be dropped here.
    Forbidden,
}

/// Process-wide cursor control. Not owned by the coordinator.
pub trait CursorManager {
    /// Show `kind` regardless of what is under the pointer.
    fn set_global_cursor(&mut self, kind: CursorKind);

    /// Return to the normal, element-driven cursor.
    fn clear_global_cursor(&mut self);
}

/// Everything the coordinator needs from its host.
pub trait DragHost<K>: VisualTree<K> + RenderSurface<K> + CursorManager {}

impl<K, T> DragHost<K> for T where T: VisualTree<K> + RenderSurface<K> + CursorManager + ?Sized {}

/// A pointer sample delivered to the coordinator.
///
/// `position` is in the drop area's coordinate space. `local_position` is
/// relative to the participant receiving the event: the coordinator rewrites it
/// (see [`PointerEvent::localized`]) before handing an event to a drop target.
/// Events built with [`PointerEvent::new`] start with both fields equal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer position relative to the drop area.
    pub position: Point,
    /// Pointer position relative to the receiving participant.
    pub local_position: Point,
}

impl PointerEvent {
    /// Create an event at `position` in drop-area coordinates.
    #[must_use]
    pub const fn new(position: Point) -> Self {
        Self {
            position,
            local_position: position,
        }
    }

    /// Return a copy whose `local_position` is relative to `node`.
    ///
    /// `space` is the node `position` is expressed in (the drop area). When the
    /// tree has no transform between the two, `local_position` stays equal to
    /// `position`.
    #[must_use]
    pub fn localized<K>(&self, tree: &(impl VisualTree<K> + ?Sized), space: &K, node: &K) -> Self {
        let local_position = tree
            .transform_to(space, node)
            .map_or(self.position, |t| t * self.position);
        Self {
            position: self.position,
            local_position,
        }
    }
}

/// Position of `node`'s origin in `relative_to`'s coordinate space.
///
/// Falls back to [`Point::ZERO`] when the nodes are not connected.
pub fn absolute_position<K>(tree: &(impl VisualTree<K> + ?Sized), node: &K, relative_to: &K) -> Point {
    tree.transform_to(node, relative_to)
        .map_or(Point::ZERO, |t| t * Point::ZERO)
}
