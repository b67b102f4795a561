// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-gesture drag state.
//!
//! A [`Session`] is created when a drag is armed and dropped as a whole when
//! it ends, so nothing from one gesture leaks into the next.

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

/// Where the coordinator is in the drag lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum DragPhase {
    /// No drag.
    #[default]
    Idle,
    /// A drag source was pressed (or set programmatically); nothing moves yet.
    Armed,
    /// Display proxies exist and follow the pointer.
    Dragging,
    /// The pointer was released and the drop is being resolved.
    Dropping,
}

/// Items moving together; most drags carry one or two.
pub(crate) type Items<K> = SmallVec<[K; 4]>;

#[derive(Clone, Debug)]
pub(crate) struct Session<K> {
    pub(crate) phase: DragPhase,
    /// The item that armed the drag; always in `items` once they are built.
    pub(crate) main_source: K,
    /// Pointer position (drop-area space) when the drag was armed.
    ///
    /// `None` for programmatic sessions until the first pointer-move.
    pub(crate) pointer_origin: Option<Point>,
    /// Pointer offset inside the main source when the drag was armed.
    pub(crate) grab_offset: Point,
    pub(crate) items: Items<K>,
    /// Per-item pointer offsets, parallel to `items`.
    pub(crate) item_offsets: SmallVec<[Vec2; 4]>,
    /// Display proxies, parallel to `items`; empty until dragging starts.
    pub(crate) proxies: Items<K>,
    pub(crate) correct_parents: bool,
    pub(crate) drop_target: Option<K>,
}

impl<K: Copy + Eq> Session<K> {
    /// A session armed by a pointer-down.
    pub(crate) fn armed(main_source: K, pointer_origin: Point, grab_offset: Point) -> Self {
        Self {
            phase: DragPhase::Armed,
            main_source,
            pointer_origin: Some(pointer_origin),
            grab_offset,
            items: Items::new(),
            item_offsets: SmallVec::new(),
            proxies: Items::new(),
            correct_parents: true,
            drop_target: None,
        }
    }

    /// A session started by the host for a single source.
    pub(crate) fn programmatic(source: K, grab_offset: Point) -> Self {
        let mut items = Items::new();
        items.push(source);
        Self {
            phase: DragPhase::Armed,
            main_source: source,
            pointer_origin: None,
            grab_offset,
            items,
            item_offsets: SmallVec::new(),
            proxies: Items::new(),
            correct_parents: true,
            drop_target: None,
        }
    }

    pub(crate) fn is_multiple(&self) -> bool {
        self.items.len() > 1
    }

    pub(crate) fn has_proxies(&self) -> bool {
        !self.proxies.is_empty()
    }

    pub(crate) fn contains(&self, node: &K) -> bool {
        self.items.contains(node)
    }
}
