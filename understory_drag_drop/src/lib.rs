// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drag_drop --heading-base-level=0

//! Understory Drag Drop: pointer-driven drag-and-drop coordination.
//!
//! This crate implements the drag-and-drop state machine for a retained UI
//! without owning the UI itself. The host supplies its visual tree, a surface
//! to put drag proxies on, and a cursor through the [`DragHost`] traits, and
//! forwards pointer-down/move/up to a [`DragDropCoordinator`].
//!
//! The coordinator takes care of:
//! - **Arming**: mapping a pointer-down on a capture zone to its owning
//!   [`DragSource`], promoted to a selected ancestor when one exists.
//! - **Multi-item drags**: every selected source that is not nested inside
//!   another selected source moves along, each via a display proxy.
//! - **Positioning**: proxies follow the pointer, optionally snapped to a
//!   [`GridSnap`], with a before-drag hook that can override the position.
//! - **Target resolution**: overlapping [`DropTarget`]s are ranked by
//!   visibility priority, then by depth (see [`relation`]), and filtered by
//!   drop groups ([`GroupFilter`]) and the target's own acceptance check.
//! - **Notifications**: [`DragEvents`] fans out start-drag, before-drag, drag,
//!   drop, invalid-drop, start-drop and end-drop to observers.
//!
//! ## Quick Start
//!
//! ```rust
//! use kurbo::{Affine, Point, Size, Vec2};
//! use understory_drag_drop::{
//!     CursorKind, CursorManager, DragDropCoordinator, DragSource, DropTarget, GroupFilter,
//!     ParentLookup, PointerEvent, RenderSurface, VisualTree,
//! };
//!
//! // Node 0 is the drop area. Node 1 is a card at its origin, node 2 a bin at (50, 0).
//! struct Host;
//!
//! impl ParentLookup<u32> for Host {
//!     fn parent_of(&self, node: &u32) -> Option<u32> {
//!         (*node != 0).then_some(0)
//!     }
//! }
//!
//! impl VisualTree<u32> for Host {
//!     fn transform_to(&self, from: &u32, to: &u32) -> Option<Affine> {
//!         let origin = |n: &u32| if *n == 2 { Vec2::new(50.0, 0.0) } else { Vec2::ZERO };
//!         Some(Affine::translate(origin(from) - origin(to)))
//!     }
//!     fn size_of(&self, _: &u32) -> Size {
//!         Size::new(20.0, 20.0)
//!     }
//! }
//!
//! impl RenderSurface<u32> for Host {
//!     fn add_child(&mut self, _: &u32, _: u32) {}
//!     fn remove_child(&mut self, _: &u32, _: &u32) {}
//!     fn set_child_position(&mut self, _: &u32, _: Point) {}
//! }
//!
//! impl CursorManager for Host {
//!     fn set_global_cursor(&mut self, _: CursorKind) {}
//!     fn clear_global_cursor(&mut self) {}
//! }
//!
//! struct Card;
//!
//! impl DragSource<u32> for Card {
//!     fn node(&self) -> u32 { 1 }
//!     fn is_selected(&self) -> bool { false }
//!     fn drag_group_name(&self) -> &str { "cards" }
//!     fn set_drag_group_name(&mut self, _: &str) {}
//! }
//!
//! struct Bin(GroupFilter);
//!
//! impl DropTarget<u32> for Bin {
//!     fn node(&self) -> u32 { 2 }
//!     fn group_filter(&self) -> &GroupFilter { &self.0 }
//!     fn group_filter_mut(&mut self) -> &mut GroupFilter { &mut self.0 }
//!     fn is_in_drop_zone(&self, _: &u32, pointer: &PointerEvent) -> bool {
//!         let p = pointer.local_position;
//!         (0.0..20.0).contains(&p.x) && (0.0..20.0).contains(&p.y)
//!     }
//!     fn can_drop(&self, _: &dyn DragSource<u32>, _: &PointerEvent) -> bool { true }
//! }
//!
//! let mut host = Host;
//! let mut dnd = DragDropCoordinator::new(0_u32);
//! dnd.register_drag_source(Box::new(Card)).unwrap();
//! dnd.register_drop_target_with_groups(Box::new(Bin(GroupFilter::new())), ["cards"])
//!     .unwrap();
//!
//! let down = PointerEvent::new(Point::new(5.0, 5.0));
//! assert!(dnd.pointer_down(&1, &down, &mut host).unwrap());
//! dnd.pointer_move(&PointerEvent::new(Point::new(55.0, 5.0)), &mut host);
//! assert_eq!(dnd.current_drop_target(), Some(2));
//! dnd.pointer_up(&PointerEvent::new(Point::new(55.0, 5.0)), &mut host);
//! assert!(dnd.main_drag_source().is_none());
//! ```
//!
//! ## Failure handling
//!
//! Registration mistakes and pointer-downs that cannot be routed are reported
//! as [`DragDropError`]s. Collaborator callbacks run inline and unguarded; if
//! one panics mid-transition, the next [`pointer_down`] clears the stale
//! session before doing anything else.
//!
//! [`pointer_down`]: DragDropCoordinator::pointer_down
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Geometry comes from [`kurbo`];
//! enable the `libm` feature when building without `std`.
//!
//! ## Features
//!
//! - `std` (default): use `std` float functions through [`kurbo`].
//! - `libm`: use `libm` float functions for `no_std` targets.
//! - `tracing`: emit [`tracing`](https://docs.rs/tracing) events for session
//!   transitions (arming, start, cancel, enter/leave, drop, recovery).

#![no_std]

extern crate alloc;

mod coordinator;
pub mod error;
pub mod events;
pub mod grid;
pub mod host;
pub mod participant;
pub mod registry;
pub mod relation;
mod session;

pub use coordinator::{DragDropCoordinator, DragDropOptions};
pub use error::{DragDropError, Role};
pub use events::{DragEvent, DragEvents, DropEvent, EventKind, ObserverId, StartDragEvent};
pub use grid::GridSnap;
pub use host::{
    CursorKind, CursorManager, DragHost, ParentLookup, PointerEvent, RenderSurface, VisualTree,
};
pub use participant::{DragPayload, DragSource, DropTarget, GroupFilter};
pub use registry::Registry;
pub use session::DragPhase;
