// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag session state machine.
//!
//! [`DragDropCoordinator`] reacts to three host signals:
//!
//! - [`pointer_down`](DragDropCoordinator::pointer_down) on a capture zone arms a drag.
//! - [`pointer_move`](DragDropCoordinator::pointer_move) starts the drag on the first move
//!   (building the dragged set and its display proxies), then repositions the
//!   proxies and re-resolves the drop target on every move.
//! - [`pointer_up`](DragDropCoordinator::pointer_up) commits the drop, or reports an
//!   invalid drop, and clears the session.
//!
//! ```text
//! Idle ──down──▶ Armed ──first move──▶ Dragging ──up──▶ Dropping ──▶ Idle
//!                  │  └─start-drag canceled──────────────────────────▶ Idle
//!                  └─up without moving──────────────────────────────▶ Idle
//! ```
//!
//! All work happens synchronously on the caller's thread. Collaborator
//! callbacks (target hooks, observers) are not guarded: a panic propagates out
//! of the pointer call. The coordinator notices the unfinished transition and
//! clears the stale session on the next pointer-down.

use alloc::boxed::Box;
use core::fmt;

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::error::{DragDropError, Role};
use crate::events::{DragEvent, DragEvents, DropEvent, StartDragEvent};
use crate::grid::GridSnap;
use crate::host::{CursorKind, DragHost, PointerEvent, VisualTree, absolute_position};
use crate::participant::{DragPayload, DragSource, DropTarget};
use crate::registry::Registry;
use crate::relation::{OverlapCandidate, ancestors, best_candidate, is_ancestor};
use crate::session::{DragPhase, Items, Session};

/// Tunables for a [`DragDropCoordinator`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragDropOptions {
    /// Grid used when [`use_grid_binding`](Self::use_grid_binding) is set.
    pub grid: GridSnap,
    /// Snap dragged positions to `grid`.
    pub use_grid_binding: bool,
    /// When the best target under the pointer rejects the drag's group, walk up
    /// its ancestors for a registered target that accepts it.
    pub find_allowed_parent_target: bool,
}

impl Default for DragDropOptions {
    fn default() -> Self {
        Self {
            grid: GridSnap::default(),
            use_grid_binding: true,
            find_allowed_parent_target: false,
        }
    }
}

/// Coordinates drag sources, drop targets and the drag session for one drop area.
pub struct DragDropCoordinator<K> {
    drop_area: K,
    registry: Registry<K>,
    events: DragEvents<K>,
    options: DragDropOptions,
    session: Option<Session<K>>,
    /// Set while a pointer-move/up transition runs; still set afterwards only
    /// if a collaborator panicked through it.
    in_transition: bool,
}

impl<K> DragDropCoordinator<K>
where
    K: Copy + Eq + fmt::Debug + 'static,
{
    /// Create a coordinator whose proxies live in `drop_area`.
    #[must_use]
    pub fn new(drop_area: K) -> Self {
        Self::with_options(drop_area, DragDropOptions::default())
    }

    /// Create a coordinator with explicit options.
    #[must_use]
    pub fn with_options(drop_area: K, options: DragDropOptions) -> Self {
        Self {
            drop_area,
            registry: Registry::new(),
            events: DragEvents::new(),
            options,
            session: None,
            in_transition: false,
        }
    }

    /// The node display proxies are inserted into.
    #[must_use]
    pub fn drop_area(&self) -> K {
        self.drop_area
    }

    /// Move to a different drop area, clearing any live session first.
    pub fn set_drop_area<H>(&mut self, drop_area: K, host: &mut H)
    where
        H: DragHost<K> + ?Sized,
    {
        if drop_area == self.drop_area {
            return;
        }
        if self.session.is_some() {
            self.clear_session(host);
        }
        self.drop_area = drop_area;
    }

    // --- options ---

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &DragDropOptions {
        &self.options
    }

    /// Mutable options; changes apply from the next pointer event.
    pub fn options_mut(&mut self) -> &mut DragDropOptions {
        &mut self.options
    }

    /// Grid cell size.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.options.grid.cell_size()
    }

    /// Change the grid cell size.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not finite and strictly positive.
    pub fn set_cell_size(&mut self, cell_size: f64) {
        self.options.grid.set_cell_size(cell_size);
    }

    /// Whether dragged positions snap to the grid.
    #[must_use]
    pub fn use_grid_binding(&self) -> bool {
        self.options.use_grid_binding
    }

    /// Enable or disable grid snapping.
    pub fn set_use_grid_binding(&mut self, enabled: bool) {
        self.options.use_grid_binding = enabled;
    }

    /// Whether rejected targets defer to an accepting ancestor target.
    #[must_use]
    pub fn find_allowed_parent_target(&self) -> bool {
        self.options.find_allowed_parent_target
    }

    /// Enable or disable the accepting-ancestor fallback.
    pub fn set_find_allowed_parent_target(&mut self, enabled: bool) {
        self.options.find_allowed_parent_target = enabled;
    }

    // --- events ---

    /// Observer lists.
    #[must_use]
    pub fn events(&self) -> &DragEvents<K> {
        &self.events
    }

    /// Observer lists, for subscribing and removing.
    pub fn events_mut(&mut self) -> &mut DragEvents<K> {
        &mut self.events
    }

    // --- registry ---

    /// Registered participants.
    #[must_use]
    pub fn registry(&self) -> &Registry<K> {
        &self.registry
    }

    /// Register a drag source; pointer-downs on its capture zone will arm drags.
    pub fn register_drag_source(
        &mut self,
        source: Box<dyn DragSource<K>>,
    ) -> Result<(), DragDropError<K>> {
        self.registry.register_drag_source(source)
    }

    /// Unregister a drag source; its capture zone stops arming drags.
    pub fn remove_drag_source(
        &mut self,
        node: &K,
    ) -> Result<Box<dyn DragSource<K>>, DragDropError<K>> {
        self.registry.remove_drag_source(node)
    }

    /// Register a drop target.
    pub fn register_drop_target(
        &mut self,
        target: Box<dyn DropTarget<K>>,
    ) -> Result<(), DragDropError<K>> {
        self.registry.register_drop_target(target)
    }

    /// Register a drop target, adding `allowed` to its allow-list.
    pub fn register_drop_target_with_groups<'a>(
        &mut self,
        target: Box<dyn DropTarget<K>>,
        allowed: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), DragDropError<K>> {
        self.registry.register_drop_target_with_groups(target, allowed)
    }

    /// Unregister a drop target.
    pub fn remove_drop_target(
        &mut self,
        node: &K,
    ) -> Result<Box<dyn DropTarget<K>>, DragDropError<K>> {
        self.registry.remove_drop_target(node)
    }

    /// Unregister every drag source.
    pub fn clear_drag_sources(&mut self) {
        self.registry.clear_drag_sources();
    }

    /// Unregister every drop target.
    pub fn clear_drop_targets(&mut self) {
        self.registry.clear_drop_targets();
    }

    /// The drag source registered for `node`.
    #[must_use]
    pub fn drag_source(&self, node: &K) -> Option<&(dyn DragSource<K> + 'static)> {
        self.registry.drag_source(node)
    }

    /// Mutable access to the drag source registered for `node`.
    pub fn drag_source_mut(&mut self, node: &K) -> Option<&mut (dyn DragSource<K> + 'static)> {
        self.registry.drag_source_mut(node)
    }

    /// The drop target registered for `node`.
    #[must_use]
    pub fn drop_target(&self, node: &K) -> Option<&(dyn DropTarget<K> + 'static)> {
        self.registry.drop_target(node)
    }

    /// Mutable access to the drop target registered for `node`.
    pub fn drop_target_mut(&mut self, node: &K) -> Option<&mut (dyn DropTarget<K> + 'static)> {
        self.registry.drop_target_mut(node)
    }

    /// Drag sources in registration order.
    pub fn drag_sources(&self) -> impl Iterator<Item = &(dyn DragSource<K> + 'static)> {
        self.registry.drag_sources()
    }

    /// Drop targets in registration order.
    pub fn drop_targets(&self) -> impl Iterator<Item = &(dyn DropTarget<K> + 'static)> {
        self.registry.drop_targets()
    }

    // --- session queries ---

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.session.as_ref().map_or(DragPhase::Idle, |s| s.phase)
    }

    /// The item that armed the current drag.
    #[must_use]
    pub fn main_drag_source(&self) -> Option<K> {
        self.session.as_ref().map(|s| s.main_source)
    }

    /// Items moving together, in registration order; empty until dragging starts.
    #[must_use]
    pub fn current_drag_sources(&self) -> &[K] {
        self.session.as_ref().map_or(&[], |s| s.items.as_slice())
    }

    /// Proxies currently inserted into the drop area, parallel to
    /// [`current_drag_sources`](Self::current_drag_sources).
    #[must_use]
    pub fn current_display_drag_sources(&self) -> &[K] {
        self.session.as_ref().map_or(&[], |s| s.proxies.as_slice())
    }

    /// Returns `true` once the dragged set is known.
    #[must_use]
    pub fn has_current_drag_sources(&self) -> bool {
        !self.current_drag_sources().is_empty()
    }

    /// Returns `true` while proxies are in the drop area.
    #[must_use]
    pub fn has_current_display_drag_sources(&self) -> bool {
        !self.current_display_drag_sources().is_empty()
    }

    /// Returns `true` if more than one item is being dragged.
    #[must_use]
    pub fn is_multiple_drag(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_multiple)
    }

    /// `false` when a multi-item drag mixes parents; such a drag cannot drop.
    #[must_use]
    pub fn is_correct_parents(&self) -> bool {
        self.session.as_ref().is_none_or(|s| s.correct_parents)
    }

    /// The target the drag is currently over and accepted by.
    #[must_use]
    pub fn current_drop_target(&self) -> Option<K> {
        self.session.as_ref().and_then(|s| s.drop_target)
    }

    /// Pointer offset inside the main source captured when the drag was armed.
    #[must_use]
    pub fn grab_offset(&self) -> Option<Point> {
        self.session.as_ref().map(|s| s.grab_offset)
    }

    /// Override the pointer offset inside the main source. No-op when idle.
    pub fn set_grab_offset(&mut self, offset: Point) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.grab_offset = offset;
        if let Some(i) = session.items.iter().position(|n| *n == session.main_source)
            && let Some(slot) = session.item_offsets.get_mut(i)
        {
            *slot = offset.to_vec2();
        }
    }

    /// The drop target the current drag would land on for `pointer`.
    ///
    /// Returns `None` when idle.
    #[must_use]
    pub fn drop_target_at<T>(&self, pointer: &PointerEvent, tree: &T) -> Option<K>
    where
        T: VisualTree<K> + ?Sized,
    {
        self.resolve_drop_target(pointer, tree)
    }

    // --- programmatic sessions ---

    /// Arm a drag of `source` without a pointer-down, e.g. from a toolbar.
    ///
    /// Any live session is cleared first. The source's group name becomes
    /// `group`, and the grab offset is the centre of its node.
    pub fn set_current_drag_source<H>(
        &mut self,
        source: K,
        group: &str,
        host: &mut H,
    ) -> Result<(), DragDropError<K>>
    where
        H: DragHost<K> + ?Sized,
    {
        if !self.registry.is_drag_source(&source) {
            return Err(DragDropError::NotRegistered {
                role: Role::DragSource,
                node: source,
            });
        }
        self.clear_session(host);
        self.in_transition = false;
        if let Some(s) = self.registry.drag_source_mut(&source) {
            s.set_drag_group_name(group);
        }
        let size = host.size_of(&source);
        let grab_offset = Point::new(size.width / 2.0, size.height / 2.0);
        self.session = Some(Session::programmatic(source, grab_offset));
        #[cfg(feature = "tracing")]
        tracing::debug!(?source, group, "drag set programmatically");
        Ok(())
    }

    /// Abandon the current drag, if any: proxies are removed and the cursor cleared.
    pub fn clear_current_drag_source<H>(&mut self, host: &mut H)
    where
        H: DragHost<K> + ?Sized,
    {
        self.clear_session(host);
        self.in_transition = false;
    }

    // --- pointer signals ---

    /// Pointer-down on `capture_zone`.
    ///
    /// Returns `Ok(true)` if a drag was armed. Pointer-downs on nodes that are
    /// not a registered capture zone, or while a drag is already armed, are
    /// ignored.
    pub fn pointer_down<H>(
        &mut self,
        capture_zone: &K,
        pointer: &PointerEvent,
        host: &mut H,
    ) -> Result<bool, DragDropError<K>>
    where
        H: DragHost<K> + ?Sized,
    {
        if self.in_transition {
            #[cfg(feature = "tracing")]
            tracing::warn!("previous drag transition did not finish; clearing session");
            self.clear_session(host);
            self.in_transition = false;
        }
        if self.session.is_some() || !self.registry.is_capture_zone(capture_zone) {
            return Ok(false);
        }
        let owner = self.owning_drag_source(capture_zone, &*host)?;
        let main = self.selected_ancestor_source(&owner, &*host).unwrap_or(owner);
        let grab_offset = self.local_point(&*host, &main, pointer.position);
        self.session = Some(Session::armed(main, pointer.position, grab_offset));
        #[cfg(feature = "tracing")]
        tracing::debug!(?capture_zone, ?main, "drag armed");
        Ok(true)
    }

    /// Pointer-move over the drop area.
    ///
    /// A session left in [`DragPhase::Dropping`] by a panicking drop observer
    /// goes back to [`DragPhase::Dragging`] here, so the next pointer-up can
    /// drop again.
    ///
    /// Returns `false` when no drag is armed.
    pub fn pointer_move<H>(&mut self, pointer: &PointerEvent, host: &mut H) -> bool
    where
        H: DragHost<K> + ?Sized,
    {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.phase == DragPhase::Dropping {
            // A drop observer unwound out of `pointer_up`; the proxies are still live.
            session.phase = DragPhase::Dragging;
        }
        let has_proxies = session.has_proxies();
        self.in_transition = true;
        if !has_proxies && !self.begin_drag(pointer, host) {
            self.in_transition = false;
            return true;
        }
        self.move_display_drag_sources(pointer, host);
        self.update_drop_target(pointer, host);
        self.in_transition = false;
        true
    }

    /// Pointer-up over the drop area.
    ///
    /// Returns `false` when no drag is armed.
    pub fn pointer_up<H>(&mut self, pointer: &PointerEvent, host: &mut H) -> bool
    where
        H: DragHost<K> + ?Sized,
    {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.has_proxies() {
            self.clear_session(host);
            return true;
        }
        session.phase = DragPhase::Dropping;
        self.in_transition = true;
        self.events.emit_start_drop();

        let accepted = self
            .resolve_drop_target(pointer, &*host)
            .filter(|t| self.is_correct_parents() && self.can_drop(t, pointer, &*host));
        match accepted {
            Some(target) => self.commit_drop(target, pointer, host),
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!("invalid drop");
                self.events.emit_invalid_drop();
            }
        }

        self.clear_session(host);
        self.in_transition = false;
        self.events.emit_end_drop();
        true
    }

    // --- transitions ---

    /// Armed → Dragging. Returns `false` if an observer canceled.
    fn begin_drag<H>(&mut self, pointer: &PointerEvent, host: &mut H) -> bool
    where
        H: DragHost<K> + ?Sized,
    {
        let Some(main) = self.main_drag_source() else {
            return false;
        };
        let position = absolute_position(&*host, &main, &self.drop_area);
        let mut start = StartDragEvent::new(main, position, *pointer);
        if !self.events.emit_start_drag(&mut start) {
            #[cfg(feature = "tracing")]
            tracing::debug!(?main, "drag canceled by observer");
            self.clear_session(host);
            return false;
        }

        if !self.has_current_drag_sources() {
            let (items, main) = self.collect_drag_sources(main, &*host);
            let correct_parents = shares_parent(&items, &*host);
            if let Some(session) = self.session.as_mut() {
                session.items = items;
                session.main_source = main;
                session.correct_parents = correct_parents;
            }
        }

        let offsets = self.item_offsets(pointer, &*host);
        let drop_area = self.drop_area;
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.pointer_origin.is_none() {
            session.pointer_origin = Some(pointer.position);
        }
        session.item_offsets = offsets;
        session.phase = DragPhase::Dragging;

        for item in session.items.clone() {
            let proxy = self
                .registry
                .drag_source_mut(&item)
                .map_or(item, |s| s.display_drag_source());
            host.add_child(&drop_area, proxy);
            session.proxies.push(proxy);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            main = ?session.main_source,
            items = session.items.len(),
            correct_parents = session.correct_parents,
            "drag started"
        );
        true
    }

    /// Place every proxy for the current pointer position.
    fn move_display_drag_sources<H>(&mut self, pointer: &PointerEvent, host: &mut H)
    where
        H: DragHost<K> + ?Sized,
    {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let origin = session.pointer_origin.unwrap_or(pointer.position);
        let moves: SmallVec<[(K, K, Vec2); 4]> = session
            .items
            .iter()
            .zip(&session.proxies)
            .zip(&session.item_offsets)
            .map(|((item, proxy), offset)| (*item, *proxy, *offset))
            .collect();

        for (item, proxy, offset) in moves {
            let mut position = if proxy == item {
                pointer.position - offset
            } else {
                absolute_position(&*host, &item, &self.drop_area) + (pointer.position - origin)
            };
            if self.options.use_grid_binding {
                position = self.options.grid.snap_point(position);
            }
            let position = self.events.emit_before_drag(DragEvent {
                source: item,
                display_drag_source: proxy,
                position,
                pointer: *pointer,
            });
            host.set_child_position(&proxy, position);
            self.events.emit_drag(DragEvent {
                source: item,
                display_drag_source: proxy,
                position,
                pointer: *pointer,
            });
        }
    }

    /// Re-resolve the drop target, fire enter/move/leave hooks and update the cursor.
    fn update_drop_target<H>(&mut self, pointer: &PointerEvent, host: &mut H)
    where
        H: DragHost<K> + ?Sized,
    {
        if !self.is_correct_parents() {
            host.set_global_cursor(CursorKind::Forbidden);
            return;
        }
        let previous = self.current_drop_target();
        let accepted = self
            .resolve_drop_target(pointer, &*host)
            .filter(|t| self.can_drop(t, pointer, &*host));

        let Some(target) = accepted else {
            host.set_global_cursor(CursorKind::Forbidden);
            if let Some(old) = previous {
                self.leave(&old);
            }
            if let Some(session) = self.session.as_mut() {
                session.drop_target = None;
            }
            return;
        };

        host.clear_global_cursor();
        let local = pointer.localized(&*host, &self.drop_area, &target);
        if previous != Some(target) {
            if let Some(old) = previous {
                self.leave(&old);
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(?target, "entered drop target");
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let payload = if session.is_multiple() {
            DragPayload::Multiple(&session.items)
        } else {
            DragPayload::Single(&session.main_source)
        };
        if let Some(t) = self.registry.drop_target_mut(&target) {
            if previous == Some(target) {
                t.on_move_in_drop_zone(payload, &local);
            } else {
                t.on_enter_drop_zone(payload, &local);
            }
        }
        session.drop_target = Some(target);
    }

    /// Dropping: release the entered target and `target`, then report every item dropped on it.
    fn commit_drop<H>(&mut self, target: K, pointer: &PointerEvent, host: &mut H)
    where
        H: DragHost<K> + ?Sized,
    {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let entered = session.drop_target.take();
        let pairs: SmallVec<[(K, K); 4]> = session
            .items
            .iter()
            .copied()
            .zip(session.proxies.iter().copied())
            .collect();
        if let Some(old) = entered.filter(|old| *old != target) {
            self.leave(&old);
        }
        self.leave(&target);
        #[cfg(feature = "tracing")]
        tracing::debug!(?target, items = pairs.len(), "drop committed");

        for (item, proxy) in pairs {
            let position = if host.parent_of(&proxy).is_some() {
                host.transform_to(&proxy, &target)
                    .map_or(pointer.position, |t| t * Point::ZERO)
            } else {
                pointer.position
            };
            self.events.emit_drop(DropEvent {
                source: item,
                target,
                display_drag_source: proxy,
                position,
                pointer: *pointer,
            });
        }
    }

    /// Back to Idle: remove proxies, clear the cursor, release an entered target.
    fn clear_session<H>(&mut self, host: &mut H)
    where
        H: DragHost<K> + ?Sized,
    {
        let session = self.session.take();
        if let Some(session) = &session {
            for proxy in &session.proxies {
                host.remove_child(&self.drop_area, proxy);
            }
        }
        host.clear_global_cursor();
        if let Some(old) = session.and_then(|s| s.drop_target) {
            self.leave(&old);
        }
        #[cfg(feature = "tracing")]
        tracing::trace!("drag session cleared");
    }

    fn leave(&mut self, target: &K) {
        if let Some(t) = self.registry.drop_target_mut(target) {
            t.on_leave_drop_zone();
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(?target, "left drop target");
    }

    // --- resolution helpers ---

    /// The registered drag source at or above `capture_zone`.
    fn owning_drag_source<T>(&self, capture_zone: &K, tree: &T) -> Result<K, DragDropError<K>>
    where
        T: VisualTree<K> + ?Sized,
    {
        if self.registry.is_drag_source(capture_zone) {
            return Ok(*capture_zone);
        }
        ancestors(tree, capture_zone)
            .find(|n| self.registry.is_drag_source(n))
            .ok_or(DragDropError::NoOwningDragSource {
                capture_zone: *capture_zone,
            })
    }

    /// Nearest registered, selected drag source strictly above `node`.
    fn selected_ancestor_source<T>(&self, node: &K, tree: &T) -> Option<K>
    where
        T: VisualTree<K> + ?Sized,
    {
        ancestors(tree, node).find(|n| {
            self.registry
                .drag_source(n)
                .is_some_and(|s| s.is_selected())
        })
    }

    /// Selected sources that are not inside another selected source, plus `main`.
    ///
    /// Returns the items and the (possibly re-pointed) main source.
    fn collect_drag_sources<T>(&self, main: K, tree: &T) -> (Items<K>, K)
    where
        T: VisualTree<K> + ?Sized,
    {
        let mut items = Items::new();
        for source in self.registry.drag_sources() {
            let node = source.node();
            if source.is_selected() && self.selected_ancestor_source(&node, tree).is_none() {
                items.push(node);
            }
        }
        if items.contains(&main) {
            return (items, main);
        }
        // `main` inside a selected item moves with that item.
        if let Some(owner) = items.iter().copied().find(|i| is_ancestor(tree, i, &main)) {
            return (items, owner);
        }
        items.push(main);
        (items, main)
    }

    /// Pointer offsets inside each dragged item, measured at arm time.
    fn item_offsets<T>(&self, pointer: &PointerEvent, tree: &T) -> SmallVec<[Vec2; 4]>
    where
        T: VisualTree<K> + ?Sized,
    {
        let Some(session) = self.session.as_ref() else {
            return SmallVec::new();
        };
        let origin = session.pointer_origin.unwrap_or(pointer.position);
        session
            .items
            .iter()
            .map(|item| {
                if *item == session.main_source {
                    session.grab_offset.to_vec2()
                } else {
                    self.local_point(tree, item, origin).to_vec2()
                }
            })
            .collect()
    }

    /// Map a drop-area point into `node`'s space.
    fn local_point<T>(&self, tree: &T, node: &K, point: Point) -> Point
    where
        T: VisualTree<K> + ?Sized,
    {
        tree.transform_to(&self.drop_area, node)
            .map_or(point, |t| t * point)
    }

    /// The target a drop at `pointer` would land on, before the acceptance check.
    fn resolve_drop_target<T>(&self, pointer: &PointerEvent, tree: &T) -> Option<K>
    where
        T: VisualTree<K> + ?Sized,
    {
        let session = self.session.as_ref()?;
        let main = session.main_source;
        let candidates = self.registry.drop_targets().filter_map(|target| {
            let node = target.node();
            if tree.parent_of(&node).is_none() {
                return None;
            }
            let local = pointer.localized(tree, &self.drop_area, &node);
            if !target.is_in_drop_zone(&main, &local) {
                return None;
            }
            // Never onto a dragged item or anything inside one. `items` is
            // still empty while armed, so `main` is checked on its own.
            if node == main
                || is_ancestor(tree, &main, &node)
                || session.contains(&node)
                || session.items.iter().any(|item| is_ancestor(tree, item, &node))
            {
                return None;
            }
            Some(OverlapCandidate {
                node,
                priority: target.drop_visibility_priority(),
            })
        });
        let best = best_candidate(candidates, tree)?.node;

        if self.is_acceptable_target(&main, &best, tree) {
            return Some(best);
        }
        if self.options.find_allowed_parent_target {
            return ancestors(tree, &best).find(|n| {
                self.registry.is_drop_target(n) && self.is_acceptable_target(&main, n, tree)
            });
        }
        None
    }

    /// Group-name filtering of `target` for a drag led by `main`.
    fn is_acceptable_target<T>(&self, main: &K, target: &K, tree: &T) -> bool
    where
        T: VisualTree<K> + ?Sized,
    {
        if target == main || tree.parent_of(target).is_none() {
            return false;
        }
        let (Some(target), Some(source)) = (
            self.registry.drop_target(target),
            self.registry.drag_source(main),
        ) else {
            return false;
        };
        target.group_filter().accepts(source.drag_group_name())
    }

    /// Whether `target` accepts the whole dragged set.
    fn can_drop<T>(&self, target: &K, pointer: &PointerEvent, tree: &T) -> bool
    where
        T: VisualTree<K> + ?Sized,
    {
        let (Some(session), Some(t)) = (self.session.as_ref(), self.registry.drop_target(target))
        else {
            return false;
        };
        if session.is_multiple() && !t.can_multiple_drop() {
            return false;
        }
        let local = pointer.localized(tree, &self.drop_area, target);
        session.items.iter().all(|item| {
            self.registry
                .drag_source(item)
                .is_some_and(|s| t.can_drop(s, &local))
        })
    }
}

/// `true` unless several items have different parents.
fn shares_parent<K, T>(items: &[K], tree: &T) -> bool
where
    K: Eq,
    T: VisualTree<K> + ?Sized,
{
    let Some((first, rest)) = items.split_first() else {
        return true;
    };
    let parent = tree.parent_of(first);
    rest.iter().all(|item| tree.parent_of(item) == parent)
}

impl<K: fmt::Debug> fmt::Debug for DragDropCoordinator<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragDropCoordinator")
            .field("drop_area", &self.drop_area)
            .field("registry", &self.registry)
            .field("options", &self.options)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
