// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle notifications emitted by the coordinator.
//!
//! Seven event kinds are fanned out synchronously, inline with the state
//! machine, to observers in subscription order:
//!
//! | Kind | Payload | Observers may |
//! |---|---|---|
//! | [`EventKind::StartDrag`] | [`StartDragEvent`] | cancel the drag |
//! | [`EventKind::BeforeDrag`] | [`DragEvent`] | override `position` |
//! | [`EventKind::Drag`] | [`DragEvent`] | observe |
//! | [`EventKind::Drop`] | [`DropEvent`] | observe |
//! | [`EventKind::InvalidDrop`] | none | observe |
//! | [`EventKind::StartDrop`] | none | observe |
//! | [`EventKind::EndDrop`] | none | observe |
//!
//! Nothing is queued, and panics raised by an observer are not caught.
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use understory_drag_drop::events::DragEvents;
//!
//! let mut events = DragEvents::<u32>::new();
//! let ended = Rc::new(Cell::new(0));
//! let seen = ended.clone();
//! let id = events.on_end_drop(move || seen.set(seen.get() + 1));
//!
//! events.emit_end_drop();
//! assert_eq!(ended.get(), 1);
//!
//! assert!(events.remove(id));
//! events.emit_end_drop();
//! assert_eq!(ended.get(), 1);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

use crate::host::PointerEvent;

/// Notification kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A drag is about to start; cancelable.
    StartDrag,
    /// A dragged item is about to be placed; its position may be overridden.
    BeforeDrag,
    /// A dragged item was placed.
    Drag,
    /// An item was dropped on a target.
    Drop,
    /// The pointer was released where nothing accepts the drag.
    InvalidDrop,
    /// Pointer-up of a visible drag; drop resolution follows.
    StartDrop,
    /// A visible drag finished, whether or not it dropped.
    EndDrop,
}

/// Handle returned when subscribing; pass it to [`DragEvents::remove`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId {
    kind: EventKind,
    serial: u32,
}

impl ObserverId {
    /// The event kind this observer listens to.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

/// Payload of [`EventKind::StartDrag`].
#[derive(Clone, Debug, PartialEq)]
pub struct StartDragEvent<K> {
    /// The item under the pointer that armed the drag.
    pub source: K,
    /// That item's position relative to the drop area.
    pub position: Point,
    /// The pointer-move that triggered the start.
    pub pointer: PointerEvent,
    canceled: bool,
}

impl<K> StartDragEvent<K> {
    /// Create an uncanceled start event.
    #[must_use]
    pub fn new(source: K, position: Point, pointer: PointerEvent) -> Self {
        Self {
            source,
            position,
            pointer,
            canceled: false,
        }
    }

    /// Abort the drag; no visuals are created and the session is cleared.
    pub fn cancel(&mut self) {
        self.canceled = true;
    }

    /// Returns `true` once any observer canceled.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.canceled
    }
}

/// Payload of [`EventKind::BeforeDrag`] and [`EventKind::Drag`].
#[derive(Clone, Debug, PartialEq)]
pub struct DragEvent<K> {
    /// The dragged item.
    pub source: K,
    /// The visual being moved for it.
    pub display_drag_source: K,
    /// Position of the visual relative to the drop area.
    ///
    /// Before-drag observers may overwrite it; the final value is applied.
    pub position: Point,
    /// The pointer-move being processed.
    pub pointer: PointerEvent,
}

/// Payload of [`EventKind::Drop`].
#[derive(Clone, Debug, PartialEq)]
pub struct DropEvent<K> {
    /// The dropped item.
    pub source: K,
    /// The receiving target.
    pub target: K,
    /// The visual that was moved for the item.
    pub display_drag_source: K,
    /// Where the visual sits, relative to the target (or the drop area when
    /// the visual is no longer attached).
    pub position: Point,
    /// The pointer-up being processed.
    pub pointer: PointerEvent,
}

type Callback<E> = Box<dyn FnMut(&mut E)>;

/// Ordered observers of one event kind.
pub struct Observers<E> {
    kind: EventKind,
    next_serial: u32,
    entries: Vec<(u32, Callback<E>)>,
}

impl<E> Observers<E> {
    /// An empty list for `kind`.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            next_serial: 0,
            entries: Vec::new(),
        }
    }

    /// Append an observer.
    pub fn subscribe(&mut self, callback: impl FnMut(&mut E) + 'static) -> ObserverId {
        let serial = self.next_serial;
        self.next_serial = self.next_serial.wrapping_add(1);
        self.entries.push((serial, Box::new(callback)));
        ObserverId {
            kind: self.kind,
            serial,
        }
    }

    /// Detach an observer. Returns `true` if it was subscribed here.
    pub fn remove(&mut self, id: ObserverId) -> bool {
        if id.kind != self.kind {
            return false;
        }
        let before = self.entries.len();
        self.entries.retain(|(serial, _)| *serial != id.serial);
        self.entries.len() != before
    }

    /// Number of observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nobody listens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Call every observer in subscription order.
    pub fn emit(&mut self, event: &mut E) {
        if self.entries.is_empty() {
            return;
        }
        for (_, callback) in &mut self.entries {
            callback(&mut *event);
        }
    }
}

impl<E> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("kind", &self.kind)
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

/// Observer lists for all seven notification kinds.
#[derive(Debug)]
pub struct DragEvents<K> {
    start_drag: Observers<StartDragEvent<K>>,
    before_drag: Observers<DragEvent<K>>,
    drag: Observers<DragEvent<K>>,
    drop: Observers<DropEvent<K>>,
    invalid_drop: Observers<()>,
    start_drop: Observers<()>,
    end_drop: Observers<()>,
}

impl<K> Default for DragEvents<K> {
    fn default() -> Self {
        Self {
            start_drag: Observers::new(EventKind::StartDrag),
            before_drag: Observers::new(EventKind::BeforeDrag),
            drag: Observers::new(EventKind::Drag),
            drop: Observers::new(EventKind::Drop),
            invalid_drop: Observers::new(EventKind::InvalidDrop),
            start_drop: Observers::new(EventKind::StartDrop),
            end_drop: Observers::new(EventKind::EndDrop),
        }
    }
}

impl<K: 'static> DragEvents<K> {
    /// No observers at all.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe drag starts; call [`StartDragEvent::cancel`] to veto.
    pub fn on_start_drag(
        &mut self,
        callback: impl FnMut(&mut StartDragEvent<K>) + 'static,
    ) -> ObserverId {
        self.start_drag.subscribe(callback)
    }

    /// Observe (and optionally override) each proposed item position.
    pub fn on_before_drag(
        &mut self,
        callback: impl FnMut(&mut DragEvent<K>) + 'static,
    ) -> ObserverId {
        self.before_drag.subscribe(callback)
    }

    /// Observe each applied item position.
    pub fn on_drag(&mut self, mut callback: impl FnMut(&DragEvent<K>) + 'static) -> ObserverId {
        self.drag.subscribe(move |e| callback(&*e))
    }

    /// Observe each dropped item.
    pub fn on_drop(&mut self, mut callback: impl FnMut(&DropEvent<K>) + 'static) -> ObserverId {
        self.drop.subscribe(move |e| callback(&*e))
    }

    /// Observe releases where nothing accepts the drag.
    pub fn on_invalid_drop(&mut self, mut callback: impl FnMut() + 'static) -> ObserverId {
        self.invalid_drop.subscribe(move |_| callback())
    }

    /// Observe the start of drop resolution.
    pub fn on_start_drop(&mut self, mut callback: impl FnMut() + 'static) -> ObserverId {
        self.start_drop.subscribe(move |_| callback())
    }

    /// Observe the end of a visible drag.
    pub fn on_end_drop(&mut self, mut callback: impl FnMut() + 'static) -> ObserverId {
        self.end_drop.subscribe(move |_| callback())
    }

    /// Detach an observer of any kind. Returns `true` if it was subscribed.
    pub fn remove(&mut self, id: ObserverId) -> bool {
        match id.kind {
            EventKind::StartDrag => self.start_drag.remove(id),
            EventKind::BeforeDrag => self.before_drag.remove(id),
            EventKind::Drag => self.drag.remove(id),
            EventKind::Drop => self.drop.remove(id),
            EventKind::InvalidDrop => self.invalid_drop.remove(id),
            EventKind::StartDrop => self.start_drop.remove(id),
            EventKind::EndDrop => self.end_drop.remove(id),
        }
    }

    /// Number of observers subscribed to `kind`.
    #[must_use]
    pub fn observer_count(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::StartDrag => self.start_drag.len(),
            EventKind::BeforeDrag => self.before_drag.len(),
            EventKind::Drag => self.drag.len(),
            EventKind::Drop => self.drop.len(),
            EventKind::InvalidDrop => self.invalid_drop.len(),
            EventKind::StartDrop => self.start_drop.len(),
            EventKind::EndDrop => self.end_drop.len(),
        }
    }

    /// Fan out a start-drag notification. Returns `true` if the drag may proceed.
    pub fn emit_start_drag(&mut self, event: &mut StartDragEvent<K>) -> bool {
        self.start_drag.emit(event);
        !event.is_canceled()
    }

    /// Fan out a before-drag notification and return the position to apply.
    pub fn emit_before_drag(&mut self, mut event: DragEvent<K>) -> Point {
        self.before_drag.emit(&mut event);
        event.position
    }

    /// Fan out a drag notification.
    pub fn emit_drag(&mut self, mut event: DragEvent<K>) {
        self.drag.emit(&mut event);
    }

    /// Fan out a drop notification.
    pub fn emit_drop(&mut self, mut event: DropEvent<K>) {
        self.drop.emit(&mut event);
    }

    /// Fan out an invalid-drop notification.
    pub fn emit_invalid_drop(&mut self) {
        self.invalid_drop.emit(&mut ());
    }

    /// Fan out a start-drop notification.
    pub fn emit_start_drop(&mut self) {
        self.start_drop.emit(&mut ());
    }

    /// Fan out an end-drop notification.
    pub fn emit_end_drop(&mut self) {
        self.end_drop.emit(&mut ());
    }
}
