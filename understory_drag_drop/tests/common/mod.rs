// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures: a translation-only host tree and logging participants.

#![allow(dead_code, reason = "not every test binary uses every fixture")]
#![allow(unreachable_pub, reason = "test helpers shared across test binaries")]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use kurbo::{Affine, Point, Rect, Size, Vec2};
use understory_drag_drop::{
    CursorKind, CursorManager, DragDropCoordinator, DragPayload, DragSource, DropTarget,
    GroupFilter, ParentLookup, PointerEvent, RenderSurface, VisualTree,
};

/// Ordered record of everything participants and observers saw.
pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

/// Pointer event at `(x, y)` in drop-area space.
pub fn at(x: f64, y: f64) -> PointerEvent {
    PointerEvent::new(Point::new(x, y))
}

/// A tree where every node is offset from its parent by a translation.
///
/// Nodes handed to [`RenderSurface::add_child`] that are not yet in the tree
/// are attached to the surface at the origin and follow
/// [`RenderSurface::set_child_position`].
#[derive(Debug, Default)]
pub struct MockHost {
    parents: HashMap<u32, u32>,
    offsets: HashMap<u32, Vec2>,
    sizes: HashMap<u32, Size>,
    attached: Vec<u32>,
    /// `(surface, child)` pairs currently on a render surface.
    pub surface: Vec<(u32, u32)>,
    /// Last position set for each child.
    pub positions: HashMap<u32, Point>,
    pub cursor: Option<CursorKind>,
    /// Keep proxies off the tree: `add_child` only records them on the surface.
    pub detach_proxies: bool,
}

impl MockHost {
    /// A host whose tree holds only `root`.
    pub fn new(root: u32) -> Self {
        let mut host = Self::default();
        host.offsets.insert(root, Vec2::ZERO);
        host.sizes.insert(root, Size::new(1000.0, 1000.0));
        host
    }

    /// Add `node` under `parent` at `origin` (parent space) with size `size`.
    pub fn add(&mut self, node: u32, parent: u32, origin: (f64, f64), size: (f64, f64)) {
        self.parents.insert(node, parent);
        self.offsets.insert(node, Vec2::new(origin.0, origin.1));
        self.sizes.insert(node, Size::new(size.0, size.1));
    }

    /// Origin of `node` in root space, if it is part of the tree.
    fn absolute(&self, node: u32) -> Option<Vec2> {
        let mut total = *self.offsets.get(&node)?;
        let mut current = node;
        while let Some(parent) = self.parents.get(&current) {
            total += *self.offsets.get(parent)?;
            current = *parent;
        }
        Some(total)
    }

    pub fn children_of_surface(&self, surface: u32) -> Vec<u32> {
        self.surface
            .iter()
            .filter(|(s, _)| *s == surface)
            .map(|(_, c)| *c)
            .collect()
    }
}

impl ParentLookup<u32> for MockHost {
    fn parent_of(&self, node: &u32) -> Option<u32> {
        self.parents.get(node).copied()
    }
}

impl VisualTree<u32> for MockHost {
    fn transform_to(&self, from: &u32, to: &u32) -> Option<Affine> {
        Some(Affine::translate(self.absolute(*from)? - self.absolute(*to)?))
    }

    fn size_of(&self, node: &u32) -> Size {
        self.sizes.get(node).copied().unwrap_or(Size::ZERO)
    }
}

impl RenderSurface<u32> for MockHost {
    fn add_child(&mut self, surface: &u32, child: u32) {
        if !self.detach_proxies && !self.offsets.contains_key(&child) {
            self.parents.insert(child, *surface);
            self.offsets.insert(child, Vec2::ZERO);
            self.attached.push(child);
        }
        self.surface.push((*surface, child));
    }

    fn remove_child(&mut self, surface: &u32, child: &u32) {
        self.surface.retain(|(s, c)| !(s == surface && c == child));
        if let Some(i) = self.attached.iter().position(|c| c == child) {
            self.attached.remove(i);
            self.parents.remove(child);
            self.offsets.remove(child);
        }
    }

    fn set_child_position(&mut self, child: &u32, position: Point) {
        self.positions.insert(*child, position);
        if self.attached.contains(child) {
            self.offsets.insert(*child, position.to_vec2());
        }
    }
}

impl CursorManager for MockHost {
    fn set_global_cursor(&mut self, kind: CursorKind) {
        self.cursor = Some(kind);
    }

    fn clear_global_cursor(&mut self) {
        self.cursor = None;
    }
}

/// Drag source with builder-style configuration.
#[derive(Debug)]
pub struct TestSource {
    node: u32,
    zone: u32,
    selected: bool,
    group: String,
    proxy: Option<u32>,
    log: Option<Log>,
}

impl TestSource {
    pub fn new(node: u32) -> Self {
        Self {
            node,
            zone: node,
            selected: false,
            group: "cards".to_string(),
            proxy: None,
            log: None,
        }
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    pub fn zone(mut self, zone: u32) -> Self {
        self.zone = zone;
        self
    }

    pub fn group(mut self, group: &str) -> Self {
        self.group = group.to_string();
        self
    }

    pub fn proxy(mut self, proxy: u32) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn log(mut self, log: &Log) -> Self {
        self.log = Some(log.clone());
        self
    }

    pub fn boxed(self) -> Box<dyn DragSource<u32>> {
        Box::new(self)
    }
}

impl DragSource<u32> for TestSource {
    fn node(&self) -> u32 {
        self.node
    }

    fn capture_zone(&self) -> u32 {
        self.zone
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn drag_group_name(&self) -> &str {
        &self.group
    }

    fn set_drag_group_name(&mut self, name: &str) {
        self.group = name.to_string();
    }

    fn display_drag_source(&mut self) -> u32 {
        if let Some(log) = &self.log {
            log.borrow_mut().push(format!("proxy {}", self.node));
        }
        self.proxy.unwrap_or(self.node)
    }
}

/// Drop target whose drop zone is its own bounds.
#[derive(Debug)]
pub struct TestTarget {
    node: u32,
    size: Size,
    priority: i32,
    multiple: bool,
    accepts: bool,
    filter: GroupFilter,
    log: Option<Log>,
}

impl TestTarget {
    pub fn new(node: u32, size: (f64, f64)) -> Self {
        Self {
            node,
            size: Size::new(size.0, size.1),
            priority: 0,
            multiple: false,
            accepts: true,
            filter: GroupFilter::new(),
            log: None,
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn refusing(mut self) -> Self {
        self.accepts = false;
        self
    }

    pub fn deny(mut self, group: &str) -> Self {
        self.filter.deny(group);
        self
    }

    pub fn allow(mut self, group: &str) -> Self {
        self.filter.allow(group);
        self
    }

    pub fn log(mut self, log: &Log) -> Self {
        self.log = Some(log.clone());
        self
    }

    pub fn boxed(self) -> Box<dyn DropTarget<u32>> {
        Box::new(self)
    }

    fn record(&self, entry: String) {
        if let Some(log) = &self.log {
            log.borrow_mut().push(entry);
        }
    }
}

impl DropTarget<u32> for TestTarget {
    fn node(&self) -> u32 {
        self.node
    }

    fn drop_visibility_priority(&self) -> i32 {
        self.priority
    }

    fn group_filter(&self) -> &GroupFilter {
        &self.filter
    }

    fn group_filter_mut(&mut self) -> &mut GroupFilter {
        &mut self.filter
    }

    fn can_multiple_drop(&self) -> bool {
        self.multiple
    }

    fn is_in_drop_zone(&self, _main_source: &u32, pointer: &PointerEvent) -> bool {
        Rect::from_origin_size(Point::ZERO, self.size).contains(pointer.local_position)
    }

    fn can_drop(&self, _item: &dyn DragSource<u32>, _pointer: &PointerEvent) -> bool {
        self.accepts
    }

    fn on_enter_drop_zone(&mut self, payload: DragPayload<'_, u32>, _pointer: &PointerEvent) {
        self.record(format!("enter {} {}", self.node, payload.len()));
    }

    fn on_move_in_drop_zone(&mut self, _payload: DragPayload<'_, u32>, _pointer: &PointerEvent) {
        self.record(format!("move {}", self.node));
    }

    fn on_leave_drop_zone(&mut self) {
        self.record(format!("leave {}", self.node));
    }
}

/// Record start-drag, drop, invalid-drop, start-drop and end-drop in `log`.
pub fn observe(dnd: &mut DragDropCoordinator<u32>, log: &Log) {
    let events = dnd.events_mut();
    let l = log.clone();
    events.on_start_drag(move |e| l.borrow_mut().push(format!("start_drag {}", e.source)));
    let l = log.clone();
    events.on_drop(move |e| {
        l.borrow_mut()
            .push(format!("drop {}->{}", e.source, e.target));
    });
    let l = log.clone();
    events.on_invalid_drop(move || l.borrow_mut().push("invalid_drop".to_string()));
    let l = log.clone();
    events.on_start_drop(move || l.borrow_mut().push("start_drop".to_string()));
    let l = log.clone();
    events.on_end_drop(move || l.borrow_mut().push("end_drop".to_string()));
}
