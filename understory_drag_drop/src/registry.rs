// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry of drag sources and drop targets.
//!
//! Both collections keep registration order, which is the iteration order used
//! when building the dragged set and when collecting drop candidates.
//! Participants are keyed by their node: a node can be registered at most once
//! per role.
//!
//! Registering a drag source also records its capture zone, so pointer-downs
//! on that zone can be routed back to it. Removing the source forgets the zone;
//! a later pointer-down there is ignored.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::error::{DragDropError, Role};
use crate::participant::{DragSource, DropTarget};

struct SourceEntry<K> {
    node: K,
    capture_zone: K,
    source: Box<dyn DragSource<K>>,
}

struct TargetEntry<K> {
    node: K,
    target: Box<dyn DropTarget<K>>,
}

/// Insertion-ordered collections of drag sources and drop targets.
pub struct Registry<K> {
    sources: Vec<SourceEntry<K>>,
    targets: Vec<TargetEntry<K>>,
}

impl<K> Default for Registry<K> {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            targets: Vec::new(),
        }
    }
}

impl<K: Copy + Eq> Registry<K> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a drag source and start routing its capture zone.
    pub fn register_drag_source(
        &mut self,
        source: Box<dyn DragSource<K>>,
    ) -> Result<(), DragDropError<K>> {
        let node = source.node();
        if self.source_index(&node).is_some() {
            return Err(DragDropError::AlreadyRegistered {
                role: Role::DragSource,
                node,
            });
        }
        self.sources.push(SourceEntry {
            node,
            capture_zone: source.capture_zone(),
            source,
        });
        Ok(())
    }

    /// Remove a drag source and stop routing its capture zone.
    pub fn remove_drag_source(
        &mut self,
        node: &K,
    ) -> Result<Box<dyn DragSource<K>>, DragDropError<K>> {
        let idx = self
            .source_index(node)
            .ok_or(DragDropError::NotRegistered {
                role: Role::DragSource,
                node: *node,
            })?;
        Ok(self.sources.remove(idx).source)
    }

    /// Register a drop target.
    pub fn register_drop_target(
        &mut self,
        target: Box<dyn DropTarget<K>>,
    ) -> Result<(), DragDropError<K>> {
        let node = target.node();
        if self.target_index(&node).is_some() {
            return Err(DragDropError::AlreadyRegistered {
                role: Role::DropTarget,
                node,
            });
        }
        self.targets.push(TargetEntry { node, target });
        Ok(())
    }

    /// Register a drop target and add `allowed` to its allow-list.
    pub fn register_drop_target_with_groups<'a>(
        &mut self,
        mut target: Box<dyn DropTarget<K>>,
        allowed: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), DragDropError<K>> {
        if self.target_index(&target.node()).is_none() {
            let filter = target.group_filter_mut();
            for name in allowed {
                filter.allow(name);
            }
        }
        self.register_drop_target(target)
    }

    /// Remove a drop target.
    pub fn remove_drop_target(
        &mut self,
        node: &K,
    ) -> Result<Box<dyn DropTarget<K>>, DragDropError<K>> {
        let idx = self
            .target_index(node)
            .ok_or(DragDropError::NotRegistered {
                role: Role::DropTarget,
                node: *node,
            })?;
        Ok(self.targets.remove(idx).target)
    }

    /// Remove every drag source.
    pub fn clear_drag_sources(&mut self) {
        self.sources.clear();
    }

    /// Remove every drop target.
    pub fn clear_drop_targets(&mut self) {
        self.targets.clear();
    }

    /// Number of registered drag sources.
    #[must_use]
    pub fn drag_source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of registered drop targets.
    #[must_use]
    pub fn drop_target_count(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if `node` is a registered drag source.
    #[must_use]
    pub fn is_drag_source(&self, node: &K) -> bool {
        self.source_index(node).is_some()
    }

    /// Returns `true` if `node` is a registered drop target.
    #[must_use]
    pub fn is_drop_target(&self, node: &K) -> bool {
        self.target_index(node).is_some()
    }

    /// The drag source registered for `node`.
    #[must_use]
    pub fn drag_source(&self, node: &K) -> Option<&(dyn DragSource<K> + 'static)> {
        self.source_index(node).map(|i| &*self.sources[i].source)
    }

    /// Mutable access to the drag source registered for `node`.
    pub fn drag_source_mut(&mut self, node: &K) -> Option<&mut (dyn DragSource<K> + 'static)> {
        let idx = self.source_index(node)?;
        Some(&mut *self.sources[idx].source)
    }

    /// The drop target registered for `node`.
    #[must_use]
    pub fn drop_target(&self, node: &K) -> Option<&(dyn DropTarget<K> + 'static)> {
        self.target_index(node).map(|i| &*self.targets[i].target)
    }

    /// Mutable access to the drop target registered for `node`.
    pub fn drop_target_mut(&mut self, node: &K) -> Option<&mut (dyn DropTarget<K> + 'static)> {
        let idx = self.target_index(node)?;
        Some(&mut *self.targets[idx].target)
    }

    /// Returns `true` if `zone` is the capture zone of a registered source.
    #[must_use]
    pub fn is_capture_zone(&self, zone: &K) -> bool {
        self.sources.iter().any(|e| e.capture_zone == *zone)
    }

    /// Drag sources in registration order.
    pub fn drag_sources(&self) -> impl Iterator<Item = &(dyn DragSource<K> + 'static)> {
        self.sources.iter().map(|e| &*e.source)
    }

    /// Drop targets in registration order.
    pub fn drop_targets(&self) -> impl Iterator<Item = &(dyn DropTarget<K> + 'static)> {
        self.targets.iter().map(|e| &*e.target)
    }

    fn source_index(&self, node: &K) -> Option<usize> {
        self.sources.iter().position(|e| e.node == *node)
    }

    fn target_index(&self, node: &K) -> Option<usize> {
        self.targets.iter().position(|e| e.node == *node)
    }
}

impl<K: fmt::Debug> fmt::Debug for Registry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field(
                "sources",
                &self.sources.iter().map(|e| &e.node).collect::<Vec<_>>(),
            )
            .field(
                "targets",
                &self.targets.iter().map(|e| &e.node).collect::<Vec<_>>(),
            )
            .finish()
    }
}
