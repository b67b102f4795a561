// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised by registration and arming.

use core::fmt;

/// Which kind of participant an error refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// A [`DragSource`](crate::participant::DragSource).
    DragSource,
    /// A [`DropTarget`](crate::participant::DropTarget).
    DropTarget,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DragSource => "drag source",
            Self::DropTarget => "drop target",
        })
    }
}

/// Programming errors reported synchronously to the caller.
///
/// None of these are recoverable by the coordinator itself; they indicate a
/// mismatch between what the host registered and what it asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragDropError<K> {
    /// A participant with this node is already registered.
    AlreadyRegistered {
        /// The registry that rejected the participant.
        role: Role,
        /// The participant's node.
        node: K,
    },
    /// No participant with this node is registered.
    NotRegistered {
        /// The registry that was searched.
        role: Role,
        /// The node that was looked up.
        node: K,
    },
    /// A pointer-down on a capture zone did not lead to any registered drag source.
    NoOwningDragSource {
        /// The capture zone that received the pointer-down.
        capture_zone: K,
    },
}

impl<K: fmt::Debug> fmt::Display for DragDropError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRegistered { role, node } => {
                write!(f, "{role} {node:?} is already registered")
            }
            Self::NotRegistered { role, node } => write!(f, "{role} {node:?} is not registered"),
            Self::NoOwningDragSource { capture_zone } => write!(
                f,
                "no registered drag source owns capture zone {capture_zone:?}"
            ),
        }
    }
}

impl<K: fmt::Debug> core::error::Error for DragDropError<K> {}
