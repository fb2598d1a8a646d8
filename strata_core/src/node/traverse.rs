// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec;
use alloc::vec::Vec;

use super::id::{INVALID, NodeId};
use super::store::NodeStore;

/// An iterator over the direct children of a node, bottom to top.
///
/// Created by [`NodeStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a NodeStore,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a NodeStore, first: u32) -> Self {
        Self {
            store,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.next_sibling[idx as usize];
        Some(NodeId {
            idx,
            generation: self.store.generation[idx as usize],
        })
    }
}

/// A depth-first pre-order iterator over a subtree, root included.
///
/// Uses an explicit stack, so nesting depth does not grow the call stack.
/// Created by [`NodeStore::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    store: &'a NodeStore,
    stack: Vec<u32>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(store: &'a NodeStore, root: u32) -> Self {
        Self {
            store,
            stack: vec![root],
        }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.stack.pop()?;
        // Push children top to bottom so the bottommost is visited first.
        let mut child = self.store.last_child[idx as usize];
        while child != INVALID {
            self.stack.push(child);
            child = self.store.prev_sibling[child as usize];
        }
        Some(NodeId {
            idx,
            generation: self.store.generation[idx as usize],
        })
    }
}
