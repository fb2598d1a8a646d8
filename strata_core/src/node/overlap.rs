// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle queries over the marked part of a subtree.
//!
//! Both walks only descend into children whose bounds overlap the query
//! rectangle, and [`has_pending_paint_under`](NodeStore::has_pending_paint_under)
//! additionally only descends through `CHILD_NEEDS_PAINT`, so their cost
//! follows the marked, overlapping part of the tree rather than its size.
//! Hidden nodes (`FORCE_ZERO_BOUNDS`) are never considered: they are not
//! drawn and cover nothing.

use alloc::vec;
use alloc::vec::Vec;

use crate::geometry::IntRect;

use super::id::{INVALID, NodeId};
use super::marks::Marks;
use super::store::NodeStore;

/// One level of the explicit stack used by the covered-marking walk.
#[derive(Debug)]
struct Frame {
    /// Next child to examine, or the child being descended into while a
    /// deeper frame is on the stack.
    cursor: u32,
    /// Union of everything marked at this level so far.
    marked: IntRect,
    /// Disjoint parts of the query rectangle, clipped to this level's node,
    /// that no visible child covers yet.
    uncovered: Vec<IntRect>,
}

impl Frame {
    fn new(cursor: u32, clip: IntRect) -> Self {
        let uncovered = if clip.is_empty() { Vec::new() } else { vec![clip] };
        Self {
            cursor,
            marked: IntRect::ZERO,
            uncovered,
        }
    }

    /// Removes `covered` from the uncovered region.
    fn cover(&mut self, covered: IntRect) {
        if self.uncovered.iter().all(|r| !r.overlaps(covered)) {
            return;
        }
        let mut rest = Vec::with_capacity(self.uncovered.len() + 3);
        for r in self.uncovered.drain(..) {
            subtract(r, covered, &mut rest);
        }
        self.uncovered = rest;
    }

    /// Whether the children seen so far cover the whole clip.
    fn is_covered(&self) -> bool {
        self.uncovered.is_empty()
    }
}

/// Pushes the parts of `r` outside `hole` as up to four disjoint bands.
fn subtract(r: IntRect, hole: IntRect, out: &mut Vec<IntRect>) {
    let h = r.intersect(hole);
    if h.is_empty() {
        out.push(r);
        return;
    }
    let bands = [
        IntRect::new(r.x0, r.y0, r.x1, h.y0),
        IntRect::new(r.x0, h.y1, r.x1, r.y1),
        IntRect::new(r.x0, h.y0, h.x0, h.y1),
        IntRect::new(h.x1, h.y0, r.x1, h.y1),
    ];
    out.extend(bands.into_iter().filter(|b| !b.is_empty()));
}

impl NodeStore {
    /// Returns `true` if a node below `under` whose bounds overlap `rect`
    /// already needs paint.
    ///
    /// A child overlapping `rect` that carries `NEEDS_PAINT` ends the search;
    /// one that only carries `CHILD_NEEDS_PAINT` is searched in turn; clean
    /// or non-overlapping children are skipped without descending.
    #[must_use]
    pub fn has_pending_paint_under(&self, under: NodeId, rect: IntRect) -> bool {
        self.validate(under);
        let mut stack = vec![under.idx];
        while let Some(idx) = stack.pop() {
            let mut child = self.first_child[idx as usize];
            while child != INVALID {
                let c = child as usize;
                if self.is_visible_at(child) && self.bounds[c].overlaps(rect) {
                    let marks = self.marks[c];
                    if marks.contains(Marks::NEEDS_PAINT) {
                        return true;
                    }
                    if marks.contains(Marks::CHILD_NEEDS_PAINT) {
                        stack.push(child);
                    }
                }
                child = self.next_sibling[c];
            }
        }
        false
    }

    /// Marks as needing paint the nodes below `under` that `rect` covers and
    /// that are not already scheduled, returning the union of their bounds.
    ///
    /// A child only partly covered by `rect` is first searched for smaller
    /// descendants to mark instead; the child itself is marked only when its
    /// descendants do not cover the overlap. A fully covered child, or a
    /// partly covered leaf, is marked directly.
    pub fn mark_covered_needs_paint(&mut self, under: NodeId, rect: IntRect) -> IntRect {
        self.validate(under);
        if rect.is_empty() {
            return IntRect::ZERO;
        }

        let mut frames: Vec<Frame> = vec![Frame::new(
            self.first_child[under.idx as usize],
            rect.intersect(self.bounds[under.idx as usize]),
        )];

        loop {
            let top = frames.len() - 1;
            let child = frames[top].cursor;

            if child == INVALID {
                let Some(done) = frames.pop() else {
                    return IntRect::ZERO;
                };
                let Some(parent) = frames.last_mut() else {
                    return done.marked;
                };
                // `parent.cursor` is the child we just finished searching.
                let c = parent.cursor;
                parent.cursor = self.next_sibling[c as usize];
                parent.marked = parent.marked.union(done.marked);
                if !done.is_covered() {
                    parent.marked = parent.marked.union(self.bounds[c as usize]);
                    self.mark_needs_paint_at(c);
                }
                continue;
            }

            let c = child as usize;
            let bounds = self.bounds[c];
            if !self.is_visible_at(child) || !bounds.overlaps(rect) {
                frames[top].cursor = self.next_sibling[c];
                continue;
            }
            frames[top].cover(bounds);
            if self.marks[c].contains(Marks::NEEDS_PAINT) {
                frames[top].cursor = self.next_sibling[c];
                continue;
            }

            let first = self.first_child[c];
            let clip = rect.intersect(bounds);
            if clip != bounds && first != INVALID {
                frames.push(Frame::new(first, clip));
                continue;
            }

            frames[top].marked = frames[top].marked.union(bounds);
            frames[top].cursor = self.next_sibling[c];
            self.mark_needs_paint_at(child);
        }
    }
}
