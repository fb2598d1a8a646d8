// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and the mark
//! protocol.

use alloc::vec::Vec;

use crate::compositor::LayerRole;
use crate::geometry::IntRect;

use super::id::{INVALID, NodeId};
use super::marks::Marks;
use super::traverse::{Children, Descendants};

/// Struct-of-arrays storage for all nodes.
///
/// Nodes are addressed by [`NodeId`] handles. Each node occupies a slot in
/// parallel arrays; children are kept in an intrusive sibling list so their
/// order is the paint order within the parent (later is on top). The
/// `parent` link is only read to propagate marks upward and is cleared on
/// detach. Destroyed nodes are recycled via a free list, and generation
/// counters prevent stale handle access.
///
/// # Mark invariant
///
/// After every public call, a node carries `CHILD_NEEDS_PAINT`
/// (resp. `CHILD_NEEDS_LAYOUT`) if and only if at least one strict
/// descendant carries a paint (resp. layout) mark. Traversals rely on this to
/// skip unmarked subtrees.
#[derive(Debug)]
pub struct NodeStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) last_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Per-node state --
    pub(crate) bounds: Vec<IntRect>,
    pub(crate) marks: Vec<Marks>,
    pub(crate) role: Vec<LayerRole>,

    // -- Paint bookkeeping --
    pub(crate) painted: Vec<Option<IntRect>>,
    pub(crate) vacated: Vec<Vec<IntRect>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    /// Creates an empty node store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            last_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            bounds: Vec::new(),
            marks: Vec::new(),
            role: Vec::new(),
            painted: Vec::new(),
            vacated: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    // -- Allocation API --

    /// Creates a new detached node with the given bounds and no marks.
    pub fn create_node(&mut self, bounds: IntRect) -> NodeId {
        self.create_with_role(bounds, LayerRole::Content)
    }

    pub(crate) fn create_with_role(&mut self, bounds: IntRect, role: LayerRole) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.last_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.bounds[i] = bounds;
            self.marks[i] = Marks::EMPTY;
            self.role[i] = role;
            self.painted[i] = None;
            self.vacated[i].clear();
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.last_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.bounds.push(bounds);
            self.marks.push(Marks::EMPTY);
            self.role.push(role);
            self.painted.push(None);
            self.vacated.push(Vec::new());
            self.generation.push(0);
            idx
        };

        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a node, freeing its slot for reuse.
    ///
    /// The node is detached first if it still has a parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, if the node has children (destroy or
    /// detach them first), or if the node is one of the compositor's layer
    /// roots.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy node with children"
        );
        assert!(
            self.role[idx as usize] == LayerRole::Content,
            "cannot destroy a compositor layer"
        );

        if self.parent[idx as usize] != INVALID {
            self.detach(idx);
        }

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len) && self.generation[id.idx as usize] == id.generation
    }

    // -- Topology API --

    /// Adds `child` as the last (topmost) child of `parent`.
    ///
    /// Pending marks already carried by `child`'s subtree are propagated to
    /// its new ancestors.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` already has a parent, if
    /// `child` is `parent` or one of its ancestors, or if `parent` is the
    /// compositor root (nodes go into one of the layers).
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        self.check_attach(parent.idx, child.idx);

        let p = parent.idx;
        let c = child.idx;
        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = INVALID;
        self.prev_sibling[c as usize] = self.last_child[p as usize];
        if self.last_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            self.next_sibling[self.last_child[p as usize] as usize] = c;
        }
        self.last_child[p as usize] = c;

        self.propagate_attached(c);
    }

    /// Inserts `child` immediately below `next` in `next`'s parent.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, `next` has
    /// no parent, `next`'s parent is the compositor root, or the insertion
    /// would create a cycle.
    pub fn insert_before(&mut self, child: NodeId, next: NodeId) {
        self.validate(child);
        self.validate(next);
        let c = child.idx;
        let s = next.idx;
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");
        self.check_attach(p, c);

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];
        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            // `next` was the first child.
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        self.propagate_attached(c);
    }

    /// Detaches `child` from its parent.
    ///
    /// The former ancestors' `CHILD_NEEDS_*` marks are recomputed. When a
    /// float layer loses a child that had been drawn, the child's last
    /// painted bounds are recorded as vacated on the layer and the layer's
    /// layout pass is scheduled so the region beneath gets repainted.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, the node has no parent, or the node is
    /// a compositor layer root.
    pub fn remove_from_parent(&mut self, child: NodeId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "node has no parent");
        assert!(
            self.role[c as usize] == LayerRole::Content,
            "cannot detach a compositor layer"
        );
        self.detach(c);
    }

    /// Returns the parent of a node, if attached.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.handle(self.parent[id.idx as usize])
    }

    /// Returns an iterator over the direct children of a node, bottom to top.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the bottommost child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.handle(self.first_child[id.idx as usize])
    }

    /// Returns the topmost child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.handle(self.last_child[id.idx as usize])
    }

    /// Returns the number of direct children.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Returns a depth-first pre-order iterator over `id` and its subtree.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        self.validate(id);
        Descendants::new(self, id.idx)
    }

    // -- Properties --

    /// Returns the bounds of a node in screen space.
    #[must_use]
    pub fn bounds(&self, id: NodeId) -> IntRect {
        self.validate(id);
        self.bounds[id.idx as usize]
    }

    /// Sets the bounds of a node.
    ///
    /// No marks are set; callers mark layout or paint as the change requires.
    pub fn set_bounds(&mut self, id: NodeId, bounds: IntRect) {
        self.validate(id);
        self.bounds[id.idx as usize] = bounds;
    }

    /// Returns the bounds the node occupies on screen: its bounds, or
    /// [`IntRect::ZERO`] while it carries `FORCE_ZERO_BOUNDS`.
    #[must_use]
    pub fn effective_bounds(&self, id: NodeId) -> IntRect {
        self.validate(id);
        if self.is_visible_at(id.idx) {
            self.bounds[id.idx as usize]
        } else {
            IntRect::ZERO
        }
    }

    /// Returns the marks of a node.
    #[must_use]
    pub fn marks(&self, id: NodeId) -> Marks {
        self.validate(id);
        self.marks[id.idx as usize]
    }

    /// Returns `true` unless the node carries `FORCE_ZERO_BOUNDS`.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.validate(id);
        self.is_visible_at(id.idx)
    }

    /// Returns the compositor role of a node.
    #[must_use]
    pub fn role(&self, id: NodeId) -> LayerRole {
        self.validate(id);
        self.role[id.idx as usize]
    }

    /// Returns the bounds the node had when it was last drawn, if it has been
    /// drawn since it was attached.
    #[must_use]
    pub fn painted_bounds(&self, id: NodeId) -> Option<IntRect> {
        self.validate(id);
        self.painted[id.idx as usize]
    }

    /// Sets state marks ([`Marks::STATE`]) on a node.
    ///
    /// # Panics
    ///
    /// Panics if `flags` contains pending-work marks; use
    /// [`mark_needs_paint`](Self::mark_needs_paint) or
    /// [`mark_needs_layout`](Self::mark_needs_layout) for those.
    pub fn insert_flags(&mut self, id: NodeId, flags: Marks) {
        self.validate(id);
        assert!(
            Marks::STATE.contains(flags),
            "only state marks can be set directly: {flags:?}"
        );
        self.marks[id.idx as usize].insert(flags);
    }

    /// Clears state marks ([`Marks::STATE`]) on a node.
    ///
    /// # Panics
    ///
    /// Panics if `flags` contains pending-work marks.
    pub fn remove_flags(&mut self, id: NodeId, flags: Marks) {
        self.validate(id);
        assert!(
            Marks::STATE.contains(flags),
            "only state marks can be cleared directly: {flags:?}"
        );
        self.marks[id.idx as usize].remove(flags);
    }

    /// Hides or shows a node by setting or clearing `FORCE_ZERO_BOUNDS`.
    ///
    /// When visibility actually changes the node is marked as needing layout,
    /// which for float-layer children schedules the layer's layout pass.
    ///
    /// Hiding a drawn node outside the float layers marks its parent as
    /// needing paint, so the pixels it leaves behind are redrawn. Float
    /// layers handle their own children in their layout hook.
    pub fn set_force_zero_bounds(&mut self, id: NodeId, hidden: bool) {
        self.validate(id);
        let idx = id.idx as usize;
        let marks = &mut self.marks[idx];
        if marks.contains(Marks::FORCE_ZERO_BOUNDS) == hidden {
            return;
        }
        marks.set(Marks::FORCE_ZERO_BOUNDS, hidden);

        let p = self.parent[idx];
        if hidden
            && p != INVALID
            && !matches!(self.role[p as usize], LayerRole::Float(_))
            && self.painted[idx].take().is_some()
        {
            self.mark_needs_paint_at(p);
        }
        self.mark_needs_layout(id);
    }

    // -- Mark protocol --

    /// Marks a node as needing paint and sets `CHILD_NEEDS_PAINT` on every
    /// ancestor, stopping at the first one that already carries it.
    pub fn mark_needs_paint(&mut self, id: NodeId) {
        self.validate(id);
        self.mark_needs_paint_at(id.idx);
    }

    /// Marks a node as needing layout and sets `CHILD_NEEDS_LAYOUT` on every
    /// ancestor, stopping at the first one that already carries it.
    ///
    /// A float layer reached by the walk marks itself as needing layout too,
    /// since its overlays sit outside normal flow layout.
    pub fn mark_needs_layout(&mut self, id: NodeId) {
        self.validate(id);
        self.mark_needs_layout_at(id.idx);
    }

    pub(crate) fn mark_needs_paint_at(&mut self, idx: u32) {
        self.marks[idx as usize].insert(Marks::NEEDS_PAINT);
        self.propagate_up(idx, Marks::CHILD_NEEDS_PAINT);
    }

    pub(crate) fn mark_needs_layout_at(&mut self, idx: u32) {
        self.marks[idx as usize].insert(Marks::NEEDS_LAYOUT);
        self.propagate_up(idx, Marks::CHILD_NEEDS_LAYOUT);
    }

    /// Sets `flag` on the ancestors of `idx` until one already carries it.
    fn propagate_up(&mut self, idx: u32, flag: Marks) {
        let mut p = self.parent[idx as usize];
        while p != INVALID {
            let marks = &mut self.marks[p as usize];
            if marks.contains(flag) {
                break;
            }
            marks.insert(flag);
            self.on_child_marked(p, flag);
            p = self.parent[p as usize];
        }
    }

    /// Role-specific reaction of an ancestor to a newly marked descendant.
    fn on_child_marked(&mut self, idx: u32, flag: Marks) {
        if let LayerRole::Float(_) = self.role[idx as usize]
            && flag == Marks::CHILD_NEEDS_LAYOUT
        {
            self.marks[idx as usize].insert(Marks::NEEDS_LAYOUT);
        }
    }

    /// Propagates the marks of a freshly attached subtree to its ancestors.
    fn propagate_attached(&mut self, idx: u32) {
        let marks = self.marks[idx as usize];
        if marks.intersects(Marks::ANY_PAINT) {
            self.propagate_up(idx, Marks::CHILD_NEEDS_PAINT);
        }
        if marks.intersects(Marks::ANY_LAYOUT) {
            self.propagate_up(idx, Marks::CHILD_NEEDS_LAYOUT);
        }
    }

    /// Recomputes `CHILD_NEEDS_*` from the children of `idx` and its
    /// ancestors, stopping once a node's marks are unchanged.
    pub(crate) fn recompute_child_marks(&mut self, mut idx: u32) {
        while idx != INVALID && self.refresh_child_marks_at(idx) {
            idx = self.parent[idx as usize];
        }
    }

    /// Recomputes `CHILD_NEEDS_*` on `idx` alone from its children's marks.
    ///
    /// Returns `true` if the marks changed.
    pub(crate) fn refresh_child_marks_at(&mut self, idx: u32) -> bool {
        let mut from_children = Marks::EMPTY;
        let mut c = self.first_child[idx as usize];
        while c != INVALID {
            let m = self.marks[c as usize];
            if m.intersects(Marks::ANY_PAINT) {
                from_children.insert(Marks::CHILD_NEEDS_PAINT);
            }
            if m.intersects(Marks::ANY_LAYOUT) {
                from_children.insert(Marks::CHILD_NEEDS_LAYOUT);
            }
            c = self.next_sibling[c as usize];
        }
        let old = self.marks[idx as usize];
        let mut new = old;
        new.remove(Marks::CHILD_NEEDS_PAINT | Marks::CHILD_NEEDS_LAYOUT);
        new.insert(from_children);
        self.marks[idx as usize] = new;
        new != old
    }

    // -- Crate-internal helpers for the compositor passes --

    #[inline]
    pub(crate) fn is_visible_at(&self, idx: u32) -> bool {
        !self.marks[idx as usize].contains(Marks::FORCE_ZERO_BOUNDS)
    }

    #[inline]
    pub(crate) fn clear_marks_at(&mut self, idx: u32, marks: Marks) {
        self.marks[idx as usize].remove(marks);
    }

    pub(crate) fn take_vacated(&mut self, idx: u32) -> Vec<IntRect> {
        core::mem::take(&mut self.vacated[idx as usize])
    }

    pub(crate) fn handle(&self, idx: u32) -> Option<NodeId> {
        if idx == INVALID {
            None
        } else {
            Some(NodeId {
                idx,
                generation: self.generation[idx as usize],
            })
        }
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Panics unless `c` may become a child of `p`.
    fn check_attach(&self, p: u32, c: u32) {
        assert!(
            self.role[p as usize] != LayerRole::Root,
            "nodes should be inserted into one of the layers directly"
        );
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let mut a = p;
        while a != INVALID {
            assert!(a != c, "cannot attach a node below itself");
            a = self.parent[a as usize];
        }
    }

    /// Unlinks `idx` from its parent and restores the mark invariant.
    fn detach(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            self.first_child[p as usize] = next;
        }
        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        } else {
            self.last_child[p as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;

        self.recompute_child_marks(p);

        let painted = self.painted[idx as usize].take();
        if let LayerRole::Float(_) = self.role[p as usize]
            && let Some(painted) = painted
        {
            self.vacated[p as usize].push(painted);
            self.mark_needs_layout_at(p);
        }
    }

    /// Attaches a compositor layer root as the last child of `parent`,
    /// bypassing the check that keeps content out of the root.
    pub(crate) fn append_layer(&mut self, parent: NodeId, layer: NodeId) {
        let p = parent.idx;
        let c = layer.idx;
        debug_assert!(self.parent[c as usize] == INVALID, "layer already attached");
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = self.last_child[p as usize];
        if self.last_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            self.next_sibling[self.last_child[p as usize] as usize] = c;
        }
        self.last_child[p as usize] = c;
    }
}
