// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The four-layer compositor.
//!
//! A [`MultiLayer`] owns a [`NodeStore`] whose root has exactly four
//! children, created once in a fixed paint order:
//!
//! ```text
//!   root
//!    ├── background   document and window content
//!    ├── separator    passive decorations
//!    ├── context      context overlays (float layer)
//!    └── menu         menus and popups (float layer, topmost)
//! ```
//!
//! Content goes into one of the layers; attaching anything directly below
//! the root panics. All four layer roots carry
//! [`NOT_DRAGGABLE`](Marks::NOT_DRAGGABLE) so drag hit-testing falls through
//! them to the content beneath.
//!
//! # Paint cycle
//!
//! [`paint_marked`](MultiLayer::paint_marked) runs once per frame:
//!
//! 1. If any layout mark is pending, the pruned layout pass
//!    ([`layout_marked`](MultiLayer::layout_marked)) runs first. Float layers
//!    reached by it run their layout hook, which repaints their visible
//!    overlays together with the background they cover.
//! 2. Overlay pre-marking, context layer then menu layer: a visible overlay
//!    sitting over background content that is about to repaint is scheduled
//!    too, and so is the background it covers.
//! 3. A pruned depth-first traversal draws every visible node carrying
//!    `NEEDS_PAINT`, clears the marks it consumes, and returns the union of
//!    the drawn bounds.

mod background;
mod float;
mod layout;
mod paint;

pub use background::BackgroundLayer;
pub use float::FloatLayer;

use alloc::vec;

use crate::geometry::{IntPoint, IntRect};
use crate::node::{INVALID, Marks, NodeId, NodeStore};

/// Which of the two float layers a node belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FloatLayerKind {
    /// Context overlays: completion lists, hover cards.
    Context,
    /// Menus and popups, above everything else.
    Menu,
}

/// The compositor role of a node.
///
/// Every node created through [`NodeStore::create_node`] is plain
/// [`Content`](Self::Content); the other roles are reserved for the roots a
/// [`MultiLayer`] creates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerRole {
    /// An ordinary node.
    Content,
    /// The compositor root, parent of the four layers.
    Root,
    /// Root of the background layer.
    Background,
    /// Root of the separator layer.
    Separator,
    /// Root of a float layer.
    Float(FloatLayerKind),
}

/// Configuration for a [`MultiLayer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CompositorConfig {
    /// Also schedule a menu overlay when the context overlay beneath it is
    /// about to repaint.
    pub check_lower_overlays: bool,
    /// Repaint the background under the previous position of an overlay that
    /// moved, was hidden, or was removed from its layer.
    pub invalidate_vacated: bool,
}

impl CompositorConfig {
    /// Full overlay reconciliation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            check_lower_overlays: true,
            invalidate_vacated: true,
        }
    }

    /// Overlays are checked against the background only, and only at their
    /// current bounds. Callers that move or hide overlays are responsible
    /// for invalidating the region left behind.
    #[must_use]
    pub const fn background_only() -> Self {
        Self {
            check_lower_overlays: false,
            invalidate_vacated: false,
        }
    }
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A fixed stack of four layers with cross-layer invalidation.
///
/// # Usage
///
/// ```rust,ignore
/// let mut ui = MultiLayer::new(IntRect::new(0, 0, 800, 600));
/// let editor = ui.nodes_mut().create_node(IntRect::new(0, 0, 800, 580));
/// ui.append_child(ui.background(), editor);
///
/// ui.nodes_mut().mark_needs_paint(editor);
/// let dirty = ui.paint_marked(&mut widgets);
/// ```
#[derive(Debug)]
pub struct MultiLayer {
    nodes: NodeStore,
    root: NodeId,
    background: NodeId,
    separator: NodeId,
    context: NodeId,
    menu: NodeId,
    config: CompositorConfig,
    cycle: u64,
}

impl MultiLayer {
    /// Creates a compositor covering `bounds` with the default configuration.
    #[must_use]
    pub fn new(bounds: IntRect) -> Self {
        Self::with_config(bounds, CompositorConfig::new())
    }

    /// Creates a compositor covering `bounds`.
    #[must_use]
    pub fn with_config(bounds: IntRect, config: CompositorConfig) -> Self {
        let mut nodes = NodeStore::new();
        let root = nodes.create_with_role(bounds, LayerRole::Root);
        let background = nodes.create_with_role(bounds, LayerRole::Background);
        let separator = nodes.create_with_role(bounds, LayerRole::Separator);
        let context = nodes.create_with_role(bounds, LayerRole::Float(FloatLayerKind::Context));
        let menu = nodes.create_with_role(bounds, LayerRole::Float(FloatLayerKind::Menu));

        // Paint order, bottom to top.
        for layer in [background, separator, context, menu] {
            nodes.append_layer(root, layer);
            nodes.insert_flags(layer, Marks::NOT_DRAGGABLE);
        }

        Self {
            nodes,
            root,
            background,
            separator,
            context,
            menu,
            config,
            cycle: 0,
        }
    }

    /// Returns the node store.
    #[must_use]
    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    /// Returns the node store for creating, arranging, and marking nodes.
    pub fn nodes_mut(&mut self) -> &mut NodeStore {
        &mut self.nodes
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> CompositorConfig {
        self.config
    }

    /// Returns the number of paint cycles run so far.
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// The compositor root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Root of the background layer.
    #[must_use]
    pub fn background(&self) -> NodeId {
        self.background
    }

    /// Root of the separator layer.
    #[must_use]
    pub fn separator(&self) -> NodeId {
        self.separator
    }

    /// Root of the context overlay layer.
    #[must_use]
    pub fn context(&self) -> NodeId {
        self.context
    }

    /// Root of the menu overlay layer.
    #[must_use]
    pub fn menu(&self) -> NodeId {
        self.menu
    }

    /// Adds `child` as the topmost child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is the compositor root: nodes should be inserted
    /// into one of the layers directly. See also
    /// [`NodeStore::append_child`].
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes.append_child(parent, child);
    }

    /// Inserts `child` immediately below `next`.
    ///
    /// # Panics
    ///
    /// Panics if `next` is one of the layer roots, since `child` would land
    /// directly below the compositor root. See also
    /// [`NodeStore::insert_before`].
    pub fn insert_before(&mut self, child: NodeId, next: NodeId) {
        self.nodes.insert_before(child, next);
    }

    /// Resizes the root and the four layers and schedules a full layout.
    pub fn resize(&mut self, bounds: IntRect) {
        for id in [
            self.root,
            self.background,
            self.separator,
            self.context,
            self.menu,
        ] {
            self.nodes.set_bounds(id, bounds);
        }
        self.nodes.mark_needs_layout(self.root);
    }

    /// Returns a view of the background layer.
    pub fn background_layer(&mut self) -> BackgroundLayer<'_> {
        BackgroundLayer::new(&mut self.nodes, self.background)
    }

    /// Returns a view of the context overlay layer.
    pub fn context_layer(&mut self) -> FloatLayer<'_> {
        self.float_layer(FloatLayerKind::Context)
    }

    /// Returns a view of the menu overlay layer.
    pub fn menu_layer(&mut self) -> FloatLayer<'_> {
        self.float_layer(FloatLayerKind::Menu)
    }

    pub(crate) fn float_layer(&mut self, kind: FloatLayerKind) -> FloatLayer<'_> {
        let id = match kind {
            FloatLayerKind::Context => self.context,
            FloatLayerKind::Menu => self.menu,
        };
        FloatLayer::new(
            &mut self.nodes,
            id,
            kind,
            self.background,
            self.context,
            self.config,
        )
    }

    /// Returns the topmost visible node under `point` that accepts drags.
    ///
    /// Nodes carrying [`NOT_DRAGGABLE`](Marks::NOT_DRAGGABLE), the layer
    /// roots among them, are transparent: the search continues with whatever
    /// lies beneath them. A node is only searched if its bounds contain the
    /// point.
    #[must_use]
    pub fn drag_target_at(&self, point: IntPoint) -> Option<NodeId> {
        // `(idx, expanded)`: a node is a candidate once all of the children
        // above it have been rejected.
        let mut stack = vec![];
        for layer in [self.background, self.separator, self.context, self.menu] {
            stack.push((layer.index(), false));
        }

        let nodes = &self.nodes;
        while let Some((idx, expanded)) = stack.pop() {
            let i = idx as usize;
            if expanded {
                if !nodes.marks[i].contains(Marks::NOT_DRAGGABLE) {
                    return nodes.handle(idx);
                }
                continue;
            }
            if !nodes.is_visible_at(idx) || !nodes.bounds[i].contains_point(point) {
                continue;
            }
            stack.push((idx, true));
            // Bottom to top, so the topmost child is popped first.
            let mut child = nodes.first_child[i];
            while child != INVALID {
                stack.push((child, false));
                child = nodes.next_sibling[child as usize];
            }
        }
        None
    }
}
