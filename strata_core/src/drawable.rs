// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget contract consumed by the layout and paint passes.
//!
//! The compositor never touches pixels or measures text. It decides *which*
//! nodes need work and hands each of them to a [`Drawable`], which is
//! implemented by the application's widget layer (a text area, a toolbar, a
//! context menu) or by a test double.
//!
//! # Paint cycle pseudocode
//!
//! A run loop typically wires the pieces together like this:
//!
//! ```rust,ignore
//! fn on_frame(ui: &mut MultiLayer, widgets: &mut Widgets, window: &mut Window) {
//!     // Input and content changes mark nodes between frames.
//!     ui.nodes_mut().mark_needs_paint(edited_row);
//!
//!     // Layout, overlay reconciliation, pruned paint traversal.
//!     let dirty = ui.paint_marked(widgets);
//!
//!     // Present only the pixels that changed.
//!     if !dirty.is_empty() {
//!         window.present(dirty);
//!     }
//! }
//! ```

use crate::node::{NodeId, NodeStore};

/// Paints and lays out individual nodes on behalf of the compositor.
pub trait Drawable {
    /// Draws `id` within its bounds.
    ///
    /// Called once per paint cycle for every visible node carrying
    /// `NEEDS_PAINT`, parents before children and children bottom to top.
    /// The store is borrowed immutably, so no marks can change while a
    /// cycle is painting.
    fn draw(&mut self, nodes: &NodeStore, id: NodeId);

    /// Lays out `id`, typically by assigning bounds to its children.
    ///
    /// Called parent-before-child for every node of a subtree whose root
    /// carries `NEEDS_LAYOUT`. The default does nothing, for widgets whose
    /// geometry is assigned from outside.
    fn layout(&mut self, nodes: &mut NodeStore, id: NodeId) {
        _ = (nodes, id);
    }
}
