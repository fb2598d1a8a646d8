// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::geometry::IntRect;
use crate::node::{NodeId, NodeStore};

/// A view of the background layer.
///
/// Created by [`MultiLayer::background_layer`](super::MultiLayer::background_layer).
#[derive(Debug)]
pub struct BackgroundLayer<'a> {
    nodes: &'a mut NodeStore,
    id: NodeId,
}

impl<'a> BackgroundLayer<'a> {
    pub(crate) fn new(nodes: &'a mut NodeStore, id: NodeId) -> Self {
        Self { nodes, id }
    }

    /// The layer root.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Schedules the background content under `rect` for repaint.
    ///
    /// Returns the union of the bounds of every node newly marked. See
    /// [`NodeStore::mark_covered_needs_paint`].
    pub fn mark_covered_needs_paint(&mut self, rect: IntRect) -> IntRect {
        self.nodes.mark_covered_needs_paint(self.id, rect)
    }

    /// Returns `true` if background content under `rect` is already
    /// scheduled for repaint.
    #[must_use]
    pub fn has_pending_paint_under(&self, rect: IntRect) -> bool {
        self.nodes.has_pending_paint_under(self.id, rect)
    }
}

#[cfg(test)]
mod tests {
    use crate::compositor::MultiLayer;
    use crate::geometry::IntRect;
    use crate::node::Marks;

    #[test]
    fn covered_marking_stays_inside_the_background() {
        let mut ui = MultiLayer::new(IntRect::new(0, 0, 100, 100));
        let (bg, ctx) = (ui.background(), ui.context());
        let nodes = ui.nodes_mut();
        let text = nodes.create_node(IntRect::new(0, 0, 100, 50));
        let popup = nodes.create_node(IntRect::new(10, 10, 30, 30));
        nodes.append_child(bg, text);
        nodes.append_child(ctx, popup);

        let mut layer = ui.background_layer();
        assert_eq!(layer.id(), bg);
        assert!(!layer.has_pending_paint_under(IntRect::new(10, 10, 30, 30)));
        let marked = layer.mark_covered_needs_paint(IntRect::new(10, 10, 30, 30));
        assert_eq!(marked, IntRect::new(0, 0, 100, 50));
        assert!(layer.has_pending_paint_under(IntRect::new(10, 10, 30, 30)));

        assert!(ui.nodes().marks(text).contains(Marks::NEEDS_PAINT));
        assert!(ui.nodes().marks(popup).is_empty());
        assert!(ui.nodes().marks(ui.root()).contains(Marks::CHILD_NEEDS_PAINT));
    }
}
