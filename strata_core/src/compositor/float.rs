// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Float layers: overlays positioned on top of the background.
//!
//! Overlay nodes sit outside normal flow layout. A float layer therefore
//! turns any layout mark arriving from below into its own `NEEDS_LAYOUT`
//! (see [`NodeStore::mark_needs_layout`]), and its layout hook, run by the
//! compositor's layout pass, repaints each visible overlay together with the
//! background it covers.

use alloc::vec::Vec;

use crate::geometry::IntRect;
use crate::node::{INVALID, NodeId, NodeStore};
use crate::trace::{CoveredMarkedEvent, ForceReason, OverlayForcedEvent, Tracer};

use super::{CompositorConfig, FloatLayerKind};

/// A view of one of the two float layers.
///
/// Created by [`MultiLayer::context_layer`](super::MultiLayer::context_layer)
/// and [`MultiLayer::menu_layer`](super::MultiLayer::menu_layer).
#[derive(Debug)]
pub struct FloatLayer<'a> {
    nodes: &'a mut NodeStore,
    id: NodeId,
    kind: FloatLayerKind,
    background: NodeId,
    context: NodeId,
    config: CompositorConfig,
}

impl<'a> FloatLayer<'a> {
    pub(crate) fn new(
        nodes: &'a mut NodeStore,
        id: NodeId,
        kind: FloatLayerKind,
        background: NodeId,
        context: NodeId,
        config: CompositorConfig,
    ) -> Self {
        Self {
            nodes,
            id,
            kind,
            background,
            context,
            config,
        }
    }

    /// The layer root.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Which float layer this is.
    #[must_use]
    pub fn kind(&self) -> FloatLayerKind {
        self.kind
    }

    /// Returns the overlays that are currently shown, bottom to top.
    #[must_use]
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .children(self.id)
            .filter(|&n| self.nodes.is_visible(n))
            .collect()
    }

    /// Runs the layout hook: every visible overlay is scheduled for repaint
    /// along with the background content it covers.
    ///
    /// With [`CompositorConfig::invalidate_vacated`], the background is also
    /// scheduled under the previously painted bounds of overlays that moved,
    /// were hidden, or were removed from the layer.
    ///
    /// Returns the union of the background bounds newly marked.
    pub fn layout(&mut self) -> IntRect {
        self.layout_traced(0, &mut Tracer::none())
    }

    pub(crate) fn layout_traced(&mut self, cycle: u64, tracer: &mut Tracer<'_>) -> IntRect {
        let mut marked = IntRect::ZERO;
        let vacated = self.nodes.take_vacated(self.id.index());
        if self.config.invalidate_vacated {
            for r in vacated {
                marked = marked.union(self.cover(r, cycle, tracer));
            }
        }

        let mut child = self.nodes.first_child[self.id.index() as usize];
        while child != INVALID {
            let c = child as usize;
            let bounds = self.nodes.bounds[c];
            let painted = self.nodes.painted[c];
            if self.nodes.is_visible_at(child) {
                if self.config.invalidate_vacated
                    && let Some(prev) = painted
                    && prev != bounds
                {
                    marked = marked.union(self.cover(prev, cycle, tracer));
                }
                self.nodes.mark_needs_paint_at(child);
                tracer.overlay_forced(&OverlayForcedEvent {
                    cycle,
                    layer: self.kind,
                    node: child,
                    bounds,
                    reason: ForceReason::Layout,
                });
                marked = marked.union(self.cover(bounds, cycle, tracer));
            } else if let Some(prev) = painted {
                // Hidden since it was last drawn.
                self.nodes.painted[c] = None;
                if self.config.invalidate_vacated {
                    marked = marked.union(self.cover(prev, cycle, tracer));
                }
            }
            child = self.nodes.next_sibling[c];
        }
        marked
    }

    /// Overlay pre-marking: schedules each visible overlay sitting over
    /// pending paint, and the background it covers.
    pub(crate) fn mark_over_pending(&mut self, cycle: u64, tracer: &mut Tracer<'_>) {
        let check_lower = self.config.check_lower_overlays && self.kind == FloatLayerKind::Menu;

        let mut child = self.nodes.first_child[self.id.index() as usize];
        while child != INVALID {
            let c = child as usize;
            let bounds = self.nodes.bounds[c];
            if self.nodes.is_visible_at(child) {
                let reason = if self.nodes.has_pending_paint_under(self.background, bounds) {
                    Some(ForceReason::PendingPaintBelow)
                } else if check_lower && self.nodes.has_pending_paint_under(self.context, bounds) {
                    Some(ForceReason::LowerOverlay)
                } else {
                    None
                };
                if let Some(reason) = reason {
                    self.nodes.mark_needs_paint_at(child);
                    tracer.overlay_forced(&OverlayForcedEvent {
                        cycle,
                        layer: self.kind,
                        node: child,
                        bounds,
                        reason,
                    });
                    if reason == ForceReason::PendingPaintBelow {
                        self.cover(bounds, cycle, tracer);
                    }
                }
            }
            child = self.nodes.next_sibling[c];
        }
    }

    /// Schedules the background under `rect`.
    fn cover(&mut self, rect: IntRect, cycle: u64, tracer: &mut Tracer<'_>) -> IntRect {
        let marked = self.nodes.mark_covered_needs_paint(self.background, rect);
        tracer.covered_marked(&CoveredMarkedEvent {
            cycle,
            layer: self.kind,
            rect,
            marked,
        });
        marked
    }
}
