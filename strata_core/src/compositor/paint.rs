// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The paint entry point and pruned paint traversal.

use alloc::vec;

use crate::drawable::Drawable;
use crate::geometry::IntRect;
use crate::node::{INVALID, Marks};
use crate::trace::{PaintBeginEvent, PaintSummary, Tracer};

use super::{FloatLayerKind, MultiLayer};

impl MultiLayer {
    /// Runs one paint cycle and returns the region that changed.
    ///
    /// Pending layout runs first, then the overlay pre-marking pass (context
    /// layer, then menu layer), then a depth-first traversal that draws
    /// every visible node carrying `NEEDS_PAINT`, parents before children and
    /// children bottom to top. Subtrees without paint marks are skipped, and
    /// hidden subtrees are skipped after their marks are cleared. All paint
    /// marks are consumed, so a second call with no intervening marks draws
    /// nothing and returns [`IntRect::ZERO`].
    ///
    /// The returned rectangle is the union of the drawn nodes' bounds, empty
    /// if nothing was drawn.
    pub fn paint_marked(&mut self, drawable: &mut dyn Drawable) -> IntRect {
        self.paint_marked_traced(drawable, &mut Tracer::none())
    }

    /// Like [`paint_marked`](Self::paint_marked), reporting each stage to
    /// `tracer`.
    pub fn paint_marked_traced(
        &mut self,
        drawable: &mut dyn Drawable,
        tracer: &mut Tracer<'_>,
    ) -> IntRect {
        self.cycle += 1;
        let cycle = self.cycle;
        let layout_pending =
            self.nodes.marks[self.root.index() as usize].intersects(Marks::ANY_LAYOUT);
        tracer.paint_begin(&PaintBeginEvent {
            cycle,
            layout_pending,
        });

        if layout_pending {
            self.layout_pass(drawable, tracer);
        }

        // Bottom to top, so a context overlay scheduled here is seen by the
        // menu layer's check.
        self.float_layer(FloatLayerKind::Context).mark_over_pending(cycle, tracer);
        self.float_layer(FloatLayerKind::Menu).mark_over_pending(cycle, tracer);

        let summary = self.paint_pass(drawable, tracer);
        tracer.paint_summary(&summary);
        summary.dirty
    }

    fn paint_pass(
        &mut self,
        drawable: &mut dyn Drawable,
        tracer: &mut Tracer<'_>,
    ) -> PaintSummary {
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = tracer;
        }

        let mut summary = PaintSummary {
            cycle: self.cycle,
            visited: 0,
            drawn: 0,
            pruned: 0,
            hidden: 0,
            dirty: IntRect::ZERO,
        };

        let root = self.root.index();
        if !self.nodes.marks[root as usize].intersects(Marks::ANY_PAINT) {
            summary.pruned = 1;
            return summary;
        }

        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let i = idx as usize;
            summary.visited += 1;

            if !self.nodes.is_visible_at(idx) {
                self.clear_paint_subtree(idx);
                summary.hidden += 1;
                continue;
            }

            let marks = self.nodes.marks[i];
            self.nodes.clear_marks_at(idx, Marks::ANY_PAINT);

            if marks.contains(Marks::NEEDS_PAINT) {
                let bounds = self.nodes.bounds[i];
                if let Some(id) = self.nodes.handle(idx) {
                    drawable.draw(&self.nodes, id);
                }
                self.nodes.painted[i] = Some(bounds);
                summary.dirty = summary.dirty.union(bounds);
                summary.drawn += 1;
                #[cfg(feature = "trace-rich")]
                tracer.node_drawn(&crate::trace::NodeDrawn {
                    cycle: summary.cycle,
                    node: idx,
                    bounds,
                });
            }

            if marks.contains(Marks::CHILD_NEEDS_PAINT) {
                // Top to bottom, so the bottommost child is drawn first.
                let mut child = self.nodes.last_child[i];
                while child != INVALID {
                    if self.nodes.marks[child as usize].intersects(Marks::ANY_PAINT) {
                        stack.push(child);
                    } else {
                        summary.pruned += 1;
                    }
                    child = self.nodes.prev_sibling[child as usize];
                }
            }
        }

        summary
    }

    /// Clears the paint marks of a subtree without drawing it.
    fn clear_paint_subtree(&mut self, top: u32) {
        let mut stack = vec![top];
        while let Some(idx) = stack.pop() {
            let marks = self.nodes.marks[idx as usize];
            self.nodes.clear_marks_at(idx, Marks::ANY_PAINT);
            if marks.contains(Marks::CHILD_NEEDS_PAINT) {
                let mut child = self.nodes.first_child[idx as usize];
                while child != INVALID {
                    if self.nodes.marks[child as usize].intersects(Marks::ANY_PAINT) {
                        stack.push(child);
                    }
                    child = self.nodes.next_sibling[child as usize];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::compositor::{CompositorConfig, MultiLayer};
    use crate::drawable::Drawable;
    use crate::geometry::IntRect;
    use crate::node::{Marks, NodeId, NodeStore};

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> IntRect {
        IntRect::new(x0, y0, x1, y1)
    }

    /// Records every draw call in order.
    #[derive(Default)]
    struct Recorder {
        drawn: Vec<NodeId>,
    }

    impl Drawable for Recorder {
        fn draw(&mut self, nodes: &NodeStore, id: NodeId) {
            assert!(nodes.is_visible(id), "hidden node drawn: {id:?}");
            self.drawn.push(id);
        }
    }

    fn paint(ui: &mut MultiLayer) -> (IntRect, Vec<NodeId>) {
        let mut rec = Recorder::default();
        let dirty = ui.paint_marked(&mut rec);
        (dirty, rec.drawn)
    }

    /// Background split into a left and a right half, one context overlay
    /// over the left half, currently hidden.
    fn halves(config: CompositorConfig) -> (MultiLayer, [NodeId; 3]) {
        let mut ui = MultiLayer::with_config(rect(0, 0, 100, 100), config);
        let (bg, ctx) = (ui.background(), ui.context());
        let nodes = ui.nodes_mut();
        let left = nodes.create_node(rect(0, 0, 50, 100));
        let right = nodes.create_node(rect(50, 0, 100, 100));
        let popup = nodes.create_node(rect(10, 10, 40, 40));
        nodes.append_child(bg, left);
        nodes.append_child(bg, right);
        nodes.append_child(ctx, popup);
        nodes.set_force_zero_bounds(popup, true);
        paint(&mut ui);
        (ui, [left, right, popup])
    }

    fn assert_all_clean(ui: &MultiLayer) {
        for id in ui.nodes().descendants(ui.root()) {
            let marks = ui.nodes().marks(id);
            assert!(
                !marks.intersects(Marks::ANY_PAINT | Marks::ANY_LAYOUT),
                "{id:?} still carries {marks:?}"
            );
        }
    }

    #[test]
    fn overlay_over_repainting_background_is_forced() {
        let mut ui = MultiLayer::new(rect(0, 0, 100, 100));
        let (bg, ctx) = (ui.background(), ui.context());
        let nodes = ui.nodes_mut();
        let a = nodes.create_node(rect(0, 0, 10, 10));
        let f = nodes.create_node(rect(5, 5, 15, 15));
        nodes.append_child(bg, a);
        nodes.append_child(ctx, f);
        nodes.mark_needs_paint(a);

        let (dirty, drawn) = paint(&mut ui);
        assert_eq!(drawn, [a, f]);
        assert_eq!(dirty, rect(0, 0, 15, 15));
        assert_all_clean(&ui);
    }

    #[test]
    fn second_paint_without_marks_draws_nothing() {
        let mut ui = MultiLayer::new(rect(0, 0, 100, 100));
        let (bg, ctx) = (ui.background(), ui.context());
        let nodes = ui.nodes_mut();
        let a = nodes.create_node(rect(0, 0, 10, 10));
        let f = nodes.create_node(rect(5, 5, 15, 15));
        nodes.append_child(bg, a);
        nodes.append_child(ctx, f);
        nodes.mark_needs_paint(a);

        let (first, _) = paint(&mut ui);
        assert!(!first.is_empty());
        let (dirty, drawn) = paint(&mut ui);
        assert!(drawn.is_empty());
        assert_eq!(dirty, IntRect::ZERO);
    }

    #[test]
    fn unmarked_subtrees_are_never_drawn() {
        let mut ui = MultiLayer::new(rect(0, 0, 100, 100));
        let bg = ui.background();
        let nodes = ui.nodes_mut();
        let mut rows = Vec::new();
        for i in 0..5 {
            let row = nodes.create_node(rect(0, 10 * i, 100, 10 * (i + 1)));
            let word = nodes.create_node(rect(0, 10 * i, 20, 10 * (i + 1)));
            nodes.append_child(bg, row);
            nodes.append_child(row, word);
            rows.push((row, word));
        }
        let (_, word) = rows[3];
        nodes.mark_needs_paint(word);

        let mut rec = Recorder::default();
        let mut sink = SummarySink::default();
        let dirty = ui.paint_marked_traced(&mut rec, &mut crate::trace::Tracer::new(&mut sink));
        assert_eq!(rec.drawn, [word]);
        assert_eq!(dirty, rect(0, 30, 20, 40));
        assert_all_clean(&ui);

        #[cfg(feature = "trace")]
        {
            let s = sink.summaries[0];
            assert_eq!(s.drawn, 1);
            // root, background, row 3, word
            assert_eq!(s.visited, 4);
            // three layers above the background, four clean rows
            assert_eq!(s.pruned, 7);
        }
    }

    #[test]
    fn drawing_is_parent_first_and_bottom_to_top() {
        let mut ui = MultiLayer::new(rect(0, 0, 100, 100));
        let (bg, menu) = (ui.background(), ui.menu());
        let nodes = ui.nodes_mut();
        let panel = nodes.create_node(rect(0, 0, 100, 50));
        let a = nodes.create_node(rect(0, 0, 50, 50));
        let b = nodes.create_node(rect(50, 0, 100, 50));
        let popup = nodes.create_node(rect(60, 60, 90, 90));
        nodes.append_child(bg, panel);
        nodes.append_child(panel, a);
        nodes.append_child(panel, b);
        nodes.append_child(menu, popup);
        for id in [popup, b, a, panel] {
            nodes.mark_needs_paint(id);
        }

        let (dirty, drawn) = paint(&mut ui);
        assert_eq!(drawn, [panel, a, b, popup]);
        assert_eq!(dirty, rect(0, 0, 100, 90));
    }

    #[test]
    fn hidden_overlay_is_never_drawn_nor_covers() {
        let mut ui = MultiLayer::new(rect(0, 0, 100, 100));
        let (bg, ctx) = (ui.background(), ui.context());
        let nodes = ui.nodes_mut();
        let a = nodes.create_node(rect(0, 0, 10, 10));
        let c = nodes.create_node(rect(10, 0, 20, 10));
        let f = nodes.create_node(rect(5, 5, 15, 15));
        nodes.append_child(bg, a);
        nodes.append_child(bg, c);
        nodes.append_child(ctx, f);
        nodes.set_force_zero_bounds(f, true);
        nodes.mark_needs_paint(a);
        nodes.mark_needs_paint(f);

        let (dirty, drawn) = paint(&mut ui);
        assert_eq!(drawn, [a]);
        assert_eq!(dirty, rect(0, 0, 10, 10));
        assert_all_clean(&ui);
    }

    #[test]
    fn showing_an_overlay_repaints_it_and_the_background_beneath() {
        let mut ui = MultiLayer::new(rect(0, 0, 100, 100));
        let (bg, ctx) = (ui.background(), ui.context());
        let nodes = ui.nodes_mut();
        let b = nodes.create_node(rect(0, 0, 10, 10));
        let f = nodes.create_node(rect(2, 2, 8, 8));
        nodes.append_child(bg, b);
        nodes.append_child(ctx, f);
        nodes.set_force_zero_bounds(f, true);
        assert_eq!(paint(&mut ui), (IntRect::ZERO, Vec::new()));

        ui.nodes_mut().set_force_zero_bounds(f, false);
        let (dirty, drawn) = paint(&mut ui);
        assert_eq!(drawn, [b, f]);
        assert_eq!(dirty, rect(0, 0, 10, 10));
        assert_all_clean(&ui);

        assert_eq!(paint(&mut ui), (IntRect::ZERO, Vec::new()));
    }

    #[test]
    fn moving_an_overlay_repaints_both_positions() {
        let (mut ui, [left, right, popup]) = halves(CompositorConfig::new());
        ui.nodes_mut().set_force_zero_bounds(popup, false);
        assert_eq!(paint(&mut ui), (rect(0, 0, 50, 100), vec![left, popup]));

        ui.nodes_mut().set_bounds(popup, rect(60, 10, 90, 40));
        ui.nodes_mut().mark_needs_layout(popup);
        let (dirty, drawn) = paint(&mut ui);
        assert_eq!(drawn, [left, right, popup]);
        assert_eq!(dirty, rect(0, 0, 100, 100));
    }

    #[test]
    fn hiding_an_overlay_repaints_what_it_covered() {
        let (mut ui, [left, _, popup]) = halves(CompositorConfig::new());
        ui.nodes_mut().set_force_zero_bounds(popup, false);
        paint(&mut ui);

        ui.nodes_mut().set_force_zero_bounds(popup, true);
        assert_eq!(paint(&mut ui), (rect(0, 0, 50, 100), vec![left]));
        assert_eq!(ui.nodes().painted_bounds(popup), None);
    }

    #[test]
    fn removing_an_overlay_repaints_what_it_covered() {
        let (mut ui, [left, _, popup]) = halves(CompositorConfig::new());
        ui.nodes_mut().set_force_zero_bounds(popup, false);
        paint(&mut ui);

        ui.nodes_mut().remove_from_parent(popup);
        ui.nodes_mut().destroy_node(popup);
        assert_eq!(paint(&mut ui), (rect(0, 0, 50, 100), vec![left]));
        assert_all_clean(&ui);
    }

    #[test]
    fn hiding_without_vacated_tracking_leaves_background_alone() {
        let (mut ui, [_, _, popup]) = halves(CompositorConfig::background_only());
        ui.nodes_mut().set_force_zero_bounds(popup, false);
        paint(&mut ui);

        ui.nodes_mut().set_force_zero_bounds(popup, true);
        assert_eq!(paint(&mut ui), (IntRect::ZERO, Vec::new()));
    }

    fn menu_over_context(config: CompositorConfig) -> (MultiLayer, NodeId, NodeId) {
        let mut ui = MultiLayer::with_config(rect(0, 0, 100, 100), config);
        let (ctx, menu) = (ui.context(), ui.menu());
        let nodes = ui.nodes_mut();
        let hint = nodes.create_node(rect(10, 10, 40, 40));
        let item = nodes.create_node(rect(20, 20, 30, 30));
        nodes.append_child(ctx, hint);
        nodes.append_child(menu, item);
        (ui, hint, item)
    }

    #[test]
    fn menu_repaints_over_repainting_context_overlay() {
        let (mut ui, hint, item) = menu_over_context(CompositorConfig::new());
        ui.nodes_mut().mark_needs_paint(hint);
        let (dirty, drawn) = paint(&mut ui);
        assert_eq!(drawn, [hint, item]);
        assert_eq!(dirty, rect(10, 10, 40, 40));
    }

    #[test]
    fn background_only_config_ignores_lower_overlays() {
        let (mut ui, hint, _) = menu_over_context(CompositorConfig::background_only());
        ui.nodes_mut().mark_needs_paint(hint);
        assert_eq!(paint(&mut ui), (rect(10, 10, 40, 40), vec![hint]));
    }

    #[test]
    fn resize_repaints_everything() {
        let (mut ui, [left, right, popup]) = halves(CompositorConfig::new());
        ui.nodes_mut().set_force_zero_bounds(popup, false);
        paint(&mut ui);

        ui.resize(rect(0, 0, 100, 100));
        let (dirty, drawn) = paint(&mut ui);
        assert_eq!(
            drawn,
            [
                ui.root(),
                ui.background(),
                left,
                right,
                ui.separator(),
                popup,
            ]
        );
        // Float layer roots are laid out but never drawn.
        assert!(!drawn.contains(&ui.context()));
        assert!(!drawn.contains(&ui.menu()));
        assert_eq!(dirty, rect(0, 0, 100, 100));
        assert_all_clean(&ui);
    }

    #[test]
    fn hiding_drawn_content_repaints_its_parent() {
        let (mut ui, [left, right, _]) = halves(CompositorConfig::new());
        ui.nodes_mut().mark_needs_paint(left);
        let (_, drawn) = paint(&mut ui);
        assert_eq!(drawn, [left]);

        ui.nodes_mut().set_force_zero_bounds(left, true);
        let (dirty, drawn) = paint(&mut ui);
        assert_eq!(drawn, [ui.background()]);
        assert_eq!(dirty, rect(0, 0, 100, 100));
        assert!(!drawn.contains(&right));
        assert_eq!(ui.nodes().painted_bounds(left), None);
        assert_all_clean(&ui);

        // Never drawn, so nothing is left behind.
        ui.nodes_mut().set_force_zero_bounds(right, true);
        let (dirty, drawn) = paint(&mut ui);
        assert!(drawn.is_empty());
        assert_eq!(dirty, IntRect::ZERO);
    }

    #[test]
    fn identical_mark_sequences_paint_identically() {
        fn run() -> Vec<(IntRect, Vec<u32>)> {
            let (mut ui, [left, right, popup]) = halves(CompositorConfig::new());
            let mut out = Vec::new();
            let mut step = |ui: &mut MultiLayer| {
                let (dirty, drawn) = paint(ui);
                out.push((dirty, drawn.iter().map(|id| id.index()).collect()));
            };
            ui.nodes_mut().set_force_zero_bounds(popup, false);
            step(&mut ui);
            ui.nodes_mut().mark_needs_paint(right);
            ui.nodes_mut().mark_needs_paint(left);
            step(&mut ui);
            ui.nodes_mut().set_bounds(popup, rect(55, 5, 95, 25));
            ui.nodes_mut().mark_needs_layout(popup);
            step(&mut ui);
            out
        }

        assert_eq!(run(), run());
    }

    #[derive(Default)]
    struct SummarySink {
        summaries: Vec<crate::trace::PaintSummary>,
    }

    impl crate::trace::TraceSink for SummarySink {
        fn on_paint_summary(&mut self, s: &crate::trace::PaintSummary) {
            self.summaries.push(*s);
        }
    }

    #[cfg(feature = "trace")]
    #[test]
    fn traced_paint_reports_overlay_forcing() {
        use crate::trace::{ForceReason, OverlayForcedEvent, TraceSink, Tracer};

        #[derive(Default)]
        struct Sink {
            forced: Vec<ForceReason>,
            layouts: u32,
        }
        impl TraceSink for Sink {
            fn on_overlay_forced(&mut self, e: &OverlayForcedEvent) {
                self.forced.push(e.reason);
            }
            fn on_layout(&mut self, _: &crate::trace::LayoutEvent) {
                self.layouts += 1;
            }
        }

        let (mut ui, [left, _, popup]) = halves(CompositorConfig::new());
        ui.nodes_mut().set_force_zero_bounds(popup, false);
        let mut sink = Sink::default();
        ui.paint_marked_traced(&mut Recorder::default(), &mut Tracer::new(&mut sink));
        assert_eq!(sink.layouts, 1);
        assert_eq!(
            sink.forced,
            [ForceReason::Layout, ForceReason::PendingPaintBelow]
        );

        let mut sink = Sink::default();
        ui.nodes_mut().mark_needs_paint(left);
        ui.paint_marked_traced(&mut Recorder::default(), &mut Tracer::new(&mut sink));
        assert_eq!(sink.layouts, 0);
        assert_eq!(sink.forced, [ForceReason::PendingPaintBelow]);
    }
}
