// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pruned layout pass.

use alloc::vec;
use alloc::vec::Vec;

use crate::drawable::Drawable;
use crate::node::{INVALID, Marks};
use crate::trace::{LayoutEvent, Tracer};

use super::{LayerRole, MultiLayer};

/// One entry of the explicit layout stack.
#[derive(Clone, Copy, Debug)]
enum Visit {
    /// Lay out the node (if `full`) and schedule its children.
    Enter { idx: u32, full: bool },
    /// All of the node's children are done.
    Exit { idx: u32 },
}

impl MultiLayer {
    /// Runs the pruned layout pass.
    ///
    /// A node carrying `NEEDS_LAYOUT` is handed to
    /// [`Drawable::layout`] together with its whole subtree, parents before
    /// children, and is then marked as needing paint. A node carrying only
    /// `CHILD_NEEDS_LAYOUT` is descended into without being laid out itself;
    /// subtrees without layout marks are skipped.
    ///
    /// Float layers are laid out like any other node but are not repainted
    /// themselves; once the pass is done, each float layer reached runs its
    /// [layout hook](super::FloatLayer::layout).
    ///
    /// [`paint_marked`](Self::paint_marked) calls this automatically when a
    /// layout mark is pending.
    pub fn layout_marked(&mut self, drawable: &mut dyn Drawable) {
        self.layout_pass(drawable, &mut Tracer::none());
    }

    pub(crate) fn layout_pass(&mut self, drawable: &mut dyn Drawable, tracer: &mut Tracer<'_>) {
        let mut laid_out = 0_u32;
        let mut floats = Vec::new();
        let mut stack = vec![Visit::Enter {
            idx: self.root.index(),
            full: false,
        }];

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter { idx, full } => {
                    let marks = self.nodes.marks[idx as usize];
                    let full = full || marks.contains(Marks::NEEDS_LAYOUT);
                    if !full && !marks.contains(Marks::CHILD_NEEDS_LAYOUT) {
                        continue;
                    }
                    stack.push(Visit::Exit { idx });

                    if full {
                        self.nodes.clear_marks_at(idx, Marks::NEEDS_LAYOUT);
                        if let Some(id) = self.nodes.handle(idx) {
                            drawable.layout(&mut self.nodes, id);
                            laid_out += 1;
                        }
                        if let LayerRole::Float(kind) = self.nodes.role[idx as usize] {
                            if !floats.contains(&kind) {
                                floats.push(kind);
                            }
                        } else {
                            self.nodes.mark_needs_paint_at(idx);
                        }
                    }

                    // Children are read after `layout`, which may rearrange
                    // them. Pushed top to bottom so the bottommost is laid
                    // out first.
                    let mut child = self.nodes.last_child[idx as usize];
                    while child != INVALID {
                        stack.push(Visit::Enter { idx: child, full });
                        child = self.nodes.prev_sibling[child as usize];
                    }
                }
                Visit::Exit { idx } => {
                    // Marks raised by `layout` calls below this node stay
                    // pending for the next pass.
                    self.nodes.refresh_child_marks_at(idx);
                }
            }
        }

        let cycle = self.cycle;
        for &kind in &floats {
            self.float_layer(kind).layout_traced(cycle, tracer);
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "there are two float layers"
        )]
        let float_layers = floats.len() as u32;
        tracer.layout(&LayoutEvent {
            cycle,
            laid_out,
            float_layers,
        });
    }
}
