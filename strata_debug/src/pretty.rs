// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use strata_core::compositor::FloatLayerKind;
use strata_core::geometry::IntRect;
use strata_core::trace::{
    CoveredMarkedEvent, ForceReason, LayoutEvent, NodeDrawn, OverlayForcedEvent,
    PaintBeginEvent, PaintSummary, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn layer_name(layer: FloatLayerKind) -> &'static str {
    match layer {
        FloatLayerKind::Context => "context",
        FloatLayerKind::Menu => "menu",
    }
}

fn reason_name(reason: ForceReason) -> &'static str {
    match reason {
        ForceReason::PendingPaintBelow => "below",
        ForceReason::LowerOverlay => "lower-overlay",
        ForceReason::Layout => "layout",
    }
}

/// Formats a rectangle as `x0,y0..x1,y1`, or `-` when empty.
struct Rect(IntRect);

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = self.0;
        if r.is_empty() {
            f.write_str("-")
        } else {
            write!(f, "{},{}..{},{}", r.x0, r.y0, r.x1, r.y1)
        }
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_paint_begin(&mut self, e: &PaintBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[paint] cycle={} layout={}",
            e.cycle, e.layout_pending,
        );
    }

    fn on_layout(&mut self, e: &LayoutEvent) {
        let _ = writeln!(
            self.writer,
            "[layout] cycle={} nodes={} floats={}",
            e.cycle, e.laid_out, e.float_layers,
        );
    }

    fn on_overlay_forced(&mut self, e: &OverlayForcedEvent) {
        let _ = writeln!(
            self.writer,
            "[forced] cycle={} {} node={} bounds={} reason={}",
            e.cycle,
            layer_name(e.layer),
            e.node,
            Rect(e.bounds),
            reason_name(e.reason),
        );
    }

    fn on_covered_marked(&mut self, e: &CoveredMarkedEvent) {
        let _ = writeln!(
            self.writer,
            "[covered] cycle={} {} rect={} marked={}",
            e.cycle,
            layer_name(e.layer),
            Rect(e.rect),
            Rect(e.marked),
        );
    }

    fn on_paint_summary(&mut self, s: &PaintSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] cycle={} visited={} drawn={} pruned={} hidden={} dirty={}",
            s.cycle,
            s.visited,
            s.drawn,
            s.pruned,
            s.hidden,
            Rect(s.dirty),
        );
    }

    fn on_node_drawn(&mut self, e: &NodeDrawn) {
        let _ = writeln!(
            self.writer,
            "[drawn] cycle={} node={} bounds={}",
            e.cycle,
            e.node,
            Rect(e.bounds),
        );
    }
}
