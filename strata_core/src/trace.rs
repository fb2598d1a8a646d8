// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the paint cycle.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! compositor calls at each stage of a paint cycle. All method bodies default
//! to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates per-node [`NodeDrawn`] events and
//!   the corresponding `TraceSink` method.

use crate::compositor::FloatLayerKind;
use crate::geometry::IntRect;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why an overlay node was scheduled for repaint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ForceReason {
    /// Background content beneath the overlay is about to repaint.
    PendingPaintBelow,
    /// A lower float layer beneath the overlay is about to repaint.
    LowerOverlay,
    /// The float layer ran its layout hook (overlay shown, moved, resized).
    Layout,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a paint cycle starts.
#[derive(Clone, Copy, Debug)]
pub struct PaintBeginEvent {
    /// Monotonic paint-cycle counter.
    pub cycle: u64,
    /// Whether a layout pass runs before painting.
    pub layout_pending: bool,
}

/// Emitted after a layout pass.
#[derive(Clone, Copy, Debug)]
pub struct LayoutEvent {
    /// Paint-cycle counter.
    pub cycle: u64,
    /// Number of nodes handed to [`Drawable::layout`](crate::drawable::Drawable::layout).
    pub laid_out: u32,
    /// Number of float layers whose layout hook ran.
    pub float_layers: u32,
}

/// Emitted when an overlay node is forced to repaint.
#[derive(Clone, Copy, Debug)]
pub struct OverlayForcedEvent {
    /// Paint-cycle counter.
    pub cycle: u64,
    /// Which float layer the overlay belongs to.
    pub layer: FloatLayerKind,
    /// Slot index of the overlay node.
    pub node: u32,
    /// Bounds of the overlay node.
    pub bounds: IntRect,
    /// What triggered the repaint.
    pub reason: ForceReason,
}

/// Emitted after background nodes beneath an overlay were marked.
#[derive(Clone, Copy, Debug)]
pub struct CoveredMarkedEvent {
    /// Paint-cycle counter.
    pub cycle: u64,
    /// Which float layer requested the marking.
    pub layer: FloatLayerKind,
    /// The query rectangle.
    pub rect: IntRect,
    /// Union of the bounds of every node newly marked.
    pub marked: IntRect,
}

/// Per-cycle summary of the paint traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaintSummary {
    /// Paint-cycle counter.
    pub cycle: u64,
    /// Nodes the traversal looked at.
    pub visited: u32,
    /// Nodes handed to [`Drawable::draw`](crate::drawable::Drawable::draw).
    pub drawn: u32,
    /// Subtrees skipped because they carried no paint marks.
    pub pruned: u32,
    /// Subtrees skipped because their root was hidden.
    pub hidden: u32,
    /// Union of the drawn nodes' bounds.
    pub dirty: IntRect,
}

/// A per-node draw record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct NodeDrawn {
    /// Paint-cycle counter.
    pub cycle: u64,
    /// Slot index of the drawn node.
    pub node: u32,
    /// Bounds the node was drawn at.
    pub bounds: IntRect,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the compositor.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a paint cycle starts.
    fn on_paint_begin(&mut self, e: &PaintBeginEvent) {
        _ = e;
    }

    /// Called after a layout pass.
    fn on_layout(&mut self, e: &LayoutEvent) {
        _ = e;
    }

    /// Called when an overlay node is forced to repaint.
    fn on_overlay_forced(&mut self, e: &OverlayForcedEvent) {
        _ = e;
    }

    /// Called after background nodes beneath an overlay were marked.
    fn on_covered_marked(&mut self, e: &CoveredMarkedEvent) {
        _ = e;
    }

    /// Called with the summary of a finished paint traversal.
    fn on_paint_summary(&mut self, s: &PaintSummary) {
        _ = s;
    }

    /// Called once per drawn node (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_node_drawn(&mut self, e: &NodeDrawn) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PaintBeginEvent`].
    #[inline]
    pub fn paint_begin(&mut self, e: &PaintBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_paint_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayoutEvent`].
    #[inline]
    pub fn layout(&mut self, e: &LayoutEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layout(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`OverlayForcedEvent`].
    #[inline]
    pub fn overlay_forced(&mut self, e: &OverlayForcedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_overlay_forced(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CoveredMarkedEvent`].
    #[inline]
    pub fn covered_marked(&mut self, e: &CoveredMarkedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_covered_marked(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PaintSummary`].
    #[inline]
    pub fn paint_summary(&mut self, s: &PaintSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_paint_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`NodeDrawn`] record (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn node_drawn(&mut self, e: &NodeDrawn) {
        if let Some(s) = &mut self.sink {
            s.on_node_drawn(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> PaintSummary {
        PaintSummary {
            cycle: 3,
            visited: 9,
            drawn: 2,
            pruned: 4,
            hidden: 1,
            dirty: IntRect::new(0, 0, 15, 15),
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_paint_begin(&PaintBeginEvent {
            cycle: 0,
            layout_pending: false,
        });
        sink.on_overlay_forced(&OverlayForcedEvent {
            cycle: 0,
            layer: FloatLayerKind::Menu,
            node: 7,
            bounds: IntRect::ZERO,
            reason: ForceReason::Layout,
        });
        sink.on_paint_summary(&sample_summary());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.layout(&LayoutEvent {
            cycle: 1,
            laid_out: 4,
            float_layers: 0,
        });
        tracer.paint_summary(&sample_summary());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            dirty: Vec<IntRect>,
        }
        impl TraceSink for RecordingSink {
            fn on_paint_summary(&mut self, s: &PaintSummary) {
                self.dirty.push(s.dirty);
            }
        }

        let mut sink = RecordingSink { dirty: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.paint_summary(&sample_summary());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.dirty, &[IntRect::new(0, 0, 15, 15)]);
    }
}
