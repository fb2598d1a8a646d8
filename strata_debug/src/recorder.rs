// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use strata_core::compositor::FloatLayerKind;
use strata_core::geometry::IntRect;
use strata_core::trace::{
    CoveredMarkedEvent, ForceReason, LayoutEvent, NodeDrawn, OverlayForcedEvent,
    PaintBeginEvent, PaintSummary, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PAINT_BEGIN: u8 = 1;
const TAG_LAYOUT: u8 = 2;
const TAG_OVERLAY_FORCED: u8 = 3;
const TAG_COVERED_MARKED: u8 = 4;
const TAG_PAINT_SUMMARY: u8 = 5;
const TAG_NODE_DRAWN: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_rect(&mut self, r: IntRect) {
        for v in [r.x0, r.y0, r.x1, r.y1] {
            self.buf.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn write_layer(&mut self, layer: FloatLayerKind) {
        self.write_u8(match layer {
            FloatLayerKind::Context => 0,
            FloatLayerKind::Menu => 1,
        });
    }

    fn write_reason(&mut self, reason: ForceReason) {
        self.write_u8(match reason {
            ForceReason::PendingPaintBelow => 0,
            ForceReason::LowerOverlay => 1,
            ForceReason::Layout => 2,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_paint_begin(&mut self, e: &PaintBeginEvent) {
        self.write_u8(TAG_PAINT_BEGIN);
        self.write_u64(e.cycle);
        self.write_u8(u8::from(e.layout_pending));
    }

    fn on_layout(&mut self, e: &LayoutEvent) {
        self.write_u8(TAG_LAYOUT);
        self.write_u64(e.cycle);
        self.write_u32(e.laid_out);
        self.write_u32(e.float_layers);
    }

    fn on_overlay_forced(&mut self, e: &OverlayForcedEvent) {
        self.write_u8(TAG_OVERLAY_FORCED);
        self.write_u64(e.cycle);
        self.write_layer(e.layer);
        self.write_u32(e.node);
        self.write_rect(e.bounds);
        self.write_reason(e.reason);
    }

    fn on_covered_marked(&mut self, e: &CoveredMarkedEvent) {
        self.write_u8(TAG_COVERED_MARKED);
        self.write_u64(e.cycle);
        self.write_layer(e.layer);
        self.write_rect(e.rect);
        self.write_rect(e.marked);
    }

    fn on_paint_summary(&mut self, s: &PaintSummary) {
        self.write_u8(TAG_PAINT_SUMMARY);
        self.write_u64(s.cycle);
        self.write_u32(s.visited);
        self.write_u32(s.drawn);
        self.write_u32(s.pruned);
        self.write_u32(s.hidden);
        self.write_rect(s.dirty);
    }

    fn on_node_drawn(&mut self, e: &NodeDrawn) {
        self.write_u8(TAG_NODE_DRAWN);
        self.write_u64(e.cycle);
        self.write_u32(e.node);
        self.write_rect(e.bounds);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`PaintBeginEvent`].
    PaintBegin(PaintBeginEvent),
    /// A [`LayoutEvent`].
    Layout(LayoutEvent),
    /// An [`OverlayForcedEvent`].
    OverlayForced(OverlayForcedEvent),
    /// A [`CoveredMarkedEvent`].
    CoveredMarked(CoveredMarkedEvent),
    /// A [`PaintSummary`].
    PaintSummary(PaintSummary),
    /// A [`NodeDrawn`] record.
    NodeDrawn(NodeDrawn),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Iteration stops at the first unknown tag or truncated record.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.take().map(i32::from_le_bytes)
    }

    fn read_rect(&mut self) -> Option<IntRect> {
        Some(IntRect::new(
            self.read_i32()?,
            self.read_i32()?,
            self.read_i32()?,
            self.read_i32()?,
        ))
    }

    fn read_layer(&mut self) -> Option<FloatLayerKind> {
        Some(match self.read_u8()? {
            0 => FloatLayerKind::Context,
            _ => FloatLayerKind::Menu,
        })
    }

    fn read_reason(&mut self) -> Option<ForceReason> {
        Some(match self.read_u8()? {
            0 => ForceReason::PendingPaintBelow,
            1 => ForceReason::LowerOverlay,
            _ => ForceReason::Layout,
        })
    }

    fn decode_paint_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PaintBegin(PaintBeginEvent {
            cycle: self.read_u64()?,
            layout_pending: self.read_u8()? != 0,
        }))
    }

    fn decode_layout(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Layout(LayoutEvent {
            cycle: self.read_u64()?,
            laid_out: self.read_u32()?,
            float_layers: self.read_u32()?,
        }))
    }

    fn decode_overlay_forced(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::OverlayForced(OverlayForcedEvent {
            cycle: self.read_u64()?,
            layer: self.read_layer()?,
            node: self.read_u32()?,
            bounds: self.read_rect()?,
            reason: self.read_reason()?,
        }))
    }

    fn decode_covered_marked(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::CoveredMarked(CoveredMarkedEvent {
            cycle: self.read_u64()?,
            layer: self.read_layer()?,
            rect: self.read_rect()?,
            marked: self.read_rect()?,
        }))
    }

    fn decode_paint_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PaintSummary(PaintSummary {
            cycle: self.read_u64()?,
            visited: self.read_u32()?,
            drawn: self.read_u32()?,
            pruned: self.read_u32()?,
            hidden: self.read_u32()?,
            dirty: self.read_rect()?,
        }))
    }

    fn decode_node_drawn(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::NodeDrawn(NodeDrawn {
            cycle: self.read_u64()?,
            node: self.read_u32()?,
            bounds: self.read_rect()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_PAINT_BEGIN => self.decode_paint_begin(),
            TAG_LAYOUT => self.decode_layout(),
            TAG_OVERLAY_FORCED => self.decode_overlay_forced(),
            TAG_COVERED_MARKED => self.decode_covered_marked(),
            TAG_PAINT_SUMMARY => self.decode_paint_summary(),
            TAG_NODE_DRAWN => self.decode_node_drawn(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use strata_core::compositor::MultiLayer;
    use strata_core::drawable::Drawable;
    use strata_core::node::{NodeId, NodeStore};
    use strata_core::trace::Tracer;

    use super::*;

    struct Nothing;

    impl Drawable for Nothing {
        fn draw(&mut self, _: &NodeStore, _: NodeId) {}
    }

    #[test]
    fn records_a_paint_cycle() {
        let mut ui = MultiLayer::new(IntRect::new(0, 0, 100, 100));
        let (bg, ctx) = (ui.background(), ui.context());
        let nodes = ui.nodes_mut();
        let a = nodes.create_node(IntRect::new(0, 0, 10, 10));
        let f = nodes.create_node(IntRect::new(5, 5, 15, 15));
        nodes.append_child(bg, a);
        nodes.append_child(ctx, f);
        nodes.mark_needs_paint(a);

        let mut rec = RecorderSink::new();
        ui.paint_marked_traced(&mut Nothing, &mut Tracer::new(&mut rec));

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert!(matches!(
            events[0],
            RecordedEvent::PaintBegin(PaintBeginEvent {
                cycle: 1,
                layout_pending: false
            })
        ));
        match &events[1] {
            RecordedEvent::OverlayForced(e) => {
                assert_eq!(e.layer, FloatLayerKind::Context);
                assert_eq!(e.node, f.index());
                assert_eq!(e.bounds, IntRect::new(5, 5, 15, 15));
                assert_eq!(e.reason, ForceReason::PendingPaintBelow);
            }
            other => panic!("expected OverlayForced, got {other:?}"),
        }
        match &events[2] {
            RecordedEvent::CoveredMarked(e) => {
                assert_eq!(e.rect, IntRect::new(5, 5, 15, 15));
                // `a` was already scheduled.
                assert_eq!(e.marked, IntRect::ZERO);
            }
            other => panic!("expected CoveredMarked, got {other:?}"),
        }
        let drawn: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::NodeDrawn(d) => Some(d.node),
                _ => None,
            })
            .collect();
        assert_eq!(drawn, [a.index(), f.index()]);
        match events.last() {
            Some(RecordedEvent::PaintSummary(s)) => {
                assert_eq!(s.drawn, 2);
                assert_eq!(s.dirty, IntRect::new(0, 0, 15, 15));
            }
            other => panic!("expected PaintSummary, got {other:?}"),
        }
    }

    #[test]
    fn layout_event_survives_recording() {
        let mut rec = RecorderSink::new();
        rec.on_layout(&LayoutEvent {
            cycle: 9,
            laid_out: 12,
            float_layers: 2,
        });
        let events: Vec<_> = decode(&rec.into_bytes()).collect();
        match &events[..] {
            [RecordedEvent::Layout(e)] => {
                assert_eq!((e.cycle, e.laid_out, e.float_layers), (9, 12, 2));
            }
            other => panic!("expected one Layout, got {other:?}"),
        }
    }

    #[test]
    fn negative_coordinates_survive_recording() {
        let mut rec = RecorderSink::new();
        rec.on_covered_marked(&CoveredMarkedEvent {
            cycle: 1,
            layer: FloatLayerKind::Menu,
            rect: IntRect::new(-20, -5, 3, 4),
            marked: IntRect::new(-30, -10, 0, 10),
        });
        match decode(rec.as_bytes()).next() {
            Some(RecordedEvent::CoveredMarked(e)) => {
                assert_eq!(e.layer, FloatLayerKind::Menu);
                assert_eq!(e.rect, IntRect::new(-20, -5, 3, 4));
                assert_eq!(e.marked, IntRect::new(-30, -10, 0, 10));
            }
            other => panic!("expected CoveredMarked, got {other:?}"),
        }
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_paint_summary(&PaintSummary {
            cycle: 2,
            visited: 3,
            drawn: 1,
            pruned: 2,
            hidden: 0,
            dirty: IntRect::new(0, 0, 5, 5),
        });
        let bytes = rec.into_bytes();
        assert_eq!(decode(&bytes).count(), 1);
        assert_eq!(decode(&bytes[..bytes.len() - 1]).count(), 0);
    }
}
