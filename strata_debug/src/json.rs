// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON exporter for recorded paint cycles.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes a JSON array with one object per event, in recording order.
//! Every object carries an `"event"` name and the paint `"cycle"`; rectangles
//! are `[x0, y0, x1, y1]` arrays.

use std::io::{self, Write};

use serde_json::{Value, json};

use strata_core::geometry::IntRect;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a pretty-printed JSON array.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes).map(|e| to_value(&e)).collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn rect(r: IntRect) -> Value {
    json!([r.x0, r.y0, r.x1, r.y1])
}

fn to_value(recorded: &RecordedEvent) -> Value {
    match recorded {
        RecordedEvent::PaintBegin(e) => json!({
            "event": "PaintBegin",
            "cycle": e.cycle,
            "layout_pending": e.layout_pending,
        }),
        RecordedEvent::Layout(e) => json!({
            "event": "Layout",
            "cycle": e.cycle,
            "laid_out": e.laid_out,
            "float_layers": e.float_layers,
        }),
        RecordedEvent::OverlayForced(e) => json!({
            "event": "OverlayForced",
            "cycle": e.cycle,
            "layer": format!("{:?}", e.layer),
            "node": e.node,
            "bounds": rect(e.bounds),
            "reason": format!("{:?}", e.reason),
        }),
        RecordedEvent::CoveredMarked(e) => json!({
            "event": "CoveredMarked",
            "cycle": e.cycle,
            "layer": format!("{:?}", e.layer),
            "rect": rect(e.rect),
            "marked": rect(e.marked),
        }),
        RecordedEvent::PaintSummary(s) => json!({
            "event": "PaintSummary",
            "cycle": s.cycle,
            "visited": s.visited,
            "drawn": s.drawn,
            "pruned": s.pruned,
            "hidden": s.hidden,
            "dirty": rect(s.dirty),
        }),
        RecordedEvent::NodeDrawn(e) => json!({
            "event": "NodeDrawn",
            "cycle": e.cycle,
            "node": e.node,
            "bounds": rect(e.bounds),
        }),
    }
}
