// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layered retained-mode compositing with dirty-rectangle invalidation.
//!
//! `strata_core` decides, once per paint cycle, exactly which widgets of a
//! retained widget tree must be redrawn and which screen region changed. It
//! performs no rasterization: drawing is delegated to a
//! [`Drawable`](drawable::Drawable) implemented by the application. It is
//! `no_std` compatible (with `alloc`) and stores nodes in struct-of-arrays
//! layout behind generational index handles.
//!
//! # Architecture
//!
//! Changes flow in as marks and out as a dirty rectangle:
//!
//! ```text
//!   content edit / overlay shown, moved, hidden
//!       │
//!       ▼
//!   NodeStore::mark_needs_paint / mark_needs_layout
//!       │            (CHILD_NEEDS_* bubbles to the root)
//!       ▼
//!   MultiLayer::paint_marked()
//!       ├── layout pass ──► Drawable::layout, float layer hooks
//!       ├── overlay pre-marking (context, then menu)
//!       └── pruned traversal ──► Drawable::draw
//!                                    │
//!       ┌────────────────────────────┘
//!       ▼
//!   dirty IntRect ──► presented by the run loop
//! ```
//!
//! **[`node`]**: Struct-of-arrays node tree with generational handles and
//! the mark protocol. Marks propagate upward with early stop, so every
//! subtree without pending work can be skipped in O(1).
//!
//! **[`compositor`]**: The fixed four-layer [`MultiLayer`](compositor::MultiLayer)
//! (background, separator, context overlays, menus) and the cross-layer
//! invalidation that keeps overlays and the content beneath them in sync.
//!
//! **[`drawable`]**: The [`Drawable`](drawable::Drawable) trait widgets
//! implement to be laid out and drawn.
//!
//! **[`geometry`]**: Integer pixel-grid rectangles and points, with
//! [`kurbo`] interop.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! paint-cycle instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-node draw
//!   events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod compositor;
pub mod drawable;
pub mod geometry;
pub mod node;
pub mod trace;
