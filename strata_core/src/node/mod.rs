// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node tree data model.
//!
//! A *node* is a rectangular element of the widget tree. Each node has:
//!
//! - An identity ([`NodeId`]), a generational handle that becomes stale when
//!   the node is destroyed, preventing use-after-free bugs at the API level.
//! - Topology: an ordered list of owned children (later children paint on
//!   top) and a non-owning parent link, used only to propagate marks upward.
//! - Screen-space [`bounds`](NodeStore::bounds) on the integer pixel grid.
//! - A [`Marks`] bitset recording pending paint/layout work and node state.
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles.
//!
//! # Mark protocol
//!
//! [`mark_needs_paint`](NodeStore::mark_needs_paint) and
//! [`mark_needs_layout`](NodeStore::mark_needs_layout) set the node's own
//! mark and walk the parent chain setting `CHILD_NEEDS_PAINT` /
//! `CHILD_NEEDS_LAYOUT`, stopping at the first ancestor that already carries
//! it. Consumers can therefore skip any subtree whose root carries neither
//! mark in O(1).

mod id;
mod marks;
mod overlap;
mod store;
mod traverse;

pub use id::{INVALID, NodeId};
pub use marks::Marks;
pub use store::NodeStore;
pub use traverse::{Children, Descendants};
