// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node mark bitset.
//!
//! Marks come in two kinds:
//!
//! - **Pending work**: [`NEEDS_PAINT`](Marks::NEEDS_PAINT) and
//!   [`NEEDS_LAYOUT`](Marks::NEEDS_LAYOUT) are set by the mark calls on
//!   [`NodeStore`](super::NodeStore) and bubble a matching `CHILD_NEEDS_*`
//!   flag up to every ancestor. They are consumed by the layout and paint
//!   passes.
//! - **State**: [`NOT_DRAGGABLE`](Marks::NOT_DRAGGABLE) and
//!   [`FORCE_ZERO_BOUNDS`](Marks::FORCE_ZERO_BOUNDS) describe the node itself
//!   and never propagate.

use core::fmt;
use core::ops::{BitOr, BitOrAssign};

/// A set of node marks.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Marks(u8);

impl Marks {
    /// No marks.
    pub const EMPTY: Self = Self(0);
    /// The node must be drawn in the next paint cycle.
    pub const NEEDS_PAINT: Self = Self(1 << 0);
    /// Some strict descendant carries `NEEDS_PAINT` or `CHILD_NEEDS_PAINT`.
    pub const CHILD_NEEDS_PAINT: Self = Self(1 << 1);
    /// The node and its subtree must be laid out again.
    pub const NEEDS_LAYOUT: Self = Self(1 << 2);
    /// Some strict descendant carries `NEEDS_LAYOUT` or `CHILD_NEEDS_LAYOUT`.
    pub const CHILD_NEEDS_LAYOUT: Self = Self(1 << 3);
    /// Drag hit-testing falls through this node to whatever lies beneath.
    pub const NOT_DRAGGABLE: Self = Self(1 << 4);
    /// The node is hidden: it is never drawn and occupies no space.
    pub const FORCE_ZERO_BOUNDS: Self = Self(1 << 5);

    /// Both paint marks.
    pub const ANY_PAINT: Self = Self(Self::NEEDS_PAINT.0 | Self::CHILD_NEEDS_PAINT.0);
    /// Both layout marks.
    pub const ANY_LAYOUT: Self = Self(Self::NEEDS_LAYOUT.0 | Self::CHILD_NEEDS_LAYOUT.0);
    /// Marks that describe node state rather than pending work.
    pub const STATE: Self = Self(Self::NOT_DRAGGABLE.0 | Self::FORCE_ZERO_BOUNDS.0);

    const NAMES: [(Self, &'static str); 6] = [
        (Self::NEEDS_PAINT, "NeedsPaint"),
        (Self::CHILD_NEEDS_PAINT, "ChildNeedsPaint"),
        (Self::NEEDS_LAYOUT, "NeedsLayout"),
        (Self::CHILD_NEEDS_LAYOUT, "ChildNeedsLayout"),
        (Self::NOT_DRAGGABLE, "NotDraggable"),
        (Self::FORCE_ZERO_BOUNDS, "ForceZeroBounds"),
    ];

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if no mark is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every mark in `other` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any mark in `other` is set.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Sets every mark in `other`.
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears every mark in `other`.
    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Sets or clears every mark in `other`.
    #[inline]
    pub fn set(&mut self, other: Self, value: bool) {
        if value {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl BitOr for Marks {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Marks {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Marks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for (mark, name) in Self::NAMES {
            if self.contains(mark) {
                set.entry(&format_args!("{name}"));
            }
        }
        set.finish()
    }
}
