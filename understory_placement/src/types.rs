// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for placement: sides, alignments, requests, and resolved positions.

use core::fmt;
use core::str::FromStr;

use kurbo::{Point, Rect, Size};

use crate::error::ParsePlacementError;

/// Side of the anchor on which the surface is placed.
///
/// The side determines the primary axis: `Top`/`Bottom` place along the
/// vertical axis and align horizontally, `Left`/`Right` the other way round.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Side {
    /// Above the anchor.
    Top,
    /// Below the anchor.
    #[default]
    Bottom,
    /// Left of the anchor.
    Left,
    /// Right of the anchor.
    Right,
}

impl Side {
    /// The side on the opposite edge of the anchor.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// True for `Top` and `Bottom`, whose primary axis is vertical.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Alignment of the surface along the anchor's cross axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Align {
    /// Surface start edge flush with the anchor start edge.
    Start,
    /// Surface centered on the anchor.
    #[default]
    Center,
    /// Surface end edge flush with the anchor end edge.
    End,
}

/// A named direction: side plus cross-axis alignment.
///
/// Parses from and formats to the usual overlay vocabulary: `"top"`,
/// `"top-start"`, `"right-end"`, and so on. A bare side means `Center`.
///
/// ```
/// use understory_placement::{Align, Placement, Side};
///
/// let p: Placement = "left-end".parse().unwrap();
/// assert_eq!(p, Placement::new(Side::Left, Align::End));
/// assert_eq!(Placement::TOP.to_string(), "top");
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    /// Side of the anchor.
    pub side: Side,
    /// Alignment along the cross axis.
    pub align: Align,
}

impl Placement {
    /// Centered above the anchor.
    pub const TOP: Self = Self::new(Side::Top, Align::Center);
    /// Centered below the anchor.
    pub const BOTTOM: Self = Self::new(Side::Bottom, Align::Center);
    /// Centered left of the anchor.
    pub const LEFT: Self = Self::new(Side::Left, Align::Center);
    /// Centered right of the anchor.
    pub const RIGHT: Self = Self::new(Side::Right, Align::Center);

    /// Create a placement from a side and an alignment.
    #[must_use]
    pub const fn new(side: Side, align: Align) -> Self {
        Self { side, align }
    }

    /// Same alignment on the opposite side.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        Self::new(self.side.mirrored(), self.align)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.side.as_str())?;
        match self.align {
            Align::Start => f.write_str("-start"),
            Align::Center => Ok(()),
            Align::End => f.write_str("-end"),
        }
    }
}

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (side, align) = match s.split_once('-') {
            Some((side, align)) => (side, Some(align)),
            None => (s, None),
        };
        let side = match side {
            "top" => Side::Top,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            "right" => Side::Right,
            _ => return Err(ParsePlacementError::UnknownSide),
        };
        let align = match align {
            None => Align::Center,
            Some("start") => Align::Start,
            Some("end") => Align::End,
            Some(_) => return Err(ParsePlacementError::UnknownAlign),
        };
        Ok(Self::new(side, align))
    }
}

/// A placement request: direction, gap from the anchor, and flip behavior.
///
/// Passed to [`compute_position`](crate::compute_position).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlacementConfig {
    /// Requested direction.
    pub placement: Placement,
    /// Distance in pixels between the anchor edge and the surface.
    pub gap: f64,
    /// Flip to the mirrored side when the requested side overflows the
    /// viewport, and shift along the cross axis to stay inside it.
    pub auto_flip: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            placement: Placement::BOTTOM,
            gap: 0.0,
            auto_flip: true,
        }
    }
}

impl PlacementConfig {
    /// Create a request for `placement` with no gap and flipping enabled.
    #[must_use]
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            ..Self::default()
        }
    }

    /// Set the gap between anchor and surface.
    #[must_use]
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Enable or disable flipping and cross-axis shifting.
    #[must_use]
    pub fn with_auto_flip(mut self, auto_flip: bool) -> Self {
        self.auto_flip = auto_flip;
        self
    }
}

/// A resolved surface position.
///
/// `top`/`left` are absolute coordinates in the anchor's coordinate space.
/// `placement` is the direction actually used, which differs from the
/// requested one when the calculator flipped (hosts use it to orient a caret).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Top edge of the surface.
    pub top: f64,
    /// Left edge of the surface.
    pub left: f64,
    /// Direction that produced this position.
    pub placement: Placement,
}

impl Position {
    /// Top-left corner as a point.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// The surface box at this position for a surface of the given size.
    #[must_use]
    pub fn rect(&self, size: Size) -> Rect {
        Rect::from_origin_size(self.origin(), size)
    }
}
