// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position computation.
//!
//! ## Overview
//!
//! Resolves a [`PlacementConfig`] against measured boxes.
//! The primary axis is the side's axis; the cross axis is aligned by [`Align`].
//!
//! ## Flip and shift
//!
//! - Flip is evaluated once: when the requested side overflows the viewport and the
//!   mirrored side fits, the mirrored side is used. Otherwise the requested side is kept
//!   and may overflow.
//! - After flipping, the cross-axis offset is clamped into the viewport when the viewport
//!   is large enough to hold the surface along that axis.
//! - Both steps only run when [`PlacementConfig::auto_flip`] is set.

use kurbo::{Rect, Size};

use crate::error::check_geometry;
use crate::types::{Align, Placement, PlacementConfig, Position, Side};

/// Compute where to put `surface` relative to `anchor`.
///
/// `anchor` and `viewport` share one coordinate space; only the size of
/// `surface` is consulted. The function is pure and idempotent.
///
/// Invalid input (non-finite coordinates or negative sizes) does not fail:
/// the naive position for the requested placement is returned without
/// flipping or shifting, and a warning is logged.
///
/// ```
/// use kurbo::Rect;
/// use understory_placement::{Placement, PlacementConfig, compute_position};
///
/// let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
/// let anchor = Rect::new(100.0, 560.0, 180.0, 592.0);
/// let surface = Rect::new(0.0, 0.0, 120.0, 80.0);
///
/// let config = PlacementConfig::new(Placement::BOTTOM).with_gap(4.0);
/// let pos = compute_position(anchor, surface, &config, viewport);
/// // Not enough room below the anchor, so the surface flips above it.
/// assert_eq!(pos.placement, Placement::TOP);
/// assert_eq!(pos.top, 560.0 - 4.0 - 80.0);
/// assert_eq!(pos.left, 80.0);
/// ```
pub fn compute_position(
    anchor: Rect,
    surface: Rect,
    config: &PlacementConfig,
    viewport: Rect,
) -> Position {
    let size = surface.size();
    let requested = config.placement;

    if let Err(err) = check_geometry(anchor, surface, viewport) {
        tracing::warn!(
            %err,
            placement = %requested,
            "invalid placement geometry, using naive position"
        );
        return place(anchor, size, requested, config.gap);
    }
    if !config.auto_flip {
        return place(anchor, size, requested, config.gap);
    }

    let mut resolved = requested;
    let side = requested.side;
    if overflows(anchor, size, side, config.gap, viewport)
        && !overflows(anchor, size, side.mirrored(), config.gap, viewport)
    {
        resolved = requested.mirrored();
    }

    let mut pos = place(anchor, size, resolved, config.gap);
    if resolved.side.is_vertical() {
        pos.left = shift(pos.left, size.width, viewport.x0, viewport.x1);
    } else {
        pos.top = shift(pos.top, size.height, viewport.y0, viewport.y1);
    }
    pos
}

/// Naive position: primary offset from the anchor edge plus gap, cross offset by alignment.
fn place(anchor: Rect, size: Size, placement: Placement, gap: f64) -> Position {
    let (top, left) = match placement.side {
        Side::Top => (
            anchor.y0 - gap - size.height,
            cross(anchor.x0, anchor.x1, size.width, placement.align),
        ),
        Side::Bottom => (
            anchor.y1 + gap,
            cross(anchor.x0, anchor.x1, size.width, placement.align),
        ),
        Side::Left => (
            cross(anchor.y0, anchor.y1, size.height, placement.align),
            anchor.x0 - gap - size.width,
        ),
        Side::Right => (
            cross(anchor.y0, anchor.y1, size.height, placement.align),
            anchor.x1 + gap,
        ),
    };
    Position {
        top,
        left,
        placement,
    }
}

fn cross(start: f64, end: f64, extent: f64, align: Align) -> f64 {
    match align {
        Align::Start => start,
        Align::Center => (start + end) * 0.5 - extent * 0.5,
        Align::End => end - extent,
    }
}

/// Room between the anchor edge on `side` and the matching viewport edge.
fn available(anchor: Rect, side: Side, viewport: Rect) -> f64 {
    match side {
        Side::Top => anchor.y0 - viewport.y0,
        Side::Bottom => viewport.y1 - anchor.y1,
        Side::Left => anchor.x0 - viewport.x0,
        Side::Right => viewport.x1 - anchor.x1,
    }
}

fn overflows(anchor: Rect, size: Size, side: Side, gap: f64, viewport: Rect) -> bool {
    let needed = gap
        + if side.is_vertical() {
            size.height
        } else {
            size.width
        };
    needed > available(anchor, side, viewport)
}

fn shift(offset: f64, extent: f64, min: f64, max: f64) -> f64 {
    if extent > max - min {
        // Cannot fit; keep the start edge visible.
        return min;
    }
    offset.clamp(min, max - extent)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    fn surface(w: f64, h: f64) -> Rect {
        Rect::new(0.0, 0.0, w, h)
    }

    fn near(a: f64, b: f64) -> bool {
        a - b < 1.0 && b - a < 1.0
    }

    #[test]
    fn center_alignment_centers_on_anchor() {
        let anchor = Rect::new(300.0, 250.0, 380.0, 282.0);
        let s = surface(121.0, 47.0);
        for placement in [
            Placement::TOP,
            Placement::BOTTOM,
            Placement::LEFT,
            Placement::RIGHT,
        ] {
            let cfg = PlacementConfig::new(placement).with_gap(8.0);
            let pos = compute_position(anchor, s, &cfg, VIEWPORT);
            let r = pos.rect(s.size());
            if placement.side.is_vertical() {
                assert!(near(r.center().x, anchor.center().x), "{placement}");
            } else {
                assert!(near(r.center().y, anchor.center().y), "{placement}");
            }
            assert_eq!(pos.placement, placement);
        }
    }

    #[test]
    fn primary_offset_includes_gap() {
        let anchor = Rect::new(100.0, 50.0, 180.0, 82.0);
        let s = surface(40.0, 20.0);
        let at = |p: Placement| {
            compute_position(anchor, s, &PlacementConfig::new(p).with_gap(4.0), VIEWPORT)
        };
        assert_eq!(at(Placement::BOTTOM).top, 86.0);
        assert_eq!(at(Placement::TOP).top, 26.0);
        assert_eq!(at(Placement::RIGHT).left, 184.0);
        assert_eq!(at(Placement::LEFT).left, 56.0);
    }

    #[test]
    fn start_and_end_alignment() {
        let anchor = Rect::new(100.0, 100.0, 180.0, 132.0);
        let s = surface(40.0, 10.0);
        let start = compute_position(
            anchor,
            s,
            &PlacementConfig::new("bottom-start".parse().unwrap()),
            VIEWPORT,
        );
        assert_eq!(start.left, 100.0);
        let end = compute_position(
            anchor,
            s,
            &PlacementConfig::new("bottom-end".parse().unwrap()),
            VIEWPORT,
        );
        assert_eq!(end.left, 140.0);
        let right_end = compute_position(
            anchor,
            s,
            &PlacementConfig::new("right-end".parse().unwrap()),
            VIEWPORT,
        );
        assert_eq!(right_end.top, 122.0);
    }

    #[test]
    fn flips_bottom_to_top_near_viewport_bottom() {
        let anchor = Rect::new(300.0, 560.0, 380.0, 590.0);
        let s = surface(100.0, 60.0);
        let cfg = PlacementConfig::new(Placement::BOTTOM).with_gap(6.0);
        let pos = compute_position(anchor, s, &cfg, VIEWPORT);
        assert_eq!(pos.placement, Placement::TOP);
        assert!(pos.top + s.height() <= VIEWPORT.y1);
        assert!(pos.top >= VIEWPORT.y0);
        assert_eq!(pos.top, 560.0 - 6.0 - 60.0);
    }

    #[test]
    fn flips_horizontally_and_keeps_alignment() {
        let anchor = Rect::new(760.0, 200.0, 790.0, 230.0);
        let s = surface(120.0, 40.0);
        let cfg = PlacementConfig::new("right-start".parse().unwrap());
        let pos = compute_position(anchor, s, &cfg, VIEWPORT);
        assert_eq!(pos.placement, "left-start".parse().unwrap());
        assert_eq!(pos.left, 640.0);
        assert_eq!(pos.top, 200.0);
    }

    #[test]
    fn no_flip_with_ample_space() {
        let anchor = Rect::new(300.0, 250.0, 380.0, 282.0);
        let s = surface(100.0, 60.0);
        for name in ["top", "bottom-start", "left-end", "right"] {
            let requested: Placement = name.parse().unwrap();
            let pos = compute_position(anchor, s, &PlacementConfig::new(requested), VIEWPORT);
            assert_eq!(pos.placement, requested);
        }
    }

    #[test]
    fn keeps_requested_side_when_neither_fits() {
        let viewport = Rect::new(0.0, 0.0, 400.0, 100.0);
        let anchor = Rect::new(100.0, 40.0, 200.0, 60.0);
        let s = surface(50.0, 80.0);
        let pos = compute_position(anchor, s, &PlacementConfig::new(Placement::BOTTOM), viewport);
        assert_eq!(pos.placement, Placement::BOTTOM);
        assert_eq!(pos.top, 60.0);
    }

    #[test]
    fn shift_clamps_cross_axis_into_viewport() {
        let anchor = Rect::new(5.0, 100.0, 25.0, 120.0);
        let s = surface(200.0, 30.0);
        let pos = compute_position(anchor, s, &PlacementConfig::new(Placement::BOTTOM), VIEWPORT);
        assert_eq!(pos.left, 0.0);

        let anchor = Rect::new(790.0, 100.0, 800.0, 120.0);
        let pos = compute_position(anchor, s, &PlacementConfig::new(Placement::TOP), VIEWPORT);
        assert_eq!(pos.left, 600.0);
    }

    #[test]
    fn oversized_surface_pins_to_viewport_start() {
        let anchor = Rect::new(300.0, 100.0, 320.0, 120.0);
        let s = surface(1000.0, 30.0);
        let pos = compute_position(anchor, s, &PlacementConfig::new(Placement::BOTTOM), VIEWPORT);
        assert_eq!(pos.left, 0.0);
    }

    #[test]
    fn auto_flip_disabled_keeps_naive_position() {
        let anchor = Rect::new(5.0, 560.0, 25.0, 590.0);
        let s = surface(200.0, 60.0);
        let cfg = PlacementConfig::new(Placement::BOTTOM).with_auto_flip(false);
        let pos = compute_position(anchor, s, &cfg, VIEWPORT);
        assert_eq!(pos.placement, Placement::BOTTOM);
        assert_eq!(pos.top, 590.0);
        assert_eq!(pos.left, 15.0 - 100.0);
    }

    #[test]
    fn invalid_input_falls_back_to_naive() {
        let anchor = Rect::new(300.0, 560.0, 380.0, 590.0);
        let s = surface(100.0, 60.0);
        let cfg = PlacementConfig::new(Placement::BOTTOM);
        let bad_viewport = Rect::new(0.0, 0.0, f64::NAN, 600.0);
        let pos = compute_position(anchor, s, &cfg, bad_viewport);
        assert_eq!(pos.placement, Placement::BOTTOM);
        assert_eq!(pos.top, 590.0);
        assert_eq!(pos.left, 290.0);

        let negative = Rect::new(0.0, 0.0, -10.0, 60.0);
        let pos = compute_position(anchor, negative, &cfg, VIEWPORT);
        assert_eq!(pos.placement, Placement::BOTTOM);
        assert_eq!(pos.top, 590.0);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let anchor = Rect::new(300.0, 560.0, 380.0, 590.0);
        let s = surface(100.0, 60.0);
        let cfg = PlacementConfig::new(Placement::BOTTOM).with_gap(2.0);
        let first = compute_position(anchor, s, &cfg, VIEWPORT);
        for _ in 0..8 {
            assert_eq!(compute_position(anchor, s, &cfg, VIEWPORT), first);
        }
    }
}
