// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported for malformed placement input.

use kurbo::Rect;

/// Failure to parse a [`Placement`](crate::Placement) name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParsePlacementError {
    /// The side is not one of `top`, `bottom`, `left`, `right`.
    #[error("unknown placement side")]
    UnknownSide,
    /// The alignment suffix is not `start` or `end`.
    #[error("unknown placement alignment")]
    UnknownAlign,
}

/// Which input rectangle was rejected by [`check_geometry`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GeometryInput {
    /// The anchor box.
    Anchor,
    /// The surface box.
    Surface,
    /// The viewport box.
    Viewport,
}

/// Invalid geometry handed to the calculator.
///
/// [`compute_position`](crate::compute_position) never fails; on invalid
/// input it returns the naive position instead. Callers that want to log the
/// condition can run [`check_geometry`] themselves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// A coordinate is NaN or infinite.
    #[error("{0:?} has a non-finite coordinate")]
    NonFinite(GeometryInput),
    /// Width or height is negative.
    #[error("{0:?} has a negative size")]
    NegativeSize(GeometryInput),
}

/// Validate calculator input.
///
/// All three boxes must be finite and have non-negative width and height.
pub fn check_geometry(anchor: Rect, surface: Rect, viewport: Rect) -> Result<(), GeometryError> {
    check_rect(anchor, GeometryInput::Anchor)?;
    check_rect(surface, GeometryInput::Surface)?;
    check_rect(viewport, GeometryInput::Viewport)
}

fn check_rect(r: Rect, which: GeometryInput) -> Result<(), GeometryError> {
    if !(r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite()) {
        return Err(GeometryError::NonFinite(which));
    }
    if r.width() < 0.0 || r.height() < 0.0 {
        return Err(GeometryError::NegativeSize(which));
    }
    Ok(())
}
