// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_placement --heading-base-level=0

//! Understory Placement: anchored positioning for transient overlays.
//!
//! Tooltips, popovers, menus, and similar surfaces are placed next to a trigger element (the anchor).
//! This crate resolves a requested direction into concrete coordinates.
//!
//! - A [`Placement`] names a side (`top`, `bottom`, `left`, `right`) and an optional cross-axis
//!   alignment (`-start`, `-end`; centered otherwise).
//! - A [`PlacementConfig`] adds the gap between anchor and surface and whether to flip.
//! - [`compute_position`] resolves the request against the measured anchor, surface, and viewport
//!   and returns a [`Position`]: the surface's top-left corner plus the placement actually used.
//!
//! It is pure and stateless. Call it on every layout pass; identical inputs yield identical output.
//!
//! ## Not a layout engine
//!
//! This crate does not measure anything.
//! The render host supplies the anchor box, the (already laid out, not yet visible) surface box,
//! and the visible viewport, all in one coordinate space.
//!
//! ## Flipping
//!
//! With [`PlacementConfig::auto_flip`] the calculator flips to the mirrored side when the requested
//! side would overflow the viewport and the mirrored side has room, then shifts the surface along
//! the cross axis to keep it inside the viewport. The flip is evaluated once; when neither side has
//! room the requested side is kept and the surface overflows.
//!
//! ## Invalid input
//!
//! Non-finite coordinates or negative sizes never panic. The naive position for the requested
//! placement is returned instead; see [`check_geometry`] to detect the condition up front.
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::Rect;
//! use understory_placement::{Placement, PlacementConfig, compute_position};
//!
//! let viewport = Rect::new(0.0, 0.0, 1024.0, 768.0);
//! let anchor = Rect::new(400.0, 300.0, 480.0, 332.0);
//! let surface = Rect::new(0.0, 0.0, 160.0, 40.0);
//!
//! let config = PlacementConfig::new("top-start".parse().unwrap()).with_gap(6.0);
//! let pos = compute_position(anchor, surface, &config, viewport);
//! assert_eq!(pos.placement, config.placement);
//! assert_eq!((pos.left, pos.top), (400.0, 254.0));
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to Kurbo.
//! - `libm`: `no_std` float math through Kurbo's `libm` feature. Enable one of `std` or `libm`.
//! - `serde`: `Serialize`/`Deserialize` for [`Placement`], [`PlacementConfig`], and
//!   [`Position`]. Sides and alignments use lowercase names.
//!
//! The serde tests are gated on the `serde` feature and only run with
//! `cargo test --all-features` (or `--features serde`).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod compute;
mod error;
mod types;

pub use compute::compute_position;
pub use error::{GeometryError, GeometryInput, ParsePlacementError, check_geometry};
pub use types::{Align, Placement, PlacementConfig, Position, Side};
