// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_overlay --heading-base-level=0

//! Understory Overlay: a deterministic lifecycle engine for transient surfaces.
//!
//! Tooltips, popovers, dropdown menus, and modal dialogs share one problem: a surface is
//! mounted on demand, animates in, is dismissed by several external signals, animates out, and
//! is unmounted, all while frames and timers from a previous cycle may still fire.
//! This crate owns that sequencing so each component only supplies its content and policy.
//!
//! ## Phases
//!
//! A surface moves through `Closed → Mounting → Visible → Closing → Closed`
//! (see [`SurfacePhase`](types::SurfacePhase)).
//!
//! - `open` mounts the surface in its pre-enter state and waits one animation frame.
//! - On that frame the anchored position is measured and the surface becomes visible.
//! - `close` starts the exit animation; the surface unmounts when it has elapsed.
//! - Reopening during the exit animation restarts the enter sequence without unmounting.
//!
//! Every phase change advances a [`Generation`](types::Generation). Frames and timers carry a
//! [`Token`](types::Token) stamped with the generation they were scheduled under, so callbacks
//! from a superseded cycle are ignored even if the host fails to cancel them.
//!
//! ## Dismissal
//!
//! A [`DismissalPolicy`](types::DismissalPolicy) selects which signals request a close:
//! the Escape key, a pointer press outside both the anchor and the surface, a scroll, or an
//! auto-close timeout. The outside-pointer listener is attached one turn after open, so the
//! press that opened the surface cannot close it.
//!
//! In [`OpenControl::Controlled`](types::OpenControl::Controlled) mode a close request only
//! reaches the open-change callback; the caller decides whether to actually close.
//!
//! ## Host contract
//!
//! The engine paints nothing and owns no clock. A render host implements the traits in
//! [`host`] and forwards fired callbacks and listener events to the
//! [`SurfaceSession`](session::SurfaceSession).
//!
//! ## Minimal usage
//!
//! ```no_run
//! use understory_overlay::host::OverlayHost;
//! use understory_overlay::session::SurfaceSession;
//! use understory_overlay::types::{DismissalPolicy, DismissTriggers, SessionConfig};
//! use understory_placement::{Placement, PlacementConfig};
//!
//! fn tooltip<H: OverlayHost>(host: H) -> SurfaceSession<H> {
//!     let config = SessionConfig::anchored(PlacementConfig::new(Placement::TOP).with_gap(4.0))
//!         .with_dismissal(DismissalPolicy::new(DismissTriggers::ESCAPE));
//!     let mut session = SurfaceSession::new(host, config);
//!     session.open();
//!     session
//! }
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to Kurbo.
//! - `libm`: `no_std` float math through Kurbo's `libm` feature. Enable one of `std` or `libm`.
//! - `serde`: `Serialize`/`Deserialize` for the configuration types in [`types`], including
//!   the placement types re-exported from [`placement`].
//!
//! The serde tests are gated on the `serde` feature and only run with
//! `cargo test --all-features` (or `--features serde`).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dismissal;
pub mod host;
pub mod lifecycle;
pub mod session;
pub mod styles;
pub mod types;

mod timers;

pub use understory_placement as placement;
