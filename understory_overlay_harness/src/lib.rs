// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic driver for Understory Overlay sessions.
//!
//! [`VirtualHost`] implements every host trait against a virtual clock and records what it
//! was asked to render. The free functions in this crate advance that clock and deliver
//! listener events the way a real host would: an event only reaches the session if the
//! session has a listener of that kind attached.
//!
//! [`HostFaults`] simulates a host whose cancellation leaks, to check that stale callbacks
//! are ignored.
//!
//! ```
//! use core::time::Duration;
//! use understory_overlay::session::SurfaceSession;
//! use understory_overlay::types::{SessionConfig, SurfacePhase};
//! use understory_overlay_harness::{VirtualHost, advance};
//!
//! let mut session = SurfaceSession::new(VirtualHost::new(), SessionConfig::unanchored());
//! session.open();
//! advance(&mut session, VirtualHost::FRAME);
//! assert_eq!(session.phase(), SurfacePhase::Visible);
//! session.close();
//! advance(&mut session, Duration::from_millis(150));
//! assert_eq!(session.phase(), SurfacePhase::Closed);
//! assert_eq!(session.host().unmounts(), 1);
//! ```

#![no_std]

extern crate alloc;

mod virtual_host;

use core::time::Duration;

use kurbo::{Rect, Size};
use understory_overlay::session::SurfaceSession;
use understory_overlay::types::{ListenerKind, Measurement};

pub use virtual_host::{
    HostFaults, Instruction, ListenerId, NodeId, TRANSITION_STYLES, TimerId, VirtualHost,
};

/// Advance virtual time by `by`, firing every callback that falls due. Returns how many fired.
///
/// Callbacks scheduled while firing are delivered too if they fall due within the window.
pub fn advance(session: &mut SurfaceSession<VirtualHost>, by: Duration) -> usize {
    let deadline = session.host().now() + by;
    let mut fired = 0;
    while let Some(token) = session.host_mut().pop_due(deadline) {
        session.fire(token);
        fired += 1;
    }
    session.host_mut().settle_clock(deadline);
    fired
}

/// Run the next turn: fire everything due now, including zero-delay timers.
pub fn next_turn(session: &mut SurfaceSession<VirtualHost>) -> usize {
    advance(session, Duration::ZERO)
}

/// Press Escape. Returns true if the session requested a close.
pub fn dispatch_escape(session: &mut SurfaceSession<VirtualHost>) -> bool {
    session.host().is_listening(ListenerKind::Escape) && session.handle_escape()
}

/// Press the pointer on `target`. Returns true if the session requested a close.
pub fn dispatch_pointer_down(session: &mut SurfaceSession<VirtualHost>, target: NodeId) -> bool {
    session.host().is_listening(ListenerKind::OutsidePointer) && session.handle_pointer_down(target)
}

/// Scroll the viewport. Returns true if the session requested a close.
pub fn dispatch_scroll(session: &mut SurfaceSession<VirtualHost>) -> bool {
    session.host().is_listening(ListenerKind::Scroll) && session.handle_scroll()
}

/// Build a measurement for a surface of `size` laid out at the origin.
#[must_use]
pub fn layout(anchor: Rect, size: Size, viewport: Rect) -> Measurement {
    Measurement {
        anchor,
        surface: Rect::from_origin_size((0.0, 0.0), size),
        viewport,
    }
}
