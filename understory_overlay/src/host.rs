// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contracts: what a render host provides to a session.
//!
//! ## Overview
//!
//! The engine paints nothing, owns no clock, and listens to no device. A render host
//! supplies those capabilities through four small traits:
//!
//! - [`RenderHost`]: mount, present, unmount, and measure the surface.
//! - [`Scheduler`]: one-shot animation frames and timers carrying a [`Token`].
//! - [`ListenerRegistry`]: attach and detach global listeners.
//! - [`ParentLookup`]: walk from an event target towards the root for containment checks.
//!
//! [`OverlayHost`] bundles them and is implemented for every type that implements all four.
//!
//! ## Callbacks
//!
//! The host delivers results back through the session:
//! a fired frame or timer calls [`SurfaceSession::fire`](crate::session::SurfaceSession::fire)
//! with its token, and listener events call
//! [`handle_escape`](crate::session::SurfaceSession::handle_escape),
//! [`handle_pointer_down`](crate::session::SurfaceSession::handle_pointer_down), or
//! [`handle_scroll`](crate::session::SurfaceSession::handle_scroll).
//! Stale deliveries are ignored, so cancellation on the host side may be best-effort.

use core::time::Duration;

use crate::types::{ListenerKind, Measurement, SurfaceState, Token};

/// Paints and measures a single surface.
///
/// Each session drives exactly one surface through its host.
pub trait RenderHost {
    /// Node identifier used for pointer targets and containment checks.
    type Node: Copy + Eq + core::fmt::Debug;

    /// Mount the surface in its invisible pre-enter state.
    fn mount(&mut self);

    /// Apply the given phase and position (animation state, coordinates).
    fn present(&mut self, state: SurfaceState);

    /// Unmount the surface. Implies the session is closed.
    fn unmount(&mut self);

    /// Measure anchor, surface, and viewport.
    ///
    /// Returns `None` when no committed layout is available.
    fn measure(&mut self) -> Option<Measurement>;

    /// Root node of the anchor subtree, if any.
    fn anchor_node(&self) -> Option<Self::Node>;

    /// Root node of the surface subtree while mounted.
    fn surface_node(&self) -> Option<Self::Node>;
}

/// One-shot frame and timer scheduling.
///
/// When a scheduled callback runs, the host passes its token to
/// [`SurfaceSession::fire`](crate::session::SurfaceSession::fire).
pub trait Scheduler {
    /// Handle used to cancel a pending callback.
    type TimerHandle: Copy + Eq + core::fmt::Debug;

    /// Run the callback on the next animation frame.
    fn request_frame(&mut self, token: Token) -> Self::TimerHandle;

    /// Run the callback after `delay`. A zero delay means "next turn", never synchronously.
    fn set_timeout(&mut self, delay: Duration, token: Token) -> Self::TimerHandle;

    /// Cancel a pending callback. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: Self::TimerHandle);
}

/// Global listener attachment.
///
/// Each session owns its listeners; there is no shared dispatcher.
pub trait ListenerRegistry {
    /// Handle used to detach a listener.
    type ListenerHandle: Copy + Eq + core::fmt::Debug;

    /// Attach a listener of the given kind on behalf of the calling session.
    fn listen(&mut self, kind: ListenerKind) -> Self::ListenerHandle;

    /// Detach a listener. Unknown handles are ignored.
    fn unlisten(&mut self, handle: Self::ListenerHandle);
}

/// Look up the parent of a node to test subtree containment.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// Everything a [`SurfaceSession`](crate::session::SurfaceSession) needs from its host.
pub trait OverlayHost:
    RenderHost + Scheduler + ListenerRegistry + ParentLookup<<Self as RenderHost>::Node>
{
}

impl<T> OverlayHost for T where
    T: RenderHost + Scheduler + ListenerRegistry + ParentLookup<<T as RenderHost>::Node>
{
}

/// True if `node` is `root` or one of its descendants.
///
/// Walks parents from `node`; the caller ensures acyclic ancestry.
pub fn is_within<K: Copy + Eq>(node: K, root: K, lookup: &impl ParentLookup<K>) -> bool {
    let mut cur = node;
    loop {
        if cur == root {
            return true;
        }
        match lookup.parent_of(&cur) {
            Some(p) => cur = p,
            None => return false,
        }
    }
}
