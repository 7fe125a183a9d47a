// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface session: one overlay instance wired to its host.
//!
//! ## Overview
//!
//! [`SurfaceSession`] composes the [`Lifecycle`], the [`Dismissal`] coordinator, and the
//! placement calculator, and carries out their steps against an [`OverlayHost`].
//! It exclusively owns its timers and listeners; destroying or dropping it releases both.
//!
//! ## Ordering
//!
//! - `open`/`close` apply synchronously. Two calls in the same turn collapse to the effect
//!   of the last one.
//! - Frames and timers apply in the order the host fires them. Stale ones are no-ops.
//! - Close requests from dismissal signals are issued only while the surface is opening or
//!   open. In [`OpenControl::Controlled`] mode they only reach the open-change callback.

use alloc::boxed::Box;
use core::fmt;

use understory_placement::{Position, compute_position};

use crate::dismissal::Dismissal;
use crate::host::OverlayHost;
use crate::lifecycle::{Lifecycle, Step};
use crate::timers::Timers;
use crate::types::{
    DismissReason, Generation, OpenControl, SessionConfig, SurfacePhase, SurfaceState, Token,
    Wakeup,
};

type OpenChangeFn = Box<dyn FnMut(bool, DismissReason)>;

/// Lifecycle, dismissal, and placement of one overlay instance.
///
/// ## Usage
///
/// - Create one session per overlay instance with [`SurfaceSession::new`]; never share it.
/// - Optionally register [`SurfaceSession::with_open_change`] to observe close requests.
/// - Call [`open`](Self::open) / [`close`](Self::close) on caller intent.
/// - Forward fired frames/timers to [`fire`](Self::fire) and listener events to
///   [`handle_escape`](Self::handle_escape), [`handle_pointer_down`](Self::handle_pointer_down),
///   and [`handle_scroll`](Self::handle_scroll).
/// - Call [`remeasure`](Self::remeasure) on resize or scroll.
/// - Call [`destroy`](Self::destroy) when the owning UI instance is torn down. Dropping the
///   session does the same.
pub struct SurfaceSession<H: OverlayHost> {
    host: H,
    config: SessionConfig,
    lifecycle: Lifecycle,
    dismissal: Dismissal<H::ListenerHandle>,
    timers: Timers<H::TimerHandle>,
    position: Option<Position>,
    on_open_change: Option<OpenChangeFn>,
}

impl<H: OverlayHost> fmt::Debug for SurfaceSession<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceSession")
            .field("phase", &self.lifecycle.phase())
            .field("generation", &self.lifecycle.generation())
            .field("position", &self.position)
            .field("pending_timers", &self.timers.len())
            .field("destroyed", &self.lifecycle.is_destroyed())
            .finish_non_exhaustive()
    }
}

impl<H: OverlayHost> SurfaceSession<H> {
    /// Create a closed session driving `host`.
    pub fn new(host: H, config: SessionConfig) -> Self {
        Self {
            host,
            lifecycle: Lifecycle::new(config.animation_duration),
            dismissal: Dismissal::new(config.dismissal),
            timers: Timers::new(),
            position: None,
            on_open_change: None,
            config,
        }
    }

    /// Register the open-change callback.
    ///
    /// Called with `false` and the reason whenever a dismissal signal requests a close,
    /// in both modes. In controlled mode this is the only effect of the request.
    #[must_use]
    pub fn with_open_change(mut self, f: impl FnMut(bool, DismissReason) + 'static) -> Self {
        self.on_open_change = Some(Box::new(f));
        self
    }

    /// The session's configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> SurfacePhase {
        self.lifecycle.phase()
    }

    /// Last resolved position.
    ///
    /// `None` when unanchored, not yet measured, or closed.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Current generation.
    pub fn generation(&self) -> Generation {
        self.lifecycle.generation()
    }

    /// Number of scheduled callbacks not yet fired or cancelled.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// True once [`destroy`](Self::destroy) has run.
    pub fn is_destroyed(&self) -> bool {
        self.lifecycle.is_destroyed()
    }

    /// Shared access to the host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Exclusive access to the host.
    ///
    /// Do not use it to mutate state the session handed to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Open the surface. No-op while opening/open or after destroy.
    pub fn open(&mut self) {
        let steps = self.lifecycle.open();
        self.apply(steps);
    }

    /// Close the surface. No-op while closing/closed or after destroy.
    pub fn close(&mut self) {
        let steps = self.lifecycle.close();
        self.apply(steps);
    }

    /// Mirror a caller-owned open value.
    pub fn set_open(&mut self, open: bool) {
        if open {
            self.open();
        } else {
            self.close();
        }
    }

    /// Deliver a fired frame or timer.
    pub fn fire(&mut self, token: Token) {
        self.timers.settle(token);
        if self.lifecycle.is_destroyed() {
            return;
        }
        match token.wakeup() {
            Wakeup::EnterFrame | Wakeup::ExitElapsed => {
                let steps = self.lifecycle.fire(token);
                self.apply(steps);
            }
            Wakeup::AutoClose => {
                if self.lifecycle.accepts(token) {
                    self.request_close(DismissReason::Timeout);
                } else {
                    tracing::debug!(?token, "ignoring stale auto-close timer");
                }
            }
            Wakeup::ArmOutsidePointer => self.dismissal.arm(&mut self.host, token),
        }
    }

    /// Escape key pressed. Returns true if a close was requested.
    pub fn handle_escape(&mut self) -> bool {
        match self.dismissal.on_escape() {
            Some(reason) => self.request_close(reason),
            None => false,
        }
    }

    /// Pointer pressed on `target`. Returns true if a close was requested.
    pub fn handle_pointer_down(&mut self, target: H::Node) -> bool {
        match self.dismissal.on_pointer_down(&self.host, target) {
            Some(reason) => self.request_close(reason),
            None => false,
        }
    }

    /// Viewport scrolled. Returns true if a close was requested.
    pub fn handle_scroll(&mut self) -> bool {
        match self.dismissal.on_scroll() {
            Some(reason) => self.request_close(reason),
            None => false,
        }
    }

    /// Recompute the anchored position after a layout change.
    ///
    /// Only measures while `Visible` or `Closing`. Presents the new state to the host
    /// when the position changed.
    pub fn remeasure(&mut self) -> Option<Position> {
        let phase = self.phase();
        if !matches!(phase, SurfacePhase::Visible | SurfacePhase::Closing) {
            return self.position;
        }
        if let Some(next) = self.measure()
            && self.position != Some(next)
        {
            self.position = Some(next);
            self.host.present(SurfaceState {
                phase,
                position: self.position,
            });
        }
        self.position
    }

    /// Release timers and listeners and invalidate in-flight callbacks.
    ///
    /// Idempotent. Afterwards every entry point is a no-op and the phase reads `Closed`.
    /// The host receives no unmount: the owning UI instance removes its own nodes.
    pub fn destroy(&mut self) {
        let steps = self.lifecycle.destroy();
        if steps.is_empty() {
            return;
        }
        self.apply(steps);
        self.timers.cancel_where(&mut self.host, |_| true);
        self.position = None;
        self.on_open_change = None;
        tracing::debug!("surface session destroyed");
    }

    fn request_close(&mut self, reason: DismissReason) -> bool {
        if !self.phase().is_open() {
            return false;
        }
        let controlled = self.config.control == OpenControl::Controlled;
        tracing::debug!(?reason, controlled, "close requested");
        if let Some(f) = self.on_open_change.as_mut() {
            f(false, reason);
        }
        if !controlled {
            self.close();
        }
        true
    }

    fn measure(&mut self) -> Option<Position> {
        let placement = self.config.placement?;
        let m = self.host.measure()?;
        Some(compute_position(m.anchor, m.surface, &placement, m.viewport))
    }

    fn apply(&mut self, steps: impl IntoIterator<Item = Step>) {
        for step in steps {
            match step {
                Step::Mount => self.host.mount(),
                Step::Present(phase) => self.host.present(SurfaceState {
                    phase,
                    position: self.position,
                }),
                Step::Measure => {
                    if let Some(pos) = self.measure() {
                        self.position = Some(pos);
                    }
                }
                Step::RequestFrame(token) => self.timers.frame(&mut self.host, token),
                Step::SetTimeout(delay, token) => self.timers.after(&mut self.host, delay, token),
                Step::CancelTimers => self.timers.cancel_where(&mut self.host, |t| {
                    t.wakeup() != Wakeup::ArmOutsidePointer
                }),
                Step::Attach => {
                    let generation = self.lifecycle.generation();
                    self.dismissal
                        .attach(&mut self.host, &mut self.timers, generation);
                }
                Step::Rearm => {
                    self.timers.cancel_where(&mut self.host, |t| {
                        t.wakeup() == Wakeup::ArmOutsidePointer
                    });
                    let generation = self.lifecycle.generation();
                    self.dismissal
                        .rearm(&mut self.host, &mut self.timers, generation);
                }
                Step::Entered => {
                    let generation = self.lifecycle.generation();
                    self.dismissal
                        .entered(&mut self.host, &mut self.timers, generation);
                }
                Step::Detach => {
                    self.dismissal.detach(&mut self.host);
                    self.timers.cancel_where(&mut self.host, |t| {
                        t.wakeup() == Wakeup::ArmOutsidePointer
                    });
                }
                Step::Unmount => {
                    self.position = None;
                    self.host.unmount();
                }
            }
        }
    }
}

impl<H: OverlayHost> Drop for SurfaceSession<H> {
    fn drop(&mut self) {
        self.destroy();
    }
}
